pub mod types;

pub use types::{
    CaseRecord, Citation, CitationKind, Item, ItemType, PageText, ParenQuote, ParentheticalNote,
    QuoteSource, Quotation, ResolutionType, Section, SectionMetadata, VerificationStrategy,
};
