//! External case-law lookup seam.
//!
//! The engine never talks to a network itself; it drives a [`CaseLookup`]
//! implementation supplied by the caller. [`CachingLookup`] wraps any
//! implementation with per-run memoization so each distinct citation is
//! looked up at most once, even under concurrent prefetch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use brief_types::CaseRecord;
use tokio::sync::{Mutex, OnceCell};

/// Identity of a full case citation for lookup purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CitationKey {
    pub volume: String,
    pub reporter: String,
    pub start_page: u32,
}

impl CitationKey {
    /// The query form lookup providers expect: `"689 S.W.3d 331"`.
    pub fn query(&self) -> String {
        format!("{} {} {}", self.volume, self.reporter, self.start_page)
    }
}

/// A source of case records keyed by citation. Returning `None` means the
/// case could not be found or the provider failed; the pipeline degrades
/// to a review flag either way.
#[async_trait]
pub trait CaseLookup: Send + Sync {
    async fn lookup(&self, key: &CitationKey) -> Option<CaseRecord>;
}

/// Per-run memoizing wrapper. Concurrent callers asking for the same key
/// share one in-flight request instead of issuing duplicates.
pub struct CachingLookup<L> {
    inner: L,
    cells: Mutex<HashMap<CitationKey, Arc<OnceCell<Option<CaseRecord>>>>>,
}

impl<L: CaseLookup> CachingLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cells: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<L: CaseLookup> CaseLookup for CachingLookup<L> {
    async fn lookup(&self, key: &CitationKey) -> Option<CaseRecord> {
        let cell = {
            let mut cells = self.cells.lock().await;
            Arc::clone(cells.entry(key.clone()).or_default())
        };
        cell.get_or_init(|| self.inner.lookup(key)).await.clone()
    }
}

#[async_trait]
impl<L: CaseLookup + ?Sized> CaseLookup for Arc<L> {
    async fn lookup(&self, key: &CitationKey) -> Option<CaseRecord> {
        (**self).lookup(key).await
    }
}

/// Lookup that finds nothing. Useful for offline runs and tests of the
/// degradation path.
pub struct NoopLookup;

#[async_trait]
impl CaseLookup for NoopLookup {
    async fn lookup(&self, _key: &CitationKey) -> Option<CaseRecord> {
        None
    }
}
