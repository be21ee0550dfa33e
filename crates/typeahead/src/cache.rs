//! Per-widget query cache with a known-empty prefix shortcut.
//!
//! Two buckets: populated result sets keyed by exact normalized query, and
//! an ordered list of queries known to have returned nothing.
//!
//! # Invariant
//!
//! Once a query is recorded as empty, every query it prefixes is assumed
//! empty without a lookup. This monotonic-narrowing assumption only holds
//! when the backing lookup implements prefix-narrowing search (extending a
//! query can never grow its result set); the cache does not verify it.
//!
//! The cache is private to one widget instance and lives only as long as
//! the page does.

use std::collections::HashMap;

use crate::suggestion::RenderedItem;

/// A bare mention sigil resolves to a volatile author listing, so its
/// result set is never recorded.
const UNCACHED_QUERY: &str = "@";

/// Outcome of a cache probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cached<'a> {
    /// Exact populated entry for this query.
    Hit(&'a [RenderedItem]),
    /// A recorded empty query is a prefix of this one; render nothing,
    /// skip the lookup.
    Empty,
    /// Nothing known; dispatch a lookup.
    Miss,
}

/// Query-keyed cache of rendered result sets.
#[derive(Debug, Default)]
pub struct QueryCache {
    populated: HashMap<String, Vec<RenderedItem>>,
    known_empty: Vec<String>,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe the cache for a normalized query.
    ///
    /// The empty-prefix check runs before the exact-hit check, matching the
    /// original lookup order.
    #[must_use]
    pub fn probe(&self, query: &str) -> Cached<'_> {
        if self.known_empty.iter().any(|p| query.starts_with(p)) {
            return Cached::Empty;
        }
        match self.populated.get(query) {
            Some(items) => Cached::Hit(items),
            None => Cached::Miss,
        }
    }

    /// Record a resolved result set for a query, filing it into the
    /// populated or known-empty bucket. The `"@"` sentinel is skipped.
    pub fn record(&mut self, query: &str, items: &[RenderedItem]) {
        if query == UNCACHED_QUERY {
            return;
        }
        if items.is_empty() {
            if !self.known_empty.iter().any(|p| p == query) {
                self.known_empty.push(query.to_string());
            }
        } else {
            self.populated.insert(query.to_string(), items.to_vec());
        }
    }

    /// Number of populated entries.
    #[must_use]
    pub fn populated_len(&self) -> usize {
        self.populated.len()
    }

    /// Number of recorded empty queries.
    #[must_use]
    pub fn known_empty_len(&self) -> usize {
        self.known_empty.len()
    }
}
