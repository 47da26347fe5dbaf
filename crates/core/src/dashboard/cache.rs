//! Dashboard summary caching using Moka.
//!
//! Summaries are cached per scope for a short TTL. Every mutation inside a
//! scope invalidates that scope's entry and the global entry.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use cashbook_shared::types::UserId;

use super::types::{GlobalSummary, ScopeSummary};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default time-to-live for cache entries (1 minute).
const DEFAULT_TTL_SECS: u64 = 60;

/// Cache key: the owning admin of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DashboardKey(pub UserId);

/// Cache for dashboard summaries.
#[derive(Clone)]
pub struct DashboardCache {
    scoped: Cache<DashboardKey, Arc<ScopeSummary>>,
    global: Cache<(), Arc<GlobalSummary>>,
}

impl DashboardCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 1000 entries max, 1 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom configuration.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);
        let scoped = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        let global = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self { scoped, global }
    }

    /// Returns the cached summary for a scope, if fresh.
    #[must_use]
    pub fn scoped(&self, key: DashboardKey) -> Option<Arc<ScopeSummary>> {
        self.scoped.get(&key)
    }

    /// Stores a scope's summary.
    pub fn store_scoped(&self, key: DashboardKey, summary: ScopeSummary) -> Arc<ScopeSummary> {
        let summary = Arc::new(summary);
        self.scoped.insert(key, Arc::clone(&summary));
        summary
    }

    /// Returns the cached global summary, if fresh.
    #[must_use]
    pub fn global(&self) -> Option<Arc<GlobalSummary>> {
        self.global.get(&())
    }

    /// Stores the global summary.
    pub fn store_global(&self, summary: GlobalSummary) -> Arc<GlobalSummary> {
        let summary = Arc::new(summary);
        self.global.insert((), Arc::clone(&summary));
        summary
    }

    /// Invalidates a scope after a mutation. The global entry goes with it.
    pub fn invalidate(&self, key: DashboardKey) {
        self.scoped.invalidate(&key);
        self.global.invalidate(&());
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.scoped.invalidate_all();
        self.global.invalidate_all();
    }

    /// Returns the number of scoped entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.scoped.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub fn run_pending_tasks(&self) {
        self.scoped.run_pending_tasks();
        self.global.run_pending_tasks();
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}
