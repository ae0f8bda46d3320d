//! Sparse per-request latency savings
//!
//! For a request r = (video, endpoint, count) served from cache c instead of
//! the origin, the saving is `(origin_latency - cache_latency) * count`.
//! Only connected pairs with a strictly positive saving are materialized;
//! everything else is absent, not zero, which keeps the downstream
//! formulation sparse.

use crate::instance::model::Instance;

/// One beneficial (request, cache) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSaving {
    /// Id of the cache
    pub cache: usize,
    /// Latency saving, weighted by the request count, strictly positive
    pub saving: u64,
}

/// Sparse matrix of positive latency savings, indexed by request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsMatrix {
    entries: Vec<Vec<CacheSaving>>,
}

impl SavingsMatrix {
    /// Compute the savings matrix for an instance
    ///
    /// Pure with respect to the instance; can be rebuilt at any time.
    pub fn build(instance: &Instance) -> Self {
        let entries = instance
            .requests
            .iter()
            .map(|request| {
                let endpoint = &instance.endpoints[request.endpoint];
                let mut row: Vec<CacheSaving> = endpoint
                    .connections
                    .iter()
                    .filter(|(_, &latency)| latency < endpoint.origin_latency)
                    .map(|(&cache, &latency)| CacheSaving {
                        cache,
                        saving: (endpoint.origin_latency - latency) * request.count,
                    })
                    .filter(|entry| entry.saving > 0)
                    .collect();
                row.sort_by_key(|entry| entry.cache);
                row
            })
            .collect();
        SavingsMatrix { entries }
    }

    /// The beneficial caches for one request, ascending by cache id
    pub fn for_request(&self, request: usize) -> &[CacheSaving] {
        &self.entries[request]
    }

    /// Total number of materialized (request, cache) pairs
    pub fn materialized_pairs(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    /// Sum over requests of the best single-cache saving
    ///
    /// An upper bound on any achievable objective value, since each request
    /// is served at most once.
    pub fn objective_upper_bound(&self) -> u64 {
        self.entries
            .iter()
            .map(|row| row.iter().map(|entry| entry.saving).max().unwrap_or(0))
            .sum()
    }
}
