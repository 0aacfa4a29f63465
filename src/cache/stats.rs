//! Intercept Statistics Module
//!
//! Tracks how intercepted requests were answered.

use serde::Serialize;

// == Intercept Stats ==
/// Counters for every outcome of the intercept path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterceptStats {
    /// GET requests answered from the active generation
    pub cache_hits: u64,
    /// GET requests not found in the active generation
    pub cache_misses: u64,
    /// Requests that reached the upstream network
    pub network_fetches: u64,
    /// Network responses copied into the cache
    pub stored: u64,
    /// Network responses returned without being cached (non-200, cross-origin)
    pub uncached: u64,
    /// Fallback documents served after a network failure
    pub fallbacks: u64,
    /// Non-GET requests forwarded untouched
    pub passthrough: u64,
}

impl InterceptStats {
    // == Constructor ==
    /// Creates a new InterceptStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no GET has been intercepted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    pub fn record_fetch(&mut self) {
        self.network_fetches += 1;
    }

    pub fn record_stored(&mut self) {
        self.stored += 1;
    }

    pub fn record_uncached(&mut self) {
        self.uncached += 1;
    }

    pub fn record_fallback(&mut self) {
        self.fallbacks += 1;
    }

    pub fn record_passthrough(&mut self) {
        self.passthrough += 1;
    }
}
