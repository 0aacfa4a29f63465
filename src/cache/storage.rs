//! Cache Storage Capability
//!
//! The store is injected into the shell as `Arc<dyn CacheStorage>` so the
//! lifecycle and interception logic never reach for a global.

use crate::cache::{CachedResponse, RequestKey};
use crate::error::Result;

/// A mapping from generation tag to a mapping from request key to response.
///
/// Every operation is atomic from the caller's perspective. Concurrent `put`
/// calls for the same key resolve last-write-wins.
pub trait CacheStorage: Send + Sync {
    /// Creates the generation if it does not exist yet.
    fn open(&self, generation: &str) -> Result<()>;

    /// Looks up `key` in `generation`.
    fn get(&self, generation: &str, key: &RequestKey) -> Option<CachedResponse>;

    /// Stores `response` under `key`, creating the generation if needed.
    fn put(&self, generation: &str, key: RequestKey, response: CachedResponse) -> Result<()>;

    /// Drops a whole generation. Returns whether it existed.
    fn delete(&self, generation: &str) -> Result<bool>;

    /// All generation tags currently present, sorted.
    fn keys(&self) -> Vec<String>;

    /// Number of entries held by `generation`.
    fn len(&self, generation: &str) -> usize;
}
