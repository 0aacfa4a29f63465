//! Cache Module
//!
//! Generation-scoped response storage for the offline shell.

mod entry;
mod memory;
mod stats;
mod storage;


// Re-export public types
pub use entry::{CachedResponse, RequestKey};
pub use memory::MemoryCacheStorage;
pub use stats::InterceptStats;
pub use storage::CacheStorage;

// == Public Constants ==
/// Maximum allowed body size of a single stored response in bytes
pub const MAX_ENTRY_SIZE: usize = 8 * 1024 * 1024; // 8 MB
