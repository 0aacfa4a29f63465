//! In-Memory Cache Storage
//!
//! HashMap-backed implementation of [`CacheStorage`] used by the server and
//! by tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::cache::{CacheStorage, CachedResponse, RequestKey, MAX_ENTRY_SIZE};
use crate::error::{Result, ShellError};

type Generation = HashMap<RequestKey, CachedResponse>;

// == Memory Cache Storage ==
/// Generation-scoped response storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    generations: RwLock<HashMap<String, Generation>>,
}

impl MemoryCacheStorage {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, generation: &str) -> Result<()> {
        let mut generations = self
            .generations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        generations.entry(generation.to_string()).or_default();
        Ok(())
    }

    fn get(&self, generation: &str, key: &RequestKey) -> Option<CachedResponse> {
        self.generations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(generation)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    fn put(&self, generation: &str, key: RequestKey, response: CachedResponse) -> Result<()> {
        // Validate body size
        if response.size() > MAX_ENTRY_SIZE {
            return Err(ShellError::Storage(format!(
                "{} exceeds maximum entry size of {} bytes",
                key, MAX_ENTRY_SIZE
            )));
        }

        let mut generations = self
            .generations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        generations
            .entry(generation.to_string())
            .or_default()
            .insert(key, response);
        Ok(())
    }

    fn delete(&self, generation: &str) -> Result<bool> {
        let mut generations = self
            .generations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(generations.remove(generation).is_some())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .generations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn len(&self, generation: &str) -> usize {
        self.generations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(generation)
            .map_or(0, HashMap::len)
    }
}
