//! In-memory fakes for exercising the shell without a network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use tokio::sync::Notify;
use url::Url;

use crate::cache::{CacheStorage, CachedResponse, MemoryCacheStorage, RequestKey};
use crate::error::{Result, ShellError};
use crate::shell::{AssetRequest, AssetResponse, Fetcher, OfflineShell, ShellOptions};

pub const ORIGIN: &str = "http://localhost:8080";

// == Fake Fetcher ==
/// Serves canned pages by URL and counts every call.
pub struct FakeFetcher {
    origin: Url,
    pages: Mutex<HashMap<String, (StatusCode, Bytes)>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeFetcher {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: Url::parse(origin).unwrap(),
            pages: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Parks every following fetch until `gate` is notified once per fetch.
    pub fn hold_on(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn serve(&self, path: &str, body: &str) {
        self.serve_status(path, StatusCode::OK, body);
    }

    pub fn serve_status(&self, path: &str, status: StatusCode, body: &str) {
        let url = self.origin.join(path).unwrap();
        self.serve_url(url.as_str(), status, body);
    }

    pub fn serve_url(&self, url: &str, status: StatusCode, body: &str) {
        self.pages.lock().unwrap().insert(
            url.to_string(),
            (status, Bytes::copy_from_slice(body.as_bytes())),
        );
    }

    /// Makes requests for `path` fail as if the network dropped.
    pub fn fail_path(&self, path: &str) {
        self.failing.lock().unwrap().insert(path.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.offline.load(Ordering::SeqCst)
            || self.failing.lock().unwrap().contains(request.url.path())
        {
            return Err(ShellError::Network(format!("unreachable: {}", request.url)));
        }

        let page = self.pages.lock().unwrap().get(request.url.as_str()).cloned();
        let (status, body) = page.unwrap_or((StatusCode::NOT_FOUND, Bytes::from_static(b"not found")));
        Ok(AssetResponse::new(status, HeaderMap::new(), body, request.url.clone()))
    }
}

// == Counting Storage ==
/// Wraps a store and counts every call made to it.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryCacheStorage,
    calls: AtomicUsize,
}

impl CountingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl CacheStorage for CountingStorage {
    fn open(&self, generation: &str) -> Result<()> {
        self.tick();
        self.inner.open(generation)
    }

    fn get(&self, generation: &str, key: &RequestKey) -> Option<CachedResponse> {
        self.tick();
        self.inner.get(generation, key)
    }

    fn put(&self, generation: &str, key: RequestKey, response: CachedResponse) -> Result<()> {
        self.tick();
        self.inner.put(generation, key, response)
    }

    fn delete(&self, generation: &str) -> Result<bool> {
        self.tick();
        self.inner.delete(generation)
    }

    fn keys(&self) -> Vec<String> {
        self.tick();
        self.inner.keys()
    }

    fn len(&self, generation: &str) -> usize {
        self.tick();
        self.inner.len(generation)
    }
}

// == Flaky Delete Storage ==
/// Store whose delete of one particular generation always fails.
pub struct FlakyDeleteStorage {
    inner: MemoryCacheStorage,
    stuck: String,
}

impl FlakyDeleteStorage {
    pub fn new(inner: MemoryCacheStorage, stuck: &str) -> Self {
        Self {
            inner,
            stuck: stuck.to_string(),
        }
    }
}

impl CacheStorage for FlakyDeleteStorage {
    fn open(&self, generation: &str) -> Result<()> {
        self.inner.open(generation)
    }

    fn get(&self, generation: &str, key: &RequestKey) -> Option<CachedResponse> {
        self.inner.get(generation, key)
    }

    fn put(&self, generation: &str, key: RequestKey, response: CachedResponse) -> Result<()> {
        self.inner.put(generation, key, response)
    }

    fn delete(&self, generation: &str) -> Result<bool> {
        if generation == self.stuck {
            return Err(ShellError::Storage(format!("{} is locked", generation)));
        }
        self.inner.delete(generation)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn len(&self, generation: &str) -> usize {
        self.inner.len(generation)
    }
}

// == Helpers ==
/// A shell over an in-memory store and a fake site serving `pages`.
pub fn shell_with_site(
    pages: &[(&str, &str)],
) -> (OfflineShell, Arc<MemoryCacheStorage>, Arc<FakeFetcher>) {
    let storage = Arc::new(MemoryCacheStorage::new());
    let fetcher = Arc::new(FakeFetcher::new(ORIGIN));
    for (path, body) in pages {
        fetcher.serve(path, body);
    }
    let shell = OfflineShell::new(
        storage.clone(),
        fetcher.clone(),
        ShellOptions::new(Url::parse(ORIGIN).unwrap()),
    );
    (shell, storage, fetcher)
}

pub fn get(shell: &OfflineShell, path: &str) -> AssetRequest {
    AssetRequest::get(shell.resolve(path).unwrap())
}

pub fn key(shell: &OfflineShell, path: &str) -> RequestKey {
    RequestKey::get(&shell.resolve(path).unwrap())
}

pub fn cached(body: &'static str) -> CachedResponse {
    CachedResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
}

/// Polls until a background write for `key` lands, or gives up after ~1s.
pub async fn wait_for_entry(storage: &dyn CacheStorage, generation: &str, key: &RequestKey) -> bool {
    for _ in 0..100 {
        if storage.get(generation, key).is_some() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
