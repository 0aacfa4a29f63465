//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use offline_shell::cache::MemoryCacheStorage;
use offline_shell::error::{Result, ShellError};
use offline_shell::shell::{AssetRequest, AssetResponse, Fetcher};
use offline_shell::{OfflineShell, ShellOptions};
use url::Url;

pub const ORIGIN: &str = "http://localhost:8080";

/// Upstream site held in memory; can be switched offline.
pub struct FakeSite {
    origin: Url,
    pages: Mutex<HashMap<String, (StatusCode, &'static str)>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl FakeSite {
    pub fn new(pages: &[(&str, &'static str)]) -> Arc<Self> {
        let site = Arc::new(Self {
            origin: Url::parse(ORIGIN).unwrap(),
            pages: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        });
        for (path, body) in pages {
            site.page(path, StatusCode::OK, body);
        }
        site
    }

    pub fn page(&self, path: &str, status: StatusCode, body: &'static str) {
        let url = self.origin.join(path).unwrap();
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body));
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
impl Fetcher for FakeSite {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ShellError::Network(format!("offline: {}", request.url)));
        }
        let page = self.pages.lock().unwrap().get(request.url.as_str()).copied();
        let (status, body) = page.unwrap_or((StatusCode::NOT_FOUND, "not found"));

        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        Ok(AssetResponse::new(
            status,
            headers,
            Bytes::from_static(body.as_bytes()),
            request.url.clone(),
        ))
    }
}

pub fn build_shell(
    site: &Arc<FakeSite>,
    fallback: Option<&str>,
) -> (OfflineShell, Arc<MemoryCacheStorage>) {
    let storage = Arc::new(MemoryCacheStorage::new());
    let mut options = ShellOptions::new(Url::parse(ORIGIN).unwrap());
    if let Some(path) = fallback {
        options = options.with_fallback(path);
    }
    let shell = OfflineShell::new(storage.clone(), site.clone(), options);
    (shell, storage)
}
