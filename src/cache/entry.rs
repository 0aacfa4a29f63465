//! Cache Entry Module
//!
//! Defines the lookup key and the stored payload for a cached response.

use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use url::Url;

// == Request Key ==
/// Identifies a cached response by method and URL.
///
/// The fragment is dropped; the query string is part of the key. Header
/// based matching (`Vary`) is not performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    url: String,
}

impl RequestKey {
    pub fn new(method: Method, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self {
            method,
            url: url.into(),
        }
    }

    /// Key for a GET of `url`, the only method the shell stores.
    pub fn get(url: &Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

// == Cached Response ==
/// A stored response payload: status, headers and body bytes.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Unix milliseconds at which the entry was written
    pub stored_at: i64,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Body size in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }
}
