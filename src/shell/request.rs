//! Request and response values flowing through the intercept path.

use axum::body::{Body, Bytes};
use axum::http::header::{
    CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER,
    TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use url::Url;

use crate::cache::{CachedResponse, RequestKey};

/// Header telling the client how a proxied response was produced.
pub const SOURCE_HEADER: &str = "x-offline-shell";

// == Response Source ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Served from the active generation
    Cache,
    /// Fetched from upstream
    Network,
    /// Fallback document served after a network failure
    Fallback,
    /// Non-GET request forwarded untouched
    Passthrough,
}

impl ResponseSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Network => "network",
            ResponseSource::Fallback => "fallback",
            ResponseSource::Passthrough => "passthrough",
        }
    }
}

// == Asset Request ==
/// An inbound read or write aimed at the upstream origin.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AssetRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Cache key for this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.clone(), &self.url)
    }
}

// == Asset Response ==
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Final URL the response came from, after redirects
    pub url: Url,
    pub source: ResponseSource,
}

impl AssetResponse {
    /// A response that just arrived from the network.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>, url: Url) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url,
            source: ResponseSource::Network,
        }
    }

    pub fn from_cached(cached: CachedResponse, url: Url, source: ResponseSource) -> Self {
        Self {
            status: cached.status,
            headers: cached.headers,
            body: cached.body,
            url,
            source,
        }
    }

    pub fn to_cached(&self) -> CachedResponse {
        CachedResponse::new(self.status, self.headers.clone(), self.body.clone())
    }

    /// Only complete (200) responses from the serving origin are stored.
    pub fn is_cacheable_for(&self, origin: &Url) -> bool {
        self.status == StatusCode::OK && self.url.origin() == origin.origin()
    }
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        strip_hop_by_hop(&mut headers);
        headers.insert(
            HeaderName::from_static(SOURCE_HEADER),
            HeaderValue::from_static(self.source.as_str()),
        );

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}

/// Removes headers that describe a single connection rather than the resource.
pub(crate) fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        CONNECTION,
        CONTENT_LENGTH,
        HOST,
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        UPGRADE,
    ] {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}
