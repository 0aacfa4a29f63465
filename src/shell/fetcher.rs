//! Network capability used for installs and cache misses.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::shell::request::strip_hop_by_hop;
use crate::shell::{AssetRequest, AssetResponse};

/// Issues a request against the network.
///
/// An `Err` means the request could not be completed at all (offline, DNS,
/// timeout). Error statuses such as 404 come back as `Ok`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse>;
}

// == HTTP Fetcher ==
/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let mut headers = request.headers.clone();
        strip_hop_by_hop(&mut headers);

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status();
        let url = response.url().clone();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);
        let body = response.bytes().await?;

        debug!(method = %request.method, url = %url, status = %status, "upstream fetch");
        Ok(AssetResponse::new(status, headers, body, url))
    }
}
