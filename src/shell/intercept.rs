//! Cache-first request interception.

use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, warn};

use crate::cache::{CachedResponse, RequestKey};
use crate::error::{Result, ShellError};
use crate::shell::{AssetRequest, AssetResponse, OfflineShell, ResponseSource};

impl OfflineShell {
    // == Intercept ==
    /// Answers `request` cache-first from the active generation.
    ///
    /// - Non-GET requests go straight to the network; the store is not touched.
    /// - A cache hit never contacts the network.
    /// - A miss is fetched; a 200 same-origin response is copied into the
    ///   cache in the background while the original is returned.
    /// - A network failure falls back to the cached fallback document, if any,
    ///   otherwise the failure is returned unchanged. Error statuses from a
    ///   reachable upstream are passed through, never replaced by the fallback.
    pub async fn intercept(&self, request: AssetRequest) -> Result<AssetResponse> {
        if request.method != Method::GET {
            self.stats.write().await.record_passthrough();
            let mut response = self.fetcher.fetch(&request).await?;
            response.source = ResponseSource::Passthrough;
            return Ok(response);
        }

        let key = request.key();
        // The lookup runs under the lifecycle lock so an activation cannot
        // purge the generation between reading its tag and reading from it.
        let generation = {
            let lifecycle = self.lifecycle.read().await;
            let Some(generation) = lifecycle.active().map(str::to_string) else {
                drop(lifecycle);
                debug!("No active generation, forwarding {}", request.url);
                self.stats.write().await.record_fetch();
                return self.fetcher.fetch(&request).await;
            };

            if let Some(cached) = self.storage.get(&generation, &key) {
                debug!("Cache hit: {}", key);
                self.stats.write().await.record_hit();
                return Ok(AssetResponse::from_cached(
                    cached,
                    request.url,
                    ResponseSource::Cache,
                ));
            }
            generation
        };

        {
            let mut stats = self.stats.write().await;
            stats.record_miss();
            stats.record_fetch();
        }

        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                if response.is_cacheable_for(&self.options.origin) {
                    self.store_in_background(generation, key, response.to_cached());
                } else {
                    debug!("Not caching {} (status {})", key, response.status);
                    self.stats.write().await.record_uncached();
                }
                Ok(response)
            }
            Err(err) => self.serve_fallback(&key, err).await,
        }
    }

    /// Writes `entry` without holding up the response already on its way out.
    ///
    /// The write is dropped when `generation` stopped being active in the
    /// meantime.
    fn store_in_background(&self, generation: String, key: RequestKey, entry: CachedResponse) {
        let storage = Arc::clone(&self.storage);
        let lifecycle = Arc::clone(&self.lifecycle);
        let stats = Arc::clone(&self.stats);

        tokio::spawn(async move {
            let lifecycle = lifecycle.read().await;
            if lifecycle.active() != Some(generation.as_str()) {
                debug!("Generation {} superseded, dropping write of {}", generation, key);
                return;
            }
            match storage.put(&generation, key.clone(), entry) {
                Ok(()) => {
                    debug!("Stored {} in generation {}", key, generation);
                    stats.write().await.record_stored();
                }
                Err(err) => warn!("Failed to store {}: {}", key, err),
            }
        });
    }

    /// Looks the fallback up in whichever generation is active now, which may
    /// be newer than the one the request missed in.
    async fn serve_fallback(&self, key: &RequestKey, err: ShellError) -> Result<AssetResponse> {
        let url = self.resolve(&self.options.fallback_document)?;
        let lifecycle = self.lifecycle.read().await;
        let cached = lifecycle
            .active()
            .and_then(|generation| self.storage.get(generation, &RequestKey::get(&url)));
        match cached {
            Some(cached) => {
                warn!(
                    "Network failed for {} ({}), serving {}",
                    key, err, self.options.fallback_document
                );
                self.stats.write().await.record_fallback();
                Ok(AssetResponse::from_cached(cached, url, ResponseSource::Fallback))
            }
            None => {
                debug!("Network failed for {} with no fallback cached", key);
                Err(err)
            }
        }
    }
}
