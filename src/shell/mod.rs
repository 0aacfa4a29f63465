//! Offline Shell Module
//!
//! Cache-first interception in front of a static origin, with an explicit
//! install → activate lifecycle per cache generation.
//!
//! # Flow
//! 1. [`OfflineShell::install`] fetches the whole manifest and commits it as a
//!    new generation, or fails without touching the store.
//! 2. [`OfflineShell::activate`] purges every other generation and makes the
//!    new one visible to all requests.
//! 3. [`OfflineShell::intercept`] answers requests cache-first.

mod fetcher;
mod intercept;
mod lifecycle;
mod manifest;
mod request;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{CacheStorage, CachedResponse, InterceptStats, RequestKey};
use crate::error::{Result, ShellError};

pub use fetcher::{Fetcher, HttpFetcher};
pub use lifecycle::{Incoming, Lifecycle, Phase};
pub use manifest::{Deployment, ASSET_MANIFEST, CACHE_GENERATION, FALLBACK_DOCUMENT};
pub use request::{AssetRequest, AssetResponse, ResponseSource, SOURCE_HEADER};

// == Shell Options ==
#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// Origin the shell is authoritative for; only its responses are stored
    pub origin: Url,
    /// Path served when the network fails and nothing is cached for a request
    pub fallback_document: String,
}

impl ShellOptions {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            fallback_document: FALLBACK_DOCUMENT.to_string(),
        }
    }

    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback_document = path.into();
        self
    }
}

// == Installed Token ==
/// Proof that a generation finished installing.
///
/// Only [`OfflineShell::install`] creates one and [`OfflineShell::activate`]
/// consumes it, so a failed install can never be activated.
#[derive(Debug)]
#[must_use = "an installed generation stays invisible until activated"]
pub struct Installed {
    generation: String,
    assets: usize,
}

impl Installed {
    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn assets(&self) -> usize {
        self.assets
    }
}

// == Activation Report ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationReport {
    pub generation: String,
    /// Stale generations deleted
    pub purged: Vec<String>,
    /// Stale generations whose deletion failed; not retried
    pub failed: Vec<String>,
}

// == Offline Shell ==
pub struct OfflineShell {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    options: ShellOptions,
    lifecycle: Arc<RwLock<Lifecycle>>,
    stats: Arc<RwLock<InterceptStats>>,
}

impl OfflineShell {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        options: ShellOptions,
    ) -> Self {
        Self {
            storage,
            fetcher,
            options,
            lifecycle: Arc::new(RwLock::new(Lifecycle::new())),
            stats: Arc::new(RwLock::new(InterceptStats::new())),
        }
    }

    pub fn origin(&self) -> &Url {
        &self.options.origin
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    /// Resolves a path against the serving origin.
    ///
    /// Paths that would escape the origin (`//host/x`, absolute URLs) are
    /// rejected.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let url = self
            .options
            .origin
            .join(path)
            .map_err(|e| ShellError::InvalidRequest(format!("bad path '{}': {}", path, e)))?;
        if url.origin() != self.options.origin.origin() {
            return Err(ShellError::InvalidRequest(format!(
                "path '{}' leaves origin {}",
                path,
                self.options.origin.origin().ascii_serialization()
            )));
        }
        Ok(url)
    }

    pub async fn active_generation(&self) -> Option<String> {
        self.lifecycle.read().await.active().map(str::to_string)
    }

    /// Snapshot of the lifecycle state.
    pub async fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.read().await.clone()
    }

    /// Snapshot of the intercept counters.
    pub async fn stats(&self) -> InterceptStats {
        self.stats.read().await.clone()
    }

    // == Install ==
    /// Fetches every manifest asset and commits them as `deployment.generation`.
    ///
    /// Fails fast: the first unreachable or non-2xx asset aborts the install,
    /// nothing is written and the active generation keeps serving.
    pub async fn install(&self, deployment: &Deployment) -> Result<Installed> {
        let generation = deployment.generation.clone();
        self.lifecycle.write().await.begin_install(&generation)?;
        info!(
            "Installing generation {} ({} assets)",
            generation,
            deployment.assets.len()
        );

        let committed = match self.fetch_manifest(deployment).await {
            Ok(assets) => self.commit(&generation, assets).await,
            Err(err) => Err(err),
        };

        let mut lifecycle = self.lifecycle.write().await;
        match committed {
            Ok(assets) => {
                lifecycle.finish_install(&generation)?;
                info!("Generation {} installed with {} assets", generation, assets);
                Ok(Installed { generation, assets })
            }
            Err(err) => {
                lifecycle.fail_install(&generation)?;
                warn!("Install of generation {} failed: {}", generation, err);
                Err(err)
            }
        }
    }

    async fn fetch_manifest(
        &self,
        deployment: &Deployment,
    ) -> Result<Vec<(RequestKey, CachedResponse)>> {
        let mut fetches = JoinSet::new();
        for path in &deployment.assets {
            let request = AssetRequest::get(self.resolve(path)?);
            let fetcher = Arc::clone(&self.fetcher);
            let path = path.clone();
            fetches.spawn(async move {
                let response = fetcher.fetch(&request).await?;
                if !response.status.is_success() {
                    return Err(ShellError::AssetUnavailable {
                        path,
                        status: response.status.as_u16(),
                    });
                }
                debug!("Fetched manifest asset {}", path);
                Ok::<_, ShellError>((request.key(), response.to_cached()))
            });
        }

        // Returning early drops the set, which aborts the remaining fetches.
        let mut assets = Vec::with_capacity(deployment.assets.len());
        while let Some(joined) = fetches.join_next().await {
            let fetched = joined.map_err(|e| ShellError::Internal(e.to_string()))?;
            assets.push(fetched?);
        }
        Ok(assets)
    }

    async fn commit(
        &self,
        generation: &str,
        assets: Vec<(RequestKey, CachedResponse)>,
    ) -> Result<usize> {
        let count = assets.len();
        let written = self.storage.open(generation).and_then(|()| {
            assets
                .into_iter()
                .try_for_each(|(key, entry)| self.storage.put(generation, key, entry))
        });

        if let Err(err) = written {
            // Never leave a partial generation behind. The active generation
            // cannot be the one installing.
            let _ = self.storage.delete(generation);
            return Err(err);
        }
        Ok(count)
    }

    // == Activate ==
    /// Purges every generation except the installed one, then makes it active.
    ///
    /// The lifecycle lock is held for the whole activation, so no request sees
    /// a half-purged store and no background write lands in a purged
    /// generation.
    pub async fn activate(&self, installed: Installed) -> Result<ActivationReport> {
        let generation = installed.generation;
        let mut lifecycle = self.lifecycle.write().await;
        lifecycle.begin_activate(&generation)?;
        info!("Activating generation {}", generation);

        let mut report = ActivationReport {
            generation: generation.clone(),
            ..ActivationReport::default()
        };
        for tag in self.storage.keys() {
            if tag == generation {
                continue;
            }
            match self.storage.delete(&tag) {
                Ok(_) => {
                    debug!("Purged stale generation {}", tag);
                    report.purged.push(tag);
                }
                Err(err) => {
                    warn!("Failed to purge stale generation {}: {}", tag, err);
                    report.failed.push(tag);
                }
            }
        }

        lifecycle.finish_activate(&generation)?;
        info!(
            "Generation {} active, purged {} stale generation(s)",
            generation,
            report.purged.len()
        );
        Ok(report)
    }
}
