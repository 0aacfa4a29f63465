//! Compiled-in deployment: generation tag, asset manifest and fallback document.
//!
//! Bumping [`CACHE_GENERATION`] is how a new deployment invalidates the
//! previous cache generation.

/// Tag of the generation this build installs.
pub const CACHE_GENERATION: &str = "deth-demo-cache-v1";

/// Paths that must be cached for the shell to work offline.
pub const ASSET_MANIFEST: &[&str] = &["/", "/index.html", "/style.css", "/app.js", "/manifest.json"];

/// Document served when the network fails and the request has no cache entry.
pub const FALLBACK_DOCUMENT: &str = "/index.html";

// == Deployment ==
/// A generation tag together with the ordered asset paths it must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub generation: String,
    pub assets: Vec<String>,
}

impl Deployment {
    pub fn new<I, S>(generation: impl Into<String>, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            generation: generation.into(),
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }

    /// The deployment baked into this build.
    pub fn compiled() -> Self {
        Self::new(CACHE_GENERATION, ASSET_MANIFEST.iter().copied())
    }
}
