//! Response DTOs for the shell API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::InterceptStats;
use crate::chat::{Category, Reply, SpeechCue};
use crate::shell::Incoming;
use crate::tasks::Beat;

/// Response body for POST /_shell/chat
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechCue>,
}

impl ChatResponse {
    pub fn new(reply: Reply, speak: bool) -> Self {
        Self {
            reply: reply.text.to_string(),
            category: reply.category,
            speech: speak.then(SpeechCue::default),
        }
    }
}

/// Response body for GET /_shell/jam and POST /_shell/jam/toggle
#[derive(Debug, Clone, Serialize)]
pub struct JamResponse {
    pub running: bool,
    pub step: u64,
    /// Drum that sounded most recently
    pub last_beat: Option<Beat>,
}

impl JamResponse {
    pub fn new(running: bool, step: u64, last_beat: Option<Beat>) -> Self {
        Self {
            running,
            step,
            last_beat,
        }
    }
}

/// Response body for GET /_shell/status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Generation requests are served from
    pub active_generation: Option<String>,
    /// Generation being deployed, with its phase
    pub incoming: Option<Incoming>,
    /// Entries held by the active generation
    pub cached_entries: usize,
    pub stats: InterceptStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatusResponse {
    pub fn new(
        active_generation: Option<String>,
        incoming: Option<Incoming>,
        cached_entries: usize,
        stats: InterceptStats,
    ) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            active_generation,
            incoming,
            cached_entries,
            stats,
            hit_rate,
        }
    }
}

/// Response body for GET /_shell/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
