//! Request DTOs for the shell API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /_shell/chat
///
/// Text limits are enforced by the responder.
///
/// # Fields
/// - `text`: What the user typed or said
/// - `speak`: Whether the reply should carry a speech cue
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub speak: bool,
}
