//! API Module
//!
//! HTTP handlers and routing for the offline shell.
//!
//! # Endpoints
//! - `GET /_shell/health` - Health check endpoint
//! - `GET /_shell/status` - Active generation, lifecycle and intercept stats
//! - `POST /_shell/chat` - Canned chatbot reply
//! - `GET /_shell/jam` - Step sequencer state
//! - `POST /_shell/jam/toggle` - Start or stop the step sequencer
//! - anything else - Intercepted, cache-first for GET

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
