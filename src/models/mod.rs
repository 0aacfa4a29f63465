//! Request and Response models for the shell's own API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ChatRequest;
pub use responses::{ChatResponse, HealthResponse, JamResponse, StatusResponse};
