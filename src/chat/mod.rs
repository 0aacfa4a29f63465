//! Chat Module
//!
//! Canned-reply chatbot: picks one line from a fixed pool, optionally
//! narrowed by a keyword-matched category.

mod pool;
mod responder;

pub use pool::{Category, RESPONSES};
pub use responder::{Reply, Responder, SpeechCue, MAX_INPUT_LENGTH};
