//! Offline Shell - A cache-first offline shell for static sites
//!
//! Installs a fixed asset manifest into a versioned cache generation,
//! activates it, and serves requests cache-first with a network fallback.
//! Also hosts a canned-reply chatbot and a toggleable step sequencer.

pub mod api;
pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod shell;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use shell::{Deployment, OfflineShell, ShellOptions};
pub use tasks::{spawn_install_task, spawn_sequencer_task};
