//! Response Selector
//!
//! Stateless: the same input may produce any line of the matched category.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::chat::{Category, RESPONSES};
use crate::error::{Result, ShellError};

/// Maximum accepted input length in characters
pub const MAX_INPUT_LENGTH: usize = 1000;

// == Speech Cue ==
/// Parameters a client hands to its speech synthesizer to read a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechCue {
    pub lang: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechCue {
    fn default() -> Self {
        Self {
            lang: "en-US",
            rate: 0.95,
            pitch: 1.0,
        }
    }
}

// == Reply ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: &'static str,
    /// Category the input matched, if any
    pub category: Option<Category>,
}

// == Responder ==
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    pool: &'static [(Category, &'static str)],
}

impl Default for Responder {
    fn default() -> Self {
        Self { pool: RESPONSES }
    }
}

impl Responder {
    pub fn new(pool: &'static [(Category, &'static str)]) -> Self {
        Self { pool }
    }

    /// First category whose keywords occur in `input`.
    pub fn classify(&self, input: &str) -> Option<Category> {
        let input = input.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| input.contains(k)))
    }

    /// Picks a reply for `input`.
    ///
    /// The matched category narrows the pool; with no match, or no line in
    /// that category, the whole pool is used.
    pub fn reply<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Result<Reply> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ShellError::InvalidRequest("Input cannot be empty".to_string()));
        }
        if input.chars().count() > MAX_INPUT_LENGTH {
            return Err(ShellError::InvalidRequest(format!(
                "Input exceeds maximum length of {} characters",
                MAX_INPUT_LENGTH
            )));
        }

        let category = self.classify(input);
        let narrowed: Vec<&'static str> = match category {
            Some(category) => self
                .pool
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, line)| *line)
                .collect(),
            None => Vec::new(),
        };
        let candidates: Vec<&'static str> = if narrowed.is_empty() {
            self.pool.iter().map(|(_, line)| *line).collect()
        } else {
            narrowed
        };

        let text = candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| ShellError::Internal("Response pool is empty".to_string()))?;
        Ok(Reply { text, category })
    }
}
