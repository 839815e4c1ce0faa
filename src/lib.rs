//! Prompt enhancement for image generation
//!
//! Wraps a chat-completion API to rewrite, improve and vary image-generation
//! prompts, with credential validation, request spacing and retry/backoff.

pub mod ai;
pub mod error;
pub mod models;
pub mod prompts;
pub mod ui;

pub use ai::{PromptEnhancer, PromptService};
pub use error::{Error, Result};
pub use models::{Config, IntensityBand, RetryPolicy};
