//! AI service integration for prompt transformation
//!
//! Provides the [`PromptService`] seam used by UI code, the OpenAI-backed
//! implementation, and a mock for tests and offline harnesses.

pub mod mock;
pub mod openai;

pub use mock::MockPromptService;
pub use openai::PromptEnhancer;

use async_trait::async_trait;

/// Prompt transformations whose failures come back as user-facing text.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Whether a credential is configured.
    fn is_available(&self) -> bool;

    async fn enhance(
        &self,
        prompt: &str,
        style_preference: &str,
        intensity_percent: u32,
    ) -> String;

    async fn improve(
        &self,
        prompt: &str,
        image_description: &str,
        intensity_percent: u32,
    ) -> String;

    async fn generate_alternatives(&self, prompt: &str, variation_type: &str) -> String;
}
