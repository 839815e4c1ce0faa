//! Entry points for front ends.
//!
//! Each wrapper answers with a fixed "disabled" message when no credential is
//! configured and otherwise delegates to the service unchanged.

use crate::ai::PromptService;

pub const ENHANCE_DISABLED: &str = "API key is not configured. Prompt enhancement is disabled.\n\n\
To enable prompt enhancement:\n\
1. Set environment variable: OPENAI_API_KEY=your_key_here\n\
2. Or restart the application and enter your API key when prompted\n\
3. Get your API key from: https://platform.openai.com/api-keys";

pub const IMPROVE_DISABLED: &str = "API key is not configured. Image improvement is disabled.";

pub const ALTERNATIVES_DISABLED: &str =
    "API key is not configured. Alternative prompts are disabled.";

pub async fn enhance_prompt_ui(
    service: &dyn PromptService,
    prompt: &str,
    style_preference: &str,
    intensity_percent: u32,
) -> String {
    if !service.is_available() {
        return ENHANCE_DISABLED.to_string();
    }
    service
        .enhance(prompt, style_preference, intensity_percent)
        .await
}

pub async fn improve_image_prompt_ui(
    service: &dyn PromptService,
    prompt: &str,
    image_description: &str,
    intensity_percent: u32,
) -> String {
    if !service.is_available() {
        return IMPROVE_DISABLED.to_string();
    }
    service
        .improve(prompt, image_description, intensity_percent)
        .await
}

pub async fn generate_alternative_prompt_ui(
    service: &dyn PromptService,
    prompt: &str,
    variation_type: &str,
) -> String {
    if !service.is_available() {
        return ALTERNATIVES_DISABLED.to_string();
    }
    service.generate_alternatives(prompt, variation_type).await
}
