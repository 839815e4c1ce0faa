use super::client::OpenAiHttpClient;
use super::credentials::CredentialManager;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::PromptService;
use crate::models::{Config, IntensityBand};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

const ENHANCE_MAX_TOKENS: u32 = 500;
const ENHANCE_TEMPERATURE: f32 = 0.7;
const IMPROVE_MAX_TOKENS: u32 = 600;
const IMPROVE_TEMPERATURE: f32 = 0.8;
const ALTERNATIVES_MAX_TOKENS: u32 = 500;
const ALTERNATIVES_TEMPERATURE: f32 = 0.9;

/// Rewrites image-generation prompts through OpenAI chat completions.
///
/// Owns its credential and request gateway; construct one per host
/// application and share it by reference.
pub struct PromptEnhancer {
    http: OpenAiHttpClient,
    credentials: Arc<CredentialManager>,
    model: String,
}

impl PromptEnhancer {
    /// Build a client without a credential. Nothing is sent until
    /// [`set_api_key`](Self::set_api_key) succeeds.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::new_with_client(config, client))
    }

    pub fn new_with_client(config: &Config, client: Client) -> Self {
        let credentials = Arc::new(CredentialManager::new(
            client.clone(),
            &config.base_url,
            config.chat_model.clone(),
            config.probe_timeout,
        ));

        Self {
            http: OpenAiHttpClient::new(
                client,
                &config.base_url,
                config.request_timeout,
                config.retry.clone(),
                Arc::clone(&credentials),
            ),
            credentials,
            model: config.chat_model.clone(),
        }
    }

    /// Build a client and validate the configured API key, if there is one.
    ///
    /// An invalid key is logged and left unset rather than treated as fatal.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let enhancer = Self::new(config)?;

        if let Some(api_key) = &config.openai_api_key {
            if enhancer.set_api_key(api_key).await {
                tracing::info!("Using API key from environment");
            } else {
                tracing::warn!("API key from environment is invalid, prompt enhancement disabled");
            }
        }

        Ok(enhancer)
    }

    pub async fn set_api_key(&self, api_key: &str) -> bool {
        self.credentials.set_credential(api_key).await
    }

    pub async fn validate_api_key(&self, api_key: &str) -> bool {
        self.credentials.validate(api_key).await
    }

    pub fn is_api_key_set(&self) -> bool {
        self.credentials.is_set()
    }

    pub async fn try_enhance(
        &self,
        prompt: &str,
        style_preference: &str,
        intensity_percent: u32,
    ) -> Result<String> {
        self.check_ready(prompt, "Please enter a prompt to enhance.")?;

        let band = IntensityBand::from_percent(intensity_percent);
        let percent = intensity_percent.to_string();
        let system = prompts::render(
            prompts::ENHANCE_SYSTEM,
            &[
                ("level", band.label()),
                ("percent", &percent),
                ("multiplier", band.detail_multiplier()),
                ("style", style_preference),
            ],
        );
        let user = prompts::render(prompts::ENHANCE_USER, &[("prompt", prompt)]);

        self.complete(system, user, ENHANCE_MAX_TOKENS, ENHANCE_TEMPERATURE)
            .await
    }

    pub async fn try_improve(
        &self,
        prompt: &str,
        image_description: &str,
        intensity_percent: u32,
    ) -> Result<String> {
        self.check_ready(prompt, "Please provide the original prompt to improve.")?;

        let band = IntensityBand::from_percent(intensity_percent);
        let percent = intensity_percent.to_string();
        let system = prompts::render(
            prompts::IMPROVE_SYSTEM,
            &[
                ("level", band.label()),
                ("percent", &percent),
                ("focus", band.improvement_focus()),
            ],
        );
        let user = prompts::render(
            prompts::IMPROVE_USER,
            &[("prompt", prompt), ("description", image_description)],
        );

        self.complete(system, user, IMPROVE_MAX_TOKENS, IMPROVE_TEMPERATURE)
            .await
    }

    pub async fn try_generate_alternatives(
        &self,
        prompt: &str,
        variation_type: &str,
    ) -> Result<String> {
        self.check_ready(prompt, "Please provide a prompt to create variations.")?;

        let system = prompts::render(
            prompts::ALTERNATIVES_SYSTEM,
            &[("variation", variation_type)],
        );
        let user = prompts::render(prompts::ALTERNATIVES_USER, &[("prompt", prompt)]);

        self.complete(system, user, ALTERNATIVES_MAX_TOKENS, ALTERNATIVES_TEMPERATURE)
            .await
    }

    fn check_ready(&self, prompt: &str, blank_message: &str) -> Result<()> {
        if !self.credentials.is_set() {
            return Err(Error::CredentialMissing);
        }
        if prompt.trim().is_empty() {
            return Err(Error::InvalidInput(blank_message.to_string()));
        }
        Ok(())
    }

    async fn complete(
        &self,
        system: String,
        user: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens,
            temperature: Some(temperature),
        };

        let response = self.http.chat_completion(&request).await?;
        response.first_text()
    }
}

fn into_message(result: Result<String>, operation: &str) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} failed: {}", operation, e);
        e.to_string()
    })
}

#[async_trait]
impl PromptService for PromptEnhancer {
    fn is_available(&self) -> bool {
        self.is_api_key_set()
    }

    async fn enhance(
        &self,
        prompt: &str,
        style_preference: &str,
        intensity_percent: u32,
    ) -> String {
        into_message(
            self.try_enhance(prompt, style_preference, intensity_percent)
                .await,
            "Prompt enhancement",
        )
    }

    async fn improve(
        &self,
        prompt: &str,
        image_description: &str,
        intensity_percent: u32,
    ) -> String {
        into_message(
            self.try_improve(prompt, image_description, intensity_percent)
                .await,
            "Prompt improvement",
        )
    }

    async fn generate_alternatives(&self, prompt: &str, variation_type: &str) -> String {
        into_message(
            self.try_generate_alternatives(prompt, variation_type).await,
            "Alternative generation",
        )
    }
}
