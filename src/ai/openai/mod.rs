pub mod client;
pub mod credentials;
pub mod enhancer;
pub mod types;

pub use client::OpenAiHttpClient;
pub use credentials::{Credential, CredentialManager};
pub use enhancer::PromptEnhancer;

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
