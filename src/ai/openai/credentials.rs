//! API key handling.
//!
//! Keys are validated with a minimal live completion call before being
//! accepted, and are kept in memory only.

use super::types::{ChatCompletionRequest, ChatMessage};
use super::CHAT_COMPLETIONS_PATH;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

const PROBE_MAX_TOKENS: u32 = 5;

/// A non-empty bearer token for the completion API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim `value`; `None` when nothing is left.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// OpenAI secret keys carry an `sk-` prefix.
    pub fn has_expected_prefix(&self) -> bool {
        self.0.starts_with("sk-")
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Holds at most one validated credential for the lifetime of the process.
pub struct CredentialManager {
    client: Client,
    url: String,
    probe_model: String,
    probe_timeout: Duration,
    current: RwLock<Option<Credential>>,
}

impl CredentialManager {
    pub fn new(
        client: Client,
        base_url: &str,
        probe_model: String,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url, CHAT_COMPLETIONS_PATH),
            probe_model,
            probe_timeout,
            current: RwLock::new(None),
        }
    }

    /// Validate `value` and keep it when the probe accepts it.
    pub async fn set_credential(&self, value: &str) -> bool {
        let Some(credential) = Credential::new(value) else {
            return false;
        };

        if !self.probe(&credential).await {
            return false;
        }

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
        tracing::info!("API key validated and stored in memory");
        true
    }

    pub fn is_set(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn current(&self) -> Option<Credential> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check `value` against the API without storing it.
    pub async fn validate(&self, value: &str) -> bool {
        match Credential::new(value) {
            Some(credential) => self.probe(&credential).await,
            None => false,
        }
    }

    async fn probe(&self, credential: &Credential) -> bool {
        let request = ChatCompletionRequest {
            model: self.probe_model.clone(),
            messages: vec![ChatMessage::user("test")],
            max_tokens: PROBE_MAX_TOKENS,
            temperature: None,
        };

        tracing::debug!("Validating API key with a probe request");

        let response = match self
            .client
            .post(&self.url)
            .timeout(self.probe_timeout)
            .header("Authorization", credential.bearer())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Could not validate API key: {}", e);
                return false;
            }
        };

        match response.status() {
            status if status.is_success() => true,
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Invalid API key (401 Unauthorized)");
                false
            }
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Rate limited during validation, but API key appears valid");
                true
            }
            status => {
                // Only a 401 is treated as proof of a bad key.
                tracing::warn!(
                    "Unexpected validation response ({}), treating API key as valid",
                    status
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::test_support;
    use wiremock::matchers::header;
    use wiremock::{MockServer, ResponseTemplate};

    fn make_manager(server: &MockServer) -> CredentialManager {
        CredentialManager::new(
            Client::new(),
            &server.uri(),
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn test_credential_rejects_blank_values() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \n").is_none());
        assert_eq!(Credential::new("  sk-abc ").unwrap().expose(), "sk-abc");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("sk-secret").unwrap();
        assert!(!format!("{:?}", credential).contains("secret"));
    }

    #[test]
    fn test_credential_prefix_check() {
        assert!(Credential::new("sk-abc").unwrap().has_expected_prefix());
        assert!(!Credential::new("abc").unwrap().has_expected_prefix());
    }

    #[tokio::test]
    async fn test_probe_success_marks_key_valid() {
        let server = MockServer::start().await;
        test_support::post(CHAT_COMPLETIONS_PATH)
            .and(header("Authorization", "Bearer sk-good"))
            .and(test_support::probe_body())
            .respond_with(test_support::completion("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let manager = make_manager(&server);
        assert!(manager.set_credential("sk-good").await);
        assert!(manager.is_set());
        assert_eq!(manager.current().unwrap().expose(), "sk-good");
    }

    #[tokio::test]
    async fn test_probe_401_marks_key_invalid() {
        let server = MockServer::start().await;
        test_support::mount_probe(&server, 401).await;

        let manager = make_manager(&server);
        assert!(!manager.set_credential("sk-bad").await);
        assert!(!manager.is_set());
    }

    #[tokio::test]
    async fn test_probe_429_marks_key_valid() {
        let server = MockServer::start().await;
        test_support::mount_probe(&server, 429).await;

        let manager = make_manager(&server);
        assert!(manager.validate("sk-throttled").await);
    }

    #[tokio::test]
    async fn test_probe_other_status_is_permissive() {
        let server = MockServer::start().await;
        test_support::mount_probe(&server, 503).await;

        let manager = make_manager(&server);
        assert!(manager.validate("sk-whatever").await);
    }

    #[tokio::test]
    async fn test_network_failure_marks_key_invalid() {
        // Nothing listens on the discard port.
        let manager = CredentialManager::new(
            Client::new(),
            "http://127.0.0.1:9",
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(2),
        );
        assert!(!manager.validate("sk-unreachable").await);
    }

    #[tokio::test]
    async fn test_blank_key_skips_probe() {
        let server = MockServer::start().await;
        test_support::post(CHAT_COMPLETIONS_PATH)
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let manager = make_manager(&server);
        assert!(!manager.set_credential("   ").await);
        assert!(!manager.validate("").await);
    }

    #[tokio::test]
    async fn test_validate_does_not_store_key() {
        let server = MockServer::start().await;
        test_support::mount_probe(&server, 200).await;

        let manager = make_manager(&server);
        assert!(manager.validate("sk-good").await);
        assert!(!manager.is_set());
    }
}
