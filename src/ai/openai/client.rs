use super::credentials::{Credential, CredentialManager};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use super::CHAT_COMPLETIONS_PATH;
use crate::models::RetryPolicy;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Request gateway for chat completions.
///
/// Calls made through one client are serialized, spaced at least
/// `min_request_interval` apart, and retried on 429s, 5xx responses and
/// transport failures. A 401 or any other 4xx fails on the first attempt:
/// resending the same request cannot fix a bad key or a bad body.
pub struct OpenAiHttpClient {
    client: Client,
    url: String,
    timeout: Duration,
    policy: RetryPolicy,
    credentials: Arc<CredentialManager>,
    last_request: Mutex<Option<Instant>>,
}

impl OpenAiHttpClient {
    pub fn new(
        client: Client,
        base_url: &str,
        timeout: Duration,
        policy: RetryPolicy,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url, CHAT_COMPLETIONS_PATH),
            timeout,
            policy,
            credentials,
            last_request: Mutex::new(None),
        }
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let credential = self.credentials.current().ok_or(Error::CredentialMissing)?;

        // Held for the whole exchange so only one call is in flight.
        let mut last_request = self.last_request.lock().await;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let wait = spacing_delay(
                *last_request,
                Instant::now(),
                self.policy.min_request_interval,
            );
            if !wait.is_zero() {
                tracing::debug!("Spacing requests, waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
            *last_request = Some(Instant::now());

            let err = match self.post_once(&credential, request, attempt).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            attempt += 1;
            if attempt >= max_attempts {
                tracing::error!("Request failed after {} attempts: {}", max_attempts, err);
                return Err(match err {
                    Error::Network(message) => Error::ExhaustedRetries {
                        attempts: max_attempts,
                        last_error: message,
                    },
                    other => other,
                });
            }

            let wait = match &err {
                Error::RateLimited { retry_after } => *retry_after,
                _ => self.policy.backoff_delay(attempt - 1),
            };
            tracing::warn!(
                "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                attempt,
                max_attempts,
                err,
                wait
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Send one request. Retryable outcomes come back as `RateLimited`,
    /// carrying the wait for this `attempt`, or as `Network`.
    async fn post_once(
        &self,
        credential: &Credential,
        request: &ChatCompletionRequest,
        attempt: u32,
    ) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header("Authorization", credential.bearer())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                Error::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after: self.policy.rate_limit_delay(attempt),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::error!("OpenAI rejected the API key: {}", body);
            return Err(Error::CredentialInvalid);
        }

        if status.is_server_error() {
            tracing::error!("OpenAI API error (status {}): {}", status, body);
            return Err(Error::Network(format!("status {}: {}", status, body)));
        }

        if !status.is_success() {
            tracing::error!("OpenAI API error (status {}): {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}\nBody: {}", e, body);
            Error::ResponseShape(e.to_string())
        })
    }
}

/// Time still to wait before the next dispatch may go out.
pub(crate) fn spacing_delay(
    last_request: Option<Instant>,
    now: Instant,
    min_interval: Duration,
) -> Duration {
    match last_request {
        Some(last) => min_interval.saturating_sub(now.saturating_duration_since(last)),
        None => Duration::ZERO,
    }
}
