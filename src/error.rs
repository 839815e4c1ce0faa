//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. The
//! `Display` text of each variant is the message shown to end users.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API key not configured. Please set your OpenAI API key first.")]
    CredentialMissing,

    #[error("Invalid API key (401 Unauthorized). Please check your OpenAI API key.")]
    CredentialInvalid,

    #[error("Rate limited. Please wait {} seconds and try again.", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Error connecting to chat completion API: {0}")]
    Network(String),

    #[error("Chat completion API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Error parsing chat completion response: {0}")]
    ResponseShape(String),

    #[error("Error connecting to chat completion API after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the gateway should resend the request after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited { .. } | Error::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_reports_whole_seconds() {
        let err = Error::RateLimited {
            retry_after: Duration::from_secs(20),
        };
        assert_eq!(
            err.to_string(),
            "Rate limited. Please wait 20 seconds and try again."
        );
    }

    #[test]
    fn test_only_rate_limits_and_network_failures_are_retryable() {
        assert!(Error::RateLimited {
            retry_after: Duration::from_secs(5)
        }
        .is_retryable());
        assert!(Error::Network("connection reset".to_string()).is_retryable());

        assert!(!Error::CredentialMissing.is_retryable());
        assert!(!Error::CredentialInvalid.is_retryable());
        assert!(!Error::Api {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(!Error::ResponseShape("no choices".to_string()).is_retryable());
        assert!(!Error::ExhaustedRetries {
            attempts: 3,
            last_error: "timeout".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_exhausted_retries_message_includes_last_error() {
        let err = Error::ExhaustedRetries {
            attempts: 3,
            last_error: "connection refused".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("3 attempts"));
        assert!(message.contains("connection refused"));
    }
}
