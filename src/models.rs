//! Data models and configuration
//!
//! Defines intensity bands for prompt transformations, the gateway's retry
//! policy, and environment-driven configuration.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Ordered enhancement strength derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntensityBand {
    Subtle,
    Moderate,
    Strong,
    Maximum,
}

impl IntensityBand {
    /// Map a percentage onto a band. Upper bounds are inclusive.
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            0..=30 => IntensityBand::Subtle,
            31..=60 => IntensityBand::Moderate,
            61..=80 => IntensityBand::Strong,
            _ => IntensityBand::Maximum,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntensityBand::Subtle => "subtle",
            IntensityBand::Moderate => "moderate",
            IntensityBand::Strong => "strong",
            IntensityBand::Maximum => "maximum",
        }
    }

    /// How much more detailed an enhanced prompt should be than the original.
    pub fn detail_multiplier(&self) -> &'static str {
        match self {
            IntensityBand::Subtle => "1.2-1.5x",
            IntensityBand::Moderate => "1.5-2x",
            IntensityBand::Strong => "2-2.5x",
            IntensityBand::Maximum => "2.5-3x",
        }
    }

    /// What an improvement pass should concentrate on.
    pub fn improvement_focus(&self) -> &'static str {
        match self {
            IntensityBand::Subtle => "minor adjustments",
            IntensityBand::Moderate => "balanced improvements",
            IntensityBand::Strong => "significant enhancements",
            IntensityBand::Maximum => "major improvements",
        }
    }
}

/// Spacing and backoff settings for the request gateway.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub min_request_interval: Duration,
    pub max_attempts: u32,
    pub rate_limit_base_delay: Duration,
    pub rate_limit_max_delay: Duration,
    pub network_base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_secs(2),
            max_attempts: 3,
            rate_limit_base_delay: Duration::from_secs(5),
            rate_limit_max_delay: Duration::from_secs(60),
            network_base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after a 429 on the zero-based `attempt`: `min(max, base * 2^attempt)`.
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.rate_limit_max_delay)
    }

    /// Wait after a transient failure on the zero-based `attempt`: `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.network_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from variables resolved by `lookup`, falling back to
    /// defaults for anything unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let base_url = lookup("OPENAI_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(crate::Error::Config(format!(
                "OPENAI_BASE_URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        Ok(Self {
            openai_api_key: lookup("OPENAI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url,
            chat_model: lookup("OPENAI_CHAT_MODEL")
                .map(|model| model.trim().to_string())
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            ..Self::default()
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.openai_api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
