use crate::error::{CorrectionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variables consulted by [`CorrectorConfig::with_env_overrides`].
pub const ENV_API_KEY: &str = "CORRECTOR_API_KEY";
pub const ENV_MODEL: &str = "CORRECTOR_MODEL";
pub const ENV_BASE_URL: &str = "CORRECTOR_BASE_URL";

/// OpenAI-compatible chat completion services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenRouter,
    OpenAi,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenRouter => OPENROUTER_BASE_URL,
            Provider::OpenAi => OPENAI_BASE_URL,
        }
    }
}

/// Add-on configuration, usually read from the host's JSON config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectorConfig {
    pub api_key: String,
    pub model: String,
    pub provider: Provider,
    /// Overrides the provider's endpoint, e.g. for a local proxy.
    pub base_url: Option<String>,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
    pub timeout_secs: u64,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            provider: Provider::default(),
            base_url: None,
            referer: "card-corrector".to_string(),
            title: "Card-Corrector".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CorrectorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Applies non-empty `CORRECTOR_*` environment variables on top of the
    /// loaded values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CorrectionError::InvalidConfig(
                "model must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(CorrectionError::InvalidConfig(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CorrectionError::InvalidConfig(format!(
                    "base_url must start with http:// or https://, got '{}'",
                    url
                )));
            }
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_config_defaults() {
        let config = CorrectorConfig::from_json_str(r#"{"api_key": "sk-test"}"#).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.provider, Provider::OpenRouter);
        assert_eq!(
            config.chat_completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_openai_provider() {
        let config = CorrectorConfig::from_json_str(
            r#"{"api_key": "sk-test", "model": "gpt-4o-mini", "provider": "openai"}"#,
        )
        .unwrap();
        assert_eq!(
            config.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = CorrectorConfig::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = CorrectorConfig::from_json_str(r#"{"base_url": "localhost:8080"}"#).unwrap_err();
        assert!(matches!(err, CorrectionError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_model_rejected() {
        let err = CorrectorConfig::from_json_str(r#"{"model": "  "}"#).unwrap_err();
        assert!(matches!(err, CorrectionError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = CorrectorConfig::from_json_str(r#"{"timeout_secs": 0}"#).unwrap_err();
        match err {
            CorrectionError::InvalidConfig(msg) => assert!(msg.contains("timeout_secs")),
            other => panic!("expected invalid config, got {:?}", other),
        }
        assert!(CorrectorConfig::from_json_str(r#"{"timeout_secs": 1}"#).is_ok());
    }

    #[test]
    fn test_missing_key_is_allowed_but_flagged() {
        let config = CorrectorConfig::from_json_str("{}").unwrap();
        assert!(!config.has_api_key());
        assert!(!CorrectorConfig::new("   ").has_api_key());
    }

    #[test]
    fn test_overrides_skip_blank_values() {
        let config = CorrectorConfig::new("from-file").with_overrides(|key| match key {
            ENV_API_KEY => Some(" ".to_string()),
            ENV_MODEL => Some("anthropic/claude-3.5-sonnet".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.model, "anthropic/claude-3.5-sonnet");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = CorrectorConfig::from_file("/nonexistent/card-corrector.json").unwrap_err();
        assert!(matches!(err, CorrectionError::IoError(_)));
    }
}
