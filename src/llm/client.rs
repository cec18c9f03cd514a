use crate::config::CorrectorConfig;
use crate::error::{CorrectionError, Result};
use crate::llm::types::*;
use crate::llm::CompletionBackend;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Chat completion client for OpenAI-compatible endpoints (OpenRouter,
/// OpenAI, or any `base_url` override).
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    config: CorrectorConfig,
}

impl CompletionClient {
    pub fn new(config: CorrectorConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl CompletionBackend for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if !self.config.has_api_key() {
            return Err(CorrectionError::MissingApiKey);
        }

        let url = self.config.chat_completions_url();
        let payload = ChatCompletionRequest::new(&self.config.model, request);
        debug!("Sending correction request to {} (model {})", url, self.config.model);

        let res = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.trim())
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let err_text = res.text().await.unwrap_or_default();
            return Err(CorrectionError::RateLimited(err_text));
        }
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(CorrectionError::ApiStatus {
                status: status.as_u16(),
                body: err_text,
            });
        }

        let body_text = res.text().await?;
        debug!("Raw completion response: {}", body_text);
        let body: ChatCompletionResponse = serde_json::from_str(&body_text).map_err(|e| {
            CorrectionError::Request(format!("Unexpected response body: {}", e))
        })?;

        let message = body
            .choices
            .into_iter()
            .next()
            .ok_or(CorrectionError::EmptyResponse)?
            .message;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(CorrectionError::Refused(refusal));
        }

        match message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(CorrectionError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::compose_messages;

    #[tokio::test]
    async fn test_missing_key_fails_before_sending() {
        // Unroutable base URL: reaching the network would surface a
        // connection error instead.
        let config = CorrectorConfig::new("").with_base_url("http://127.0.0.1:9");
        let client = CompletionClient::new(config).unwrap();
        let request = CompletionRequest {
            messages: compose_messages([("Front", "teh")]),
            schema: serde_json::json!({}),
            schema_name: "CorrectedFields".to_string(),
        };

        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, CorrectionError::MissingApiKey));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = CorrectorConfig::new("k").with_base_url("ftp://example");
        assert!(matches!(
            CompletionClient::new(config),
            Err(CorrectionError::InvalidConfig(_))
        ));
    }
}
