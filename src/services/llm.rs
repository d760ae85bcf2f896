use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while talking to the LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing API credential: {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("LLM API returned error: {0}")]
    ApiError(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct LlmResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Client for an OpenAI Responses-shaped endpoint. One blocking call
/// per estimation, temperature 0 for deterministic extraction.
pub struct LlmClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_output_tokens: u32,
    client: Client,
}

impl LlmClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        max_output_tokens: u32,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(75))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            max_output_tokens,
            client,
        })
    }

    /// Send the extraction prompt and return the model's raw text.
    /// The caller owns all parsing and validation of that text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey("OPENAI_API_KEY".to_string()))?;

        let url = format!("{}/v1/responses", self.base_url.trim_end_matches('/'));
        let payload = json!({
            "model": self.model,
            "input": prompt,
            "temperature": 0,
            "max_output_tokens": self.max_output_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!(
                "extraction request failed with status {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let parsed: LlmResponse = response.json().await?;
        let text: String = parsed
            .output
            .iter()
            .flat_map(|o| o.content.iter())
            .filter(|c| c.kind == "output_text")
            .map(|c| c.text.as_str())
            .collect();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        debug!(chars = text.len(), "LLM extraction response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let client = LlmClient::new(
            "https://api.openai.test".to_string(),
            None,
            "gpt-4o-mini".to_string(),
            1024,
        )
        .unwrap();
        let err = tokio_test::block_on(client.complete("prompt")).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(_)));
    }

    #[test]
    fn test_response_text_extraction_shape() {
        let raw = r#"{
            "output": [
                {"content": [{"type": "reasoning", "text": "hmm"},
                             {"type": "output_text", "text": "{\"min_usd\": 1}"}]},
                {"content": [{"type": "output_text", "text": " trailing"}]}
            ]
        }"#;
        let parsed: LlmResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .output
            .iter()
            .flat_map(|o| o.content.iter())
            .filter(|c| c.kind == "output_text")
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(text, "{\"min_usd\": 1} trailing");
    }
}
