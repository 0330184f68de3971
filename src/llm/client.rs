use crate::error::{ForecastError, Result};
use crate::llm::completion::CompletionClient;
use crate::llm::types::*;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Everything needed to talk to Gemini, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ForecastError::Config(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: Some("application/json".to_string()),
            }),
        };

        debug!(
            "Sending {} byte prompt to Gemini model {}",
            prompt.len(),
            self.config.model
        );

        let res = self.client.post(self.endpoint()).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(ForecastError::Completion(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        response_text(body)
    }
}

/// Concatenates the text parts of the first candidate.
fn response_text(body: GenerateContentResponse) -> Result<String> {
    let candidate = body
        .candidates
        .ok_or_else(|| ForecastError::Completion("No candidates returned".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::Completion("Empty candidates list".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!("Gemini finished with reason {}", reason);
        }
    }

    let parts = candidate
        .content
        .map(|c| c.parts)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ForecastError::Completion("No parts in content".to_string()))?;

    let text: String = parts
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text),
            Part::Other(_) => None,
        })
        .collect();

    if text.is_empty() {
        return Err(ForecastError::Completion(
            "Model returned non-text content".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }

    fn name(&self) -> &str {
        self.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new("k3y")
                .with_model("gemini-test")
                .with_base_url(server.uri())
                .with_temperature(0.3),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(query_param("key", "k3y"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "price of tea"}]}],
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"current_price\": 2.5}"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client.generate("price of tea").await.unwrap();
        assert_eq!(text, "{\"current_price\": 2.5}");
    }

    #[tokio::test]
    async fn test_generate_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate("x").await.unwrap_err();
        assert!(matches!(err, ForecastError::Completion(_)));
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_generate_rejects_unreadable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate("x").await.unwrap_err();
        assert!(matches!(err, ForecastError::Http(_)));
    }

    #[test]
    fn test_temperature_builder() {
        let config = GeminiConfig::new("k").with_temperature(0.7);
        assert_eq!(config.temperature, Some(0.7));
    }

    fn parse(body: &str) -> GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_response_text_joins_text_parts() {
        let body = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": " {\"a\":"}, {"text": " 1} "}]}}]}"#,
        );
        assert_eq!(response_text(body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_response_text_errors() {
        let no_candidates = parse(r#"{}"#);
        assert!(matches!(
            response_text(no_candidates),
            Err(ForecastError::Completion(_))
        ));

        let empty = parse(r#"{"candidates": []}"#);
        assert!(matches!(response_text(empty), Err(ForecastError::Completion(_))));

        let no_parts = parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#);
        assert!(matches!(
            response_text(no_parts),
            Err(ForecastError::Completion(_))
        ));

        let non_text = parse(
            r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "f"}}]}}]}"#,
        );
        let err = response_text(non_text).unwrap_err();
        assert!(err.to_string().contains("non-text"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = GeminiClient::new(GeminiConfig::new("  ")).err().unwrap();
        assert!(matches!(err, ForecastError::Config(_)));
    }

    #[test]
    fn test_endpoint_uses_config() {
        let client = GeminiClient::new(
            GeminiConfig::new("k3y")
                .with_model("gemini-test")
                .with_base_url("http://localhost:9999/v1/"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1/models/gemini-test:generateContent?key=k3y"
        );
        assert_eq!(client.name(), "gemini-test");
    }
}
