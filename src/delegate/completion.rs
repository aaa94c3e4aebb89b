//! OpenAI-compatible chat completion client

use super::traits::DelegateError;
use crate::config::DelegateSettings;
use crate::network::{HttpClient, OutboundRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat completion against OpenRouter, OpenAI, or any compatible gateway
pub struct ChatCompletion {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletion {
    pub fn new(settings: &DelegateSettings, client: HttpClient) -> Self {
        Self {
            client,
            base_url: resolve_base_url(settings),
            api_key: settings.llm_api_key.clone(),
            model: settings.model_name().to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Local gateways run without a key; the hosted providers do not
    pub fn validate(&self) -> Result<(), DelegateError> {
        let hosted = self.base_url == OPENROUTER_API_URL || self.base_url == OPENAI_API_URL;
        if hosted && self.api_key.is_none() {
            return Err(DelegateError::NotConfigured(format!(
                "an API key is required for {} (set OPENROUTER_API_KEY, OPENAI_API_KEY or LLM_API_KEY)",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Send one system + user exchange and return the first choice's text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, DelegateError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| DelegateError::Completion(format!("failed to encode request: {}", e)))?;

        let mut request = OutboundRequest::post(format!("{}/chat/completions", self.base_url)).json(body);
        if let Some(ref key) = self.api_key {
            request = request.bearer(key);
        }

        debug!(model = %self.model, "chat completion request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(DelegateError::http("completion"))?;

        if !response.is_success() {
            return Err(DelegateError::Completion(format!(
                "API error ({}): {}",
                response.status,
                response.excerpt()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| DelegateError::Completion(format!("invalid response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(DelegateError::EmptyCompletion)
    }
}

fn resolve_base_url(settings: &DelegateSettings) -> String {
    if let Some(ref url) = settings.llm_base_url {
        return url.trim_end_matches('/').to_string();
    }
    match settings.model_provider() {
        Some("openai") => OPENAI_API_URL.to_string(),
        _ => OPENROUTER_API_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base: Option<String>, key: Option<&str>) -> DelegateSettings {
        DelegateSettings {
            llm_base_url: base,
            llm_api_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_url_resolution() {
        let client = HttpClient::new().unwrap();
        let chat = ChatCompletion::new(&DelegateSettings::default(), client.clone());
        assert_eq!(chat.base_url(), OPENROUTER_API_URL);
        assert_eq!(chat.model(), "google/gemini-2.0-flash-001");

        let openai = DelegateSettings {
            model_id: "openai/gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let chat = ChatCompletion::new(&openai, client.clone());
        assert_eq!(chat.base_url(), OPENAI_API_URL);
        assert_eq!(chat.model(), "gpt-4o-mini");

        let chat = ChatCompletion::new(&settings(Some("http://localhost:4000/".into()), None), client);
        assert_eq!(chat.base_url(), "http://localhost:4000");
    }

    #[test]
    fn test_hosted_provider_needs_key() {
        let client = HttpClient::new().unwrap();
        assert!(ChatCompletion::new(&settings(None, None), client.clone()).validate().is_err());
        assert!(ChatCompletion::new(&settings(None, Some("k")), client.clone()).validate().is_ok());
        let local = settings(Some("http://localhost:4000".into()), None);
        assert!(ChatCompletion::new(&local, client).validate().is_ok());
    }

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "google/gemini-2.0-flash-001",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "# PRD"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let chat = ChatCompletion::new(&settings(Some(server.uri()), Some("sk-test")), HttpClient::new().unwrap());
        let text = chat.complete("sys", "hello").await.unwrap();
        assert_eq!(text, "# PRD");
    }

    #[tokio::test]
    async fn test_empty_choice_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": null}}]
            })))
            .mount(&server)
            .await;

        let chat = ChatCompletion::new(&settings(Some(server.uri()), None), HttpClient::new().unwrap());
        let err = chat.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, DelegateError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_api_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let chat = ChatCompletion::new(&settings(Some(server.uri()), None), HttpClient::new().unwrap());
        let err = chat.complete("sys", "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "completion failed: API error (429): rate limited");
    }
}
