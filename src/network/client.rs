//! HTTP client for calling the search, rerank and completion services

use super::request::{HttpMethod, OutboundRequest, OutboundResponse};
use reqwest::{Client, Response};

/// HTTP client wrapper shared by every outbound integration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// No request timeout is configured: generation may legitimately take minutes.
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().gzip(true).brotli(true).build()?;

        Ok(Self {
            client,
            user_agent: format!("deepsearch-prd/{}", crate::VERSION),
        })
    }

    /// Execute an outbound request
    pub async fn execute(&self, request: OutboundRequest) -> reqwest::Result<OutboundResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(ref token) = request.bearer {
            req_builder = req_builder.bearer_auth(token);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(ref body) = request.json {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into OutboundResponse
    async fn parse_response(response: Response) -> reqwest::Result<OutboundResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(OutboundResponse { status, text })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
