//! Outbound request and response types

use std::collections::HashMap;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request to an external service
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// JSON body
    pub json: Option<serde_json::Value>,
    /// Bearer token for the Authorization header
    pub bearer: Option<String>,
}

impl OutboundRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            params: Vec::new(),
            json: None,
            bearer: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.json = Some(data);
        self
    }

    /// Authenticate with a bearer token
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// HTTP response from an external service
#[derive(Debug)]
pub struct OutboundResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl OutboundResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body shortened for error messages
    pub fn excerpt(&self) -> &str {
        const LIMIT: usize = 300;
        let text = self.text.trim();
        match text.char_indices().nth(LIMIT) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, text: &str) -> OutboundResponse {
        OutboundResponse {
            status,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_builder() {
        let req = OutboundRequest::post("http://localhost/search")
            .header("X-API-KEY", "k")
            .param("format", "json")
            .bearer("t")
            .json(serde_json::json!({"q": "x"}));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.headers.get("X-API-KEY").map(String::as_str), Some("k"));
        assert_eq!(req.params, vec![("format".to_string(), "json".to_string())]);
        assert_eq!(req.bearer.as_deref(), Some("t"));
        assert!(req.json.is_some());
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, "").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(302, "").is_success());
        assert!(!response(500, "").is_success());
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let resp = response(500, &long);
        assert_eq!(resp.excerpt().chars().count(), 300);
        assert_eq!(response(500, "  short  ").excerpt(), "short");
    }
}
