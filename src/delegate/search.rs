//! Web search backends

use super::traits::{DelegateError, Source};
use crate::config::{DelegateSettings, SearchProviderKind};
use crate::network::{HttpClient, OutboundRequest};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const SERPER_URL: &str = "https://google.serper.dev/search";

/// Web search against the configured provider
pub struct WebSearch {
    kind: SearchProviderKind,
    client: HttpClient,
    serper_url: String,
    serper_api_key: Option<String>,
    searxng_instance_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerperResponse {
    organic: Vec<SerperResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerperResult {
    title: String,
    link: String,
    snippet: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearxngResponse {
    results: Vec<SearxngResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearxngResult {
    title: String,
    url: String,
    content: Option<String>,
}

impl WebSearch {
    pub fn new(settings: &DelegateSettings, client: HttpClient) -> Self {
        Self {
            kind: settings.search_provider,
            client,
            serper_url: SERPER_URL.to_string(),
            serper_api_key: settings.serper_api_key.clone(),
            searxng_instance_url: settings.searxng_instance_url.clone(),
        }
    }

    /// Point the Serper backend at another endpoint
    pub fn with_serper_url(mut self, url: impl Into<String>) -> Self {
        self.serper_url = url.into();
        self
    }

    pub fn kind(&self) -> SearchProviderKind {
        self.kind
    }

    /// Check that the configured provider has what it needs
    pub fn validate(&self) -> Result<(), DelegateError> {
        match self.kind {
            SearchProviderKind::Serper => {
                if self.serper_api_key.is_none() {
                    return Err(DelegateError::NotConfigured(
                        "SERPER_API_KEY is required for the serper search provider".to_string(),
                    ));
                }
            }
            SearchProviderKind::Searxng => {
                let instance = self.searxng_instance_url.as_deref().ok_or_else(|| {
                    DelegateError::NotConfigured(
                        "SEARXNG_INSTANCE_URL is required for the searxng search provider"
                            .to_string(),
                    )
                })?;
                Url::parse(instance).map_err(|e| {
                    DelegateError::NotConfigured(format!(
                        "invalid SearXNG instance URL {}: {}",
                        instance, e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Search the web for `phrase`
    pub async fn search(&self, phrase: &str) -> Result<Vec<Source>, DelegateError> {
        let sources = match self.kind {
            SearchProviderKind::Serper => self.search_serper(phrase).await?,
            SearchProviderKind::Searxng => self.search_searxng(phrase).await?,
        };
        debug!("{} returned {} results", self.kind, sources.len());
        Ok(sources)
    }

    async fn search_serper(&self, phrase: &str) -> Result<Vec<Source>, DelegateError> {
        let key = self.serper_api_key.as_deref().unwrap_or_default();
        let request = OutboundRequest::post(&self.serper_url)
            .header("X-API-KEY", key)
            .json(serde_json::json!({ "q": phrase }));

        let response = self
            .client
            .execute(request)
            .await
            .map_err(DelegateError::http("serper"))?;

        if !response.is_success() {
            return Err(DelegateError::Search(format!(
                "serper returned HTTP {}: {}",
                response.status,
                response.excerpt()
            )));
        }

        let parsed: SerperResponse = response
            .json()
            .map_err(|e| DelegateError::Search(format!("invalid serper response: {}", e)))?;

        Ok(parsed
            .organic
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .map(|r| Source {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect())
    }

    async fn search_searxng(&self, phrase: &str) -> Result<Vec<Source>, DelegateError> {
        let instance = self.searxng_instance_url.as_deref().unwrap_or_default();
        let request = OutboundRequest::get(format!("{}/search", instance.trim_end_matches('/')))
            .param("q", phrase)
            .param("format", "json");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(DelegateError::http("searxng"))?;

        if !response.is_success() {
            return Err(DelegateError::Search(format!(
                "searxng returned HTTP {}: {}",
                response.status,
                response.excerpt()
            )));
        }

        let parsed: SearxngResponse = response
            .json()
            .map_err(|e| DelegateError::Search(format!("invalid searxng response: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .map(|r| Source {
                title: r.title,
                url: r.url,
                snippet: r.content.unwrap_or_default(),
            })
            .collect())
    }
}
