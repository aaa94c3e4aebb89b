//! Snippet reranking

use super::traits::{DelegateError, Source};
use crate::config::{DelegateSettings, RerankerKind};
use crate::network::{HttpClient, OutboundRequest};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const JINA_URL: &str = "https://api.jina.ai/v1/rerank";
const JINA_MODEL: &str = "jina-reranker-v2-base-multilingual";

/// Reorders search results by relevance to the query
pub struct Reranker {
    kind: RerankerKind,
    client: HttpClient,
    jina_url: String,
    jina_api_key: Option<String>,
    infinity_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankHit>,
}

#[derive(Debug, Deserialize)]
struct RerankHit {
    index: usize,
    relevance_score: f64,
}

impl Reranker {
    pub fn new(settings: &DelegateSettings, client: HttpClient) -> Self {
        Self {
            kind: settings.reranker,
            client,
            jina_url: JINA_URL.to_string(),
            jina_api_key: settings.jina_api_key.clone(),
            infinity_url: settings.infinity_url.clone(),
        }
    }

    /// Point the Jina backend at another endpoint
    pub fn with_jina_url(mut self, url: impl Into<String>) -> Self {
        self.jina_url = url.into();
        self
    }

    pub fn kind(&self) -> RerankerKind {
        self.kind
    }

    /// Check that the configured reranker has what it needs
    pub fn validate(&self) -> Result<(), DelegateError> {
        match self.kind {
            RerankerKind::Jina if self.jina_api_key.is_none() => Err(DelegateError::NotConfigured(
                "JINA_API_KEY is required for the jina reranker".to_string(),
            )),
            RerankerKind::Infinity => {
                let base = self.infinity_url.as_deref().ok_or_else(|| {
                    DelegateError::NotConfigured(
                        "INFINITY_API_URL is required for the infinity reranker".to_string(),
                    )
                })?;
                Url::parse(base).map_err(|e| {
                    DelegateError::NotConfigured(format!("invalid Infinity URL {}: {}", base, e))
                })?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Keep the `top_n` sources most relevant to `query`, best first
    pub async fn rerank(
        &self,
        query: &str,
        mut sources: Vec<Source>,
        top_n: usize,
    ) -> Result<Vec<Source>, DelegateError> {
        if sources.is_empty() || top_n == 0 {
            sources.truncate(top_n);
            return Ok(sources);
        }

        let request = match self.kind {
            RerankerKind::None => {
                sources.truncate(top_n);
                return Ok(sources);
            }
            RerankerKind::Jina => OutboundRequest::post(&self.jina_url)
                .bearer(self.jina_api_key.as_deref().unwrap_or_default())
                .json(serde_json::json!({
                    "model": JINA_MODEL,
                    "query": query,
                    "documents": documents(&sources),
                    "top_n": top_n,
                })),
            RerankerKind::Infinity => {
                let base = self.infinity_url.as_deref().unwrap_or_default();
                OutboundRequest::post(format!("{}/rerank", base.trim_end_matches('/'))).json(
                    serde_json::json!({
                        "query": query,
                        "documents": documents(&sources),
                        "return_documents": false,
                    }),
                )
            }
        };

        let response = self
            .client
            .execute(request)
            .await
            .map_err(DelegateError::http("reranker"))?;

        if !response.is_success() {
            return Err(DelegateError::Rerank(format!(
                "{} returned HTTP {}: {}",
                self.kind,
                response.status,
                response.excerpt()
            )));
        }

        let parsed: RerankResponse = response
            .json()
            .map_err(|e| DelegateError::Rerank(format!("invalid {} response: {}", self.kind, e)))?;

        let ranked = order_by_hits(sources, parsed.results, top_n);
        debug!("{} kept {} sources", self.kind, ranked.len());
        Ok(ranked)
    }
}

fn documents(sources: &[Source]) -> Vec<String> {
    sources.iter().map(Source::document).collect()
}

/// Apply reranker hits to `sources`; unknown or repeated indices are skipped
fn order_by_hits(sources: Vec<Source>, mut hits: Vec<RerankHit>, top_n: usize) -> Vec<Source> {
    hits.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut slots: Vec<Option<Source>> = sources.into_iter().map(Some).collect();
    hits.into_iter()
        .filter_map(|hit| slots.get_mut(hit.index).and_then(Option::take))
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(name: &str) -> Source {
        Source {
            title: name.to_string(),
            url: format!("https://{}.example", name),
            snippet: format!("about {}", name),
        }
    }

    fn titles(sources: &[Source]) -> Vec<&str> {
        sources.iter().map(|s| s.title.as_str()).collect()
    }

    fn settings(kind: RerankerKind) -> DelegateSettings {
        DelegateSettings {
            reranker: kind,
            ..Default::default()
        }
    }

    #[test]
    fn test_order_by_hits() {
        let hits = vec![
            RerankHit { index: 0, relevance_score: 0.1 },
            RerankHit { index: 2, relevance_score: 0.9 },
            RerankHit { index: 7, relevance_score: 0.8 },
            RerankHit { index: 2, relevance_score: 0.5 },
            RerankHit { index: 1, relevance_score: 0.4 },
        ];
        let ranked = order_by_hits(vec![source("a"), source("b"), source("c")], hits, 2);
        assert_eq!(titles(&ranked), vec!["c", "b"]);
    }

    #[test]
    fn test_validate() {
        let client = HttpClient::new().unwrap();
        assert!(Reranker::new(&settings(RerankerKind::None), client.clone()).validate().is_ok());
        assert!(Reranker::new(&settings(RerankerKind::Jina), client.clone()).validate().is_err());
        assert!(Reranker::new(&settings(RerankerKind::Infinity), client).validate().is_err());
    }

    #[tokio::test]
    async fn test_none_truncates_without_network() {
        let reranker = Reranker::new(&settings(RerankerKind::None), HttpClient::new().unwrap());
        let ranked = reranker
            .rerank("q", vec![source("a"), source("b"), source("c")], 2)
            .await
            .unwrap();
        assert_eq!(titles(&ranked), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_jina_rerank() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .and(header("authorization", "Bearer jina-key"))
            .and(body_partial_json(serde_json::json!({
                "model": JINA_MODEL,
                "query": "habits",
                "top_n": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": JINA_MODEL,
                "results": [{"index": 1, "relevance_score": 0.97}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut s = settings(RerankerKind::Jina);
        s.jina_api_key = Some("jina-key".to_string());
        let reranker = Reranker::new(&s, HttpClient::new().unwrap())
            .with_jina_url(format!("{}/v1/rerank", server.uri()));

        let ranked = reranker
            .rerank("habits", vec![source("a"), source("b")], 1)
            .await
            .unwrap();
        assert_eq!(titles(&ranked), vec!["b"]);
    }

    #[tokio::test]
    async fn test_infinity_rerank() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rerank"))
            .and(body_partial_json(serde_json::json!({
                "query": "habits",
                "documents": ["a\nabout a", "b\nabout b"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"index": 0, "relevance_score": 0.2},
                    {"index": 1, "relevance_score": 0.6}
                ]
            })))
            .mount(&server)
            .await;

        let mut s = settings(RerankerKind::Infinity);
        s.infinity_url = Some(server.uri());
        let reranker = Reranker::new(&s, HttpClient::new().unwrap());

        let ranked = reranker
            .rerank("habits", vec![source("a"), source("b")], 5)
            .await
            .unwrap();
        assert_eq!(titles(&ranked), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_empty_sources_skip_network() {
        let mut s = settings(RerankerKind::Infinity);
        s.infinity_url = Some("http://127.0.0.1:9".to_string());
        let reranker = Reranker::new(&s, HttpClient::new().unwrap());
        let ranked = reranker.rerank("q", Vec::new(), 3).await.unwrap();
        assert!(ranked.is_empty());
    }
}
