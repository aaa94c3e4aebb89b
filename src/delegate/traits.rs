//! Delegate trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a search delegate
#[derive(Debug, Error)]
pub enum DelegateError {
    /// Required credentials or endpoints are missing
    #[error("delegate not configured: {0}")]
    NotConfigured(String),
    /// The web search backend rejected the query or returned garbage
    #[error("search failed: {0}")]
    Search(String),
    /// The reranker rejected the request or returned garbage
    #[error("rerank failed: {0}")]
    Rerank(String),
    /// The completion API rejected the request or returned garbage
    #[error("completion failed: {0}")]
    Completion(String),
    /// Transport-level failure talking to an external service
    #[error("request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The model answered without any text
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl DelegateError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { service, source }
    }
}

/// A web page used as context for generation
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl Source {
    /// Text handed to rerankers
    pub fn document(&self) -> String {
        if self.snippet.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.snippet)
        }
    }
}

/// External collaborator that turns a prompt into generated text.
///
/// One instance is built at startup and shared by every request; implementations
/// must tolerate concurrent `execute` calls.
#[async_trait]
pub trait SearchDelegate: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Idempotent initialisation; safe to call any number of times
    async fn setup(&self) -> Result<(), DelegateError> {
        Ok(())
    }

    /// Run one generation for `prompt`
    async fn execute(&self, prompt: &str) -> Result<String, DelegateError>;
}
