//! Search, rerank, then generate

use super::completion::ChatCompletion;
use super::rerank::Reranker;
use super::search::WebSearch;
use super::traits::{DelegateError, SearchDelegate, Source};
use crate::config::DelegateSettings;
use crate::network::HttpClient;
use crate::prompt;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are a senior product manager. Write precise, well-structured \
Product Requirements Documents in Markdown, grounded in the web sources provided when they are relevant.";

/// Longest search phrase sent to a provider when the prompt has no query line
const MAX_PHRASE_CHARS: usize = 400;

/// Deep-search delegate: web search, rerank, then one chat completion.
///
/// Built once per process. Holds no per-request state, so concurrent
/// `execute` calls proceed independently.
pub struct DeepSearchTool {
    search: WebSearch,
    reranker: Reranker,
    completion: ChatCompletion,
    max_context_results: usize,
    ready: OnceCell<()>,
}

impl DeepSearchTool {
    pub fn new(settings: &DelegateSettings, client: HttpClient) -> Self {
        Self {
            search: WebSearch::new(settings, client.clone()),
            reranker: Reranker::new(settings, client.clone()),
            completion: ChatCompletion::new(settings, client),
            max_context_results: settings.max_context_results,
            ready: OnceCell::new(),
        }
    }

    /// Replace the search backend
    pub fn with_search(mut self, search: WebSearch) -> Self {
        self.search = search;
        self
    }

    /// Replace the reranker
    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = reranker;
        self
    }

    fn validate(&self) -> Result<(), DelegateError> {
        self.completion.validate()?;
        self.search.validate()?;
        self.reranker.validate()?;
        Ok(())
    }
}

#[async_trait]
impl SearchDelegate for DeepSearchTool {
    fn name(&self) -> &str {
        "deep-search"
    }

    async fn setup(&self) -> Result<(), DelegateError> {
        self.ready
            .get_or_try_init(|| async {
                self.validate()?;
                info!(
                    "Deep search ready: model={} search={} reranker={}",
                    self.completion.model(),
                    self.search.kind(),
                    self.reranker.kind()
                );
                Ok::<(), DelegateError>(())
            })
            .await
            .map(|_| ())
    }

    async fn execute(&self, prompt: &str) -> Result<String, DelegateError> {
        self.setup().await?;

        let phrase = search_phrase(prompt);
        let sources = self.search.search(&phrase).await?;
        let sources = self
            .reranker
            .rerank(&phrase, sources, self.max_context_results)
            .await?;
        debug!("Generating with {} sources", sources.len());

        self.completion
            .complete(SYSTEM_PROMPT, &compose_user_message(&sources, prompt))
            .await
    }
}

/// What to search the web for: the product query if the prompt carries one
fn search_phrase(prompt: &str) -> String {
    match prompt::extract_query(prompt) {
        Some(query) => query.to_string(),
        None => prompt.trim().chars().take(MAX_PHRASE_CHARS).collect(),
    }
}

fn compose_user_message(sources: &[Source], prompt: &str) -> String {
    if sources.is_empty() {
        return format!(
            "No web search results were found; rely on your own knowledge.\n\n{}",
            prompt
        );
    }

    let mut message = String::from("Web search results:\n");
    for (i, source) in sources.iter().enumerate() {
        message.push_str(&format!("\n[{}] {} ({})\n", i + 1, source.title, source.url));
        if !source.snippet.is_empty() {
            message.push_str(&source.snippet);
            message.push('\n');
        }
    }
    message.push_str("\n---\n\n");
    message.push_str(prompt);
    message
}
