//! Settings structures for DeepSearch-PRD configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Model used when neither the settings file nor the environment names one
pub const DEFAULT_MODEL_ID: &str = "openrouter/google/gemini-2.0-flash-001";

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub delegate: DelegateSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with the process environment
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge values from an arbitrary variable lookup.
    ///
    /// The model id prefers `LITELLM_SEARCH_MODEL_ID`, then `LITELLM_MODEL_ID`.
    /// Credentials for the LLM follow the provider prefix of the resolved
    /// model id unless `LLM_API_KEY` is set.
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = get("LITELLM_SEARCH_MODEL_ID").or_else(|| get("LITELLM_MODEL_ID")) {
            self.delegate.model_id = model;
        }

        if let Some(val) = get("PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", val),
            }
        }
        if let Some(val) = get("BIND_ADDRESS") {
            self.server.bind_address = val;
        }

        if let Some(val) = get("RERANKER") {
            match val.parse() {
                Ok(reranker) => self.delegate.reranker = reranker,
                Err(e) => warn!("{}", e),
            }
        }
        if let Some(val) = get("SEARCH_PROVIDER") {
            match val.parse() {
                Ok(provider) => self.delegate.search_provider = provider,
                Err(e) => warn!("{}", e),
            }
        }

        let provider_key = match self.delegate.model_provider() {
            Some("openai") => "OPENAI_API_KEY",
            _ => "OPENROUTER_API_KEY",
        };
        if let Some(val) = get("LLM_API_KEY").or_else(|| get(provider_key)) {
            self.delegate.llm_api_key = Some(val);
        }
        if let Some(val) = get("LLM_BASE_URL") {
            self.delegate.llm_base_url = Some(val);
        }
        if let Some(val) = get("SERPER_API_KEY") {
            self.delegate.serper_api_key = Some(val);
        }
        if let Some(val) = get("JINA_API_KEY") {
            self.delegate.jina_api_key = Some(val);
        }
        if let Some(val) = get("SEARXNG_INSTANCE_URL") {
            self.delegate.searxng_instance_url = Some(val);
        }
        if let Some(val) = get("INFINITY_API_URL") {
            self.delegate.infinity_url = Some(val);
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Settings for the deep-search collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateSettings {
    /// LiteLLM-style model id, e.g. `openrouter/google/gemini-2.0-flash-001`
    pub model_id: String,
    /// Reranker applied to search snippets
    pub reranker: RerankerKind,
    /// Web search backend
    pub search_provider: SearchProviderKind,
    /// Override for the chat-completions base URL
    pub llm_base_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub jina_api_key: Option<String>,
    pub searxng_instance_url: Option<String>,
    pub infinity_url: Option<String>,
    /// Maximum number of snippets passed to the model
    pub max_context_results: usize,
    /// Run one generation before accepting traffic
    pub warmup: bool,
}

impl Default for DelegateSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            reranker: RerankerKind::default(),
            search_provider: SearchProviderKind::default(),
            llm_base_url: None,
            llm_api_key: None,
            serper_api_key: None,
            jina_api_key: None,
            searxng_instance_url: None,
            infinity_url: None,
            max_context_results: 5,
            warmup: true,
        }
    }
}

impl DelegateSettings {
    /// Provider prefix of the model id (`openrouter` in `openrouter/google/gemini`)
    pub fn model_provider(&self) -> Option<&str> {
        self.model_id.split_once('/').map(|(provider, _)| provider)
    }

    /// Model name as the completion API expects it, without the provider prefix
    pub fn model_name(&self) -> &str {
        match self.model_id.split_once('/') {
            Some(("openrouter" | "openai", rest)) => rest,
            _ => &self.model_id,
        }
    }
}

/// Reranker choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankerKind {
    /// Jina hosted rerank API
    #[default]
    Jina,
    /// Self-hosted Infinity server
    Infinity,
    /// Keep provider order
    None,
}

impl FromStr for RerankerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jina" => Ok(Self::Jina),
            "infinity" => Ok(Self::Infinity),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("Ignoring unknown reranker: {}", other)),
        }
    }
}

impl fmt::Display for RerankerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jina => "jina",
            Self::Infinity => "infinity",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Web search backend choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProviderKind {
    /// serper.dev Google search API
    #[default]
    Serper,
    /// Self-hosted SearXNG instance
    Searxng,
}

impl FromStr for SearchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serper" => Ok(Self::Serper),
            "searxng" => Ok(Self::Searxng),
            other => Err(format!("Ignoring unknown search provider: {}", other)),
        }
    }
}

impl fmt::Display for SearchProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Serper => "serper",
            Self::Searxng => "searxng",
        };
        f.write_str(name)
    }
}
