//! DeepSearch-PRD: an HTTP gateway that turns a product idea into a
//! Product Requirements Document.
//!
//! A request's query is expanded into a structured PRD prompt, handed to a
//! deep-search delegate (web search, rerank, LLM completion), and the
//! generated text is returned as-is.

pub mod config;
pub mod delegate;
pub mod lifecycle;
pub mod network;
pub mod prompt;
pub mod web;

pub use config::Settings;
pub use delegate::{DeepSearchTool, DelegateError, SearchDelegate};
pub use prompt::build_prd_prompt;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
