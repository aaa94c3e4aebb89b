//! Deep-search delegate
//!
//! The boundary between the HTTP layer and the external search/rerank/LLM
//! services. Handlers only see [`SearchDelegate`]; [`DeepSearchTool`] is the
//! implementation wired up at startup.

mod completion;
mod deep_search;
mod rerank;
mod search;
mod traits;

pub use completion::ChatCompletion;
pub use deep_search::DeepSearchTool;
pub use rerank::Reranker;
pub use search::WebSearch;
pub use traits::{DelegateError, SearchDelegate, Source};
