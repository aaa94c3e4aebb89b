//! HTTP networking module
//!
//! Provides HTTP client functionality for the external search, rerank and
//! completion services the delegate talks to.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{HttpMethod, OutboundRequest, OutboundResponse};
