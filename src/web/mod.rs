//! Web server module
//!
//! Provides the HTTP API for DeepSearch-PRD.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{PrdRequest, PrdResponse};
pub use routes::create_router;
pub use state::AppState;
