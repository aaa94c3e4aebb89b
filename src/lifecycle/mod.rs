//! Service startup hooks
//!
//! The warm-up generation runs once before the listener is bound. Its
//! outcome is logged and returned for inspection, never propagated: a
//! failing backend must not keep the service from starting.

use crate::delegate::SearchDelegate;
use crate::prompt::{build_prd_prompt, WARMUP_QUERY};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Result of the startup warm-up call
#[derive(Debug)]
pub enum WarmupOutcome {
    Succeeded { elapsed: Duration, chars: usize },
    Failed { elapsed: Duration, reason: String },
}

impl WarmupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Initialise the delegate; failures are logged, not returned
pub async fn initialize(delegate: &dyn SearchDelegate) -> bool {
    match delegate.setup().await {
        Ok(()) => true,
        Err(e) => {
            error!("Error initializing {} delegate: {}", delegate.name(), e);
            false
        }
    }
}

/// Run exactly one generation for the fixed warm-up query
pub async fn warm_up(delegate: &dyn SearchDelegate) -> WarmupOutcome {
    let prompt = build_prd_prompt(WARMUP_QUERY);
    let start = Instant::now();

    info!("Warming up {} delegate", delegate.name());

    match delegate.execute(&prompt).await {
        Ok(text) => {
            let elapsed = start.elapsed();
            info!(
                "PRD generator initialized successfully in {:?} ({} chars)",
                elapsed,
                text.len()
            );
            WarmupOutcome::Succeeded {
                elapsed,
                chars: text.len(),
            }
        }
        Err(e) => {
            let elapsed = start.elapsed();
            error!("Warm-up generation failed after {:?}: {}", elapsed, e);
            WarmupOutcome::Failed {
                elapsed,
                reason: e.to_string(),
            }
        }
    }
}
