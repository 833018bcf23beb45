// Outcome reporting
//
// Decision: Reporting is a trait so tests can collect outcomes instead of scraping logs
// Decision: Non-2xx responses are logged at warn but otherwise treated like any response

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::outcome::RequestOutcome;

/// Trait for sinks that receive one outcome per loop iteration
///
/// Implementations must not fail: reporting is the last step of an
/// iteration and nothing downstream can handle an error.
#[async_trait]
pub trait OutcomeReporter: Send + Sync {
    async fn report(&self, outcome: &RequestOutcome);
}

/// Logs each outcome as one console line through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

#[async_trait]
impl OutcomeReporter for TracingReporter {
    async fn report(&self, outcome: &RequestOutcome) {
        match outcome {
            RequestOutcome::Response { status, .. } if (200..300).contains(status) => {
                let species = outcome.species().map(|s| s.to_string());
                info!(status = *status, species = ?species, "{}", outcome);
            }
            RequestOutcome::Response { status, .. } => {
                warn!(status = *status, "{}", outcome);
            }
            RequestOutcome::Failed { .. } => {
                error!("{}", outcome);
            }
        }
    }
}

/// Collects outcomes in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryReporter {
    outcomes: Arc<RwLock<Vec<RequestOutcome>>>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All outcomes reported so far, oldest first
    pub async fn outcomes(&self) -> Vec<RequestOutcome> {
        self.outcomes.read().await.clone()
    }

    /// Rendered console lines, oldest first
    pub async fn lines(&self) -> Vec<String> {
        self.outcomes
            .read()
            .await
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.outcomes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.outcomes.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.outcomes.write().await.clear();
    }
}

#[async_trait]
impl OutcomeReporter for InMemoryReporter {
    async fn report(&self, outcome: &RequestOutcome) {
        self.outcomes.write().await.push(outcome.clone());
    }
}
