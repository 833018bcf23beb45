// Load generator loop
// Decision: One sequential task; the next iteration is the only retry
// Decision: The loop has no exit condition; callers stop it by dropping the future

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::client::PredictionClient;
use crate::outcome::RequestOutcome;
use crate::record::{FeatureRecord, RecordGenerator};
use crate::reporter::OutcomeReporter;

// =============================================================================
// State
// =============================================================================

/// Logical state of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Between requests, waiting out the fixed delay
    Idle,
    /// Request sent, awaiting a response or failure
    InFlight,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Idle => f.write_str("idle"),
            LoopState::InFlight => f.write_str("in_flight"),
        }
    }
}

// =============================================================================
// LoadGenerator
// =============================================================================

/// Sends one synthetic record per interval to a prediction endpoint
pub struct LoadGenerator {
    client: Arc<dyn PredictionClient>,
    reporter: Arc<dyn OutcomeReporter>,
    records: RecordGenerator,
    interval: Duration,
    state: LoopState,
    iterations: u64,
}

impl LoadGenerator {
    pub fn new(
        client: Arc<dyn PredictionClient>,
        reporter: Arc<dyn OutcomeReporter>,
        records: RecordGenerator,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            reporter,
            records,
            interval,
            state: LoopState::Idle,
            iterations: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed iterations
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn target(&self) -> &str {
        self.client.target()
    }

    /// Send a record and report whatever happened
    ///
    /// Never fails: every error is turned into a [`RequestOutcome::Failed`].
    pub async fn send_and_report(&mut self, record: FeatureRecord) -> RequestOutcome {
        self.transition(LoopState::InFlight);

        let outcome = match self.client.predict(&record).await {
            Ok(reply) => RequestOutcome::Response {
                status: reply.status,
                body: reply.body,
                input: record,
            },
            Err(e) => RequestOutcome::Failed {
                error: e.describe(),
                input: record,
            },
        };

        self.transition(LoopState::Idle);
        self.reporter.report(&outcome).await;
        outcome
    }

    /// Run a single iteration without the trailing delay
    pub async fn tick(&mut self) -> RequestOutcome {
        let record = self.records.next_record();
        let outcome = self.send_and_report(record).await;
        self.iterations += 1;
        outcome
    }

    /// Run until the process is stopped
    pub async fn run_forever(&mut self) {
        info!(
            target_url = %self.client.target(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting load generator"
        );

        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run a fixed number of iterations, sleeping between them
    pub async fn run_iterations(&mut self, count: u64) {
        debug!(count, "Running bounded load");

        for i in 0..count {
            self.tick().await;
            if i + 1 < count {
                tokio::time::sleep(self.interval).await;
            }
        }
    }

    fn transition(&mut self, next: LoopState) {
        trace!(from = %self.state, to = %next, "Loop state change");
        self.state = next;
    }
}

impl fmt::Debug for LoadGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadGenerator")
            .field("target", &self.client.target())
            .field("interval", &self.interval)
            .field("state", &self.state)
            .field("iterations", &self.iterations)
            .finish()
    }
}
