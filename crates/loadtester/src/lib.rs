// Penguin Loadtester
//
// Decision: Library crate with a thin binary; tests drive the loop through the same API
// Decision: Request failures never leave the loop, they become reported outcomes

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod outcome;
pub mod record;
pub mod reporter;
pub mod telemetry;

pub use client::{ClientError, HttpPredictionClient, PredictionClient, PredictionReply};
pub use config::{resolve_target, LoadTesterConfig, DEFAULT_API_URL};
pub use error::{LoadTesterError, Result};
pub use generator::{LoadGenerator, LoopState};
pub use outcome::{RequestOutcome, Species};
pub use record::{generate_record, FeatureRange, FeatureRecord, RecordGenerator};
pub use reporter::{InMemoryReporter, OutcomeReporter, TracingReporter};

use std::sync::Arc;

/// Build a generator that posts to the configured endpoint and logs via `tracing`
pub fn build_generator(config: &LoadTesterConfig) -> Result<LoadGenerator> {
    let client = HttpPredictionClient::new(config.target.clone(), config.request_timeout)?;
    Ok(LoadGenerator::new(
        Arc::new(client),
        Arc::new(TracingReporter),
        RecordGenerator::new(),
        config.interval,
    ))
}
