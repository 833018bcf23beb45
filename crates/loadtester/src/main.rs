use anyhow::{Context, Result};
use penguin_loadtester::config::load_env_file;
use penguin_loadtester::telemetry::{init_telemetry, TelemetryConfig};
use penguin_loadtester::{build_generator, LoadTesterConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading any configuration
    let env_file = load_env_file();

    // Configure via environment variables:
    // - RUST_LOG or LOG_LEVEL: Log filter (default: "penguin_loadtester=info")
    init_telemetry(TelemetryConfig::from_env());

    if let Some(path) = &env_file {
        tracing::info!(path = %path.display(), "Loaded environment from .env file");
    }

    // Target is resolved exactly once, here
    let config = LoadTesterConfig::from_env();

    tracing::info!(
        target_url = %config.target,
        interval_ms = config.interval.as_millis() as u64,
        timeout_secs = config.request_timeout.as_secs(),
        "penguin-loadtester starting..."
    );

    let mut generator = build_generator(&config).context("Failed to create load generator")?;

    // Runs until interrupted; request failures never end the loop
    tokio::select! {
        _ = generator.run_forever() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(iterations = generator.iterations(), "Received shutdown signal");
        }
    }

    Ok(())
}
