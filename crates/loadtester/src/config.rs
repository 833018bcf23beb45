// Load tester configuration
// Decision: Environment variables only, resolved once at startup
// Decision: Bad numeric values fall back to defaults with a warning instead of aborting

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding the prediction endpoint
pub const API_URL_ENV: &str = "API_URL";
/// Default prediction endpoint (docker-compose service name)
pub const DEFAULT_API_URL: &str = "http://api:8989/predict";

pub const REQUEST_INTERVAL_ENV: &str = "REQUEST_INTERVAL_MS";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a `.env` file from the working directory or one of its parents
///
/// Returns the path that was loaded. Variables already set are not overridden.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific env file, returning its path when it was read
pub fn load_env_file_from(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    dotenvy::from_path(path).ok().map(|_| path.to_path_buf())
}

/// Resolve the target endpoint from the process environment
pub fn resolve_target() -> String {
    resolve_target_with(|key| std::env::var(key).ok())
}

/// Resolve the target endpoint using a custom variable lookup
///
/// A missing or blank `API_URL` is a normal case and yields [`DEFAULT_API_URL`].
pub fn resolve_target_with<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(API_URL_ENV)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Configuration for the load generator
#[derive(Debug, Clone)]
pub struct LoadTesterConfig {
    /// Prediction endpoint that receives every request
    pub target: String,
    /// Fixed delay after each request
    pub interval: Duration,
    /// Per-request timeout enforced by the HTTP client
    pub request_timeout: Duration,
}

impl Default for LoadTesterConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_API_URL.to_string(),
            interval: DEFAULT_INTERVAL,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoadTesterConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `API_URL`: prediction endpoint (default: "http://api:8989/predict")
    /// - `REQUEST_INTERVAL_MS`: delay between requests in milliseconds (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS`: per-request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LoadTesterConfig::from_env`] with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let interval = match lookup(REQUEST_INTERVAL_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!(value = %raw, "Invalid {}, using default", REQUEST_INTERVAL_ENV);
                    DEFAULT_INTERVAL
                }
            },
            None => DEFAULT_INTERVAL,
        };

        let request_timeout = match lookup(REQUEST_TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "Invalid {}, using default", REQUEST_TIMEOUT_ENV);
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Self {
            target: resolve_target_with(&lookup),
            interval,
            request_timeout,
        }
    }
}
