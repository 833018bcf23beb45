// Error types for load tester startup

use thiserror::Error;

use crate::client::ClientError;

/// Result type alias for startup operations
pub type Result<T> = std::result::Result<T, LoadTesterError>;

/// Errors that can stop the load tester before its loop starts
///
/// Once the loop runs, request failures are reported, never returned.
#[derive(Debug, Error)]
pub enum LoadTesterError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ClientError),
}
