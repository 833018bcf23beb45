// Per-request outcomes and their console rendering

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::record::FeatureRecord;

/// Species labels returned by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    /// Extract the label from a `{"prediction": "<species>"}` body
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("prediction")
            .cloned()
            .and_then(|label| serde_json::from_value(label).ok())
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        };
        f.write_str(name)
    }
}

/// Result of one request attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The endpoint answered with a JSON body (any status code)
    Response {
        status: u16,
        body: Value,
        input: FeatureRecord,
    },
    /// The request failed before a JSON body could be read
    Failed { error: String, input: FeatureRecord },
}

impl RequestOutcome {
    pub fn input(&self) -> &FeatureRecord {
        match self {
            RequestOutcome::Response { input, .. } | RequestOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_response(&self) -> bool {
        matches!(self, RequestOutcome::Response { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Response { status, .. } => Some(*status),
            RequestOutcome::Failed { .. } => None,
        }
    }

    /// Predicted species, when the body carries a known label
    pub fn species(&self) -> Option<Species> {
        match self {
            RequestOutcome::Response { body, .. } => Species::from_body(body),
            RequestOutcome::Failed { .. } => None,
        }
    }
}

/// Renders the single console line logged for this outcome
impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOutcome::Response {
                status,
                body,
                input,
            } => write!(f, "[{}] {} | input: {}", status, body, input),
            RequestOutcome::Failed { error, input } => {
                write!(f, "request failed: {} | input: {}", error, input)
            }
        }
    }
}
