// HTTP client for the prediction endpoint
//
// Decision: Trait seam so the loop can run against scripted clients in tests
// Decision: The body is read as text and parsed separately, so a bad body keeps its status code

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::record::FeatureRecord;

/// Errors raised while calling the prediction endpoint
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connection failed")]
    Connect(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error")]
    Http(#[source] reqwest::Error),

    #[error("invalid JSON response body ({status})")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Render the error followed by each of its causes, `: `-separated
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else if err.is_connect() {
            ClientError::Connect(err)
        } else {
            ClientError::Http(err)
        }
    }
}

/// Status code and parsed JSON body returned by the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReply {
    pub status: u16,
    pub body: Value,
}

/// Trait for clients that submit feature records for prediction
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Submit one record and return the status code and parsed body
    async fn predict(&self, record: &FeatureRecord) -> Result<PredictionReply, ClientError>;

    /// The endpoint this client talks to
    fn target(&self) -> &str;
}

/// reqwest-backed client posting JSON to a fixed URL
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    target: String,
    http: reqwest::Client,
}

impl HttpPredictionClient {
    /// Build a client with the given request timeout
    pub fn new(target: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            target: target.into(),
            http,
        })
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, record: &FeatureRecord) -> Result<PredictionReply, ClientError> {
        let response = self
            .http
            .post(&self.target)
            .header(CONTENT_TYPE, "application/json")
            .json(record)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text)
            .map_err(|source| ClientError::InvalidBody { status, source })?;

        Ok(PredictionReply { status, body })
    }

    fn target(&self) -> &str {
        &self.target
    }
}
