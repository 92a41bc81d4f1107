//! Message contract with the background persistence handler

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Action tag of an import request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageAction {
    #[default]
    ImportSessions,
}

/// How imported sessions combine with stored ones. Only merge is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
}

/// `{ action: "IMPORT_SESSIONS", jsonData, importMode: "merge" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub action: MessageAction,
    /// The bundle exactly as decoded from the file
    pub json_data: String,
    pub import_mode: ImportMode,
}

impl ImportRequest {
    pub fn new(json_data: impl Into<String>) -> Self {
        Self {
            action: MessageAction::ImportSessions,
            json_data: json_data.into(),
            import_mode: ImportMode::Merge,
        }
    }
}

/// `{ success, error? }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Transport-level gateway failures
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request could not be delivered
    #[error("Request failed: {0}")]
    Transport(String),

    /// Handler answered with a non-success HTTP status
    #[error("Import service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not an import response
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// The sole channel that persists imported sessions
#[async_trait]
pub trait ImportGateway: Send + Sync {
    async fn send(&self, request: ImportRequest) -> Result<ImportResponse, GatewayError>;
}

/// Gateway that POSTs requests as JSON to the import service
#[derive(Debug, Clone)]
pub struct HttpImportGateway {
    url: String,
    client: Client,
}

impl HttpImportGateway {
    /// Build a gateway for `url`. Without a timeout a hung service leaves the
    /// workflow importing until it answers.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ImportGateway for HttpImportGateway {
    async fn send(&self, request: ImportRequest) -> Result<ImportResponse, GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}
