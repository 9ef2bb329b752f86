// src/core/error.rs
//! Canonical error returned by every transport, service and poll operation

use super::backend::Backend;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_SERVER_MESSAGE: &str = "Server error";
pub const DEFAULT_UNKNOWN_MESSAGE: &str = "Unknown error";
pub const DEFAULT_NETWORK_MESSAGE: &str = "Network error";
pub const DEFAULT_SERVER_STATUS: u16 = 500;

/// Where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    Primary,
    Ai,
    /// The request never reached a recognized backend.
    Network,
    /// Not a transport failure at all.
    Unknown,
}

impl From<Backend> for ErrorSource {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Primary => ErrorSource::Primary,
            Backend::Ai => ErrorSource::Ai,
        }
    }
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorSource::Primary => "primary",
            ErrorSource::Ai => "ai",
            ErrorSource::Network => "network",
            ErrorSource::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    PrimaryBackendError,
    AiBackendError,
    UnknownError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub source: ErrorSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

impl ApiError {
    pub fn new(source: ErrorSource, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
            details: None,
            source,
            correlation_id: None,
            retry_after_ms: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorSource::Unknown, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorSource::Network, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self.source {
            ErrorSource::Primary => ErrorKind::PrimaryBackendError,
            ErrorSource::Ai => ErrorKind::AiBackendError,
            ErrorSource::Network => ErrorKind::NetworkFailure,
            ErrorSource::Unknown => ErrorKind::UnknownError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }

    pub fn is_network(&self) -> bool {
        self.source == ErrorSource::Network
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
