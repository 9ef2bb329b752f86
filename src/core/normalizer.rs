// src/core/normalizer.rs
//! Maps raw failures from either backend into one `ApiError`.
//!
//! The primary backend wraps errors as `{ "error": { "code", "message" } }` (or a flat
//! `{ "code", "message" }`, or ProblemDetails); the AI backend uses
//! `{ "detail": { "code", "message" } }`, `{ "detail": "text" }` or a validation list.
//! Bodies are parsed into these shapes strictly; anything else falls back to the
//! transport message.

use super::backend::Backend;
use super::error::{
    ApiError, ErrorSource, DEFAULT_NETWORK_MESSAGE, DEFAULT_SERVER_MESSAGE,
    DEFAULT_SERVER_STATUS, DEFAULT_UNKNOWN_MESSAGE,
};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use serde_json::Value;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// A failed HTTP exchange as seen by the transport.
#[derive(Debug, Clone, Default)]
pub struct TransportFailure {
    /// Tag of the transport that issued the request, when known.
    pub backend: Option<Backend>,
    pub url: Option<String>,
    /// `None` when no response was received.
    pub status: Option<u16>,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub message: String,
    pub timed_out: bool,
}

impl TransportFailure {
    fn has_response(&self) -> bool {
        self.status.is_some() || self.body.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum RawFailure {
    Transport(TransportFailure),
    /// Anything that is not a transport error.
    Other(String),
    /// Already normalized; passes through unchanged.
    Canonical(ApiError),
}

impl From<TransportFailure> for RawFailure {
    fn from(failure: TransportFailure) -> Self {
        RawFailure::Transport(failure)
    }
}

impl From<ApiError> for RawFailure {
    fn from(err: ApiError) -> Self {
        RawFailure::Canonical(err)
    }
}

impl From<reqwest::Error> for RawFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_builder() {
            return RawFailure::Other(err.to_string());
        }
        RawFailure::Transport(TransportFailure {
            backend: None,
            url: err.url().map(|url| url.to_string()),
            status: err.status().map(|status| status.as_u16()),
            headers: HeaderMap::new(),
            body: None,
            message: err.to_string(),
            timed_out: err.is_timeout(),
        })
    }
}

impl From<anyhow::Error> for RawFailure {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ApiError>() {
            Ok(api_error) => return RawFailure::Canonical(api_error),
            Err(err) => err,
        };
        match err.downcast::<reqwest::Error>() {
            Ok(transport_error) => transport_error.into(),
            Err(err) => RawFailure::Other(format!("{:#}", err)),
        }
    }
}

impl From<serde_json::Error> for RawFailure {
    fn from(err: serde_json::Error) -> Self {
        RawFailure::Other(err.to_string())
    }
}

// ===== Backend error envelopes =====

#[derive(Debug, Default, Deserialize)]
struct CodeMessage {
    #[serde(default, alias = "errorCode")]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PrimaryErrorBody {
    Enveloped {
        error: CodeMessage,
        /// Used when the nested object has no message.
        #[serde(default)]
        message: Option<String>,
        #[serde(default, alias = "errorCode")]
        code: Option<Value>,
    },
    EnvelopedText {
        error: String,
    },
    Flat {
        message: String,
        #[serde(default, alias = "errorCode")]
        code: Option<Value>,
    },
    /// Matches any object. Only a `title`, or a `detail` next to `status` or `type`,
    /// makes it a problem document.
    Problem {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        status: Option<Value>,
        #[serde(default)]
        detail: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        errors: Option<Value>,
        #[serde(default, rename = "traceId")]
        trace_id: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AiErrorBody {
    DetailList { detail: Vec<ValidationIssue> },
    DetailText { detail: String },
    DetailObject { detail: CodeMessage },
    Flat {
        message: String,
        #[serde(default)]
        code: Option<Value>,
    },
}

#[derive(Debug, Default)]
struct Extracted {
    code: Option<String>,
    message: Option<String>,
    details: Option<Value>,
    correlation_id: Option<String>,
}

fn code_to_string(code: Option<Value>) -> Option<String> {
    match code? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn extract_primary(body: &Value) -> Option<Extracted> {
    let parsed = PrimaryErrorBody::deserialize(body).ok()?;
    let extracted = match parsed {
        PrimaryErrorBody::Enveloped {
            error,
            message,
            code,
        } => Extracted {
            code: code_to_string(error.code).or_else(|| code_to_string(code)),
            message: non_empty(error.message).or_else(|| non_empty(message)),
            ..Default::default()
        },
        PrimaryErrorBody::EnvelopedText { error } => Extracted {
            message: non_empty(Some(error)),
            ..Default::default()
        },
        PrimaryErrorBody::Flat { message, code } => Extracted {
            code: code_to_string(code),
            message: non_empty(Some(message)),
            ..Default::default()
        },
        PrimaryErrorBody::Problem {
            title,
            status,
            detail,
            kind,
            errors,
            trace_id,
        } => {
            let detail_only = detail.is_some() && (status.is_some() || kind.is_some());
            if title.is_none() && !detail_only {
                return None;
            }
            Extracted {
                code: Some(kind.unwrap_or_else(|| "PROBLEM_DETAILS".to_string())),
                message: non_empty(detail).or_else(|| non_empty(title)),
                details: errors,
                correlation_id: trace_id,
            }
        }
    };
    Some(extracted)
}

fn extract_ai(body: &Value) -> Option<Extracted> {
    let parsed = AiErrorBody::deserialize(body).ok()?;
    let extracted = match parsed {
        AiErrorBody::DetailList { detail } => {
            let message = detail
                .iter()
                .map(|issue| {
                    issue
                        .msg
                        .clone()
                        .or_else(|| issue.kind.clone())
                        .unwrap_or_else(|| "validation error".to_string())
                })
                .collect::<Vec<_>>()
                .join("; ");
            Extracted {
                code: Some("VALIDATION_ERROR".to_string()),
                message: non_empty(Some(message)),
                ..Default::default()
            }
        }
        AiErrorBody::DetailText { detail } => Extracted {
            message: non_empty(Some(detail)),
            ..Default::default()
        },
        AiErrorBody::DetailObject { detail } => Extracted {
            code: code_to_string(detail.code),
            message: non_empty(detail.message),
            ..Default::default()
        },
        AiErrorBody::Flat { message, code } => Extracted {
            code: code_to_string(code),
            message: non_empty(Some(message)),
            ..Default::default()
        },
    };
    Some(extracted)
}

/// Milliseconds to wait, from a `Retry-After` value in seconds or as an HTTP date.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds.saturating_mul(1000));
    }
    let date = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
    Some(wait.num_milliseconds().max(0) as u64)
}

fn header_str(headers: &HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Knows both base URLs so that untagged failures can still be attributed.
#[derive(Debug, Clone)]
pub struct ErrorNormalizer {
    primary_base: String,
    ai_base: String,
}

impl ErrorNormalizer {
    pub fn new(primary_base: impl Into<String>, ai_base: impl Into<String>) -> Self {
        Self {
            primary_base: crate::utils::trim_base_url(&primary_base.into()),
            ai_base: crate::utils::trim_base_url(&ai_base.into()),
        }
    }

    pub fn primary_base(&self) -> &str {
        &self.primary_base
    }

    pub fn ai_base(&self) -> &str {
        &self.ai_base
    }

    /// Attribute a URL to a backend by longest matching base URL; AI wins ties.
    pub fn source_for_url(&self, url: &str) -> ErrorSource {
        let ai = prefix_len(&self.ai_base, url);
        let primary = prefix_len(&self.primary_base, url);
        match (ai, primary) {
            (Some(a), Some(p)) if p > a => ErrorSource::Primary,
            (Some(_), _) => ErrorSource::Ai,
            (None, Some(_)) => ErrorSource::Primary,
            (None, None) => ErrorSource::Network,
        }
    }

    pub fn normalize(&self, raw: impl Into<RawFailure>) -> ApiError {
        match raw.into() {
            RawFailure::Canonical(err) => err,
            RawFailure::Other(message) => {
                ApiError::unknown(non_empty(Some(message)).unwrap_or_else(|| {
                    DEFAULT_UNKNOWN_MESSAGE.to_string()
                }))
                .with_code("UNKNOWN")
            }
            RawFailure::Transport(failure) => self.normalize_transport(failure),
        }
    }

    fn normalize_transport(&self, failure: TransportFailure) -> ApiError {
        let correlation_id = header_str(&failure.headers, CORRELATION_ID_HEADER);

        if !failure.has_response() {
            let (code, message) = if failure.timed_out {
                ("TIMEOUT", "The request timed out.".to_string())
            } else {
                (
                    "NETWORK",
                    non_empty(Some(failure.message))
                        .unwrap_or_else(|| DEFAULT_NETWORK_MESSAGE.to_string()),
                )
            };
            let mut err = ApiError::network(message).with_code(code);
            err.details = failure.url.map(|url| serde_json::json!({ "url": url }));
            err.correlation_id = correlation_id;
            return err;
        }

        let source = match failure.backend {
            Some(backend) => ErrorSource::from(backend),
            None => failure
                .url
                .as_deref()
                .map(|url| self.source_for_url(url))
                .unwrap_or(ErrorSource::Network),
        };
        let status = failure.status.unwrap_or(DEFAULT_SERVER_STATUS);

        let body_json = failure
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .map(|body| {
                serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string()))
            });

        let extracted = body_json
            .as_ref()
            .and_then(|body| match source {
                ErrorSource::Primary => extract_primary(body),
                ErrorSource::Ai => extract_ai(body),
                _ => extract_primary(body).or_else(|| extract_ai(body)),
            })
            .unwrap_or_default();

        let message = extracted
            .message
            .or_else(|| non_empty(Some(failure.message)))
            .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());

        let retry_after_ms = if status == 429 {
            header_str(&failure.headers, RETRY_AFTER).and_then(|value| parse_retry_after(&value))
        } else {
            None
        };

        ApiError {
            message,
            status: Some(status),
            code: extracted.code,
            details: extracted.details.or(body_json),
            source,
            correlation_id: correlation_id.or(extracted.correlation_id),
            retry_after_ms,
        }
    }
}

fn prefix_len(base: &str, url: &str) -> Option<usize> {
    if base.is_empty() || !url.starts_with(base) {
        return None;
    }
    match url[base.len()..].chars().next() {
        None | Some('/') | Some('?') | Some('#') => Some(base.len()),
        _ => None,
    }
}
