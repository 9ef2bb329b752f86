// src/core/poll.rs
//! Ingest a resource, then poll until its derived result is ready or time runs out.
//!
//! States: `Ingesting -> Polling -> {Ready, TimedOut}`. A failed submission is fatal;
//! failed polls are retried. Running out of time is not an error: the handle comes
//! back with `result: None`.

use super::error::ApiError;
use crate::app_log;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Response fields that may carry the new resource's identifier, in lookup order.
const RESOURCE_ID_FIELDS: &[&str] = &["resume_id", "id", "resumeId"];

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub cancel: Option<CancellationToken>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
            cancel: None,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Ingesting,
    Polling,
    Ready,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestHandle<T> {
    pub resource_id: String,
    /// `None` only when the timeout elapsed first.
    pub result: Option<T>,
}

fn cancelled() -> ApiError {
    ApiError::unknown("Operation cancelled").with_code("CANCELLED")
}

/// Await `fut`, or bail out with `CANCELLED` when the token fires first.
async fn until_cancelled<F: Future>(
    fut: F,
    cancel: Option<&CancellationToken>,
) -> Result<F::Output, ApiError> {
    match cancel {
        Some(token) => tokio::select! {
            _ = token.cancelled() => Err(cancelled()),
            output = fut => Ok(output),
        },
        None => Ok(fut.await),
    }
}

/// Treat `null`, `{}`, `[]` and `""` as "not ready yet".
pub fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Pull the new resource's identifier out of an ingest response.
pub fn resource_id_from(response: &Value) -> Result<String, ApiError> {
    RESOURCE_ID_FIELDS
        .iter()
        .filter_map(|field| response.get(*field))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            ApiError::unknown("Ingest response did not include a resource identifier")
                .with_code("MISSING_RESOURCE_ID")
                .with_details(response.clone())
        })
}

/// Run `submit`, then call `poll` with the returned identifier every `config.interval`
/// until it yields `Some`, or until `config.timeout` has elapsed since submission began.
pub async fn ingest_and_poll<T, S, P, PFut>(
    submit: S,
    mut poll: P,
    config: &PollConfig,
) -> Result<IngestHandle<T>, ApiError>
where
    S: Future<Output = Result<String, ApiError>>,
    P: FnMut(String) -> PFut,
    PFut: Future<Output = Result<Option<T>, ApiError>>,
{
    let cancel = config.cancel.as_ref();
    let started = Instant::now();

    app_log!(debug, "Poll state: {:?}", PollState::Ingesting);
    let resource_id = until_cancelled(submit, cancel).await??;

    app_log!(debug, "Poll state: {:?} for {}", PollState::Polling, resource_id);
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match until_cancelled(poll(resource_id.clone()), cancel).await? {
            Ok(Some(result)) => {
                app_log!(
                    info,
                    "Resource {} ready after {} poll(s) ({:?})",
                    resource_id,
                    attempts,
                    PollState::Ready
                );
                return Ok(IngestHandle {
                    resource_id,
                    result: Some(result),
                });
            }
            Ok(None) => {}
            Err(e) => {
                app_log!(debug, "Poll {} for {} failed, retrying: {}", attempts, resource_id, e);
            }
        }

        if started.elapsed() > config.timeout {
            app_log!(
                warn,
                "Resource {} not ready after {:?} ({:?})",
                resource_id,
                config.timeout,
                PollState::TimedOut
            );
            return Ok(IngestHandle {
                resource_id,
                result: None,
            });
        }

        until_cancelled(tokio::time::sleep(config.interval), cancel).await?;
    }
}
