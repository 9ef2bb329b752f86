// src/core/transport.rs
//! HTTP transport bound to exactly one backend.
//!
//! Every request resolves the session token first, then dispatches; every failure
//! leaves through the `ErrorNormalizer` as an `ApiError`.

use super::backend::Backend;
use super::error::ApiError;
use super::normalizer::{ErrorNormalizer, TransportFailure, CORRELATION_ID_HEADER};
use super::token::TokenSlot;
use crate::app_log;
use crate::utils::{join_url, trim_base_url};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    /// Keep cookies between requests, the native counterpart of sending credentials.
    pub with_credentials: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            with_credentials: true,
        }
    }
}

#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    /// Sent without a JSON content type; reqwest sets the multipart boundary.
    Multipart(Form),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| {
                ApiError::unknown(format!("Failed to serialize request body: {}", e))
                    .with_code("INVALID_REQUEST")
            })
    }
}

struct Inner {
    backend: Backend,
    base_url: String,
    client: reqwest::Client,
    tokens: TokenSlot,
    normalizer: Arc<ErrorNormalizer>,
}

/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TransportClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("backend", &self.inner.backend)
            .field("base_url", &self.inner.base_url)
            .finish()
    }
}

impl TransportClient {
    pub fn new(
        backend: Backend,
        base_url: &str,
        tokens: TokenSlot,
        normalizer: Arc<ErrorNormalizer>,
        options: TransportOptions,
    ) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .cookie_store(options.with_credentials)
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                ApiError::unknown(format!("Failed to create HTTP client: {}", e))
                    .with_code("CLIENT_INIT")
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                backend,
                base_url: trim_base_url(base_url),
                client,
                tokens,
                normalizer,
            }),
        })
    }

    pub fn backend(&self) -> Backend {
        self.inner.backend
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn tokens(&self) -> &TokenSlot {
        &self.inner.tokens
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.inner.base_url, path)
    }

    /// Issue a request and decode a JSON response. Empty bodies decode as `null`.
    pub async fn request<T, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        params: Option<&Q>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request_with_headers(method, path, body, params, HeaderMap::new())
            .await
    }

    pub async fn request_with_headers<T, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        params: Option<&Q>,
        extra_headers: HeaderMap,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let backend = self.inner.backend;
        let url = self.url(path);

        let mut builder = self
            .inner
            .client
            .request(method.clone(), &url)
            .header(CORRELATION_ID_HEADER, uuid::Uuid::new_v4().to_string());

        if let Some(params) = params {
            builder = builder.query(params);
        }

        builder = match body {
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            Some(RequestBody::Json(value)) => builder.json(&value),
            None => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
        };
        builder = builder.headers(extra_headers);

        if let Some(bearer) = self.inner.tokens.bearer().await {
            builder = builder.header(AUTHORIZATION, bearer);
        }

        app_log!(debug, "{} {} ({})", method, url, backend);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = self.inner.normalizer.normalize(TransportFailure {
                    backend: Some(backend),
                    url: Some(url.clone()),
                    status: None,
                    headers: HeaderMap::new(),
                    body: None,
                    message: e.to_string(),
                    timed_out: e.is_timeout(),
                });
                app_log!(warn, "{} {} failed before a response: {}", method, url, err);
                return Err(err);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        app_log!(trace, "{} {} -> {}", method, url, status);

        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| {
                self.inner.normalizer.normalize(TransportFailure {
                    backend: Some(backend),
                    url: Some(url.clone()),
                    status: Some(status.as_u16()),
                    headers: headers.clone(),
                    body: None,
                    message: format!("Failed to read response body: {}", e),
                    timed_out: e.is_timeout(),
                })
            })?;
            return decode_body(&bytes).map_err(|e| {
                app_log!(error, "Undecodable {} response from {}: {}", backend, url, e);
                ApiError::unknown(format!("Failed to parse response from {}: {}", url, e))
                    .with_code("INVALID_RESPONSE")
                    .with_status(status.as_u16())
            });
        }

        let body = response.text().await.ok();
        let err = self.inner.normalizer.normalize(TransportFailure {
            backend: Some(backend),
            url: Some(url.clone()),
            status: Some(status.as_u16()),
            headers,
            body,
            message: format!("Request failed with status {}", status),
            timed_out: false,
        });

        app_log!(
            warn,
            "{} {} failed: source={} status={:?} code={:?} message={}",
            method,
            url,
            err.source,
            err.status,
            err.code,
            err.message
        );
        Err(err)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None, None).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, params: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, path, None, Some(params)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::json(body)?;
        self.request::<T, ()>(Method::POST, path, Some(body), None)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::json(body)?;
        self.request::<T, ()>(Method::PUT, path, Some(body), None)
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::json(body)?;
        self.request::<T, ()>(Method::PATCH, path, Some(body), None)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None, None)
            .await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::POST, path, Some(RequestBody::Multipart(form)), None)
            .await
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(bytes)
    }
}
