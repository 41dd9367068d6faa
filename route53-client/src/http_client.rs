//! Request execution
//!
//! One [`Request`] is one signed HTTP round trip. Nothing here retries: a
//! request is sent at most once and the caller sees exactly one outcome.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec;
use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};
use crate::sign;
use crate::utils::log_sanitizer::truncate_for_log;

/// Header the service uses to echo the request id.
const REQUEST_ID_HEADER: &str = "x-amzn-RequestId";

/// Ordered query parameters.
pub(crate) type QueryParams = Vec<(&'static str, String)>;

/// Description of a single API call, consumed by [`Transport::execute`].
#[derive(Debug, Clone)]
pub(crate) struct Request<'b, B = ()> {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<&'b B>,
}

impl Request<'static, ()> {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }
}

impl<'b, B: Serialize> Request<'b, B> {
    pub(crate) fn post(path: impl Into<String>, body: &'b B) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
        }
    }
}

impl<B> Request<'_, B> {
    /// Add a query parameter, replacing any previous value for `key`.
    #[must_use]
    pub(crate) fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.retain(|(k, _)| *k != key);
        self.query.push((key, value.into()));
        self
    }

    /// Apply a continuation cursor on top of the base parameters.
    #[must_use]
    pub(crate) fn with_cursor(self, cursor: QueryParams) -> Self {
        cursor
            .into_iter()
            .fold(self, |request, (key, value)| request.with_query(key, value))
    }
}

/// Signed transport shared by every operation of one client.
pub(crate) struct Transport {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl Transport {
    pub(crate) fn new(
        client: reqwest::Client,
        base_url: &str,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub(crate) fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Full target address for `path` with its query string.
    pub(crate) fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        for (i, (key, value)) in query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            let _ = write!(
                url,
                "{sep}{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            );
        }
        url
    }

    /// Perform one signed round trip and decode the response as `T`.
    pub(crate) async fn execute<B, T>(&self, request: Request<'_, B>) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(&request.path, &request.query);

        // Snapshot only; the lock is released before any I/O.
        let credential = self.credentials.current();
        let headers = sign::sign(&credential, Utc::now());
        drop(credential);

        let mut builder = headers.apply(self.client.request(request.method.clone(), &url));
        if let Some(body) = request.body {
            let document = codec::encode(body)?;
            log::debug!("[route53] Request Body: {}", truncate_for_log(&document));
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, codec::CONTENT_TYPE)
                .body(document);
        }

        let reply = execute_request(builder, request.method.as_str(), &url).await?;

        if !(200..300).contains(&reply.status) {
            let err = codec::decode_error(reply.status, &reply.body, reply.request_id);
            log::error!("[route53] {} {url} failed: {err}", request.method);
            return Err(err);
        }

        codec::decode(&reply.body)
    }
}

/// Raw outcome of a round trip.
struct RawReply {
    status: u16,
    request_id: Option<String>,
    body: String,
}

/// Send the request and read the whole body.
///
/// Transport-level failures are classified as [`ClientError::Timeout`] or
/// [`ClientError::Network`]; every HTTP status is returned to the caller.
async fn execute_request(
    request_builder: RequestBuilder,
    method_name: &str,
    url: &str,
) -> Result<RawReply> {
    log::debug!("[route53] {method_name} {url}");

    let response = request_builder.send().await.map_err(|e| {
        log::warn!("[route53] {method_name} {url} did not complete: {e}");
        if e.is_timeout() {
            ClientError::Timeout {
                detail: e.to_string(),
            }
        } else {
            ClientError::Network {
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    log::debug!("[route53] Response Status: {status}");

    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            ClientError::Timeout {
                detail: format!("Failed to read response body: {e}"),
            }
        } else {
            ClientError::Network {
                detail: format!("Failed to read response body: {e}"),
            }
        }
    })?;

    log::debug!("[route53] Response Body: {}", truncate_for_log(&body));

    Ok(RawReply {
        status,
        request_id,
        body,
    })
}
