//! Credentials, credential sources and the background refresher
//!
//! The client reads the current credential once per request under a shared
//! lock; rotation swaps it under the exclusive lock. Temporary credentials
//! (those with an expiration) are kept fresh by an owned tokio task that dies
//! with the client.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::error::{ClientError, Result};
use crate::utils::log_sanitizer::mask_key;

/// How long before expiration a temporary credential is replaced.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Default instance metadata endpoint.
pub const INSTANCE_METADATA_ENDPOINT: &str = "http://169.254.169.254";

const SECURITY_CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";

const METADATA_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

// ============ Credential ============

/// An access key pair, optionally temporary.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl Credential {
    /// Long-lived credential from an access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    /// Attach the session token of a temporary credential.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Attach the expiration of a temporary credential.
    #[must_use]
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Time left before this credential should be replaced; `None` if it never expires.
    fn until_refresh(&self, now: DateTime<Utc>) -> Option<Duration> {
        let refresh_at = self.expiration? - chrono::Duration::seconds(REFRESH_MARGIN_SECS);
        Some((refresh_at - now).to_std().unwrap_or(Duration::ZERO))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &mask_key(&self.access_key_id))
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

// ============ Sources ============

/// Somewhere a credential can be obtained from.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Obtain a credential.
    async fn fetch(&self) -> Result<Credential>;
}

/// A fixed credential.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credential);

#[async_trait]
impl CredentialSource for StaticCredentials {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<Credential> {
        Ok(self.0.clone())
    }
}

/// Credential from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
///
/// The older `AWS_ACCESS_KEY` / `AWS_SECRET_KEY` names are accepted as fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    fn var(names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn fetch(&self) -> Result<Credential> {
        let access_key_id = Self::var(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]);
        let secret_access_key = Self::var(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]);

        let (Some(access_key_id), Some(secret_access_key)) = (access_key_id, secret_access_key)
        else {
            return Err(ClientError::Credentials {
                detail: "AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set".to_string(),
            });
        };

        let credential = Credential::new(access_key_id, secret_access_key);
        Ok(match Self::var(&["AWS_SESSION_TOKEN", "AWS_SECURITY_TOKEN"]) {
            Some(token) => credential.with_session_token(token),
            None => credential,
        })
    }
}

/// Instance role credential served by the instance metadata service.
pub struct InstanceMetadataCredentials {
    /// `None` when the HTTP client could not be built; every fetch then fails.
    client: Option<reqwest::Client>,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleCredentialDocument {
    code: Option<String>,
    access_key_id: String,
    secret_access_key: String,
    token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl InstanceMetadataCredentials {
    /// Source talking to the standard metadata endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(INSTANCE_METADATA_ENDPOINT)
    }

    /// Source talking to a custom metadata endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let built = reqwest::Client::builder()
            .connect_timeout(METADATA_CONNECT_TIMEOUT)
            .timeout(METADATA_TIMEOUT)
            .build();
        let client = match built {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("[route53] failed to create instance metadata HTTP client: {e}");
                None
            }
        };
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout: METADATA_TIMEOUT,
        }
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.endpoint);
        let failure = |detail: String| ClientError::Credentials {
            detail: format!("instance metadata {url}: {detail}"),
        };

        let Some(client) = &self.client else {
            return Err(failure("HTTP client unavailable".to_string()));
        };
        let response = client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {}", status.as_u16())));
        }
        response.text().await.map_err(|e| failure(e.to_string()))
    }
}

impl Default for InstanceMetadataCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSource for InstanceMetadataCredentials {
    fn name(&self) -> &'static str {
        "instance-metadata"
    }

    async fn fetch(&self) -> Result<Credential> {
        let roles = self.get_text(SECURITY_CREDENTIALS_PATH).await?;
        let role = roles
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ClientError::Credentials {
                detail: "no instance role attached".to_string(),
            })?;

        let body = self
            .get_text(&format!("{SECURITY_CREDENTIALS_PATH}{role}"))
            .await?;
        let document: RoleCredentialDocument =
            serde_json::from_str(&body).map_err(|e| ClientError::Credentials {
                detail: format!("invalid credential document for role '{role}': {e}"),
            })?;

        if let Some(code) = document.code.as_deref()
            && code != "Success"
        {
            return Err(ClientError::Credentials {
                detail: format!("instance metadata returned {code} for role '{role}'"),
            });
        }

        let mut credential = Credential::new(document.access_key_id, document.secret_access_key);
        if let Some(token) = document.token {
            credential = credential.with_session_token(token);
        }
        if let Some(expiration) = document.expiration {
            credential = credential.with_expiration(expiration);
        }
        Ok(credential)
    }
}

/// Tries each source in order and returns the first credential obtained.
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Environment first, then the instance role.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Box::new(EnvCredentials),
            Box::new(InstanceMetadataCredentials::new()),
        ])
    }
}

#[async_trait]
impl CredentialSource for CredentialChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn fetch(&self) -> Result<Credential> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.fetch().await {
                Ok(credential) => {
                    log::debug!(
                        "[route53] credential {} obtained from {}",
                        mask_key(credential.access_key_id()),
                        source.name()
                    );
                    return Ok(credential);
                }
                Err(e) => failures.push(format!("{}: {e}", source.name())),
            }
        }
        Err(ClientError::Credentials {
            detail: if failures.is_empty() {
                "no credential sources configured".to_string()
            } else {
                failures.join("; ")
            },
        })
    }
}

// ============ Store & refresher ============

/// The credential shared by all in-flight requests of one client.
pub(crate) struct CredentialStore {
    current: RwLock<Arc<Credential>>,
}

impl CredentialStore {
    pub(crate) fn new(credential: Credential) -> Self {
        Self {
            current: RwLock::new(Arc::new(credential)),
        }
    }

    /// Snapshot of the current credential.
    pub(crate) fn current(&self) -> Arc<Credential> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn replace(&self, credential: Credential) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(credential);
    }
}

/// Owned handle of the refresh task; aborts the task when dropped.
pub(crate) struct CredentialRefresher {
    task: JoinHandle<()>,
}

impl CredentialRefresher {
    /// Start refreshing, unless the current credential never expires.
    pub(crate) fn spawn(
        store: Arc<CredentialStore>,
        source: Arc<dyn CredentialSource>,
        retry_every: Duration,
    ) -> Option<Self> {
        if store.current().expiration().is_none() {
            log::debug!("[route53] credential has no expiration, refresher not started");
            return None;
        }
        let task = tokio::spawn(refresh_loop(store, source, retry_every));
        Some(Self { task })
    }
}

impl Drop for CredentialRefresher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh_loop(
    store: Arc<CredentialStore>,
    source: Arc<dyn CredentialSource>,
    retry_every: Duration,
) {
    loop {
        let Some(wait) = store.current().until_refresh(Utc::now()) else {
            log::info!("[route53] credential no longer expires, stopping refresher");
            return;
        };
        if !wait.is_zero() {
            log::debug!("[route53] credential valid, sleeping {}s", wait.as_secs());
            tokio::time::sleep(wait).await;
        }

        let fresh = loop {
            match source.fetch().await {
                Ok(credential) => break credential,
                Err(e) => {
                    log::warn!(
                        "[route53] credential refresh from {} failed, retrying in {:.1}s: {e}",
                        source.name(),
                        retry_every.as_secs_f32()
                    );
                    tokio::time::sleep(retry_every).await;
                }
            }
        };

        log::info!(
            "[route53] credential {} refreshed, expires at {:?}",
            mask_key(fresh.access_key_id()),
            fresh.expiration()
        );
        let stale_on_arrival = fresh.until_refresh(Utc::now()) == Some(Duration::ZERO);
        store.replace(fresh);

        if stale_on_arrival {
            tokio::time::sleep(retry_every).await;
        }
    }
}
