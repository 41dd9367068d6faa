use std::sync::Arc;
use std::time::Duration;

use crate::credentials::{Credential, CredentialRefresher, CredentialSource, CredentialStore};
use crate::error::{ClientError, Result};
use crate::http_client::Transport;
use crate::utils::log_sanitizer::mask_key;

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
/// Default API version, used both in resource paths and the document namespace.
pub const DEFAULT_API_VERSION: &str = "2012-12-12";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_RETRY_SECS: u64 = 5;

/// Route 53 API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the credential and
/// the credential refresher. Safe to use concurrently from many tasks.
///
/// # Construction
///
/// ```rust,no_run
/// use route53_client::{Credential, Route53Client};
///
/// let client = Route53Client::with_credential(Credential::new(
///     "your-access-key-id",
///     "your-secret-access-key",
/// ))?;
/// # Ok::<(), route53_client::ClientError>(())
/// ```
#[derive(Clone)]
pub struct Route53Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Transport,
    api_version: String,
    xmlns: String,
    // Dropping it aborts the refresh task.
    refresher: Option<CredentialRefresher>,
}

/// Builder for [`Route53Client`].
#[derive(Debug, Clone)]
pub struct Route53ClientBuilder {
    endpoint: String,
    api_version: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    credential_refresh_retry: Duration,
}

impl Default for Route53ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            credential_refresh_retry: Duration::from_secs(DEFAULT_REFRESH_RETRY_SECS),
        }
    }
}

impl Route53ClientBuilder {
    /// Service endpoint (default: `https://route53.amazonaws.com`).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// API version (default: `2012-12-12`).
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// TCP/TLS connect timeout (default: 10s).
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whole-exchange timeout of a single request (default: 30s).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Delay between failed credential refresh attempts (default: 5s).
    #[must_use]
    pub fn credential_refresh_retry(mut self, retry: Duration) -> Self {
        self.credential_refresh_retry = retry;
        self
    }

    /// Build a client using a fixed credential. No refresher is started.
    pub fn build(self, credential: Credential) -> Result<Route53Client> {
        self.assemble(Arc::new(CredentialStore::new(credential)), None)
    }

    /// Build a client whose credential comes from `source`.
    ///
    /// The first credential is fetched now. If it expires, a background task
    /// re-fetches it shortly before expiration for as long as the client lives.
    pub async fn connect<S>(self, source: S) -> Result<Route53Client>
    where
        S: CredentialSource + 'static,
    {
        let credential = source.fetch().await?;
        log::info!(
            "[route53] using credential {} from {}",
            mask_key(credential.access_key_id()),
            source.name()
        );

        let store = Arc::new(CredentialStore::new(credential));
        let source: Arc<dyn CredentialSource> = Arc::new(source);
        let refresher =
            CredentialRefresher::spawn(Arc::clone(&store), source, self.credential_refresh_retry);
        self.assemble(store, refresher)
    }

    fn assemble(
        self,
        store: Arc<CredentialStore>,
        refresher: Option<CredentialRefresher>,
    ) -> Result<Route53Client> {
        let invalid = |detail: String| ClientError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            detail,
        };

        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(invalid(format!("invalid API version '{}'", self.api_version)));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| invalid(format!("failed to create HTTP client: {e}")))?;

        log::debug!(
            "[route53] client for {} (API {})",
            self.endpoint,
            self.api_version
        );

        Ok(Route53Client {
            inner: Arc::new(ClientInner {
                transport: Transport::new(http, &self.endpoint, store),
                xmlns: format!("https://route53.amazonaws.com/doc/{}/", self.api_version),
                api_version: self.api_version,
                refresher,
            }),
        })
    }
}

impl Route53Client {
    /// Returns a builder for customizing the client configuration.
    pub fn builder() -> Route53ClientBuilder {
        Route53ClientBuilder::default()
    }

    /// Client with default settings and a fixed credential.
    pub fn with_credential(credential: Credential) -> Result<Self> {
        Self::builder().build(credential)
    }

    /// Client with default settings and a refreshing credential source.
    pub async fn connect<S>(source: S) -> Result<Self>
    where
        S: CredentialSource + 'static,
    {
        Self::builder().connect(source).await
    }

    /// Replace the credential used by subsequent requests.
    ///
    /// In-flight requests keep the credential they were signed with.
    pub fn set_credential(&self, credential: Credential) {
        log::info!(
            "[route53] credential replaced with {}",
            mask_key(credential.access_key_id())
        );
        self.inner.transport.credentials().replace(credential);
    }

    /// Snapshot of the credential the next request will be signed with.
    pub fn credential(&self) -> Arc<Credential> {
        self.inner.transport.credentials().current()
    }

    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    /// Document namespace for request bodies.
    pub(crate) fn xmlns(&self) -> String {
        self.inner.xmlns.clone()
    }

    /// Versioned resource path, e.g. `/2012-12-12/hostedzone/Z1`.
    pub(crate) fn path(&self, resource: &str) -> String {
        format!("/{}/{resource}", self.inner.api_version)
    }
}

impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("api_version", &self.inner.api_version)
            .field("refreshing", &self.inner.refresher.is_some())
            .finish_non_exhaustive()
    }
}
