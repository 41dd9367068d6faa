//! # route53-client
//!
//! Async client for the Route 53 DNS hosting control-plane API (REST + XML).
//!
//! ## What it covers
//!
//! | Resource | Operations |
//! |----------|------------|
//! | Hosted zones | create, get, list (all pages), delete |
//! | Record sets | batched change, create, delete, list (all pages) |
//! | Health checks | create, get, list (all pages), delete |
//! | Changes | get status, wait until in sync |
//!
//! Requests are signed with `AWS3-HTTPS` (HMAC-SHA256 over the request date).
//! List operations follow the service's continuation markers and return the
//! full listing; a failing page fails the whole call. Mutations that propagate
//! asynchronously return a [`PendingChange`] that can be awaited until in sync.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use route53_client::{
//!     CredentialChain, RecordType, ResourceRecordSet, Route53Client,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Credentials from the environment, falling back to the instance role
//!     let client = Route53Client::connect(CredentialChain::default_chain()).await?;
//!
//!     // 2. List zones
//!     let zones = client.list_hosted_zones().await?;
//!     let zone = &zones[0];
//!
//!     // 3. Add a record set and wait for it to propagate
//!     let record = ResourceRecordSet::new(
//!         format!("www.{}", zone.name),
//!         RecordType::A,
//!         300,
//!         vec!["192.0.2.10".to_string()],
//!     );
//!     let change = client.create_record_set(&zone.id, record, Some("add www")).await?;
//!     let synced = change
//!         .wait_until_synced(Duration::from_secs(5), Duration::from_secs(300))
//!         .await?;
//!     println!("change {} is {}", synced.id, synced.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Remote rejections surface as
//! [`ClientError::Api`] with the service's code and message:
//!
//! ```rust,no_run
//! # use route53_client::{ClientError, Route53Client};
//! # async fn example(client: &Route53Client) {
//! match client.get_hosted_zone("Z1").await {
//!     Ok(details) => println!("{:?}", details.name_servers),
//!     Err(e) if e.is_not_found() => println!("no such zone"),
//!     Err(ClientError::Api { code, message, .. }) => eprintln!("{code}: {message}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

mod api;
mod change;
mod client;
pub mod codec;
pub mod credentials;
mod error;
mod http_client;
mod paginator;
pub mod sign;
mod types;
mod utils;

pub use change::{ChangeWaiter, PendingChange};
pub use client::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT, Route53Client, Route53ClientBuilder};
pub use credentials::{
    Credential, CredentialChain, CredentialSource, EnvCredentials, InstanceMetadataCredentials,
    StaticCredentials,
};
pub use error::{ClientError, Result};
pub use types::{
    AliasTarget, ChangeAction, ChangeInfo, ChangeStatus, CreatedHostedZone, FailoverRole,
    HealthCheck, HealthCheckConfig, HealthCheckType, HostedZone, HostedZoneDetails,
    ParseEnumError, RecordSetChange, RecordType, ResourceRecordSet, RoutingPolicy,
};
