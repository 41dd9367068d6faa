//! Health check commands

use anyhow::{Result, bail};
use clap::Args;
use route53_client::{HealthCheck, HealthCheckConfig, HealthCheckType};

use super::Context;

/// Health check definition as given on the command line.
#[derive(Args, Debug)]
pub struct AddCheckArgs {
    /// Check type (HTTP, HTTPS, HTTP_STR_MATCH, HTTPS_STR_MATCH, TCP)
    #[arg(value_name = "TYPE")]
    pub check_type: HealthCheckType,

    /// IP address of the endpoint to check
    #[arg(long)]
    pub ip: Option<String>,

    /// Port of the endpoint
    #[arg(long)]
    pub port: Option<u16>,

    /// Path requested by HTTP(S) checks
    #[arg(long)]
    pub path: Option<String>,

    /// Domain name of the endpoint
    #[arg(long)]
    pub fqdn: Option<String>,

    /// String the response body must contain (*_STR_MATCH only)
    #[arg(long)]
    pub search: Option<String>,

    /// Seconds between checks (10 or 30)
    #[arg(long)]
    pub interval: Option<u32>,

    /// Consecutive failures before the endpoint is unhealthy
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Idempotency token (random when omitted)
    #[arg(long)]
    pub caller_ref: Option<String>,
}

impl AddCheckArgs {
    pub fn config(&self) -> Result<HealthCheckConfig> {
        let str_match = matches!(
            self.check_type,
            HealthCheckType::HttpStrMatch | HealthCheckType::HttpsStrMatch
        );
        if str_match && self.search.is_none() {
            bail!("{} checks need --search", self.check_type);
        }
        if !str_match && self.search.is_some() {
            bail!("--search only applies to *_STR_MATCH checks");
        }
        if self.check_type == HealthCheckType::Tcp && self.port.is_none() {
            bail!("TCP checks need --port");
        }
        if self.ip.is_none() && self.fqdn.is_none() {
            bail!("either --ip or --fqdn is required");
        }

        let mut config = HealthCheckConfig::new(self.check_type);
        config.ip_address.clone_from(&self.ip);
        config.port = self.port;
        config.resource_path.clone_from(&self.path);
        config.fully_qualified_domain_name.clone_from(&self.fqdn);
        config.search_string.clone_from(&self.search);
        config.request_interval = self.interval;
        config.failure_threshold = self.threshold;
        Ok(config)
    }
}

pub async fn list(ctx: &Context) -> Result<()> {
    let checks = ctx.client.list_health_checks().await?;
    ctx.emit(&checks, |checks| print_check_table(checks))
}

pub async fn get(ctx: &Context, health_check_id: &str) -> Result<()> {
    let check = ctx.client.get_health_check(health_check_id).await?;
    ctx.emit(&check, print_check)
}

pub async fn add(ctx: &Context, args: &AddCheckArgs) -> Result<()> {
    let config = args.config()?;
    let check = ctx
        .client
        .create_health_check(&config, args.caller_ref.clone())
        .await?;
    ctx.emit(&check, print_check)
}

pub async fn delete(ctx: &Context, health_check_id: &str) -> Result<()> {
    ctx.client.delete_health_check(health_check_id).await?;
    ctx.emit(&serde_json::json!({ "deleted": health_check_id }), |_| {
        println!("Deleted health check {health_check_id}");
    })
}

fn endpoint(config: &HealthCheckConfig) -> String {
    let host = config
        .fully_qualified_domain_name
        .as_deref()
        .or(config.ip_address.as_deref())
        .unwrap_or("-");
    let port = config.port.map(|p| format!(":{p}")).unwrap_or_default();
    let path = config.resource_path.as_deref().unwrap_or("");
    format!("{host}{port}{path}")
}

fn print_check_table(checks: &[HealthCheck]) {
    if checks.is_empty() {
        println!("No health checks.");
        return;
    }

    println!("{:<38} {:<16} ENDPOINT", "ID", "TYPE");
    for check in checks {
        println!(
            "{:<38} {:<16} {}",
            check.id,
            check.config.check_type,
            endpoint(&check.config)
        );
    }
}

fn print_check(check: &HealthCheck) {
    let config = &check.config;
    println!("Health check: {}", check.id);
    println!("Reference:    {}", check.caller_reference);
    println!("Type:         {}", config.check_type);
    println!("Endpoint:     {}", endpoint(config));
    if let Some(search) = &config.search_string {
        println!("Search:       {search}");
    }
    if let Some(interval) = config.request_interval {
        println!("Interval:     {interval}s");
    }
    if let Some(threshold) = config.failure_threshold {
        println!("Threshold:    {threshold}");
    }
}
