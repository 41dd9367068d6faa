//! Route 53 command-line client
//!
//! Thin front end over `route53-client`: every subcommand maps onto one
//! library operation. Settings come from flags, then the config file
//! (`<config_dir>/route53/config.toml`), then defaults. Without a
//! `[credentials]` table the environment and the instance role are tried.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Context;
use commands::check::AddCheckArgs;
use commands::rrset::RecordSetArgs;
use config::{ConfigFile, Settings};
use route53_client::{ClientError, CredentialChain, Route53Client};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "route53")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: <config_dir>/route53/config.toml)
    #[arg(long, global = true, env = "ROUTE53_CONFIG")]
    config: Option<PathBuf>,

    /// API endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// API version
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of a change
    GetChange {
        /// Change id
        id: String,

        #[command(flatten)]
        wait: commands::WaitArgs,
    },

    /// List hosted zones
    ListZones,

    /// Show a hosted zone and its name servers
    GetZone {
        /// Hosted zone id
        id: String,
    },

    /// Create a hosted zone
    AddZone {
        /// Zone name, e.g. example.com.
        name: String,

        /// Zone comment
        #[arg(long)]
        comment: Option<String>,

        /// Idempotency token (random when omitted)
        #[arg(long)]
        caller_ref: Option<String>,

        #[command(flatten)]
        wait: commands::WaitArgs,
    },

    /// Delete an empty hosted zone
    DeleteZone {
        /// Hosted zone id
        id: String,

        #[command(flatten)]
        wait: commands::WaitArgs,
    },

    /// List the record sets of a hosted zone
    ListRrsets {
        /// Hosted zone id
        zone: String,
    },

    /// Create a record set
    AddRrset(RecordSetArgs),

    /// Delete a record set
    DeleteRrset(RecordSetArgs),

    /// List health checks
    ListChecks,

    /// Show a health check
    GetCheck {
        /// Health check id
        id: String,
    },

    /// Create a health check
    AddCheck(AddCheckArgs),

    /// Delete a health check
    DeleteCheck {
        /// Health check id
        id: String,
    },
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

async fn connect(cli: &Cli) -> Result<Route53Client> {
    let file = ConfigFile::load(cli.config.as_deref())?;
    let settings = Settings::resolve(file, cli.endpoint.clone(), cli.api_version.clone());
    tracing::debug!(
        "endpoint {} api version {}",
        settings.endpoint,
        settings.api_version
    );

    let builder = Route53Client::builder()
        .endpoint(settings.endpoint)
        .api_version(settings.api_version);
    let client = match settings.credential {
        Some(credential) => builder.build(credential)?,
        None => builder.connect(CredentialChain::default_chain()).await?,
    };
    Ok(client)
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        client: connect(&cli).await?,
        json: cli.json,
    };

    match cli.command {
        Commands::GetChange { id, wait } => commands::change::get(&ctx, &id, wait).await,
        Commands::ListZones => commands::zone::list(&ctx).await,
        Commands::GetZone { id } => commands::zone::get(&ctx, &id).await,
        Commands::AddZone {
            name,
            comment,
            caller_ref,
            wait,
        } => commands::zone::add(&ctx, &name, comment.as_deref(), caller_ref, wait).await,
        Commands::DeleteZone { id, wait } => commands::zone::delete(&ctx, &id, wait).await,
        Commands::ListRrsets { zone } => commands::rrset::list(&ctx, &zone).await,
        Commands::AddRrset(args) => commands::rrset::add(&ctx, &args).await,
        Commands::DeleteRrset(args) => commands::rrset::delete(&ctx, &args).await,
        Commands::ListChecks => commands::check::list(&ctx).await,
        Commands::GetCheck { id } => commands::check::get(&ctx, &id).await,
        Commands::AddCheck(args) => commands::check::add(&ctx, &args).await,
        Commands::DeleteCheck { id } => commands::check::delete(&ctx, &id).await,
    }
}

fn report(err: &anyhow::Error, json: bool) {
    if json
        && let Some(client_err) = err.downcast_ref::<ClientError>()
        && let Ok(body) = serde_json::to_string_pretty(client_err)
    {
        eprintln!("{body}");
        return;
    }

    eprintln!("Error: {err:#}");
    if let Some(ClientError::Api {
        request_id: Some(id),
        ..
    }) = err.downcast_ref::<ClientError>()
    {
        eprintln!("Request id: {id}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let json = cli.json;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            report(&err, json);
            ExitCode::FAILURE
        }
    }
}
