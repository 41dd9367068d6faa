//! Subcommand implementations.

pub mod change;
pub mod check;
pub mod rrset;
pub mod zone;

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use route53_client::{ChangeInfo, PendingChange, Route53Client};
use serde::Serialize;

/// State shared by every subcommand.
pub struct Context {
    pub client: Route53Client,
    pub json: bool,
}

impl Context {
    /// Print `value` as JSON when `--json` is set, otherwise through `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }
}

/// Flags of commands that submit a change.
#[derive(Args, Debug, Clone, Copy)]
pub struct WaitArgs {
    /// Block until the change reaches INSYNC
    #[arg(long)]
    pub wait: bool,

    /// Seconds between status polls while waiting
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    pub poll_interval: u64,

    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 600, value_name = "SECS")]
    pub wait_timeout: u64,
}

impl WaitArgs {
    /// Latest status of `change`, after waiting for it when `--wait` is set.
    pub async fn settle(self, change: PendingChange) -> Result<ChangeInfo> {
        if !self.wait {
            return Ok(change.into_info());
        }

        tracing::info!("waiting for change {} to reach INSYNC", change.id());
        let info = change
            .wait_until_synced(
                Duration::from_secs(self.poll_interval),
                Duration::from_secs(self.wait_timeout),
            )
            .await?;
        Ok(info)
    }
}

pub fn print_change(info: &ChangeInfo) {
    println!("Change:    {}", info.id);
    println!("Status:    {}", info.status);
    println!("Submitted: {}", info.submitted_at.to_rfc3339());
    if let Some(comment) = &info.comment {
        println!("Comment:   {comment}");
    }
}
