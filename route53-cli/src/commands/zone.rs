//! Hosted zone commands

use anyhow::Result;
use route53_client::{CreatedHostedZone, HostedZone, HostedZoneDetails};

use super::{Context, WaitArgs, print_change};

pub async fn list(ctx: &Context) -> Result<()> {
    let zones = ctx.client.list_hosted_zones().await?;
    ctx.emit(&zones, |zones| print_zone_table(zones))
}

pub async fn get(ctx: &Context, zone_id: &str) -> Result<()> {
    let details = ctx.client.get_hosted_zone(zone_id).await?;
    ctx.emit(&details, print_details)
}

pub async fn add(
    ctx: &Context,
    name: &str,
    comment: Option<&str>,
    caller_ref: Option<String>,
    wait: WaitArgs,
) -> Result<()> {
    let (mut created, change) = ctx.client.create_hosted_zone(name, caller_ref, comment).await?;
    created.change = wait.settle(change).await?;
    ctx.emit(&created, print_created)
}

pub async fn delete(ctx: &Context, zone_id: &str, wait: WaitArgs) -> Result<()> {
    let change = ctx.client.delete_hosted_zone(zone_id).await?;
    let info = wait.settle(change).await?;
    ctx.emit(&info, print_change)
}

fn print_zone_table(zones: &[HostedZone]) {
    if zones.is_empty() {
        println!("No hosted zones.");
        return;
    }

    println!("{:<24} {:<32} {:>7}  COMMENT", "ID", "NAME", "RECORDS");
    for zone in zones {
        let count = zone
            .resource_record_set_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "{:<24} {:<32} {:>7}  {}",
            zone.id,
            zone.name,
            count,
            zone.comment.as_deref().unwrap_or("")
        );
    }
}

fn print_zone(zone: &HostedZone) {
    println!("Zone:      {}", zone.id);
    println!("Name:      {}", zone.name);
    println!("Reference: {}", zone.caller_reference);
    if let Some(comment) = &zone.comment {
        println!("Comment:   {comment}");
    }
    if let Some(count) = zone.resource_record_set_count {
        println!("Records:   {count}");
    }
}

fn print_name_servers(name_servers: &[String]) {
    println!("Name servers:");
    for ns in name_servers {
        println!("  {ns}");
    }
}

fn print_details(details: &HostedZoneDetails) {
    print_zone(&details.zone);
    print_name_servers(&details.name_servers);
}

fn print_created(created: &CreatedHostedZone) {
    print_zone(&created.zone);
    print_name_servers(&created.name_servers);
    print_change(&created.change);
}
