//! Record set commands

use anyhow::{Result, bail};
use clap::Args;
use route53_client::{
    AliasTarget, FailoverRole, RecordType, ResourceRecordSet, RoutingPolicy,
};

use super::{Context, WaitArgs, print_change};

/// A record set as given on the command line.
///
/// Deleting requires the same arguments the record set was created with.
#[derive(Args, Debug)]
pub struct RecordSetArgs {
    /// Hosted zone id
    pub zone: String,

    /// Fully qualified record name
    pub name: String,

    /// Record type (A, AAAA, CNAME, MX, TXT, ...)
    #[arg(value_name = "TYPE")]
    pub record_type: RecordType,

    /// Record values
    pub values: Vec<String>,

    /// Time to live in seconds
    #[arg(long, default_value_t = 300)]
    pub ttl: u32,

    /// Weighted routing: relative weight of this record set
    #[arg(long, group = "policy", requires = "set_id")]
    pub weight: Option<u8>,

    /// Failover routing: PRIMARY or SECONDARY
    #[arg(long, group = "policy", requires = "set_id")]
    pub failover: Option<FailoverRole>,

    /// Latency routing: region the record set serves
    #[arg(long, group = "policy", requires = "set_id")]
    pub region: Option<String>,

    /// Identifier distinguishing record sets of the same name and type
    #[arg(long)]
    pub set_id: Option<String>,

    /// Alias routing: hosted zone of the alias target
    #[arg(long, group = "policy", requires = "alias_dns")]
    pub alias_zone: Option<String>,

    /// Alias routing: DNS name of the alias target
    #[arg(long, requires = "alias_zone")]
    pub alias_dns: Option<String>,

    /// Alias routing: answer only while the target is healthy
    #[arg(long, requires = "alias_zone")]
    pub evaluate_health: bool,

    /// Health check associated with the record set
    #[arg(long)]
    pub health_check: Option<String>,

    /// Comment attached to the change batch
    #[arg(long)]
    pub comment: Option<String>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

impl RecordSetArgs {
    /// Build the record set these arguments describe.
    pub fn record_set(&self) -> Result<ResourceRecordSet> {
        let routing = self.routing()?;

        let record_set = if let RoutingPolicy::Alias { target } = routing {
            if !self.values.is_empty() {
                bail!("alias record sets take no values");
            }
            ResourceRecordSet::alias(self.name.clone(), self.record_type, target)
        } else {
            if self.values.is_empty() {
                bail!("at least one value is required");
            }
            ResourceRecordSet::new(
                self.name.clone(),
                self.record_type,
                self.ttl,
                self.values.clone(),
            )
            .with_routing(routing)
        };

        Ok(match &self.health_check {
            Some(id) => record_set.with_health_check(id.clone()),
            None => record_set,
        })
    }

    fn routing(&self) -> Result<RoutingPolicy> {
        let set_identifier = || self.set_id.clone().unwrap_or_default();

        let routing = if let Some(weight) = self.weight {
            RoutingPolicy::Weighted {
                set_identifier: set_identifier(),
                weight,
            }
        } else if let Some(role) = self.failover {
            RoutingPolicy::Failover {
                set_identifier: set_identifier(),
                role,
            }
        } else if let Some(region) = &self.region {
            RoutingPolicy::Latency {
                set_identifier: set_identifier(),
                region: region.clone(),
            }
        } else if let (Some(zone), Some(dns)) = (&self.alias_zone, &self.alias_dns) {
            RoutingPolicy::Alias {
                target: AliasTarget {
                    hosted_zone_id: zone.clone(),
                    dns_name: dns.clone(),
                    evaluate_target_health: self.evaluate_health,
                },
            }
        } else {
            RoutingPolicy::Simple
        };

        if self.set_id.is_some() && routing.set_identifier().is_none() {
            bail!("--set-id needs --weight, --failover or --region");
        }
        Ok(routing)
    }
}

pub async fn list(ctx: &Context, zone_id: &str) -> Result<()> {
    let record_sets = ctx.client.list_record_sets(zone_id).await?;
    ctx.emit(&record_sets, |sets| print_record_sets(sets))
}

pub async fn add(ctx: &Context, args: &RecordSetArgs) -> Result<()> {
    let record_set = args.record_set()?;
    let change = ctx
        .client
        .create_record_set(&args.zone, record_set, args.comment.as_deref())
        .await?;
    let info = args.wait.settle(change).await?;
    ctx.emit(&info, print_change)
}

pub async fn delete(ctx: &Context, args: &RecordSetArgs) -> Result<()> {
    let record_set = args.record_set()?;
    let change = ctx
        .client
        .delete_record_set(&args.zone, record_set, args.comment.as_deref())
        .await?;
    let info = args.wait.settle(change).await?;
    ctx.emit(&info, print_change)
}

fn describe_routing(routing: &RoutingPolicy) -> String {
    match routing {
        RoutingPolicy::Simple => "simple".to_string(),
        RoutingPolicy::Weighted {
            set_identifier,
            weight,
        } => format!("weighted {set_identifier}={weight}"),
        RoutingPolicy::Alias { target } => format!(
            "alias {} ({}{})",
            target.dns_name,
            target.hosted_zone_id,
            if target.evaluate_target_health { ", health" } else { "" }
        ),
        RoutingPolicy::Failover {
            set_identifier,
            role,
        } => format!("failover {role} {set_identifier}"),
        RoutingPolicy::Latency {
            set_identifier,
            region,
        } => format!("latency {region} {set_identifier}"),
    }
}

fn print_record_sets(record_sets: &[ResourceRecordSet]) {
    if record_sets.is_empty() {
        println!("No record sets.");
        return;
    }

    println!("{:<40} {:<6} {:>6}  {:<28} VALUES", "NAME", "TYPE", "TTL", "ROUTING");
    for set in record_sets {
        let ttl = set.ttl.map_or_else(|| "-".to_string(), |t| t.to_string());
        println!(
            "{:<40} {:<6} {:>6}  {:<28} {}",
            set.name,
            set.record_type,
            ttl,
            describe_routing(&set.routing),
            set.records.join(" ")
        );
    }
}
