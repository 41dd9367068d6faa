//! Wire documents of the Route 53 XML API
//!
//! Field order follows the service schema, which is order-sensitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bare_id;
use crate::error::{ClientError, Result};
use crate::paginator::{Page, Paged, next_cursor};
use crate::types::{
    AliasTarget, ChangeInfo, ChangeStatus, FailoverRole, HealthCheck, HealthCheckConfig,
    HealthCheckType, HostedZone, RecordSetChange, RecordType, ResourceRecordSet, RoutingPolicy,
};

// ============ Changes ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChangeInfo {
    pub id: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
    pub comment: Option<String>,
}

impl TryFrom<WireChangeInfo> for ChangeInfo {
    type Error = ClientError;

    fn try_from(wire: WireChangeInfo) -> Result<Self> {
        let status = wire
            .status
            .parse::<ChangeStatus>()
            .map_err(|e| ClientError::decode(e, wire.status.clone()))?;
        Ok(Self {
            id: bare_id(&wire.id).to_string(),
            status,
            submitted_at: wire.submitted_at,
            comment: wire.comment.filter(|c| !c.is_empty()),
        })
    }
}

/// Response of `GetChange`, `DeleteHostedZone` and `ChangeResourceRecordSets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeInfoResponse {
    pub change_info: WireChangeInfo,
}

// ============ Hosted zones ============

#[derive(Debug, Serialize)]
#[serde(rename = "CreateHostedZoneRequest", rename_all = "PascalCase")]
pub struct CreateHostedZoneRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub name: String,
    pub caller_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_zone_config: Option<WireZoneConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct WireZoneConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireHostedZone {
    pub id: String,
    pub name: String,
    pub caller_reference: String,
    pub config: Option<WireZoneConfig>,
    pub resource_record_set_count: Option<u64>,
}

impl From<WireHostedZone> for HostedZone {
    fn from(wire: WireHostedZone) -> Self {
        Self {
            id: bare_id(&wire.id).to_string(),
            name: wire.name,
            caller_reference: wire.caller_reference,
            comment: wire
                .config
                .and_then(|c| c.comment)
                .filter(|c| !c.is_empty()),
            resource_record_set_count: wire.resource_record_set_count,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct WireDelegationSet {
    #[serde(default)]
    pub name_servers: WireNameServers,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireNameServers {
    #[serde(rename = "NameServer", default)]
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateHostedZoneResponse {
    pub hosted_zone: WireHostedZone,
    pub change_info: WireChangeInfo,
    #[serde(default)]
    pub delegation_set: WireDelegationSet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetHostedZoneResponse {
    pub hosted_zone: WireHostedZone,
    #[serde(default)]
    pub delegation_set: WireDelegationSet,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireHostedZones {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<WireHostedZone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListHostedZonesResponse {
    #[serde(default)]
    pub hosted_zones: WireHostedZones,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
}

impl Paged for ListHostedZonesResponse {
    type Item = HostedZone;

    fn into_page(self) -> Result<Page<HostedZone>> {
        Ok(Page {
            next: next_cursor(
                self.is_truncated,
                [("marker", self.next_marker)],
                "hosted zone",
            )?,
            items: self
                .hosted_zones
                .items
                .into_iter()
                .map(HostedZone::from)
                .collect(),
        })
    }
}

// ============ Record sets ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireResourceRecord {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WireResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<WireResourceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAliasTarget {
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

/// Flat record set shape: the routing style is implied by which optional fields are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRecordSet {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_records: Option<WireResourceRecords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<WireAliasTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

impl From<&ResourceRecordSet> for WireRecordSet {
    fn from(rrset: &ResourceRecordSet) -> Self {
        let mut wire = Self {
            name: rrset.name.clone(),
            record_type: rrset.record_type.as_str().to_string(),
            set_identifier: rrset.routing.set_identifier().map(str::to_string),
            weight: None,
            region: None,
            failover: None,
            ttl: rrset.ttl,
            resource_records: (!rrset.records.is_empty()).then(|| WireResourceRecords {
                items: rrset
                    .records
                    .iter()
                    .map(|value| WireResourceRecord {
                        value: value.clone(),
                    })
                    .collect(),
            }),
            alias_target: None,
            health_check_id: rrset.health_check_id.clone(),
        };

        match &rrset.routing {
            RoutingPolicy::Simple => {}
            RoutingPolicy::Weighted { weight, .. } => wire.weight = Some(*weight),
            RoutingPolicy::Latency { region, .. } => wire.region = Some(region.clone()),
            RoutingPolicy::Failover { role, .. } => wire.failover = Some(role.to_string()),
            RoutingPolicy::Alias { target } => {
                wire.ttl = None;
                wire.resource_records = None;
                wire.alias_target = Some(WireAliasTarget {
                    hosted_zone_id: bare_id(&target.hosted_zone_id).to_string(),
                    dns_name: target.dns_name.clone(),
                    evaluate_target_health: target.evaluate_target_health,
                });
            }
        }
        wire
    }
}

impl WireRecordSet {
    fn routing(&mut self) -> std::result::Result<RoutingPolicy, String> {
        let identifier = self.set_identifier.take();
        let weight = self.weight.take();
        let region = self.region.take();
        let failover = self.failover.take();
        let alias = self.alias_target.take();

        let present = [
            weight.is_some(),
            region.is_some(),
            failover.is_some(),
            alias.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if present > 1 {
            return Err("more than one routing style is set".to_string());
        }

        if let Some(alias) = alias {
            if identifier.is_some() {
                return Err("alias record set carries a set identifier".to_string());
            }
            return Ok(RoutingPolicy::Alias {
                target: AliasTarget {
                    hosted_zone_id: alias.hosted_zone_id,
                    dns_name: alias.dns_name,
                    evaluate_target_health: alias.evaluate_target_health,
                },
            });
        }

        let Some(set_identifier) = identifier else {
            if present > 0 {
                return Err("routed record set has no set identifier".to_string());
            }
            return Ok(RoutingPolicy::Simple);
        };

        if let Some(weight) = weight {
            Ok(RoutingPolicy::Weighted {
                set_identifier,
                weight,
            })
        } else if let Some(region) = region {
            Ok(RoutingPolicy::Latency {
                set_identifier,
                region,
            })
        } else if let Some(failover) = failover {
            let role = failover
                .parse::<FailoverRole>()
                .map_err(|e| e.to_string())?;
            Ok(RoutingPolicy::Failover {
                set_identifier,
                role,
            })
        } else {
            Err("set identifier given without a routing style".to_string())
        }
    }
}

impl TryFrom<WireRecordSet> for ResourceRecordSet {
    type Error = ClientError;

    fn try_from(wire: WireRecordSet) -> Result<Self> {
        let raw = format!("{wire:?}");
        let mut wire = wire;

        let record_type: RecordType = wire
            .record_type
            .parse()
            .map_err(|e| ClientError::decode(e, raw.clone()))?;
        let routing = wire.routing().map_err(|detail| {
            ClientError::decode(format!("record set '{}': {detail}", wire.name), raw.clone())
        })?;
        let records: Vec<String> = wire
            .resource_records
            .map(|r| r.items.into_iter().map(|r| r.value).collect())
            .unwrap_or_default();

        if matches!(routing, RoutingPolicy::Alias { .. }) && (wire.ttl.is_some() || !records.is_empty())
        {
            return Err(ClientError::decode(
                format!("alias record set '{}' carries TTL or records", wire.name),
                raw,
            ));
        }

        Ok(Self {
            name: wire.name,
            record_type,
            ttl: wire.ttl,
            records,
            health_check_id: wire.health_check_id,
            routing,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest", rename_all = "PascalCase")]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub change_batch: WireChangeBatch,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChangeBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: WireChanges,
}

#[derive(Debug, Serialize)]
pub struct WireChanges {
    #[serde(rename = "Change")]
    pub items: Vec<WireChange>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChange {
    pub action: String,
    pub resource_record_set: WireRecordSet,
}

impl From<&RecordSetChange> for WireChange {
    fn from(change: &RecordSetChange) -> Self {
        Self {
            action: change.action.as_str().to_string(),
            resource_record_set: WireRecordSet::from(&change.record_set),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct WireRecordSets {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<WireRecordSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResourceRecordSetsResponse {
    #[serde(default)]
    pub resource_record_sets: WireRecordSets,
    pub is_truncated: bool,
    pub next_record_name: Option<String>,
    pub next_record_type: Option<String>,
    pub next_record_identifier: Option<String>,
}

impl Paged for ListResourceRecordSetsResponse {
    type Item = ResourceRecordSet;

    fn into_page(self) -> Result<Page<ResourceRecordSet>> {
        let next = next_cursor(
            self.is_truncated,
            [
                ("name", self.next_record_name),
                ("type", self.next_record_type),
                ("identifier", self.next_record_identifier),
            ],
            "record set",
        )?;
        let items = self
            .resource_record_sets
            .items
            .into_iter()
            .map(ResourceRecordSet::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page { items, next })
    }
}

// ============ Health checks ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireHealthCheckConfig {
    #[serde(rename = "IPAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "Type")]
    pub check_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,
}

impl From<&HealthCheckConfig> for WireHealthCheckConfig {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            ip_address: config.ip_address.clone(),
            port: config.port,
            check_type: config.check_type.as_str().to_string(),
            resource_path: config.resource_path.clone(),
            fully_qualified_domain_name: config.fully_qualified_domain_name.clone(),
            search_string: config.search_string.clone(),
            request_interval: config.request_interval,
            failure_threshold: config.failure_threshold,
        }
    }
}

impl TryFrom<WireHealthCheckConfig> for HealthCheckConfig {
    type Error = ClientError;

    fn try_from(wire: WireHealthCheckConfig) -> Result<Self> {
        let check_type = wire
            .check_type
            .parse::<HealthCheckType>()
            .map_err(|e| ClientError::decode(e, wire.check_type.clone()))?;
        Ok(Self {
            ip_address: wire.ip_address.filter(|s| !s.is_empty()),
            port: wire.port,
            check_type,
            resource_path: wire.resource_path.filter(|s| !s.is_empty()),
            fully_qualified_domain_name: wire.fully_qualified_domain_name.filter(|s| !s.is_empty()),
            search_string: wire.search_string.filter(|s| !s.is_empty()),
            request_interval: wire.request_interval,
            failure_threshold: wire.failure_threshold,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "CreateHealthCheckRequest", rename_all = "PascalCase")]
pub struct CreateHealthCheckRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    pub caller_reference: String,
    pub health_check_config: WireHealthCheckConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireHealthCheck {
    pub id: String,
    pub caller_reference: String,
    pub health_check_config: WireHealthCheckConfig,
}

impl TryFrom<WireHealthCheck> for HealthCheck {
    type Error = ClientError;

    fn try_from(wire: WireHealthCheck) -> Result<Self> {
        Ok(Self {
            id: bare_id(&wire.id).to_string(),
            caller_reference: wire.caller_reference,
            config: wire.health_check_config.try_into()?,
        })
    }
}

/// Response of `CreateHealthCheck` and `GetHealthCheck`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheckResponse {
    pub health_check: WireHealthCheck,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireHealthChecks {
    #[serde(rename = "HealthCheck", default)]
    pub items: Vec<WireHealthCheck>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListHealthChecksResponse {
    #[serde(default)]
    pub health_checks: WireHealthChecks,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
}

impl Paged for ListHealthChecksResponse {
    type Item = HealthCheck;

    fn into_page(self) -> Result<Page<HealthCheck>> {
        let next = next_cursor(
            self.is_truncated,
            [("marker", self.next_marker)],
            "health check",
        )?;
        let items = self
            .health_checks
            .items
            .into_iter()
            .map(HealthCheck::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page { items, next })
    }
}

/// Empty acknowledgement document.
#[derive(Debug, Deserialize)]
pub struct EmptyResponse {}
