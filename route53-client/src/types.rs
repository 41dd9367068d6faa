use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ Enumerations ============

/// A string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Declares a closed string enumeration with its wire spelling.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Spelling used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// DNS record type accepted by the service.
    RecordType, "record type" {
        /// IPv4 address.
        A => "A",
        /// IPv6 address.
        Aaaa => "AAAA",
        /// Canonical name.
        Cname => "CNAME",
        /// Mail exchange.
        Mx => "MX",
        /// Name server.
        Ns => "NS",
        /// Pointer.
        Ptr => "PTR",
        /// Start of authority.
        Soa => "SOA",
        /// Sender policy framework.
        Spf => "SPF",
        /// Service locator.
        Srv => "SRV",
        /// Text.
        Txt => "TXT",
        /// Certification authority authorization.
        Caa => "CAA",
        /// Delegation signer.
        Ds => "DS",
        /// Naming authority pointer.
        Naptr => "NAPTR",
    }
}

wire_enum! {
    /// Role of a record set in a failover pair.
    FailoverRole, "failover role" {
        Primary => "PRIMARY",
        Secondary => "SECONDARY",
    }
}

wire_enum! {
    /// How a health check probes its endpoint.
    HealthCheckType, "health check type" {
        Http => "HTTP",
        Https => "HTTPS",
        /// HTTP, passing only if the body contains the search string.
        HttpStrMatch => "HTTP_STR_MATCH",
        /// HTTPS, passing only if the body contains the search string.
        HttpsStrMatch => "HTTPS_STR_MATCH",
        Tcp => "TCP",
    }
}

wire_enum! {
    /// What a change does to a record set.
    ChangeAction, "change action" {
        Create => "CREATE",
        Delete => "DELETE",
        /// Create, or replace an existing record set with the same name, type and identifier.
        Upsert => "UPSERT",
    }
}

wire_enum! {
    /// Propagation state of a change.
    ChangeStatus, "change status" {
        Pending => "PENDING",
        /// Fully propagated to every edge location.
        InSync => "INSYNC",
    }
}

// ============ Changes ============

/// Status record of an asynchronous change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Bare change id (prefix `/change/` stripped).
    pub id: String,
    pub status: ChangeStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ChangeInfo {
    /// Whether the change has fully propagated.
    pub fn is_synced(&self) -> bool {
        self.status == ChangeStatus::InSync
    }
}

// ============ Hosted zones ============

/// A hosted zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Bare zone id (prefix `/hostedzone/` stripped).
    pub id: String,
    /// Fully qualified zone name, with trailing dot.
    pub name: String,
    pub caller_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_record_set_count: Option<u64>,
}

/// A hosted zone with its delegation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZoneDetails {
    pub zone: HostedZone,
    pub name_servers: Vec<String>,
}

/// Result of creating a hosted zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedHostedZone {
    pub zone: HostedZone,
    pub name_servers: Vec<String>,
    pub change: ChangeInfo,
}

// ============ Record sets ============

/// Target of an alias record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Zone hosting the target (for load balancers, the balancer's zone).
    pub hosted_zone_id: String,
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

/// Routing style of a record set. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(
    tag = "policy",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum RoutingPolicy {
    /// Plain record set.
    #[default]
    Simple,
    /// One of several record sets sharing name and type, chosen by weight.
    Weighted { set_identifier: String, weight: u8 },
    /// Answers with the records of another resource.
    Alias { target: AliasTarget },
    /// Primary/secondary pair switched by health check.
    Failover {
        set_identifier: String,
        role: FailoverRole,
    },
    /// Chosen by lowest latency from the resolver's region.
    Latency {
        set_identifier: String,
        region: String,
    },
}

impl RoutingPolicy {
    /// Identifier distinguishing record sets with the same name and type.
    pub fn set_identifier(&self) -> Option<&str> {
        match self {
            Self::Weighted { set_identifier, .. }
            | Self::Failover { set_identifier, .. }
            | Self::Latency { set_identifier, .. } => Some(set_identifier),
            Self::Simple | Self::Alias { .. } => None,
        }
    }
}

/// A named, typed group of DNS values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully qualified name.
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Ignored for alias record sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Ignored for alias record sets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    #[serde(default)]
    pub routing: RoutingPolicy,
}

impl ResourceRecordSet {
    /// Simple record set.
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        records: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl: Some(ttl),
            records,
            health_check_id: None,
            routing: RoutingPolicy::Simple,
        }
    }

    /// Alias record set.
    pub fn alias(name: impl Into<String>, record_type: RecordType, target: AliasTarget) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl: None,
            records: Vec::new(),
            health_check_id: None,
            routing: RoutingPolicy::Alias { target },
        }
    }

    #[must_use]
    pub fn with_routing(mut self, routing: RoutingPolicy) -> Self {
        self.routing = routing;
        self
    }

    #[must_use]
    pub fn with_health_check(mut self, health_check_id: impl Into<String>) -> Self {
        self.health_check_id = Some(health_check_id.into());
        self
    }
}

/// One entry of a change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetChange {
    pub action: ChangeAction,
    pub record_set: ResourceRecordSet,
}

impl RecordSetChange {
    pub fn create(record_set: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Create,
            record_set,
        }
    }

    pub fn delete(record_set: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Delete,
            record_set,
        }
    }

    pub fn upsert(record_set: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Upsert,
            record_set,
        }
    }
}

// ============ Health checks ============

/// Probe definition of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "type")]
    pub check_type: HealthCheckType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,
    /// Required by the string-matching check types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    /// Seconds between probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,
}

impl HealthCheckConfig {
    /// Probe of the given type with every optional setting unset.
    pub fn new(check_type: HealthCheckType) -> Self {
        Self {
            ip_address: None,
            port: None,
            check_type,
            resource_path: None,
            fully_qualified_domain_name: None,
            search_string: None,
            request_interval: None,
            failure_threshold: None,
        }
    }
}

/// A health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// Bare health check id (prefix `/healthcheck/` stripped).
    pub id: String,
    pub caller_reference: String,
    pub config: HealthCheckConfig,
}
