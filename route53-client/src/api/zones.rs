use super::types::{
    ChangeInfoResponse, CreateHostedZoneRequest, CreateHostedZoneResponse, GetHostedZoneResponse,
    ListHostedZonesResponse, WireZoneConfig,
};
use super::{bare_id, caller_reference};
use crate::change::PendingChange;
use crate::client::Route53Client;
use crate::error::Result;
use crate::http_client::Request;
use crate::types::{ChangeInfo, CreatedHostedZone, HostedZone, HostedZoneDetails};

impl Route53Client {
    fn zone_path(&self, zone_id: &str) -> String {
        self.path(&format!("hostedzone/{}", urlencoding::encode(bare_id(zone_id))))
    }

    /// Create a hosted zone.
    ///
    /// A random caller reference is used when none is given. The returned
    /// handle tracks propagation of the new zone's delegation.
    pub async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference_id: Option<String>,
        comment: Option<&str>,
    ) -> Result<(CreatedHostedZone, PendingChange)> {
        let body = CreateHostedZoneRequest {
            xmlns: self.xmlns(),
            name: name.to_string(),
            caller_reference: caller_reference(caller_reference_id),
            hosted_zone_config: comment.filter(|c| !c.is_empty()).map(|c| WireZoneConfig {
                comment: Some(c.to_string()),
            }),
        };

        let response: CreateHostedZoneResponse = self
            .transport()
            .execute(Request::post(self.path("hostedzone"), &body))
            .await?;

        let change = ChangeInfo::try_from(response.change_info)?;
        let created = CreatedHostedZone {
            zone: response.hosted_zone.into(),
            name_servers: response.delegation_set.name_servers.items,
            change: change.clone(),
        };
        log::info!("[route53] created hosted zone {} ({})", created.zone.name, created.zone.id);
        Ok((created, self.pending_change(change)))
    }

    /// Hosted zone with its name servers. Accepts `Z1` or `/hostedzone/Z1`.
    pub async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZoneDetails> {
        let response: GetHostedZoneResponse = self
            .transport()
            .execute(Request::get(self.zone_path(zone_id)))
            .await?;
        Ok(HostedZoneDetails {
            zone: response.hosted_zone.into(),
            name_servers: response.delegation_set.name_servers.items,
        })
    }

    /// Every hosted zone of the account, across all pages.
    pub async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        self.transport()
            .list_all::<ListHostedZonesResponse>(Request::get(self.path("hostedzone")))
            .await
    }

    /// Delete a hosted zone. It must contain only its SOA and NS record sets.
    pub async fn delete_hosted_zone(&self, zone_id: &str) -> Result<PendingChange> {
        let response: ChangeInfoResponse = self
            .transport()
            .execute(Request::delete(self.zone_path(zone_id)))
            .await?;
        log::info!("[route53] deleted hosted zone {}", bare_id(zone_id));
        Ok(self.pending_change(response.change_info.try_into()?))
    }
}
