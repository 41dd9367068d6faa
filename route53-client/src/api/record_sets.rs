use super::bare_id;
use super::types::{
    ChangeInfoResponse, ChangeResourceRecordSetsRequest, ListResourceRecordSetsResponse,
    WireChange, WireChangeBatch, WireChanges,
};
use crate::change::PendingChange;
use crate::client::Route53Client;
use crate::error::{ClientError, Result};
use crate::http_client::Request;
use crate::types::{RecordSetChange, ResourceRecordSet};

impl Route53Client {
    fn rrset_path(&self, zone_id: &str) -> String {
        self.path(&format!(
            "hostedzone/{}/rrset",
            urlencoding::encode(bare_id(zone_id))
        ))
    }

    /// Apply a batch of record set changes atomically.
    ///
    /// An empty `comment` is not sent.
    pub async fn change_record_sets(
        &self,
        zone_id: &str,
        changes: &[RecordSetChange],
        comment: Option<&str>,
    ) -> Result<PendingChange> {
        if changes.is_empty() {
            return Err(ClientError::Encode {
                detail: "change batch has no changes".to_string(),
            });
        }

        let body = ChangeResourceRecordSetsRequest {
            xmlns: self.xmlns(),
            change_batch: WireChangeBatch {
                comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
                changes: WireChanges {
                    items: changes.iter().map(WireChange::from).collect(),
                },
            },
        };

        let response: ChangeInfoResponse = self
            .transport()
            .execute(Request::post(self.rrset_path(zone_id), &body))
            .await?;
        let info = response.change_info.try_into()?;
        log::info!(
            "[route53] submitted {} record set change(s) to zone {}",
            changes.len(),
            bare_id(zone_id)
        );
        Ok(self.pending_change(info))
    }

    /// Create a single record set.
    pub async fn create_record_set(
        &self,
        zone_id: &str,
        record_set: ResourceRecordSet,
        comment: Option<&str>,
    ) -> Result<PendingChange> {
        self.change_record_sets(zone_id, &[RecordSetChange::create(record_set)], comment)
            .await
    }

    /// Delete a single record set. It must match the existing one exactly.
    pub async fn delete_record_set(
        &self,
        zone_id: &str,
        record_set: ResourceRecordSet,
        comment: Option<&str>,
    ) -> Result<PendingChange> {
        self.change_record_sets(zone_id, &[RecordSetChange::delete(record_set)], comment)
            .await
    }

    /// Every record set of a zone, across all pages, in the service's order.
    pub async fn list_record_sets(&self, zone_id: &str) -> Result<Vec<ResourceRecordSet>> {
        self.transport()
            .list_all::<ListResourceRecordSetsResponse>(Request::get(self.rrset_path(zone_id)))
            .await
    }
}
