use super::bare_id;
use super::types::ChangeInfoResponse;
use crate::change::PendingChange;
use crate::client::Route53Client;
use crate::error::Result;
use crate::http_client::Request;
use crate::types::ChangeInfo;

impl Route53Client {
    /// Current status of a change. Accepts `C1` or `/change/C1`.
    pub async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let path = self.path(&format!("change/{}", urlencoding::encode(bare_id(change_id))));
        let response: ChangeInfoResponse = self.transport().execute(Request::get(path)).await?;
        response.change_info.try_into()
    }

    /// Handle for tracking a change obtained elsewhere.
    pub fn pending_change(&self, info: ChangeInfo) -> PendingChange {
        PendingChange::new(self.clone(), info)
    }
}
