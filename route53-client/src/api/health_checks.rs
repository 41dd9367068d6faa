use super::types::{
    CreateHealthCheckRequest, EmptyResponse, HealthCheckResponse, ListHealthChecksResponse,
    WireHealthCheckConfig,
};
use super::{bare_id, caller_reference};
use crate::client::Route53Client;
use crate::error::Result;
use crate::http_client::Request;
use crate::types::{HealthCheck, HealthCheckConfig};

impl Route53Client {
    fn health_check_path(&self, health_check_id: &str) -> String {
        self.path(&format!(
            "healthcheck/{}",
            urlencoding::encode(bare_id(health_check_id))
        ))
    }

    /// Create a health check. A random caller reference is used when none is given.
    pub async fn create_health_check(
        &self,
        config: &HealthCheckConfig,
        caller_reference_id: Option<String>,
    ) -> Result<HealthCheck> {
        let body = CreateHealthCheckRequest {
            xmlns: self.xmlns(),
            caller_reference: caller_reference(caller_reference_id),
            health_check_config: WireHealthCheckConfig::from(config),
        };
        let response: HealthCheckResponse = self
            .transport()
            .execute(Request::post(self.path("healthcheck"), &body))
            .await?;
        let check = HealthCheck::try_from(response.health_check)?;
        log::info!("[route53] created health check {}", check.id);
        Ok(check)
    }

    pub async fn get_health_check(&self, health_check_id: &str) -> Result<HealthCheck> {
        let response: HealthCheckResponse = self
            .transport()
            .execute(Request::get(self.health_check_path(health_check_id)))
            .await?;
        response.health_check.try_into()
    }

    /// Every health check of the account, across all pages.
    pub async fn list_health_checks(&self) -> Result<Vec<HealthCheck>> {
        self.transport()
            .list_all::<ListHealthChecksResponse>(Request::get(self.path("healthcheck")))
            .await
    }

    /// Delete a health check. Takes effect immediately; there is no change to track.
    pub async fn delete_health_check(&self, health_check_id: &str) -> Result<()> {
        let _: EmptyResponse = self
            .transport()
            .execute(Request::delete(self.health_check_path(health_check_id)))
            .await?;
        log::info!("[route53] deleted health check {}", bare_id(health_check_id));
        Ok(())
    }
}
