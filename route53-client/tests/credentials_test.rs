//! Credential sources backed by HTTP endpoints

mod common;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use route53_client::{
    ClientError, CredentialChain, CredentialSource, InstanceMetadataCredentials, Route53Client,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROLES: &str = "/latest/meta-data/iam/security-credentials/";

#[tokio::test]
async fn instance_role_credential_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES))
        .respond_with(ResponseTemplate::new(200).set_body_string("dns-admin\n"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLES}dns-admin")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
  "Code" : "Success",
  "LastUpdated" : "2024-10-01T11:55:00Z",
  "Type" : "AWS-HMAC",
  "AccessKeyId" : "ASIAEXAMPLEROLE",
  "SecretAccessKey" : "role-secret",
  "Token" : "role-token",
  "Expiration" : "2024-10-01T18:00:00Z"
}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let source = InstanceMetadataCredentials::with_endpoint(server.uri());
    let credential = require_ok!(source.fetch().await);
    assert_eq!(credential.access_key_id(), "ASIAEXAMPLEROLE");
    assert_eq!(credential.secret_access_key(), "role-secret");
    assert_eq!(credential.session_token(), Some("role-token"));
    assert_eq!(
        credential.expiration(),
        Utc.with_ymd_and_hms(2024, 10, 1, 18, 0, 0).single()
    );
}

#[tokio::test]
async fn missing_role_is_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = InstanceMetadataCredentials::with_endpoint(server.uri())
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Credentials { .. }), "got {err:?}");
}

#[tokio::test]
async fn failed_role_lookup_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES))
        .respond_with(ResponseTemplate::new(200).set_body_string("dns-admin"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLES}dns-admin")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"Code":"AssumeRoleUnauthorizedAccess","AccessKeyId":"","SecretAccessKey":""}"#,
        ))
        .mount(&server)
        .await;

    let err = InstanceMetadataCredentials::with_endpoint(server.uri())
        .fetch()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("AssumeRoleUnauthorizedAccess"));
}

#[tokio::test]
async fn connect_with_expiring_credential_keeps_working() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES))
        .respond_with(ResponseTemplate::new(200).set_body_string("dns-admin"))
        .mount(&server)
        .await;
    let expiration = (Utc::now() + chrono::Duration::hours(6)).to_rfc3339();
    Mock::given(method("GET"))
        .and(path(format!("{ROLES}dns-admin")))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"Code":"Success","AccessKeyId":"ASIAONE","SecretAccessKey":"s","Token":"t","Expiration":"{expiration}"}}"#
        )))
        .mount(&server)
        .await;

    let chain = CredentialChain::new(vec![Box::new(InstanceMetadataCredentials::with_endpoint(
        server.uri(),
    ))]);
    let client = require_ok!(
        Route53Client::builder()
            .credential_refresh_retry(Duration::from_millis(10))
            .connect(chain)
            .await
    );
    assert_eq!(client.credential().access_key_id(), "ASIAONE");
    assert!(format!("{client:?}").contains("refreshing: true"));
    drop(client);
}
