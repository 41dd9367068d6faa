//! Request execution against a mock endpoint: signing, bodies, error classification

mod common;

use common::{API, change_info_xml, error_xml, mock_client, xml};
use route53_client::{ClientError, Credential, RecordType, ResourceRecordSet, Route53Client};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn requests_carry_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/change/C1")))
        .and(header_exists("X-Amz-Date"))
        .and(header_exists("X-Amzn-Authorization"))
        .respond_with(xml(change_info_xml("GetChangeResponse", "C1", "PENDING")))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let info = require_ok!(client.get_change("/change/C1").await);
    assert_eq!(info.id, "C1");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("X-Amzn-Authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(auth.starts_with("AWS3-HTTPS AWSAccessKeyId=AKIDEXAMPLE,Algorithm=HmacSHA256,Signature="));
    assert!(requests[0].headers.get("X-Amz-Security-Token").is_none());
}

#[tokio::test]
async fn session_token_header_sent_for_temporary_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-Amz-Security-Token", "session-token-1"))
        .respond_with(xml(change_info_xml("GetChangeResponse", "C1", "INSYNC")))
        .expect(1)
        .mount(&server)
        .await;

    let client = Route53Client::builder()
        .endpoint(server.uri())
        .build(Credential::new("ASIATEMP", "secret").with_session_token("session-token-1"))
        .unwrap();
    require_ok!(client.get_change("C1").await);
}

#[tokio::test]
async fn rotated_credential_used_by_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml(change_info_xml("GetChangeResponse", "C1", "PENDING")))
        .expect(2)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    require_ok!(client.get_change("C1").await);
    client.set_credential(Credential::new("AKIDROTATED", "new-secret"));
    require_ok!(client.get_change("C1").await);

    let requests = server.received_requests().await.unwrap();
    let key_of = |i: usize| {
        requests[i]
            .headers
            .get("X-Amzn-Authorization")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    };
    assert!(key_of(0).contains("AWSAccessKeyId=AKIDEXAMPLE,"));
    assert!(key_of(1).contains("AWSAccessKeyId=AKIDROTATED,"));
}

#[tokio::test]
async fn post_body_is_declared_xml() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/hostedzone/Z1/rrset")))
        .and(header("content-type", "application/xml"))
        .and(body_string_contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#))
        .and(body_string_contains("<Comment>add www</Comment>"))
        .respond_with(xml(change_info_xml(
            "ChangeResourceRecordSetsResponse",
            "C7",
            "PENDING",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let record = ResourceRecordSet::new(
        "www.example.com.",
        RecordType::A,
        300,
        vec!["192.0.2.1".to_string()],
    );
    let change = require_ok!(
        client
            .create_record_set("/hostedzone/Z1", record, Some("add www"))
            .await
    );
    assert_eq!(change.id(), "C7");
}

#[tokio::test]
async fn error_envelope_yields_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/hostedzone/ZMISSING")))
        .respond_with(error_xml(404, "NoSuchHostedZone", "No hosted zone found with ID: ZMISSING"))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.get_hosted_zone("ZMISSING").await.unwrap_err();
    match &err {
        ClientError::Api {
            status,
            code,
            message,
            request_id,
        } => {
            assert_eq!(*status, 404);
            assert_eq!(code, "NoSuchHostedZone");
            assert_eq!(message, "No hosted zone found with ID: ZMISSING");
            assert_eq!(request_id.as_deref(), Some("req-NoSuchHostedZone"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_not_found());
}

#[tokio::test]
async fn request_id_header_fills_missing_document_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("x-amzn-RequestId", "hdr-123")
                .set_body_string(
                    "<ErrorResponse><Error><Code>Throttling</Code><Message>Rate exceeded</Message></Error></ErrorResponse>",
                ),
        )
        .mount(&server)
        .await;

    let err = mock_client(&server).get_change("C1").await.unwrap_err();
    assert_eq!(err.remote_code(), Some("Throttling"));
    assert!(matches!(
        err,
        ClientError::Api { request_id: Some(ref id), .. } if id == "hdr-123"
    ));
}

#[tokio::test]
async fn malformed_error_body_keeps_raw_bytes() {
    let server = MockServer::start().await;
    let raw = "<html><body><h1>502 Bad Gateway</h1></body></html>";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string(raw))
        .mount(&server)
        .await;

    let err = mock_client(&server).list_hosted_zones().await.unwrap_err();
    match err {
        ClientError::MalformedErrorBody { status, raw: body } => {
            assert_eq!(status, 502);
            assert_eq!(body, raw);
        }
        other => panic!("expected MalformedErrorBody, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml("<SomethingElse><Unexpected/></SomethingElse>"))
        .mount(&server)
        .await;

    let err = mock_client(&server).get_change("C1").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { ref raw, .. } if raw.contains("SomethingElse")));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Bind then release a port so nothing listens on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = Route53Client::builder()
        .endpoint(format!("http://127.0.0.1:{port}"))
        .build(Credential::new("AKID", "secret"))
        .unwrap();
    let err = client.get_change("C1").await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

#[tokio::test]
async fn slow_response_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            xml(change_info_xml("GetChangeResponse", "C1", "PENDING"))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = Route53Client::builder()
        .endpoint(server.uri())
        .request_timeout(std::time::Duration::from_millis(50))
        .build(Credential::new("AKID", "secret"))
        .unwrap();
    let err = client.get_change("C1").await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }), "got {err:?}");
}
