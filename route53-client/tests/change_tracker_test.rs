//! Waiting for a change to reach INSYNC

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{API, Scripted, change_info_xml, error_xml, mock_client, xml};
use route53_client::{ChangeStatus, ClientError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

fn status(s: &str) -> wiremock::ResponseTemplate {
    xml(change_info_xml("GetChangeResponse", "C1", s))
}

#[tokio::test]
async fn syncs_after_third_poll() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![
        status("PENDING"),
        status("PENDING"),
        status("INSYNC"),
    ]);
    Mock::given(method("GET"))
        .and(path(format!("{API}/change/C1")))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let info = require_ok!(
        client
            .wait_for_change("C1", Duration::from_millis(10), Duration::from_secs(1))
            .await
    );
    assert_eq!(info.status, ChangeStatus::InSync);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Polling stopped with the success.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn pending_change_handle_waits_and_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/hostedzone/Z1/rrset")))
        .respond_with(xml(change_info_xml(
            "ChangeResourceRecordSetsResponse",
            "C1",
            "PENDING",
        )))
        .mount(&server)
        .await;
    let (responder, calls) = Scripted::new(vec![status("PENDING"), status("INSYNC")]);
    Mock::given(method("GET"))
        .and(path(format!("{API}/change/C1")))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let record = route53_client::ResourceRecordSet::new(
        "www.example.com.",
        route53_client::RecordType::A,
        300,
        vec!["192.0.2.1".to_string()],
    );
    let mut change = require_ok!(client.create_record_set("Z1", record, None).await);
    assert_eq!(change.info().status, ChangeStatus::Pending);

    let refreshed = require_ok!(change.refresh().await);
    assert_eq!(refreshed.status, ChangeStatus::Pending);

    let synced = require_ok!(
        change
            .wait_until_synced(Duration::from_millis(10), Duration::from_secs(1))
            .await
    );
    assert!(synced.is_synced());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn times_out_and_stops_polling() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![status("PENDING")]);
    Mock::given(method("GET"))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client
        .wait_for_change("C1", Duration::from_millis(10), Duration::from_millis(50))
        .await
        .unwrap_err();
    match err {
        ClientError::ChangeSyncTimeout {
            change_id,
            waited_ms,
        } => {
            assert_eq!(change_id, "C1");
            assert_eq!(waited_ms, 50);
        }
        other => panic!("expected ChangeSyncTimeout, got {other:?}"),
    }

    // Let a request cut off at the deadline settle.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let at_deadline = calls.load(Ordering::SeqCst);
    assert!(at_deadline >= 1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), at_deadline, "polled after the deadline");
}

#[tokio::test]
async fn failed_poll_is_reported_once() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![
        status("PENDING"),
        error_xml(404, "NoSuchChange", "A change with the specified change ID does not exist."),
    ]);
    Mock::given(method("GET"))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client
        .wait_for_change("/change/C1", Duration::from_millis(10), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(err.remote_code(), Some("NoSuchChange"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn abandoned_waiter_still_terminates() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![status("PENDING")]);
    Mock::given(method("GET"))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let waiter = client.wait_for_change("C1", Duration::from_millis(10), Duration::from_millis(60));
    assert_eq!(waiter.change_id(), "C1");
    drop(waiter);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let settled = calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), settled);
}

#[tokio::test]
async fn unbounded_timeout_still_syncs() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![status("PENDING"), status("INSYNC")]);
    Mock::given(method("GET"))
        .and(path(format!("{API}/change/C1")))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let info = require_ok!(
        client
            .wait_for_change("C1", Duration::from_millis(10), Duration::MAX)
            .await
    );
    assert!(info.is_synced());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unbounded_poll_interval_times_out() {
    let server = MockServer::start().await;
    let (responder, calls) = Scripted::new(vec![status("PENDING")]);
    Mock::given(method("GET"))
        .respond_with(responder)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client
        .wait_for_change("C1", Duration::MAX, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::ChangeSyncTimeout { waited_ms: 50, .. }),
        "got {err:?}"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
