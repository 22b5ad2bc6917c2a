//! Integration tests for the request executor's recovery policy
//!
//! **Coverage:**
//! - Expired session: 401 on first attempt, success after re-auth, exactly
//!   two HTTP calls
//! - Second 401: fatal error naming both failures
//! - Data not ready (14006): exactly one reissue carrying the
//!   server-suggested end time
//! - Range too old (14013): immediate failure, no second call
//! - 404 on MAC lookup: distinct not-found error
//! - Any other status: generic error carrying status and body
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates Catalyst Center)
//! - Mock token provider so request counts stay auth-free

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::collections::BTreeMap;
use std::sync::Arc;

use catc_domain::types::Paging;
use catc_infra::api::ApiError;
use serde_json::json;
use support::{commands_with, test_range, RotatingTokenProvider};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENTS_PATH: &str = "/dna/data/api/v1/clients";

#[tokio::test]
async fn expired_session_is_reestablished_and_request_reissued_once() {
    let server = MockServer::start().await;

    // First attempt with the stale token is rejected.
    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .and(header("X-Auth-Token", "stale-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    // Reissue with the fresh token succeeds.
    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .and(header("X-Auth-Token", "fresh-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": [{"id": "c1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["stale-token", "fresh-token"]));
    let commands = commands_with(&server.uri(), Arc::clone(&provider));

    let body = commands
        .clients(test_range(), &Default::default(), &Paging::default())
        .await
        .expect("second attempt payload");

    assert_eq!(body["response"][0]["id"], "c1");
    assert_eq!(provider.invalidations(), 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn second_rejection_after_reauth_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["stale", "also-stale"]));
    let commands = commands_with(&server.uri(), Arc::clone(&provider));

    let err = commands
        .clients(test_range(), &Default::default(), &Paging::default())
        .await
        .unwrap_err();

    match err {
        ApiError::SessionExpired(msg) => {
            // The error names both the original rejection and the retry's.
            assert!(msg.contains("401"));
            assert!(msg.contains("reissued"));
        }
        other => panic!("expected SessionExpired, got {other:?}"),
    }

    // Exactly one recovery attempt; no third call.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn data_not_ready_reissues_once_with_suggested_end_time() {
    let server = MockServer::start().await;
    let range = test_range();

    // The original end time is rejected with a suggested replacement.
    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .and(query_param("endTime", range.end_epoch_ms.to_string()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "response": {
                "errorCode": 14006,
                "message": "Data not ready for the requested end time, use endTime=1699999000000"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The reissue must carry exactly the suggested bound.
    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .and(query_param("endTime", "1699999000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    let body = commands
        .clients(range, &Default::default(), &Paging::default())
        .await
        .expect("retry with corrected end time");

    assert_eq!(body["response"], json!([]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn unparseable_not_ready_message_fails_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "response": {"errorCode": 14006, "message": "data not ready, try again later"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    let err = commands
        .clients(test_range(), &Default::default(), &Paging::default())
        .await
        .unwrap_err();

    match err {
        ApiError::DataNotReady(msg) => assert!(msg.contains("suggested end time")),
        other => panic!("expected DataNotReady, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn range_too_old_fails_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "response": {"errorCode": 14013, "message": "start time is beyond retention"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    let err = commands
        .clients(test_range(), &Default::default(), &Paging::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RangeTooOld(_)));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn mac_lookup_404_is_a_distinct_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CLIENTS_PATH}/aa:bb:cc:dd:ee:ff")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    let err = commands
        .client_by_mac("aa:bb:cc:dd:ee:ff", test_range(), None, None)
        .await
        .unwrap_err();

    match err {
        ApiError::NotFound(msg) => assert!(msg.contains("aa:bb:cc:dd:ee:ff")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn other_statuses_surface_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    let err = commands.network_devices(&BTreeMap::new()).await.unwrap_err();

    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("maintenance window"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_data_calls_carry_the_caller_id_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CLIENTS_PATH))
        .and(header("X-CALLER-ID", "test-caller"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(RotatingTokenProvider::new(&["token"]));
    let commands = commands_with(&server.uri(), provider);

    commands
        .clients(test_range(), &Default::default(), &Paging::default())
        .await
        .expect("caller-id header matched");
}
