//! Integration tests for `UpstreamClient` using wiremock HTTP mocks.

use outlet_upstream::{UpstreamClient, UpstreamError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> UpstreamClient {
    UpstreamClient::new(base_url, 5, "outlet-test/0.1").expect("client construction should not fail")
}

fn outlets_body() -> serde_json::Value {
    json!([
        {
            "id": "1",
            "name": "McDonald's KLCC",
            "address": "Suria KLCC, Kuala Lumpur",
            "latitude": 3.1579,
            "longitude": 101.7116,
            "waze_link": "https://waze.com/ul?ll=3.1579,101.7116"
        },
        {
            "id": "2",
            "name": "McDonald's Pavilion",
            "address": "Pavilion, Bukit Bintang",
            "latitude": 3.1490,
            "longitude": 101.7236,
            "waze_link": "https://waze.com/ul?ll=3.1490,101.7236"
        }
    ])
}

#[tokio::test]
async fn fetch_outlets_returns_body_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(outlets_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client.fetch_outlets().await.expect("should fetch outlets");

    assert_eq!(payload, outlets_body());
}

#[tokio::test]
async fn fetch_snapshot_decodes_outlets() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(outlets_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.fetch_snapshot().await.expect("should decode snapshot");

    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot.get("2").map(|o| o.name.as_str()),
        Some("McDonald's Pavilion")
    );
}

#[tokio::test]
async fn fetch_snapshot_rejects_object_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "oops" })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_snapshot().await.unwrap_err();

    assert!(matches!(err, UpstreamError::Payload { .. }), "got {err:?}");
}

#[tokio::test]
async fn search_forwards_decoded_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "24 hours"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [{ "id": "1" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client.search("24 hours").await.expect("should search");

    assert_eq!(payload, json!({ "results": [{ "id": "1" }] }));
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_outlets().await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert!(matches!(err, UpstreamError::Status { .. }));
}

#[tokio::test]
async fn non_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("klcc").await.unwrap_err();

    assert!(matches!(err, UpstreamError::Deserialize { .. }), "got {err:?}");
    assert!(err.status().is_none());
}

#[tokio::test]
async fn unreachable_upstream_is_an_http_error() {
    // A non-pooled server, so dropping it actually closes the port.
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let client = test_client(&uri);
    let err = client.fetch_outlets().await.unwrap_err();

    assert!(matches!(err, UpstreamError::Http(_)), "got {err:?}");
}
