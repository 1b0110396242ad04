//! Request executor behavior over real HTTP

use crate::mock_server::MockServerFixture;
use fetchy::{Failure, FetchyBuilder, RequestOptions, TransportOrigin};
use mockito::Matcher;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize, PartialEq)]
struct Thing {
    id: u32,
    name: String,
}

fn transport_origin(failure: &Failure) -> Option<TransportOrigin> {
    match failure {
        Failure::Transport(t) => Some(t.origin),
        _ => None,
    }
}

#[tokio::test]
async fn test_json_success_decodes_data() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json("GET", "/things/1", 200, r#"{"id":1,"name":"widget"}"#)
        .await;

    let resp = fixture
        .client()
        .get::<Thing>("things/1", None)
        .await
        .expect("request should succeed");

    mock.assert_async().await;
    assert_eq!(resp.status, 200);
    assert!(resp.is_json());
    assert!(resp.text.is_empty());
    assert_eq!(
        resp.data,
        Some(Thing {
            id: 1,
            name: "widget".to_string()
        })
    );
}

#[tokio::test]
async fn test_text_success_keeps_raw_body() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_text("GET", "/health", 200, "ok").await;

    let resp = fixture
        .client()
        .get::<Value>("health", None)
        .await
        .expect("request should succeed");

    assert!(resp.data.is_none());
    assert_eq!(resp.text, "ok");
    assert_eq!(resp.header("content-type"), Some("text/plain"));
}

#[tokio::test]
async fn test_json_error_becomes_structured_failure() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("PUT", "/things/1", 409, r#"{"error_message":"DUPLICATE"}"#)
        .await;

    let failure = fixture
        .client()
        .put::<Value>("things/1", Some(RequestOptions::new().json(json!({"name": "w"}))))
        .await
        .expect_err("409 should fail");

    assert!(matches!(failure, Failure::Structured(_)));
    assert_eq!(failure.status(), Some(409));
    assert_eq!(failure.field("error_message"), Some(&json!("DUPLICATE")));
    assert_eq!(
        failure.to_value(),
        json!({"status": 409, "error_message": "DUPLICATE"})
    );
}

#[tokio::test]
async fn test_text_error_becomes_raw_response() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_text("DELETE", "/things/1", 500, "Internal Server Error")
        .await;

    let failure = fixture
        .client()
        .delete::<Value>("things/1", None)
        .await
        .expect_err("500 should fail");

    match failure {
        Failure::Response(resp) => {
            assert_eq!(resp.status, 500);
            assert_eq!(resp.text, "Internal Server Error");
            assert!(resp.url.ends_with("/things/1"));
        }
        other => panic!("expected raw response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_status_is_a_failure() {
    let fixture = MockServerFixture::new().await;
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/cached")
            .with_status(304)
            .create_async()
            .await
    };

    let failure = fixture
        .client()
        .get::<Value>("cached", None)
        .await
        .expect_err("304 is not ok");

    assert_eq!(failure.status(), Some(304));
}

#[tokio::test]
async fn test_malformed_json_success_is_a_parse_failure() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("GET", "/broken", 200, "{not json").await;

    let failure = fixture
        .client()
        .get::<Value>("broken", None)
        .await
        .expect_err("bad JSON should fail");

    assert!(matches!(failure, Failure::Parse(_)));
    assert!(failure.message().unwrap_or_default().starts_with("syntax error"));
}

#[tokio::test]
async fn test_post_sends_headers_query_and_json_body() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/things")
            .match_header("authorization", "Bearer secret")
            .match_header("x-trace", "abc")
            .match_header("content-type", "application/json")
            .match_query(Matcher::UrlEncoded("dry_run".into(), "true".into()))
            .match_body(Matcher::Json(json!({"name": "widget"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7,"name":"widget"}"#)
            .create_async()
            .await
    };

    let options = RequestOptions::new()
        .header("x-trace", "abc")
        .query("dry_run", "true")
        .bearer_auth("secret")
        .json(json!({"name": "widget"}));
    let resp = fixture
        .client()
        .post::<Thing>("things", Some(options))
        .await
        .expect("request should succeed");

    mock.assert_async().await;
    assert_eq!(resp.status, 201);
    assert_eq!(resp.into_data().map(|t| t.id), Some(7));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("GET", "/me")
            .match_header("x-api-key", "k1")
            .with_status(204)
            .create_async()
            .await
    };

    let client = fixture
        .builder()
        .default_header("x-api-key", "k1")
        .build()
        .expect("client should build");
    let resp = client.get::<Value>("me", None).await.expect("204 is ok");

    mock.assert_async().await;
    assert_eq!(resp.status, 204);
    assert!(resp.text.is_empty());
}

#[tokio::test]
async fn test_free_functions_use_default_client() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("GET", "/ping", 200, r#"{"pong":true}"#).await;

    let resp = fetchy::get::<Value>(&fixture.url("/ping"), None)
        .await
        .expect("request should succeed");

    assert_eq!(resp.data, Some(json!({"pong": true})));
}

#[tokio::test]
async fn test_connection_refused_is_a_network_failure() {
    crate::init_tracing();
    let client = FetchyBuilder::new().build().expect("client should build");

    let failure = client
        .get::<Value>("http://127.0.0.1:1/unreachable", None)
        .await
        .expect_err("nothing listens on port 1");

    assert_eq!(transport_origin(&failure), Some(TransportOrigin::Request));
    assert!(failure
        .message()
        .unwrap_or_default()
        .to_lowercase()
        .contains("network"));
}

#[tokio::test]
async fn test_timeout_is_a_network_failure() {
    crate::init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let hold = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let failure = fetchy::get::<Value>(
        &format!("http://{}/slow", addr),
        Some(RequestOptions::new().timeout(Duration::from_millis(100))),
    )
    .await
    .expect_err("request should time out");
    hold.abort();

    assert!(failure
        .message()
        .unwrap_or_default()
        .starts_with("network timeout"));
}

#[tokio::test]
async fn test_invalid_url_is_a_fetch_failure() {
    let failure = fetchy::get::<Value>("not a url", None)
        .await
        .expect_err("relative URL without a base");

    assert_eq!(transport_origin(&failure), Some(TransportOrigin::Request));
    assert!(failure.message().unwrap_or_default().starts_with("fetch failed"));
}

#[tokio::test]
async fn test_https_only_blocks_plain_http() {
    let fixture = MockServerFixture::new().await;
    let client = fixture
        .builder()
        .https_only(true)
        .build()
        .expect("client should build");

    let failure = client
        .get::<Value>("anything", None)
        .await
        .expect_err("plain http is refused");

    assert_eq!(transport_origin(&failure), Some(TransportOrigin::Security));
    assert!(failure.message().unwrap_or_default().contains("security"));
}

#[tokio::test]
async fn test_cancelled_token_aborts_request() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("GET", "/slow", 200, "{}").await;
    let token = CancellationToken::new();
    token.cancel();

    let failure = fixture
        .client()
        .get::<Value>("slow", Some(RequestOptions::new().abort_signal(token)))
        .await
        .expect_err("cancelled before sending");

    assert_eq!(transport_origin(&failure), Some(TransportOrigin::Aborted));
    assert!(failure.message().unwrap_or_default().contains("abort"));
}
