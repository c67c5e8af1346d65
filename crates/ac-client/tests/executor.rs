//! End-to-end tests for the request pipeline against a mock HTTP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use activecampaign_client::{
    Configuration, ErrorKind, HttpTransport, Request, RequestExecutor, RequestMethod,
    RequestOptions, Transport, TransportResult,
};
use futures::future::BoxFuture;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(max_retries: u32) -> Configuration {
    Configuration::builder("test-token", "https://acme.api-us1.com")
        .with_max_retries(max_retries)
        .with_retry_delay(Duration::from_millis(10))
        .build()
        .unwrap()
}

fn executor(server: &MockServer, max_retries: u32) -> RequestExecutor {
    let config = config(max_retries);
    let transport = HttpTransport::new(&config).unwrap().with_base_url(server.uri());
    RequestExecutor::with_transport(config, transport)
}

/// Counts the round trips handed to the wrapped transport.
#[derive(Debug)]
struct CountingTransport {
    inner: HttpTransport,
    calls: Arc<AtomicUsize>,
}

impl Transport for CountingTransport {
    fn send<'a>(
        &'a self,
        config: &'a Configuration,
        request: &'a Request,
    ) -> BoxFuture<'a, TransportResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.send(config, request)
    }
}

#[tokio::test]
async fn test_get_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/contacts/1"))
        .and(header("Api-Token", "test-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contact": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server, 1).get("/api/3/contacts/1").await.unwrap();
    assert_eq!(value, json!({"contact": {"id": 1}}));
}

#[tokio::test]
async fn test_query_and_body_sent() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/3/deals/7"))
        .and(query_param("force", "1"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"deal": {"title": "Renewal"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deal": {"id": "7"}})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .query("force", "1")
        .json(&json!({"deal": {"title": "Renewal"}}))
        .unwrap();
    let value = executor(&server, 0)
        .execute(RequestMethod::Put, "/api/3/deals/7", options)
        .await
        .unwrap();
    assert_eq!(value["deal"]["id"], "7");
}

#[tokio::test]
async fn test_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/3/contacts"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"errors": {"email": ["is invalid"]}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = executor(&server, 3)
        .post_json("/api/3/contacts", &json!({"contact": {"email": "bad"}}))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.status(), 422);
    assert_eq!(err.validation_errors(), Some(&json!({"email": ["is invalid"]})));
    assert_eq!(err.context()["error_type"], "ClientError");
}

#[tokio::test]
async fn test_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/contacts"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let err = executor(&server, 0)
        .get("/api/3/contacts")
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.kind, ErrorKind::RateLimit { retry_after: Some(30) });
    assert_eq!(err.retry_after(), Some(30));
}

#[tokio::test]
async fn test_retry_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/deals"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/3/deals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deals": []})))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server, 1).get("/api/3/deals").await.unwrap();
    assert_eq!(value, json!({"deals": []}));
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(3)
        .mount(&server)
        .await;

    let err = executor(&server, 2)
        .get("/api/3/accounts")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Generic);
    assert_eq!(err.status(), 500);
    assert_eq!(err.message(), "boom");
    assert_eq!(err.context()["attempts"], 3);
    assert_eq!(err.context()["error_type"], "ServerError");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/contacts/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "No Result found for Subscriber with id 999"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = executor(&server, 3)
        .get("/api/3/contacts/999")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.message(), "No Result found for Subscriber with id 999");
}

#[tokio::test]
async fn test_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/contacts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = executor(&server, 3)
        .get("/api/3/contacts")
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/3/contacts/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server, 0).delete("/api/3/contacts/1").await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_connection_failure_attempts() {
    // Bind then drop a listener so the port refuses connections.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = config(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = CountingTransport {
        inner: HttpTransport::new(&config)
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}")),
        calls: calls.clone(),
    };
    let executor = RequestExecutor::with_transport(config, transport);

    let err = executor.get("/api/3/contacts").await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.status(), 0);
    assert_eq!(err.kind, ErrorKind::Generic);
    assert!(err.message().starts_with("Connection error"));
    assert_eq!(err.context()["status_code"], 0);
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let server_accepted = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            server_accepted.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 404 Not Found\r\n\
                      Content-Type: application/json\r\n\
                      Content-Length: 100\r\n\
                      \r\n\
                      {\"message\":\"No",
                )
                .await;
        }
    });

    let config = config(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = CountingTransport {
        inner: HttpTransport::new(&config)
            .unwrap()
            .with_base_url(format!("http://{addr}")),
        calls: calls.clone(),
    };
    let executor = RequestExecutor::with_transport(config, transport);

    let err = executor.get("/api/3/contacts/1").await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.status(), 404);
    assert_eq!(err.context()["status_code"], 404);
    assert_eq!(err.context()["error_type"], "BodyError");
    assert_eq!(err.context()["attempts"], 1);
}

#[tokio::test]
async fn test_unbuildable_request_fails_once() {
    let config = config(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = CountingTransport {
        inner: HttpTransport::new(&config).unwrap().with_base_url("not a url"),
        calls: calls.clone(),
    };
    let executor = RequestExecutor::with_transport(config, transport);

    let err = executor.get("/api/3/contacts").await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn test_token_rotation_applies_to_next_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/3/users/me"))
        .and(header("Api-Token", "rotated-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": "1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut executor = executor(&server, 0);
    executor
        .update_configuration(|config| config.set_api_token("rotated-token"))
        .unwrap();

    let value = executor.get("/api/3/users/me").await.unwrap();
    assert_eq!(value["user"]["id"], "1");
}
