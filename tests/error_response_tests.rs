//! Integration tests for error response classification.
//!
//! These tests verify that error statuses are classified into the right
//! kind, that messages are built from the response body, and that
//! credentials never appear in error output.

use datadog_api::{
    ApiKey, ApplicationKey, Client, DatadogConfig, ErrorKind, HttpError, Middleware,
    RequestOptions, ResponseError, ResponseStage,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "9775a026f1ca7d1c6c5af9d94d9595a4";
const APPLICATION_KEY: &str = "87ce4a24b5553d2e482ea8a8500e71b8ad4554ff";

/// Creates a client pointed at the mock server with both credentials set.
fn create_test_client(server: &MockServer) -> Client {
    let mut config = DatadogConfig::from_lookup(|_| None);
    config
        .set_api_endpoint(format!("{}/api/v1", server.uri()))
        .set_api_key(Some(ApiKey::new(API_KEY)))
        .set_application_key(Some(ApplicationKey::new(APPLICATION_KEY)));
    Client::new(config)
}

/// Serves `status` for `GET monitor` and returns the classified error.
async fn response_error(status: u16, body: Option<serde_json::Value>) -> ResponseError {
    let server = MockServer::start().await;
    let template = match body {
        Some(body) => ResponseTemplate::new(status).set_body_json(body),
        None => ResponseTemplate::new(status),
    };
    Mock::given(method("GET"))
        .and(path("/api/v1/monitor"))
        .respond_with(template)
        .mount(&server)
        .await;

    let mut client = create_test_client(&server);
    match client.get("monitor", RequestOptions::new()).await {
        Err(HttpError::Response(e)) => e,
        other => panic!("Expected a response error for {status}, got {other:?}"),
    }
}

#[tokio::test]
async fn test_named_statuses_map_to_named_kinds() {
    let cases = [
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
        (409, ErrorKind::Conflict),
        (422, ErrorKind::UnprocessableEntity),
        (500, ErrorKind::InternalServerError),
        (501, ErrorKind::NotImplemented),
        (502, ErrorKind::BadGateway),
        (503, ErrorKind::ServiceUnavailable),
    ];

    for (status, kind) in cases {
        let error = response_error(status, None).await;
        assert_eq!(error.kind, kind, "Wrong kind for {status}");
        assert_eq!(error.status, status);
    }
}

#[tokio::test]
async fn test_other_statuses_map_to_family_kinds() {
    let error = response_error(429, None).await;
    assert_eq!(error.kind, ErrorKind::ClientError);
    assert!(error.kind.is_client_error());

    let error = response_error(504, None).await;
    assert_eq!(error.kind, ErrorKind::ServerError);
    assert!(error.kind.is_server_error());
}

#[tokio::test]
async fn test_validation_failure_message() {
    let error = response_error(
        422,
        Some(json!({
            "message": "Validation Failed",
            "errors": [
                {"resource": "Issue", "field": "title", "code": "missing_field"}
            ],
            "documentation_url": "https://docs.datadoghq.com/api/"
        })),
    )
    .await;

    let message = error.to_string();
    assert!(message.starts_with("GET "));
    assert!(message.contains(": 422 - Validation Failed"));
    assert!(message.contains("\nError summary:\n"));
    assert!(message.contains("  resource: Issue"));
    assert!(message.contains("  field: title"));
    assert!(message.contains("  code: missing_field"));
    assert!(message.ends_with(" // See: https://docs.datadoghq.com/api/"));
}

#[tokio::test]
async fn test_error_field_is_included() {
    let error = response_error(403, Some(json!({"error": "Forbidden"}))).await;

    assert!(error.to_string().ends_with(": 403 - Error: Forbidden"));
    assert_eq!(error.error.as_deref(), Some("Forbidden"));
}

#[tokio::test]
async fn test_empty_body_yields_status_only_message() {
    let error = response_error(500, None).await;

    assert!(error.to_string().ends_with(": 500 - "));
    assert!(error.server_message.is_none());
    assert!(error.errors.is_empty());
}

#[tokio::test]
async fn test_array_body_yields_no_message_fields() {
    let error = response_error(400, Some(json!(["bad", "request"]))).await;

    assert_eq!(error.kind, ErrorKind::ClientError);
    assert!(error.to_string().ends_with(": 400 - "));
}

#[tokio::test]
async fn test_error_message_redacts_credentials() {
    let error = response_error(401, Some(json!({"errors": ["Unauthorized"]}))).await;
    let message = error.to_string();

    assert!(!message.contains(API_KEY));
    assert!(!message.contains(APPLICATION_KEY));
    assert!(message.contains("api_key=(redacted)"));
    assert!(!error.url.contains(API_KEY));
}

#[tokio::test]
async fn test_plain_text_body_is_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/monitor"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let mut client = create_test_client(&server);
    let error = client
        .get("monitor", RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(ErrorKind::BadGateway));
    assert!(error.to_string().ends_with(": 502 - upstream unavailable"));
}

#[tokio::test]
async fn test_success_statuses_are_not_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/monitor"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"accepted": true})))
        .mount(&server)
        .await;

    let mut client = create_test_client(&server);
    let data = client.get("monitor", RequestOptions::new()).await.unwrap();

    assert_eq!(data, json!({"accepted": true}));
}

#[tokio::test]
async fn test_middleware_without_raise_error_returns_error_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/monitor/0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not found"]})))
        .mount(&server)
        .await;

    let mut client = create_test_client(&server);
    client.configure(|c| {
        c.set_middleware(Middleware::new([ResponseStage::Logger]));
    });

    let data = client.get("monitor/0", RequestOptions::new()).await.unwrap();
    assert_eq!(data, json!({"errors": ["Not found"]}));
    assert_eq!(client.last_response().unwrap().status, 404);
}
