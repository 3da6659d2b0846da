//! API integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use serial_test::serial;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribe_api::{create_router, ApiConfig, AppState};
use scribe_firestore::{FirestoreClient, FirestoreConfig, RetryConfig, TokenSource};

fn test_firestore(base_url: String) -> FirestoreClient {
    let config = FirestoreConfig {
        project_id: "test-project".to_string(),
        database_id: "(default)".to_string(),
        base_url,
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    };
    FirestoreClient::new(config, TokenSource::Fixed("owner".to_string())).unwrap()
}

fn test_state(database_uri: String) -> AppState {
    AppState {
        config: ApiConfig {
            environment: Some("test".to_string()),
            ..ApiConfig::default()
        },
        firestore: Arc::new(test_firestore(database_uri)),
    }
}

/// Router wired to a database endpoint nothing listens on; fine for every
/// route that never touches the database.
fn test_app() -> axum::Router {
    create_router(test_state("http://127.0.0.1:1/v1/documents".to_string()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn blogs_root_reports_the_original_path() {
    let response = test_app()
        .oneshot(Request::builder().uri("/blogs/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Received a request on /blogs/");
}

#[tokio::test]
async fn blogs_nested_route_reports_both_params() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/blogs/42/notAParam/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("42"));
    assert!(message.contains("99"));
}

#[tokio::test]
async fn blogs_post_echoes_the_json_body() {
    let payload = json!({"postAuthorID": "abc", "title": "hi"});
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blogs/7")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().ends_with("ID of 7"));
    assert_eq!(body["bodyContent"], payload);
}

#[tokio::test]
async fn blogs_post_without_body_echoes_an_empty_object() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blogs/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bodyContent"], json!({}));
}

#[tokio::test]
async fn blogs_post_accepts_url_encoded_bodies() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blogs/7")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("postAuthorID=abc&title=hi"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bodyContent"], json!({"postAuthorID": "abc", "title": "hi"}));
}

#[tokio::test]
async fn users_router_is_mounted_with_the_same_semantics() {
    let response = test_app()
        .oneshot(Request::builder().uri("/users/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Received a request on /users/");

    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/users/melissa")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("melissa"));
}

#[tokio::test]
#[serial]
async fn homepage_greeting_follows_node_env_at_request_time() {
    let app = test_app();

    std::env::set_var("NODE_ENV", "staging");
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("staging"));

    std::env::set_var("NODE_ENV", "production");
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("production"));

    std::env::remove_var("NODE_ENV");
}

#[tokio::test]
async fn cors_allows_listed_origins() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/blogs/")
                .header(header::ORIGIN, "http://localhost:3000")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn cors_refuses_unlisted_origins() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/blogs/")
                .header(header::ORIGIN, "http://localhost:3001")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Standard CORS rejection: no allow-origin header, no custom error body.
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn security_headers_are_applied_everywhere() {
    // Regular route
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(
        response.headers().get("content-security-policy").unwrap(),
        "default-src 'self'"
    );
    assert_eq!(
        response
            .headers()
            .get("x-permitted-cross-domain-policies")
            .unwrap(),
        "none"
    );

    // Unknown route: the 404 still carries the headers
    let response = test_app()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");

    // CORS-refused preflight: still wrapped by the security layer
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/blogs/")
                .header(header::ORIGIN, "https://evil.example")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn ready_endpoint_probes_the_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_health/_check"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = create_router(test_state(server.uri()));
    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn ready_endpoint_reports_an_unreachable_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_health/_check"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = create_router(test_state(server.uri()));
    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["detail"].is_string());
}

#[tokio::test]
#[serial]
async fn test_environment_skips_the_startup_probe() {
    let server = MockServer::start().await;

    std::env::remove_var("FIREBASE_ADMIN_PROJECT_ID");
    std::env::remove_var("FIREBASE_ADMIN_PRIVATE_KEY");
    std::env::remove_var("FIREBASE_ADMIN_CLIENT_EMAIL");
    std::env::set_var(
        "DATABASE_URI",
        format!("{}/v1/projects/p/databases/(default)/documents", server.uri()),
    );

    let config = ApiConfig {
        environment: Some("test".to_string()),
        ..ApiConfig::default()
    };
    let _state = AppState::new(config).await.unwrap();

    // Give a would-be probe time to fire before asserting it never did.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 0);

    std::env::remove_var("DATABASE_URI");
}

#[tokio::test]
#[serial]
async fn non_test_environment_fires_the_startup_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/v1/projects/p/databases/(default)/documents/_health/_check",
        ))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    std::env::remove_var("FIREBASE_ADMIN_PROJECT_ID");
    std::env::remove_var("FIREBASE_ADMIN_PRIVATE_KEY");
    std::env::remove_var("FIREBASE_ADMIN_CLIENT_EMAIL");
    std::env::set_var(
        "DATABASE_URI",
        format!("{}/v1/projects/p/databases/(default)/documents", server.uri()),
    );

    let config = ApiConfig {
        environment: Some("development".to_string()),
        ..ApiConfig::default()
    };
    let _state = AppState::new(config).await.unwrap();

    // The probe runs on its own task; poll until it lands.
    let mut seen = 0;
    for _ in 0..50 {
        seen = server.received_requests().await.unwrap().len();
        if seen > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(seen > 0, "startup probe never reached the database endpoint");

    std::env::remove_var("DATABASE_URI");
}

#[tokio::test]
#[serial]
async fn partial_credentials_fail_assembly() {
    std::env::set_var("FIREBASE_ADMIN_PROJECT_ID", "my-project");
    std::env::remove_var("FIREBASE_ADMIN_PRIVATE_KEY");
    std::env::remove_var("FIREBASE_ADMIN_CLIENT_EMAIL");

    let result = AppState::new(ApiConfig {
        environment: Some("test".to_string()),
        ..ApiConfig::default()
    })
    .await;
    assert!(result.is_err());

    std::env::remove_var("FIREBASE_ADMIN_PROJECT_ID");
}
