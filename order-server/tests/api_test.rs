//! In-process API tests
//!
//! Drives the full router (middleware included) without a network stack,
//! with an in-memory database per test.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use order_server::api::build_app;
use order_server::auth::JwtConfig;
use order_server::core::{Config, ServerState};
use order_server::db::Store;
use order_server::db::models::ProductCreate;

fn test_config() -> Config {
    Config {
        work_dir: ".".into(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-key-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "order-server".into(),
            audience: "order-clients".into(),
        },
        environment: "test".into(),
        request_timeout_ms: 30_000,
    }
}

fn test_state() -> ServerState {
    let store = Store::open_in_memory().expect("in-memory store");
    ServerState::with_store(test_config(), store)
}

fn test_app(state: &ServerState) -> Router {
    build_app(state).with_state(state.clone())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json_body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn register(app: &Router, username: &str, balance: f64) {
    let (status, _) = send(
        app,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({
            "username": username,
            "password": "password-123",
            "wallet_balance": balance,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": "password-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token in response").to_string()
}

fn seed_products(state: &ServerState) {
    for (id, name, price) in [
        ("p1", "Coffee", Decimal::from(10)),
        ("p2", "Cake", Decimal::from(15)),
        ("p3", "Sandwich", Decimal::from(30)),
    ] {
        state
            .products()
            .create(ProductCreate {
                id: Some(id.to_string()),
                name: name.to_string(),
                price,
            })
            .unwrap();
    }
}

async fn place_order(app: &Router, token: &str, product_ids: &[&str]) -> u64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/orders",
        Some(token),
        Some(json!({"product_ids": product_ids})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["order_id"].as_u64().expect("order id")
}

// ============================================================================
// Auth & accounts
// ============================================================================

#[tokio::test]
async fn health_is_public() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = send(&app, "GET", "/api/accounts/balance", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    let (status, _) = send(
        &app,
        "GET",
        "/api/accounts/balance",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_then_login_then_me() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user_alike() {
    let state = test_state();
    let app = test_app(&state);
    register(&app, "alice", 0.0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "alice", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let wrong_password_message = body["message"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "password-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // Same message either way, no username enumeration
    assert_eq!(body["message"], wrong_password_message);
}

#[tokio::test]
async fn registration_is_validated() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({"username": "ab", "password": "password-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (status, _) = send(
        &app,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({"username": "alice", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({"username": "alice", "password": "password-123", "wallet_balance": -5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts/register",
        None,
        Some(json!({"username": "alice", "password": "password-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn balance_is_token_scoped_and_signed_deltas_apply() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 100.0).await;
    register(&app, "bob", 7.0).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (status, body) = send(&app, "GET", "/api/accounts/balance", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["current_balance"].as_f64(), Some(100.0));

    // bob's token never sees alice's wallet
    let (_, body) = send(&app, "GET", "/api/accounts/balance", Some(&bob), None).await;
    assert_eq!(body["data"]["username"], "bob");
    assert_eq!(body["data"]["current_balance"].as_f64(), Some(7.0));

    // deposit then withdraw
    let (status, _) = send(
        &app,
        "PUT",
        "/api/accounts/balance",
        Some(&alice),
        Some(json!({"username": "alice", "amount": 25.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/accounts/balance",
        Some(&alice),
        Some(json!({"username": "alice", "amount": -5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/accounts/balance", Some(&alice), None).await;
    assert_eq!(body["data"]["current_balance"].as_f64(), Some(120.0));
}

#[tokio::test]
async fn balance_update_failures_are_not_distinguished() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 10.0).await;
    let alice = login(&app, "alice").await;

    // overdraw
    let (status, body) = send(
        &app,
        "PUT",
        "/api/accounts/balance",
        Some(&alice),
        Some(json!({"username": "alice", "amount": -1000.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let overdraw_message = body["message"].clone();

    // unknown account looks exactly the same
    let (status, body) = send(
        &app,
        "PUT",
        "/api/accounts/balance",
        Some(&alice),
        Some(json!({"username": "nobody", "amount": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], overdraw_message);

    // failed attempts did not touch the wallet
    let (_, body) = send(&app, "GET", "/api/accounts/balance", Some(&alice), None).await;
    assert_eq!(body["data"]["current_balance"].as_f64(), Some(10.0));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn product_catalog_roundtrip() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    let token = login(&app, "alice").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({"id": "p1", "name": "Coffee", "price": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], "p1");

    let (status, body) = send(&app, "GET", "/api/products/p1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Coffee");

    let (status, body) = send(&app, "GET", "/api/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    let (status, _) = send(&app, "GET", "/api/products/missing", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn order_lifecycle_over_http() {
    let state = test_state();
    seed_products(&state);
    let app = test_app(&state);

    register(&app, "alice", 100.0).await;
    register(&app, "bob", 100.0).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let order_id = place_order(&app, &alice, &["p1", "p2"]).await;

    let uri = format!("/api/orders/{}", order_id);
    let (status, body) = send(&app, "GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["owner"], "alice");
    assert_eq!(body["total"].as_f64(), Some(25.0));
    assert_eq!(body["kind"], "simple");

    // non-owner cannot confirm
    let confirm_uri = format!("/api/orders/{}/confirm", order_id);
    let (status, body) = send(&app, "POST", &confirm_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    // owner confirms
    let (status, _) = send(&app, "POST", &confirm_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    // double confirm conflicts, even for the owner
    let (status, body) = send(&app, "POST", &confirm_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // the conflict also wins over ownership for non-owners
    let (status, _) = send(&app, "POST", &confirm_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // non-owner cannot cancel
    let (status, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // owner cancels the confirmed order
    let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    // cancelled is terminal
    let (status, _) = send(&app, "POST", &confirm_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn placing_an_order_with_unknown_product_is_404() {
    let state = test_state();
    seed_products(&state);
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    let alice = login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&alice),
        Some(json!({"product_ids": ["p1", "missing"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_order_is_404() {
    let state = test_state();
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    let alice = login(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/api/orders/42", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn compound_order_over_http() {
    let state = test_state();
    seed_products(&state);
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    register(&app, "bob", 0.0).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let alices = place_order(&app, &alice, &["p1", "p2"]).await; // 25
    let bobs = place_order(&app, &bob, &["p3"]).await; // 30

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders/compound/confirm",
        Some(&alice),
        Some(json!({"orders": [
            {"username": "alice", "order_id": alices},
            {"username": "bob", "order_id": bobs},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let compound_id = body["data"]["order_id"].as_u64().unwrap();

    let uri = format!("/api/orders/{}", compound_id);
    let (status, body) = send(&app, "GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Confirmed");
    assert_eq!(body["owner"], "alice");
    assert_eq!(body["kind"], "compound");
    assert_eq!(body["total"].as_f64(), Some(55.0));

    // members keep their own status
    let (_, body) = send(&app, "GET", &format!("/api/orders/{}", alices), Some(&alice), None).await;
    assert_eq!(body["status"], "Pending");
}

#[tokio::test]
async fn compound_member_checks_surface_over_http() {
    let state = test_state();
    seed_products(&state);
    let app = test_app(&state);

    register(&app, "alice", 0.0).await;
    register(&app, "bob", 0.0).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let alices = place_order(&app, &alice, &["p1"]).await;
    let bobs = place_order(&app, &bob, &["p3"]).await;

    // slot declares the wrong owner
    let (status, _) = send(
        &app,
        "POST",
        "/api/orders/compound/confirm",
        Some(&alice),
        Some(json!({"orders": [{"username": "alice", "order_id": bobs}]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // already-confirmed member conflicts
    let confirm_uri = format!("/api/orders/{}/confirm", bobs);
    send(&app, "POST", &confirm_uri, Some(&bob), None).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/orders/compound/confirm",
        Some(&alice),
        Some(json!({"orders": [
            {"username": "alice", "order_id": alices},
            {"username": "bob", "order_id": bobs},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // unknown member
    let (status, _) = send(
        &app,
        "POST",
        "/api/orders/compound/confirm",
        Some(&alice),
        Some(json!({"orders": [{"username": "alice", "order_id": 4242}]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // empty member list
    let (status, _) = send(
        &app,
        "POST",
        "/api/orders/compound/confirm",
        Some(&alice),
        Some(json!({"orders": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
