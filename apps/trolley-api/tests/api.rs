//! End-to-end tests of the HTTP gateway, driven through `tower::ServiceExt::oneshot`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use trolley_api::middleware::{RateLimitConfig, API_KEY_HEADER};
use trolley_api::{build_router, AppState};
use trolley_core::{CatalogPricing, FlatRatePricing, Money, PricingResolver};
use trolley_store::{BasketStore, ManualClock, StoreConfig};

const KEY: &str = "test-key";

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        TestApp::with(
            Arc::new(FlatRatePricing::new(Money::from_cents(10))),
            RateLimitConfig {
                limit: 1_000,
                window: Duration::from_secs(60),
            },
        )
    }

    fn with(pricing: Arc<dyn PricingResolver>, rate_limit: RateLimitConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let store = BasketStore::with_clock(
            StoreConfig::with_expiry_window(Duration::from_millis(1000)),
            pricing,
            clock.clone(),
        );
        let state = AppState::new(Arc::new(store), KEY, rate_limit);
        TestApp {
            router: build_router(state),
            clock,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(request(method, uri, body)).await
    }

    async fn create_cart(&self) -> String {
        let (status, body) = self.call(Method::POST, "/cart", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["cartId"].as_str().unwrap().to_string()
    }
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(API_KEY_HEADER, KEY);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn raw_json(method: Method, uri: &str, raw: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(API_KEY_HEADER, KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap()
}

fn error_body(code: &str, message: &str) -> Value {
    json!({ "error": code, "message": message })
}

// =============================================================================
// Happy paths
// =============================================================================

#[tokio::test]
async fn test_create_cart_returns_empty_basket() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::POST, "/cart", Some(json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["cartId"].is_string());
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totals"], json!({ "subtotal": 0, "itemCount": 0 }));
}

#[tokio::test]
async fn test_add_item_returns_accepted_with_totals() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/cart/{cart_id}/items"),
            Some(json!({ "sku": "ITEM_123", "quantity": 2 })),
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["cartId"], cart_id.as_str());
    assert_eq!(body["items"][0]["sku"], "ITEM_123");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["unitPrice"], 10);
    assert_eq!(body["items"][0]["totalPrice"], 20);
    assert_eq!(body["totals"], json!({ "subtotal": 20, "itemCount": 2 }));
}

#[tokio::test]
async fn test_same_sku_is_merged() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let uri = format!("/cart/{cart_id}/items");

    app.call(Method::POST, &uri, Some(json!({ "sku": "ITEM_1", "quantity": 2 })))
        .await;
    let (_, body) = app
        .call(Method::POST, &uri, Some(json!({ "sku": "ITEM_1", "quantity": 1 })))
        .await;

    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["totals"], json!({ "subtotal": 30, "itemCount": 3 }));
}

#[tokio::test]
async fn test_update_then_zero_removes_item() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let (_, body) = app
        .call(
            Method::POST,
            &format!("/cart/{cart_id}/items"),
            Some(json!({ "sku": "ITEM_2", "quantity": 1 })),
        )
        .await;
    let item_uri = format!(
        "/cart/{cart_id}/items/{}",
        body["items"][0]["itemId"].as_str().unwrap()
    );

    let (status, body) = app
        .call(Method::PUT, &item_uri, Some(json!({ "quantity": 3 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["totals"]["subtotal"], 30);

    let (status, body) = app
        .call(Method::PUT, &item_uri, Some(json!({ "quantity": 0 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totals"], json!({ "subtotal": 0, "itemCount": 0 }));
}

#[tokio::test]
async fn test_remove_item_and_get_cart() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let items_uri = format!("/cart/{cart_id}/items");
    app.call(Method::POST, &items_uri, Some(json!({ "sku": "A", "quantity": 1 })))
        .await;
    let (_, body) = app
        .call(Method::POST, &items_uri, Some(json!({ "sku": "B", "quantity": 4 })))
        .await;
    let a_id = body["items"][0]["itemId"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(Method::DELETE, &format!("{items_uri}/{a_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["sku"], "B");

    let (status, fetched) = app
        .call(Method::GET, &format!("/cart/{cart_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_health_needs_no_api_key() {
    let app = TestApp::new();
    app.create_cart().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "baskets": 1 }));
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_invalid_quantity_is_rejected_and_cart_unchanged() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let items_uri = format!("/cart/{cart_id}/items");
    app.call(Method::POST, &items_uri, Some(json!({ "sku": "ITEM_3", "quantity": 1 })))
        .await;

    let (status, body) = app
        .call(Method::POST, &items_uri, Some(json!({ "sku": "ITEM_3", "quantity": -1 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        error_body("INVALID_QUANTITY", "Invalid quantity. It must be greater than zero")
    );

    let (_, cart) = app.call(Method::GET, &format!("/cart/{cart_id}"), None).await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_invalid_quantity_wins_over_missing_cart() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/cart/unknown/items",
            Some(json!({ "sku": "ITEM_1", "quantity": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_QUANTITY");
}

#[tokio::test]
async fn test_unknown_cart_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/cart/unknown", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, error_body("CART_NOT_FOUND", "Cart not found or expired"));
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;

    let (status, body) = app
        .call(Method::DELETE, &format!("/cart/{cart_id}/items/nope"), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        error_body("ITEM_NOT_FOUND", "Item does not exists in the cart")
    );
}

#[tokio::test]
async fn test_expired_cart_is_not_found() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let uri = format!("/cart/{cart_id}");

    app.clock.advance(Duration::from_millis(800));
    assert_eq!(app.call(Method::GET, &uri, None).await.0, StatusCode::OK);

    app.clock.advance(Duration::from_millis(800));
    assert_eq!(app.call(Method::GET, &uri, None).await.0, StatusCode::OK);

    app.clock.advance(Duration::from_millis(1200));
    let (status, body) = app.call(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "CART_NOT_FOUND");
}

#[tokio::test]
async fn test_unpriceable_sku() {
    let catalog = CatalogPricing::new().with_price("KNOWN", Money::from_cents(25));
    let app = TestApp::with(
        Arc::new(catalog),
        RateLimitConfig {
            limit: 100,
            window: Duration::from_secs(60),
        },
    );
    let cart_id = app.create_cart().await;
    let uri = format!("/cart/{cart_id}/items");

    let (status, body) = app
        .call(Method::POST, &uri, Some(json!({ "sku": "MYSTERY", "quantity": 1 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, error_body("UNPRICEABLE_SKU", "Item cannot be priced"));

    let (status, body) = app
        .call(Method::POST, &uri, Some(json!({ "sku": "KNOWN", "quantity": 2 })))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["totals"]["subtotal"], 50);
}

#[tokio::test]
async fn test_malformed_and_unknown_payloads_are_invalid_requests() {
    let app = TestApp::new();
    let cart_id = app.create_cart().await;
    let items_uri = format!("/cart/{cart_id}/items");
    let expected = error_body("INVALID_REQUEST", "Invalid request payload");

    let cases = [
        raw_json(Method::POST, &items_uri, "{ not json"),
        raw_json(Method::POST, &items_uri, r#"{"sku":"A","quantity":1,"price":1}"#),
        raw_json(Method::POST, &items_uri, r#"{"sku":"A","quantity":"2"}"#),
        raw_json(Method::POST, &items_uri, r#"{"sku":"","quantity":1}"#),
        raw_json(Method::POST, &items_uri, r#"{"quantity":1}"#),
        raw_json(Method::POST, "/cart", r#"{"owner":"me"}"#),
        raw_json(Method::PUT, &format!("{items_uri}/x"), r#"{"quantity":1,"sku":"A"}"#),
    ];

    for request in cases {
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);
    }
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_missing_or_wrong_api_key_is_unauthorized() {
    let app = TestApp::new();
    let expected = error_body("UNAUTHORIZED", "Invalid API key");

    let missing = Request::builder()
        .method(Method::POST)
        .uri("/cart")
        .body(Body::empty())
        .unwrap();
    let wrong = Request::builder()
        .method(Method::POST)
        .uri("/cart")
        .header(API_KEY_HEADER, "nope")
        .body(Body::empty())
        .unwrap();

    for request in [missing, wrong] {
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let app = TestApp::with(
        Arc::new(FlatRatePricing::default()),
        RateLimitConfig {
            limit: 2,
            window: Duration::from_secs(60),
        },
    );
    let from = |ip: [u8; 4]| {
        let mut req = request(Method::POST, "/cart", None);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40_000))));
        req
    };

    assert_eq!(app.send(from([10, 0, 0, 1])).await.0, StatusCode::CREATED);
    assert_eq!(app.send(from([10, 0, 0, 1])).await.0, StatusCode::CREATED);

    let (status, body) = app.send(from([10, 0, 0, 1])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, error_body("RATE_LIMIT_EXCEEDED", "Too many requests"));

    assert_eq!(app.send(from([10, 0, 0, 2])).await.0, StatusCode::CREATED);
}

#[tokio::test]
async fn test_rate_limited_response_carries_retry_after() {
    let app = TestApp::with(
        Arc::new(FlatRatePricing::default()),
        RateLimitConfig {
            limit: 1,
            window: Duration::from_secs(30),
        },
    );
    assert_eq!(app.call(Method::GET, "/health", None).await.0, StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=30).contains(&retry_after));
}

#[tokio::test]
async fn test_rate_limit_runs_before_auth() {
    let app = TestApp::with(
        Arc::new(FlatRatePricing::default()),
        RateLimitConfig {
            limit: 1,
            window: Duration::from_secs(60),
        },
    );

    let unauthenticated = Request::builder()
        .method(Method::POST)
        .uri("/cart")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(unauthenticated).await.0, StatusCode::UNAUTHORIZED);

    // The rejected request still used up the budget.
    let (status, _) = app.call(Method::POST, "/cart", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
