//! Router-level tests: request decoding, error bodies, and one full pass
//! through each endpoint against a mock Admin API.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use storefront_gateway::server::{router, AppState};
use storefront_gateway::{
    AccessToken, GatewayConfig, HostUrl, RetryPolicy, RewardsConfig, ShopDomain,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server_uri: &str) -> axum::Router {
    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new("test-token").unwrap())
        .api_host(HostUrl::new(server_uri).unwrap())
        .retry(RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
        })
        .rewards(RewardsConfig {
            program_deadline: Utc::now() + chrono::Duration::days(30),
            ..RewardsConfig::default()
        })
        .build()
        .unwrap();
    router(AppState::new(config))
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_config_shape_without_the_token() {
    let server = MockServer::start().await;
    let response = app(&server.uri()).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["config"]["shop"], "test-shop.myshopify.com");
    assert_eq!(body["config"]["token_length"], 10);
    assert!(body.to_string().find("test-token").is_none());
}

#[tokio::test]
async fn test_test_config_reports_upstream_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/shop.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shop": {"id": 1, "name": "Test Store", "domain": "shop.example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(get("/test-config"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["shop_name"], "Test Store");
}

#[tokio::test]
async fn test_create_draft_order_rejects_empty_cart_with_400() {
    let server = MockServer::start().await;
    let response = app(&server.uri())
        .oneshot(json_post(
            "/create-draft-order",
            serde_json::json!({"items": []}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No items provided");
}

#[tokio::test]
async fn test_create_draft_order_names_offending_item() {
    let server = MockServer::start().await;
    let response = app(&server.uri())
        .oneshot(json_post(
            "/create-draft-order",
            serde_json::json!({"items": [
                {"variant_id": 1, "quantity": 1, "price": 100, "discount_percent": 0},
                {"variant_id": 2, "quantity": 0, "price": 100, "discount_percent": 0}
            ]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Item 1: quantity must be greater than 0");
}

#[tokio::test]
async fn test_create_draft_order_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/api/2024-10/draft_orders.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "draft_order": {
                "id": 994118539,
                "invoice_url": "https://test-shop.myshopify.com/548380009/invoices/994118539/abc",
                "total_price": "180.00"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(json_post(
            "/create-draft-order",
            serde_json::json!({
                "customer_id": 777,
                "items": [{"variant_id": 1, "quantity": 2, "price": 100, "discount_percent": 10}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["draft_order_id"], 994_118_539);
    assert!(body["invoice_url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn test_exchange_rejects_unknown_tier_listing_valid_values() {
    let server = MockServer::start().await;
    let response = app(&server.uri())
        .oneshot(json_post(
            "/rewards/exchange",
            serde_json::json!({"customer_id": 777, "discount_value": 75000}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid discount_value");
    assert_eq!(
        body["valid_values"],
        serde_json::json!([50_000, 100_000, 200_000, 500_000])
    );
}

#[tokio::test]
async fn test_exchange_insufficiency_end_to_end_reports_both_values() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/customers/777.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": 777}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/customers/777/metafields.json"))
        .and(query_param("key", "points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metafields": [{"id": 1, "key": "points", "value": "40000", "type": "number_integer"}]
        })))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(json_post(
            "/rewards/exchange",
            serde_json::json!({"customer_id": 777, "discount_value": 50000}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Không đủ điểm");
    assert_eq!(body["current_points"], 40_000);
    assert_eq!(body["points_required"], 50_000);
}

#[tokio::test]
async fn test_rewards_history_requires_customer_id() {
    let server = MockServer::start().await;
    let response = app(&server.uri())
        .oneshot(get("/rewards/history"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "customer_id is required");
}

#[tokio::test]
async fn test_rewards_history_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/customers/777/metafields.json"))
        .and(query_param("namespace", "rewards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metafields": [
                {"id": 1, "key": "points", "value": "20000", "type": "number_integer"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(get("/rewards/history?customer_id=777"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["customer_id"], "777");
    assert_eq!(body["points"], 20_000);
    assert_eq!(body["history"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_customer_history_is_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/customers/777/metafields.json"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"errors": "Not Found"})),
        )
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(get("/rewards/history?customer_id=777"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/create-draft-order")
        .header(header::ORIGIN, "https://storefront.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(&server.uri()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_unknown_method_is_405() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/create-draft-order")
        .body(Body::empty())
        .unwrap();

    let response = app(&server.uri()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
