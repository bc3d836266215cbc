//! Integration tests for the points-to-reward exchange against a mock
//! Admin API.
//!
//! The central invariants: an exchange succeeds iff the balance covers the
//! tier, the stored balance afterwards is exactly `balance - cost`, and no
//! balance write happens when any step before the debit fails.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use storefront_gateway::clients::RestClient;
use storefront_gateway::rewards::{CustomerId, ExchangeRequest, ExchangeService};
use storefront_gateway::{
    AccessToken, ExchangeError, GatewayConfig, HostUrl, RetryPolicy, RewardKind, RewardsConfig,
    ShopDomain,
};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMER_PATH: &str = "/admin/api/2024-10/customers/777.json";
const METAFIELDS_PATH: &str = "/admin/api/2024-10/customers/777/metafields.json";
const GIFT_CARDS_PATH: &str = "/admin/api/2024-10/gift_cards.json";
const PRICE_RULES_PATH: &str = "/admin/api/2024-10/price_rules.json";

fn active_rewards(kind: RewardKind) -> RewardsConfig {
    RewardsConfig {
        program_deadline: Utc::now() + chrono::Duration::days(30),
        reward_kind: kind,
        ..RewardsConfig::default()
    }
}

fn service(server_uri: &str, rewards: RewardsConfig) -> ExchangeService {
    let config = GatewayConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new("test-token").unwrap())
        .api_host(HostUrl::new(server_uri).unwrap())
        .retry(RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
        })
        .rewards(rewards.clone())
        .build()
        .unwrap();
    ExchangeService::new(Arc::new(RestClient::new(&config)), rewards)
}

fn request(discount_value: i64) -> ExchangeRequest {
    ExchangeRequest {
        customer_id: Some(CustomerId::Number(777)),
        discount_value: Some(discount_value),
    }
}

async fn mount_customer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CUSTOMER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": 777, "email": "bob@example.com"}
        })))
        .mount(server)
        .await;
}

async fn mount_points_balance(server: &MockServer, points: i64) {
    Mock::given(method("GET"))
        .and(path(METAFIELDS_PATH))
        .and(query_param("namespace", "rewards"))
        .and(query_param("key", "points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metafields": [{
                "id": 1,
                "namespace": "rewards",
                "key": "points",
                "value": points.to_string(),
                "type": "number_integer"
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_empty_history(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(METAFIELDS_PATH))
        .and(query_param("namespace", "rewards"))
        .and(query_param("key", "history"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"metafields": []})),
        )
        .mount(server)
        .await;
}

fn created_gift_card() -> serde_json::Value {
    serde_json::json!({
        "gift_card": {
            "id": 99,
            "code": "RWD-ISSUED123456",
            "initial_value": "50000",
            "customer_id": 777
        }
    })
}

#[tokio::test]
async fn test_successful_exchange_debits_exact_remainder() {
    let server = MockServer::start().await;
    mount_customer(&server).await;
    mount_points_balance(&server, 70_000).await;
    mount_empty_history(&server).await;

    Mock::given(method("POST"))
        .and(path(GIFT_CARDS_PATH))
        .and(body_partial_json(serde_json::json!({
            "gift_card": {"initial_value": "50000", "customer_id": 777}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_gift_card()))
        .expect(1)
        .mount(&server)
        .await;

    // The debit must write exactly 70000 - 50000
    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .and(body_partial_json(serde_json::json!({
            "metafield": {"key": "points", "value": "20000", "type": "number_integer"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "metafield": {"id": 1, "key": "points", "value": "20000"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // History write carries the issued code, newest first
    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .and(body_partial_json(serde_json::json!({
            "metafield": {"key": "history", "type": "json"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "metafield": {"id": 2, "key": "history"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap();

    assert_eq!(outcome.discount_code, "RWD-ISSUED123456");
    assert_eq!(outcome.discount_value, 50_000);
    assert_eq!(outcome.points_used, 50_000);
    assert_eq!(outcome.remaining_points, 20_000);
}

#[tokio::test]
async fn test_insufficient_points_fails_without_any_write() {
    let server = MockServer::start().await;
    mount_customer(&server).await;
    mount_points_balance(&server, 40_000).await;

    // Neither a reward nor a metafield write may happen
    Mock::given(method("POST"))
        .and(path(GIFT_CARDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_gift_card()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let error = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap_err();

    match error {
        ExchangeError::InsufficientPoints {
            current_points,
            points_required,
        } => {
            assert_eq!(current_points, 40_000);
            assert_eq!(points_required, 50_000);
        }
        other => panic!("expected InsufficientPoints, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_points_metafield_reads_as_zero_balance() {
    let server = MockServer::start().await;
    mount_customer(&server).await;

    Mock::given(method("GET"))
        .and(path(METAFIELDS_PATH))
        .and(query_param("key", "points"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"metafields": []})),
        )
        .mount(&server)
        .await;

    let error = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ExchangeError::InsufficientPoints { current_points: 0, .. }
    ));
}

#[tokio::test]
async fn test_unknown_customer_is_terminal_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CUSTOMER_PATH))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"errors": "Not Found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap_err();

    assert!(matches!(error, ExchangeError::CustomerNotFound));
}

#[tokio::test]
async fn test_gift_card_403_surfaces_missing_scope_and_skips_debit() {
    let server = MockServer::start().await;
    mount_customer(&server).await;
    mount_points_balance(&server, 70_000).await;

    Mock::given(method("POST"))
        .and(path(GIFT_CARDS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errors": "[API] This action requires merchant approval for write_gift_cards scope."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let error = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap_err();

    assert!(matches!(error, ExchangeError::MissingScope));
}

#[tokio::test]
async fn test_debit_failure_revokes_the_issued_gift_card() {
    let server = MockServer::start().await;
    mount_customer(&server).await;
    mount_points_balance(&server, 70_000).await;

    Mock::given(method("POST"))
        .and(path(GIFT_CARDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_gift_card()))
        .expect(1)
        .mount(&server)
        .await;

    // The points write is rejected outright (non-retryable 422)
    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .and(body_partial_json(serde_json::json!({
            "metafield": {"key": "points"}
        })))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "errors": {"value": ["is invalid"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Compensation: the issued card must be disabled
    Mock::given(method("POST"))
        .and(path("/admin/api/2024-10/gift_cards/99/disable.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "gift_card": {"id": 99, "disabled_at": "2026-08-06T00:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .exchange(&request(50_000))
        .await
        .unwrap_err();

    assert!(matches!(error, ExchangeError::DebitFailed(_)));
}

#[tokio::test]
async fn test_discount_code_variant_creates_rule_and_code() {
    let server = MockServer::start().await;
    mount_customer(&server).await;
    mount_points_balance(&server, 200_000).await;
    mount_empty_history(&server).await;

    Mock::given(method("POST"))
        .and(path(PRICE_RULES_PATH))
        .and(body_partial_json(serde_json::json!({
            "price_rule": {
                "value_type": "fixed_amount",
                "value": "-100000.0",
                "customer_selection": "prerequisite",
                "prerequisite_customer_ids": [777],
                "once_per_customer": true,
                "usage_limit": 1
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "price_rule": {"id": 4242, "title": "RWD-TESTRULE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin/api/2024-10/price_rules/4242/discount_codes.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "discount_code": {"id": 1, "price_rule_id": 4242, "code": "RWD-CODE9999"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(METAFIELDS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "metafield": {"id": 1}
        })))
        .mount(&server)
        .await;

    let outcome = service(&server.uri(), active_rewards(RewardKind::DiscountCode))
        .exchange(&request(100_000))
        .await
        .unwrap();

    assert_eq!(outcome.discount_code, "RWD-CODE9999");
    assert_eq!(outcome.remaining_points, 100_000);
}

#[tokio::test]
async fn test_history_snapshot_reports_points_and_entries() {
    let server = MockServer::start().await;

    let history = serde_json::json!([{
        "date": "2025-02-01T00:00:00Z",
        "action": "Đổi điểm lấy Gift Card",
        "points_used": 50_000,
        "discount_code": "RWD-PAST",
        "amount_vnd": 50_000
    }]);
    Mock::given(method("GET"))
        .and(path(METAFIELDS_PATH))
        .and(query_param("namespace", "rewards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metafields": [
                {"id": 1, "namespace": "rewards", "key": "points", "value": "20000", "type": "number_integer"},
                {"id": 2, "namespace": "rewards", "key": "history", "value": history.to_string(), "type": "json"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (customer_id, snapshot) = service(&server.uri(), active_rewards(RewardKind::GiftCard))
        .history("gid://shopify/Customer/777")
        .await
        .unwrap();

    assert_eq!(customer_id, 777);
    assert_eq!(snapshot.points, 20_000);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].discount_code, "RWD-PAST");
}
