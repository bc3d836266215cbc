//! The points-to-reward exchange sequencer.
//!
//! One exchange runs the linear sequence
//! `Validate → FetchCustomer → FetchPoints → CheckSufficiency →
//! IssueReward → DebitPoints → AppendHistory → Respond`.
//!
//! Shopify offers no transaction over these calls, so the sequencer
//! defends the two gaps itself:
//!
//! - Exchanges are serialized per customer inside the process, closing the
//!   read-modify-write race on the points balance between concurrent
//!   requests.
//! - When the points debit fails after a reward was issued, the reward is
//!   revoked best-effort (gift card disabled, price rule deleted) so the
//!   customer cannot keep both the points and the reward.
//!
//! A history-append failure after a completed debit is logged and
//! swallowed: the exchange already happened, and failing the request would
//! strand the customer with a reward and an error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, Utc};
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::config::{RewardKind, RewardsConfig};
use crate::clients::RestClient;
use crate::resources::{
    Customer, DiscountCode, GiftCard, PriceRule, PriceRuleAllocationMethod,
    PriceRuleCustomerSelection, PriceRuleTargetSelection, PriceRuleTargetType,
    PriceRuleValueType, ResourceError,
};
use crate::rewards::code::{reward_code, DISCOUNT_CODE_LEN, GIFT_CARD_CODE_LEN};
use crate::rewards::points::{HistoryEntry, PointsStore, RewardsSnapshot};

/// Internal note stamped on issued gift cards.
const GIFT_CARD_NOTE: &str = "Đổi điểm thưởng Helios Rewards";

/// A customer identifier as the storefront sends it: a number, or a string
/// that may carry a `gid://shopify/Customer/...` prefix.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CustomerId {
    /// Plain numeric ID.
    Number(u64),
    /// String form, normalized by stripping non-digits.
    Text(String),
}

impl CustomerId {
    /// Normalizes to the numeric Admin API ID, or `None` when no digits
    /// remain.
    #[must_use]
    pub fn normalize(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => {
                let digits: String = s.chars().filter(char::is_ascii_digit).collect();
                digits.parse().ok()
            }
        }
    }
}

/// Request body for the exchange endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExchangeRequest {
    /// The redeeming customer.
    pub customer_id: Option<CustomerId>,
    /// Requested reward value in VND; must match a configured tier.
    pub discount_value: Option<i64>,
}

/// A successful exchange, as returned to the storefront.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExchangeOutcome {
    /// The issued code.
    pub discount_code: String,
    /// Reward value in VND.
    pub discount_value: i64,
    /// Points debited.
    pub points_used: i64,
    /// Balance after the debit.
    pub remaining_points: i64,
}

/// Errors from the exchange sequence.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// No customer ID in the request.
    #[error("customer_id is required")]
    MissingCustomerId,

    /// The customer ID contained no digits.
    #[error("Invalid customer_id format")]
    InvalidCustomerId,

    /// The requested value is not a configured tier.
    #[error("Invalid discount_value")]
    InvalidDiscountValue {
        /// The values the program accepts.
        valid_values: Vec<i64>,
    },

    /// The program deadline has passed.
    #[error("Chương trình đổi điểm đã kết thúc vào ngày 03/03/2026")]
    ProgramEnded,

    /// The customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound,

    /// The customer's balance does not cover the tier.
    #[error("Không đủ điểm")]
    InsufficientPoints {
        /// The balance that was read.
        current_points: i64,
        /// The tier's cost.
        points_required: i64,
    },

    /// The access token lacks the `write_gift_cards` scope.
    #[error("Missing write_gift_cards permission")]
    MissingScope,

    /// Creating the reward artifact failed; nothing was debited.
    #[error("Failed to create reward")]
    RewardIssue(#[source] ResourceError),

    /// The points debit failed after issuance; the reward was revoked.
    #[error("Failed to update points; the issued reward was revoked")]
    DebitFailed(#[source] ResourceError),

    /// Any other upstream failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// The reward artifact created by `IssueReward`, with enough context to
/// revoke it if the debit fails.
enum IssuedReward {
    GiftCard { card: GiftCard, code: String },
    DiscountCode { rule: PriceRule, code: String },
}

impl IssuedReward {
    fn code(&self) -> &str {
        match self {
            Self::GiftCard { code, .. } | Self::DiscountCode { code, .. } => code,
        }
    }

    const fn action(&self) -> &'static str {
        match self {
            Self::GiftCard { .. } => "Đổi điểm lấy Gift Card",
            Self::DiscountCode { .. } => "Đổi điểm lấy mã giảm giá",
        }
    }

    async fn revoke(&self, client: &RestClient) -> Result<(), ResourceError> {
        match self {
            Self::GiftCard { card, .. } => card.disable(client).await.map(|_| ()),
            Self::DiscountCode { rule, .. } => rule.delete(client).await,
        }
    }
}

/// Runs points-to-reward exchanges.
#[derive(Debug)]
pub struct ExchangeService {
    client: Arc<RestClient>,
    points: PointsStore,
    rewards: RewardsConfig,
    /// Per-customer serialization of the read-modify-write sequence.
    locks: Mutex<HashMap<u64, Arc<tokio::sync::Mutex<()>>>>,
}

impl ExchangeService {
    /// Creates a new service over the given client and program
    /// configuration.
    #[must_use]
    pub fn new(client: Arc<RestClient>, rewards: RewardsConfig) -> Self {
        Self {
            points: PointsStore::new(Arc::clone(&client)),
            client,
            rewards,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Executes one exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] at whichever step fails; no points are
    /// debited unless a reward was issued first.
    pub async fn exchange(
        &self,
        request: &ExchangeRequest,
    ) -> Result<ExchangeOutcome, ExchangeError> {
        // Validate
        let (customer_id, discount_value, points_required) =
            validate_request(request, &self.rewards)?;

        let _guard = self.customer_lock(customer_id).await;

        // FetchCustomer
        Customer::find(&self.client, customer_id)
            .await
            .map_err(|err| match err {
                ResourceError::NotFound { .. } => ExchangeError::CustomerNotFound,
                other => ExchangeError::Resource(other),
            })?;

        // FetchPoints
        let current_points = self.points.balance(customer_id).await?;

        // CheckSufficiency
        if current_points < points_required {
            return Err(ExchangeError::InsufficientPoints {
                current_points,
                points_required,
            });
        }

        // IssueReward
        let reward = self.issue_reward(customer_id, discount_value).await?;
        let code = reward.code().to_string();

        // DebitPoints, revoking the reward when the write fails
        let remaining_points = current_points - points_required;
        if let Err(err) = self.points.set_balance(customer_id, remaining_points).await {
            tracing::error!(
                customer_id,
                %err,
                "points debit failed after reward issuance, revoking reward"
            );
            if let Err(revoke_err) = reward.revoke(&self.client).await {
                tracing::error!(
                    customer_id,
                    code = %code,
                    %revoke_err,
                    "failed to revoke issued reward; manual repair required"
                );
            }
            return Err(ExchangeError::DebitFailed(err));
        }

        // AppendHistory, best effort
        let entry = HistoryEntry {
            date: Utc::now(),
            action: reward.action().to_string(),
            points_used: points_required,
            discount_code: code.clone(),
            amount_vnd: discount_value,
        };
        if let Err(err) = self.points.append_history(customer_id, entry).await {
            tracing::warn!(customer_id, %err, "failed to append reward history");
        }

        tracing::info!(
            customer_id,
            points_used = points_required,
            code = %code,
            "points exchanged for reward"
        );

        Ok(ExchangeOutcome {
            discount_code: code,
            discount_value,
            points_used: points_required,
            remaining_points,
        })
    }

    /// Returns the customer's points balance and reward history.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::CustomerNotFound`] on a 404, or the wrapped
    /// upstream failure.
    pub async fn history(&self, raw_customer_id: &str) -> Result<(u64, RewardsSnapshot), ExchangeError> {
        let customer_id = CustomerId::Text(raw_customer_id.to_string())
            .normalize()
            .ok_or(ExchangeError::InvalidCustomerId)?;

        let snapshot = self
            .points
            .snapshot(customer_id)
            .await
            .map_err(|err| match err {
                ResourceError::NotFound { .. } => ExchangeError::CustomerNotFound,
                other => ExchangeError::Resource(other),
            })?;

        Ok((customer_id, snapshot))
    }

    async fn customer_lock(&self, customer_id: u64) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                locks
                    .entry(customer_id)
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    async fn issue_reward(
        &self,
        customer_id: u64,
        discount_value: i64,
    ) -> Result<IssuedReward, ExchangeError> {
        match self.rewards.reward_kind {
            RewardKind::GiftCard => {
                let generated = reward_code(GIFT_CARD_CODE_LEN);
                let card = GiftCard {
                    code: Some(generated.clone()),
                    initial_value: Some(discount_value.to_string()),
                    customer_id: Some(customer_id),
                    note: Some(GIFT_CARD_NOTE.to_string()),
                    expires_on: Some(self.rewards.gift_card_expires_on),
                    ..Default::default()
                };

                match card.create(&self.client).await {
                    Ok(created) => {
                        // Shopify may normalize the code; prefer what it stored
                        let code = created.code.clone().unwrap_or(generated);
                        Ok(IssuedReward::GiftCard {
                            card: created,
                            code,
                        })
                    }
                    Err(err) if err.upstream_status() == Some(403) => {
                        Err(ExchangeError::MissingScope)
                    }
                    Err(err) => Err(ExchangeError::RewardIssue(err)),
                }
            }
            RewardKind::DiscountCode => {
                let code = reward_code(DISCOUNT_CODE_LEN);
                let now = Utc::now();
                let rule = PriceRule {
                    title: Some(code.clone()),
                    value_type: Some(PriceRuleValueType::FixedAmount),
                    value: Some(format!("-{discount_value}.0")),
                    customer_selection: Some(PriceRuleCustomerSelection::Prerequisite),
                    prerequisite_customer_ids: Some(vec![customer_id]),
                    target_type: Some(PriceRuleTargetType::LineItem),
                    target_selection: Some(PriceRuleTargetSelection::All),
                    allocation_method: Some(PriceRuleAllocationMethod::Across),
                    once_per_customer: Some(true),
                    usage_limit: Some(1),
                    starts_at: Some(now),
                    ends_at: Some(now + Duration::days(self.rewards.discount_code_validity_days)),
                    ..Default::default()
                };

                let created_rule = rule
                    .create(&self.client)
                    .await
                    .map_err(ExchangeError::RewardIssue)?;

                let discount_code = DiscountCode {
                    code: Some(code.clone()),
                    ..Default::default()
                };
                let rule_id = created_rule.id.ok_or(ExchangeError::RewardIssue(
                    ResourceError::UnexpectedBody {
                        resource: "PriceRule",
                        key: "id",
                    },
                ))?;

                match discount_code.create_for_rule(&self.client, rule_id).await {
                    Ok(created) => {
                        let code = created.code.clone().unwrap_or(code);
                        Ok(IssuedReward::DiscountCode {
                            rule: created_rule,
                            code,
                        })
                    }
                    Err(err) => {
                        // The rule without a code is unusable; clean it up
                        if let Err(delete_err) = created_rule.delete(&self.client).await {
                            tracing::warn!(
                                rule_id,
                                %delete_err,
                                "failed to delete orphaned price rule"
                            );
                        }
                        Err(ExchangeError::RewardIssue(err))
                    }
                }
            }
        }
    }
}

/// Validates an exchange request against the program configuration.
///
/// Returns the normalized customer ID, the requested value, and the points
/// cost.
fn validate_request(
    request: &ExchangeRequest,
    rewards: &RewardsConfig,
) -> Result<(u64, i64, i64), ExchangeError> {
    let customer_id = request
        .customer_id
        .as_ref()
        .ok_or(ExchangeError::MissingCustomerId)?
        .normalize()
        .ok_or(ExchangeError::InvalidCustomerId)?;

    let discount_value = request
        .discount_value
        .ok_or_else(|| ExchangeError::InvalidDiscountValue {
            valid_values: rewards.valid_values(),
        })?;
    let points_required =
        rewards
            .points_required(discount_value)
            .ok_or_else(|| ExchangeError::InvalidDiscountValue {
                valid_values: rewards.valid_values(),
            })?;

    if Utc::now() > rewards.program_deadline {
        return Err(ExchangeError::ProgramEnded);
    }

    Ok((customer_id, discount_value, points_required))
}
