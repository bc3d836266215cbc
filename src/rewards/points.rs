//! Metafield-backed points balance and reward history.
//!
//! Shopify is the system of record: the balance lives in the
//! `rewards.points` customer metafield (`number_integer`), the audit trail
//! in `rewards.history` (`json`, newest first, capped at 100 entries). This
//! module only computes transitions and issues the read/write calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::RestClient;
use crate::resources::{Metafield, ResourceError};

/// Namespace holding all rewards metafields.
pub const REWARDS_NAMESPACE: &str = "rewards";
/// Key of the integer points balance.
pub const POINTS_KEY: &str = "points";
/// Key of the JSON history list.
pub const HISTORY_KEY: &str = "history";
/// Oldest entries beyond this count are dropped on append.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// One audit entry of the reward history, newest first in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// When the exchange happened.
    pub date: DateTime<Utc>,
    /// Human-readable description of the action.
    pub action: String,
    /// Points debited.
    pub points_used: i64,
    /// The issued code.
    pub discount_code: String,
    /// Reward value in VND.
    pub amount_vnd: i64,
}

/// Combined view of a customer's rewards state, for the history endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RewardsSnapshot {
    /// Current points balance (0 when the metafield is absent).
    pub points: i64,
    /// Reward history, newest first.
    pub history: Vec<HistoryEntry>,
}

/// Reads and writes the rewards metafields of customers.
#[derive(Debug, Clone)]
pub struct PointsStore {
    client: Arc<RestClient>,
}

impl PointsStore {
    /// Creates a new store over the given client.
    #[must_use]
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// Returns the customer's current points balance.
    ///
    /// An absent `rewards.points` metafield reads as a zero balance, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the metafield listing itself fails.
    pub async fn balance(&self, customer_id: u64) -> Result<i64, ResourceError> {
        let metafields = Metafield::list_for_customer(
            &self.client,
            customer_id,
            Some(REWARDS_NAMESPACE),
            Some(POINTS_KEY),
        )
        .await?;

        Ok(Self::points_from(&metafields))
    }

    /// Writes the customer's points balance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the write fails; the caller decides
    /// whether to compensate.
    pub async fn set_balance(&self, customer_id: u64, points: i64) -> Result<(), ResourceError> {
        Metafield::number_integer(REWARDS_NAMESPACE, POINTS_KEY, points)
            .create_for_customer(&self.client, customer_id)
            .await
            .map(|_| ())
    }

    /// Returns the customer's reward history, newest first.
    ///
    /// Malformed or absent history reads as an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the metafield listing itself fails.
    pub async fn history(&self, customer_id: u64) -> Result<Vec<HistoryEntry>, ResourceError> {
        let metafields = Metafield::list_for_customer(
            &self.client,
            customer_id,
            Some(REWARDS_NAMESPACE),
            Some(HISTORY_KEY),
        )
        .await?;

        Ok(Self::history_from(&metafields))
    }

    /// Prepends an entry to the customer's history, truncating to the
    /// newest [`MAX_HISTORY_ENTRIES`].
    ///
    /// A failed read of the existing list is treated as an empty list so an
    /// exchange can still record its own entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the write fails.
    pub async fn append_history(
        &self,
        customer_id: u64,
        entry: HistoryEntry,
    ) -> Result<(), ResourceError> {
        let mut history = self.history(customer_id).await.unwrap_or_default();

        history.insert(0, entry);
        history.truncate(MAX_HISTORY_ENTRIES);

        let value = serde_json::to_value(&history).unwrap_or_else(|_| serde_json::json!([]));
        Metafield::json(REWARDS_NAMESPACE, HISTORY_KEY, &value)
            .create_for_customer(&self.client, customer_id)
            .await
            .map(|_| ())
    }

    /// Fetches the balance and history with a single metafield listing.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the customer doesn't exist,
    /// or the wrapped HTTP error otherwise.
    pub async fn snapshot(&self, customer_id: u64) -> Result<RewardsSnapshot, ResourceError> {
        let metafields = Metafield::list_for_customer(
            &self.client,
            customer_id,
            Some(REWARDS_NAMESPACE),
            None,
        )
        .await?;

        Ok(RewardsSnapshot {
            points: Self::points_from(&metafields),
            history: Self::history_from(&metafields),
        })
    }

    fn points_from(metafields: &[Metafield]) -> i64 {
        metafields
            .iter()
            .find(|m| m.key.as_deref() == Some(POINTS_KEY))
            .and_then(Metafield::integer_value)
            .unwrap_or(0)
    }

    fn history_from(metafields: &[Metafield]) -> Vec<HistoryEntry> {
        metafields
            .iter()
            .find(|m| m.key.as_deref() == Some(HISTORY_KEY))
            .and_then(|m| m.value.as_deref())
            .and_then(|value| serde_json::from_str(value).ok())
            .unwrap_or_default()
    }
}
