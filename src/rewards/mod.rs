//! The loyalty rewards program: points, history, and the exchange sequence.
//!
//! Points and history live in Shopify customer metafields
//! (`rewards.points`, `rewards.history`); the gateway owns no durable
//! state. [`ExchangeService`] runs the exchange sequence; [`PointsStore`]
//! handles the metafield reads and writes.

pub mod code;
mod exchange;
mod points;

pub use code::{reward_code, DISCOUNT_CODE_LEN, GIFT_CARD_CODE_LEN, REWARD_CODE_PREFIX};
pub use exchange::{
    CustomerId, ExchangeError, ExchangeOutcome, ExchangeRequest, ExchangeService,
};
pub use points::{
    HistoryEntry, PointsStore, RewardsSnapshot, HISTORY_KEY, MAX_HISTORY_ENTRIES, POINTS_KEY,
    REWARDS_NAMESPACE,
};
