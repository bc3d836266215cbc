//! Reward code generation.

use rand::Rng;

/// Prefix stamped on every code the exchange issues.
pub const REWARD_CODE_PREFIX: &str = "RWD-";

/// Random suffix length for gift card codes.
pub const GIFT_CARD_CODE_LEN: usize = 12;

/// Random suffix length for discount codes.
pub const DISCOUNT_CODE_LEN: usize = 8;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a `RWD-` prefixed code with `random_len` random characters
/// drawn from `[A-Z0-9]`.
#[must_use]
pub fn reward_code(random_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..random_len)
        .map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())]))
        .collect();
    format!("{REWARD_CODE_PREFIX}{suffix}")
}
