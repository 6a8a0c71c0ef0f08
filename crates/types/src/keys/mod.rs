// Path: crates/types/src/keys/mod.rs
//! Defines constants for the contract's global-state keys and call conventions.

/// Global-state key holding the current king's raw public key (empty when vacant).
pub const KING_KEY: &[u8] = b"king";
/// Global-state key holding the admin's raw public key.
pub const ADMIN_KEY: &[u8] = b"admin";
/// Global-state key holding the end of the current reign, in unix seconds.
pub const END_OF_REIGN_KEY: &[u8] = b"end_of_reign_timestamp";
/// Global-state key holding the price to dethrone an active king.
pub const KING_PRICE_KEY: &[u8] = b"king_price";
/// Global-state key holding the price to claim a vacant or expired throne.
pub const INIT_PRICE_KEY: &[u8] = b"init_price";
/// Global-state key holding the percentage routed to the dethroned king.
pub const REWARD_MULTIPLIER_KEY: &[u8] = b"reward_multiplier";
/// Global-state key holding the percentage routed to the admin.
pub const ADMIN_FEE_KEY: &[u8] = b"admin_fee";
/// Global-state key holding the protection window, in seconds.
pub const REIGN_PERIOD_KEY: &[u8] = b"reign_period";

/// The application argument selecting the coronation method.
pub const CLAIM_THRONE_METHOD: &[u8] = b"claim_throne";

/// Prefix shared by every transaction note the client writes.
pub const NOTE_PREFIX: &str = "kingOfAlgo/v1:u";
/// Note suffix for the admin-fee payment.
pub const ADMIN_FEE_NOTE: &str = "admin_fee_tx";
/// Note suffix for the compensation payment.
pub const COMP_NOTE: &str = "comp_tx";
/// Note suffix for the reward payment.
pub const REWARD_NOTE: &str = "reward_tx";

/// Formats a free-text message into the client's note convention.
pub fn note(text: &str) -> Vec<u8> {
    format!("{}{}", NOTE_PREFIX, text).into_bytes()
}

/// Number of `uint` slots in the contract's global schema.
pub const GLOBAL_NUM_UINTS: u64 = 6;
/// Number of byte-slice slots in the contract's global schema.
pub const GLOBAL_NUM_BYTE_SLICES: u64 = 2;
/// Initial funding sent to the contract account right after creation.
pub const CONTRACT_FUNDING: u64 = 100_000;
/// Price the contract starts at, and resets to after an expired reign.
pub const DEFAULT_PRICE: u64 = 100_000;
