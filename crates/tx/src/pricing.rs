// Path: crates/tx/src/pricing.rs
//! The economic split of a coronation.
//!
//! Every function here is pure over one state snapshot and one captured `now`.
//! Percentages round up and the compensation absorbs the remainder, so
//! `admin_fee_amount + reward_amount + comp_amount == pay_amount` always holds.

use chrono::{DateTime, Utc};
use koa_types::app::ContractState;
use koa_types::error::BuildError;
use serde::Serialize;

/// True once the current reign's protection window has elapsed.
pub fn reign_ended(state: &ContractState, now: DateTime<Utc>) -> bool {
    now >= state.end_of_reign
}

/// The price the challenger pays.
pub fn pay_amount(state: &ContractState, now: DateTime<Utc>) -> u64 {
    if reign_ended(state, now) {
        state.init_price
    } else {
        state.king_price
    }
}

/// The admin's cut, rounded up.
pub fn admin_fee_amount(state: &ContractState, now: DateTime<Utc>) -> Result<u64, BuildError> {
    percent_ceil(pay_amount(state, now), state.admin_fee)
}

/// The dethroned king's cut, rounded up. Zero when there is no king.
pub fn reward_amount(state: &ContractState, now: DateTime<Utc>) -> Result<u64, BuildError> {
    if state.king_is_set() {
        percent_ceil(pay_amount(state, now), state.reward_multiplier)
    } else {
        Ok(0)
    }
}

/// What remains for the contract account after the admin and reward cuts.
pub fn comp_amount(state: &ContractState, now: DateTime<Utc>) -> Result<u64, BuildError> {
    Pricing::compute(state, now).map(|p| p.comp_amount)
}

/// `ceil(amount * percent / 100)` without floating point.
fn percent_ceil(amount: u64, percent: u64) -> Result<u64, BuildError> {
    let scaled = u128::from(amount) * u128::from(percent);
    u64::try_from(scaled.div_ceil(100)).map_err(|_| {
        BuildError::Pricing(format!("{}% of {} overflows", percent, amount))
    })
}

/// The complete split for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pricing {
    /// Whether the protection window had elapsed at `now`.
    pub reign_ended: bool,
    /// Whether a king held the throne in the snapshot.
    pub king_is_set: bool,
    /// Total the challenger pays.
    pub pay_amount: u64,
    /// Paid to the admin.
    pub admin_fee_amount: u64,
    /// Paid to the dethroned king.
    pub reward_amount: u64,
    /// Paid to the contract account.
    pub comp_amount: u64,
}

impl Pricing {
    /// Computes the split from one snapshot and one timestamp.
    pub fn compute(state: &ContractState, now: DateTime<Utc>) -> Result<Self, BuildError> {
        let pay_amount = pay_amount(state, now);
        let admin_fee_amount = admin_fee_amount(state, now)?;
        let reward_amount = reward_amount(state, now)?;
        let comp_amount = pay_amount
            .checked_sub(admin_fee_amount)
            .and_then(|rest| rest.checked_sub(reward_amount))
            .ok_or_else(|| {
                BuildError::Pricing(format!(
                    "admin fee {} and reward {} exceed the price {}",
                    admin_fee_amount, reward_amount, pay_amount
                ))
            })?;

        Ok(Self {
            reign_ended: reign_ended(state, now),
            king_is_set: state.king_is_set(),
            pay_amount,
            admin_fee_amount,
            reward_amount,
            comp_amount,
        })
    }

    /// True when the call must reference the dethroned king and carry the
    /// inner-payment fee budget.
    pub fn needs_expired_king_settlement(&self) -> bool {
        self.reign_ended && self.king_is_set
    }
}
