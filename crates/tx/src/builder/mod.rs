// Path: crates/tx/src/builder/mod.rs
//! Builds the signed coronation group.
//!
//! Member order is fixed:
//! 1. `claim_throne` call from the challenger,
//! 2. admin-fee payment to the admin,
//! 3. compensation payment to the contract account,
//! 4. reward payment to the current king, only when a king exists.
//!
//! When the reign has ended and a king exists, the call references the king's
//! account and carries a flat fee of twice the minimum, funding the contract's
//! inner payment to the dethroned king.

use crate::factory::{make_app_call, make_payment};
use crate::group::SignedGroup;
use crate::pricing::Pricing;
use chrono::{DateTime, Utc};
use koa_crypto::Account;
use koa_types::app::{Address, ContractState, SuggestedParams};
use koa_types::error::BuildError;
use koa_types::keys::{self, ADMIN_FEE_NOTE, CLAIM_THRONE_METHOD, COMP_NOTE, REWARD_NOTE};

/// Overrides applied on top of the computed split.
///
/// Used only to construct deliberately invalid groups in negative tests; the
/// contract must reject any group built with an override that changes the split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOverride {
    /// Replaces the admin-fee amount.
    pub admin_fee: Option<u64>,
    /// Replaces the compensation amount.
    pub comp: Option<u64>,
    /// Replaces the reward amount.
    pub reward: Option<u64>,
    /// Replaces the admin-fee receiver.
    pub admin_receiver: Option<Address>,
    /// Replaces the reward receiver.
    pub reward_receiver: Option<Address>,
}

/// Everything needed for one coronation attempt. Built fresh and consumed once.
#[derive(Debug, Clone)]
pub struct BecomeKingRequest<'a> {
    /// Network parameters for every member.
    pub params: SuggestedParams,
    /// The snapshot the split is computed from.
    pub state: ContractState,
    /// The signing challenger.
    pub challenger: &'a Account,
    /// Free-text message carried in the call's note.
    pub message: String,
    /// The contract's application id.
    pub app_id: u64,
    /// Negative-testing override. `None` in normal use.
    pub split_override: Option<SplitOverride>,
}

/// A signed coronation group together with the split it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoronationGroup {
    /// The split computed for the captured `now`.
    pub pricing: Pricing,
    /// The signed group.
    pub group: SignedGroup,
}

/// Builds and signs the coronation group for one captured `now`.
pub fn build_become_king_group(
    req: &BecomeKingRequest<'_>,
    now: DateTime<Utc>,
) -> Result<CoronationGroup, BuildError> {
    let pricing = Pricing::compute(&req.state, now)?;
    let overrides = req.split_override.clone().unwrap_or_default();
    let sender = req.challenger.address();
    let contract = Address::for_application(req.app_id);

    let (call_params, accounts) = match (pricing.needs_expired_king_settlement(), req.state.king) {
        (true, Some(king)) => {
            let fee = req
                .params
                .min_fee_or_default()
                .checked_mul(2)
                .ok_or_else(|| BuildError::Invalid("minimum fee overflows".to_string()))?;
            (req.params.with_flat_fee(fee), vec![king])
        }
        _ => (req.params.clone(), Vec::new()),
    };

    let mut txns = Vec::with_capacity(4);
    txns.push(make_app_call(
        &call_params,
        sender,
        req.app_id,
        vec![CLAIM_THRONE_METHOD.to_vec()],
        accounts,
        keys::note(&req.message),
    )?);
    txns.push(make_payment(
        &req.params,
        sender,
        overrides.admin_receiver.unwrap_or(req.state.admin),
        overrides.admin_fee.unwrap_or(pricing.admin_fee_amount),
        keys::note(ADMIN_FEE_NOTE),
    )?);
    txns.push(make_payment(
        &req.params,
        sender,
        contract,
        overrides.comp.unwrap_or(pricing.comp_amount),
        keys::note(COMP_NOTE),
    )?);
    if let Some(king) = req.state.king {
        txns.push(make_payment(
            &req.params,
            sender,
            overrides.reward_receiver.unwrap_or(king),
            overrides.reward.unwrap_or(pricing.reward_amount),
            keys::note(REWARD_NOTE),
        )?);
    }

    if req.split_override.is_some() {
        tracing::warn!(target: "builder", "building coronation group with a split override");
    }
    tracing::info!(
        target: "builder",
        app_id = req.app_id,
        pay = pricing.pay_amount,
        admin_fee = pricing.admin_fee_amount,
        reward = pricing.reward_amount,
        comp = pricing.comp_amount,
        reign_ended = pricing.reign_ended,
        members = txns.len(),
        "built coronation group"
    );

    let group = SignedGroup::sign(txns, req.challenger)?;
    Ok(CoronationGroup { pricing, group })
}

#[cfg(test)]
mod tests;
