// Path: crates/tx/src/deploy.rs
//! Transactions for deploying and funding the contract.

use crate::factory::{make_app_create, make_payment, AppCreateSpec};
use crate::group::SignedGroup;
use koa_crypto::Account;
use koa_types::app::{Address, StateSchema, SuggestedParams};
use koa_types::error::BuildError;
use koa_types::keys::{self, CONTRACT_FUNDING, GLOBAL_NUM_BYTE_SLICES, GLOBAL_NUM_UINTS};

/// Builds the signed application-creation transaction.
///
/// The single creation argument is the reign period in seconds, big-endian.
pub fn build_create_app(
    params: &SuggestedParams,
    creator: &Account,
    approval_program: Vec<u8>,
    clear_program: Vec<u8>,
    reign_period_secs: u64,
) -> Result<SignedGroup, BuildError> {
    let spec = AppCreateSpec {
        approval_program,
        clear_program,
        global_schema: StateSchema {
            num_byte_slices: GLOBAL_NUM_BYTE_SLICES,
            num_uints: GLOBAL_NUM_UINTS,
        },
        local_schema: StateSchema::default(),
        args: vec![reign_period_secs.to_be_bytes().to_vec()],
    };
    let txn = make_app_create(params, creator.address(), spec, keys::note("create_app"))?;
    SignedGroup::sign(vec![txn], creator)
}

/// Builds the signed payment that seeds the contract account's minimum balance.
pub fn build_fund_app(
    params: &SuggestedParams,
    funder: &Account,
    app_id: u64,
) -> Result<SignedGroup, BuildError> {
    let txn = make_payment(
        params,
        funder.address(),
        Address::for_application(app_id),
        CONTRACT_FUNDING,
        keys::note("fund_app"),
    )?;
    SignedGroup::sign(vec![txn], funder)
}
