// Path: crates/tx/src/factory.rs
//! Constructors for the individual transactions of a group.
//!
//! Each constructor fills the common header from [`SuggestedParams`], validates
//! the result and applies the fee rule: a flat fee is used verbatim, otherwise
//! the fee is `fee_per_byte * estimated_size`, floored at the network minimum.

use koa_types::app::{
    Address, OnCompletion, StateSchema, SuggestedParams, Transaction, TxType, MAX_APP_ACCOUNTS,
    MAX_APP_ARGS, MAX_APP_TOTAL_ARG_LEN, MAX_NOTE_BYTES,
};
use koa_types::error::BuildError;
use serde_bytes::ByteBuf;

/// Builds a payment.
pub fn make_payment(
    params: &SuggestedParams,
    sender: Address,
    receiver: Address,
    amount: u64,
    note: Vec<u8>,
) -> Result<Transaction, BuildError> {
    let txn = Transaction {
        tx_type: TxType::Payment,
        sender,
        receiver,
        amount,
        note,
        ..header(params)
    };
    finalize(txn, params)
}

/// Builds a no-op call to an existing application.
pub fn make_app_call(
    params: &SuggestedParams,
    sender: Address,
    app_id: u64,
    args: Vec<Vec<u8>>,
    accounts: Vec<Address>,
    note: Vec<u8>,
) -> Result<Transaction, BuildError> {
    if app_id == 0 {
        return Err(BuildError::Invalid(
            "application call needs a non-zero app id".to_string(),
        ));
    }
    let txn = Transaction {
        tx_type: TxType::ApplicationCall,
        sender,
        app_id,
        on_completion: OnCompletion::NoOp,
        app_args: args.into_iter().map(ByteBuf::from).collect(),
        accounts,
        note,
        ..header(params)
    };
    finalize(txn, params)
}

/// Programs and schemas for a new application.
#[derive(Debug, Clone, Default)]
pub struct AppCreateSpec {
    /// Compiled approval program.
    pub approval_program: Vec<u8>,
    /// Compiled clear-state program.
    pub clear_program: Vec<u8>,
    /// Global state schema.
    pub global_schema: StateSchema,
    /// Local state schema.
    pub local_schema: StateSchema,
    /// Creation arguments.
    pub args: Vec<Vec<u8>>,
}

/// Builds an application-creation call.
pub fn make_app_create(
    params: &SuggestedParams,
    sender: Address,
    spec: AppCreateSpec,
    note: Vec<u8>,
) -> Result<Transaction, BuildError> {
    if spec.approval_program.is_empty() || spec.clear_program.is_empty() {
        return Err(BuildError::Invalid(
            "application creation needs both programs".to_string(),
        ));
    }
    let txn = Transaction {
        tx_type: TxType::ApplicationCall,
        sender,
        on_completion: OnCompletion::NoOp,
        approval_program: spec.approval_program,
        clear_program: spec.clear_program,
        global_schema: spec.global_schema,
        local_schema: spec.local_schema,
        app_args: spec.args.into_iter().map(ByteBuf::from).collect(),
        note,
        ..header(params)
    };
    finalize(txn, params)
}

fn header(params: &SuggestedParams) -> Transaction {
    Transaction {
        fee: params.fee,
        first_valid: params.first_valid,
        last_valid: params.last_valid,
        genesis_id: params.genesis_id.clone(),
        genesis_hash: params.genesis_hash,
        ..Default::default()
    }
}

fn finalize(mut txn: Transaction, params: &SuggestedParams) -> Result<Transaction, BuildError> {
    validate(&txn)?;
    apply_fee(&mut txn, params)?;
    Ok(txn)
}

/// Checks the limits the network enforces on a single transaction.
pub fn validate(txn: &Transaction) -> Result<(), BuildError> {
    if txn.last_valid < txn.first_valid {
        return Err(BuildError::Invalid(format!(
            "validity window is inverted: first {} > last {}",
            txn.first_valid, txn.last_valid
        )));
    }
    if txn.genesis_hash.is_zero() {
        return Err(BuildError::Invalid("genesis hash is required".to_string()));
    }
    if txn.sender.is_zero() {
        return Err(BuildError::Invalid("sender is required".to_string()));
    }
    if txn.note.len() > MAX_NOTE_BYTES {
        return Err(BuildError::Invalid(format!(
            "note is {} bytes, limit is {}",
            txn.note.len(),
            MAX_NOTE_BYTES
        )));
    }
    if txn.accounts.len() > MAX_APP_ACCOUNTS {
        return Err(BuildError::Invalid(format!(
            "{} foreign accounts, limit is {}",
            txn.accounts.len(),
            MAX_APP_ACCOUNTS
        )));
    }
    if txn.app_args.len() > MAX_APP_ARGS {
        return Err(BuildError::Invalid(format!(
            "{} application args, limit is {}",
            txn.app_args.len(),
            MAX_APP_ARGS
        )));
    }
    let arg_len: usize = txn.app_args.iter().map(|a| a.len()).sum();
    if arg_len > MAX_APP_TOTAL_ARG_LEN {
        return Err(BuildError::Invalid(format!(
            "application args total {} bytes, limit is {}",
            arg_len, MAX_APP_TOTAL_ARG_LEN
        )));
    }
    Ok(())
}

/// Sets `txn.fee` according to the fee rule.
pub fn apply_fee(txn: &mut Transaction, params: &SuggestedParams) -> Result<(), BuildError> {
    if params.flat_fee {
        txn.fee = params.fee;
        return Ok(());
    }
    txn.fee = params.fee;
    let size = txn.estimate_size().map_err(BuildError::Encoding)?;
    let size = u64::try_from(size).map_err(|_| BuildError::Invalid("oversized transaction".into()))?;
    let fee = params
        .fee
        .checked_mul(size)
        .ok_or_else(|| BuildError::Invalid(format!("fee {}/byte overflows", params.fee)))?;
    txn.fee = fee.max(params.min_fee_or_default());
    Ok(())
}
