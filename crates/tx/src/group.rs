// Path: crates/tx/src/group.rs
//! Atomic grouping and signing.
//!
//! A group is committed as a whole: every member is built first, then the
//! shared group id is computed over all of them and embedded in each, and only
//! then is each member signed. Nothing partial ever leaves this module.

use koa_crypto::Account;
use koa_types::app::{Digest, SignedTransaction, Transaction, TxGroup};
use koa_types::codec;
use koa_types::error::{BuildError, DecodeError};

/// Maximum number of transactions in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

/// Computes the group id over `txns`, ignoring any group id they already carry.
pub fn compute_group_id(txns: &[Transaction]) -> Result<Digest, BuildError> {
    if txns.is_empty() {
        return Err(BuildError::Grouping("cannot group zero transactions".to_string()));
    }
    if txns.len() > MAX_GROUP_SIZE {
        return Err(BuildError::Grouping(format!(
            "{} transactions exceed the group limit of {}",
            txns.len(),
            MAX_GROUP_SIZE
        )));
    }
    let tx_ids = txns
        .iter()
        .map(|txn| {
            let mut bare = txn.clone();
            bare.group = Digest::default();
            bare.raw_id()
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(BuildError::Grouping)?;
    TxGroup { tx_ids }.id().map_err(BuildError::Grouping)
}

/// Embeds a freshly computed group id in every transaction.
pub fn assign_group_id(mut txns: Vec<Transaction>) -> Result<(Digest, Vec<Transaction>), BuildError> {
    let group_id = compute_group_id(&txns)?;
    for txn in &mut txns {
        txn.group = group_id;
    }
    Ok((group_id, txns))
}

/// Ordered signed transactions sharing one group id, with their wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedGroup {
    /// The group id embedded in every member.
    pub group_id: Digest,
    /// Member ids in group order.
    pub tx_ids: Vec<String>,
    /// Typed view of each member, decoded back from `wire`.
    pub transactions: Vec<SignedTransaction>,
    /// Concatenated canonical encoding, ready for submission.
    pub wire: Vec<u8>,
}

impl SignedGroup {
    /// Groups `txns` and signs every member with `signer`.
    pub fn sign(txns: Vec<Transaction>, signer: &Account) -> Result<Self, BuildError> {
        let (group_id, txns) = assign_group_id(txns)?;

        let mut tx_ids = Vec::with_capacity(txns.len());
        let mut wire = Vec::new();
        for txn in txns {
            if txn.sender != signer.address() {
                return Err(BuildError::Signing(format!(
                    "signer {} is not the sender {}",
                    signer.address(),
                    txn.sender
                )));
            }
            tx_ids.push(txn.id().map_err(BuildError::Encoding)?);
            let stx = signer.sign_transaction(txn)?;
            wire.extend(stx.encode().map_err(BuildError::Encoding)?);
        }

        let transactions = Self::decode_wire(&wire)
            .map_err(|e| BuildError::Encoding(format!("signed group does not decode: {}", e)))?;
        if transactions.len() != tx_ids.len() {
            return Err(BuildError::Encoding(format!(
                "encoded {} transactions but decoded {}",
                tx_ids.len(),
                transactions.len()
            )));
        }

        tracing::debug!(
            target: "builder",
            group = %group_id,
            size = tx_ids.len(),
            bytes = wire.len(),
            "signed atomic group"
        );
        Ok(Self {
            group_id,
            tx_ids,
            transactions,
            wire,
        })
    }

    /// Splits concatenated signed transactions back into typed entries.
    pub fn decode_wire(wire: &[u8]) -> Result<Vec<SignedTransaction>, DecodeError> {
        codec::from_bytes_concatenated(wire).map_err(DecodeError::Codec)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// True if the group has no members. Never the case for a built group.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The id of the first member, which the node reports as the group's id.
    pub fn first_tx_id(&self) -> Option<&str> {
        self.tx_ids.first().map(String::as_str)
    }

    /// The unsigned members, as submitted for simulation.
    pub fn unsigned(&self) -> Vec<SignedTransaction> {
        self.transactions
            .iter()
            .map(|stx| SignedTransaction::unsigned(stx.txn.clone()))
            .collect()
    }
}
