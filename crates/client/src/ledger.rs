// Path: crates/client/src/ledger.rs
//! The narrow interfaces through which every flow reaches the ledger.
//!
//! [`crate::AlgodClient`] implements all of them over HTTP. Tests implement
//! them over an in-memory ledger.

use crate::algod::models::{NodeStatus, PendingTransaction, SimulateRequest, SimulateResponse};
use crate::error::ClientError;
use async_trait::async_trait;
use koa_types::app::{Address, RawKeyValue, SuggestedParams};

/// Read-only ledger queries.
#[async_trait]
pub trait LedgerRead: Send + Sync {
    /// Network parameters for building transactions.
    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError>;

    /// Global state of `app_id` as seen through its creator `address`.
    async fn read_contract_key_values(
        &self,
        address: &Address,
        app_id: u64,
    ) -> Result<Vec<RawKeyValue>, ClientError>;

    /// Spendable balance of `address` in base units.
    async fn account_balance(&self, address: &Address) -> Result<u64, ClientError>;
}

/// Submission and finality polling.
#[async_trait]
pub trait LedgerWrite: Send + Sync {
    /// Submits concatenated signed transactions and returns the first member's id.
    ///
    /// A node that refuses the bytes yields [`koa_types::error::SubmissionError::Rejected`].
    async fn submit(&self, signed: &[u8]) -> Result<String, ClientError>;

    async fn status(&self) -> Result<NodeStatus, ClientError>;

    /// Blocks until the node has seen a round after `round`.
    async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus, ClientError>;

    async fn pending_transaction(&self, tx_id: &str) -> Result<PendingTransaction, ClientError>;
}

/// Dry execution of a group without committing it.
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn simulate(&self, request: &SimulateRequest) -> Result<SimulateResponse, ClientError>;
}

/// Compiles contract source into bytecode.
#[async_trait]
pub trait ProgramCompiler: Send + Sync {
    async fn compile(&self, source: &[u8]) -> Result<Vec<u8>, ClientError>;
}

/// Everything the game flows need from a ledger.
pub trait Ledger: LedgerRead + LedgerWrite + Simulator + ProgramCompiler {}

impl<T> Ledger for T where T: LedgerRead + LedgerWrite + Simulator + ProgramCompiler {}
