// Path: crates/client/src/algod/models.rs
//! Request and response shapes of the node's v2 REST API.

use koa_types::app::{Digest, RawKeyValue, SignedTransaction, SuggestedParams};
use serde::{Deserialize, Serialize};

/// Rounds a suggested transaction stays valid for.
pub const DEFAULT_VALIDITY_ROUNDS: u64 = 1000;

fn is_false(v: &bool) -> bool {
    !*v
}

/// `GET /v2/transactions/params`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionParams {
    #[serde(rename = "consensus-version", default)]
    pub consensus_version: String,
    pub fee: u64,
    #[serde(rename = "genesis-hash")]
    pub genesis_hash: Digest,
    #[serde(rename = "genesis-id")]
    pub genesis_id: String,
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "min-fee", default)]
    pub min_fee: u64,
}

impl From<TransactionParams> for SuggestedParams {
    fn from(p: TransactionParams) -> Self {
        SuggestedParams {
            fee: p.fee,
            min_fee: p.min_fee,
            flat_fee: false,
            first_valid: p.last_round,
            last_valid: p.last_round.saturating_add(DEFAULT_VALIDITY_ROUNDS),
            genesis_id: p.genesis_id,
            genesis_hash: p.genesis_hash,
            consensus_version: p.consensus_version,
        }
    }
}

/// `GET /v2/status` and `GET /v2/status/wait-for-block-after/{round}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeStatus {
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "last-version", default)]
    pub last_version: String,
    #[serde(rename = "time-since-last-round", default)]
    pub time_since_last_round: u64,
}

/// `POST /v2/transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// `GET /v2/transactions/pending/{txid}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Zero while the transaction is still in the pool.
    #[serde(rename = "confirmed-round", default)]
    pub confirmed_round: u64,
    /// Non-empty when the pool dropped the transaction.
    #[serde(rename = "pool-error", default)]
    pub pool_error: String,
    /// Set when the transaction created an application.
    #[serde(
        rename = "application-index",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_index: Option<u64>,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round > 0
    }
}

/// `GET /v2/accounts/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountInformation {
    pub address: String,
    pub amount: u64,
    #[serde(rename = "min-balance", default)]
    pub min_balance: u64,
}

/// `GET /v2/accounts/{address}/applications/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountApplicationInformation {
    #[serde(rename = "created-app", default, skip_serializing_if = "Option::is_none")]
    pub created_app: Option<ApplicationParams>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationParams {
    #[serde(rename = "global-state", default)]
    pub global_state: Vec<RawKeyValue>,
}

/// `POST /v2/teal/compile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResponse {
    pub hash: String,
    /// Base64 program bytecode.
    pub result: String,
}

/// Error body the node attaches to non-success responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}

/// `POST /v2/transactions/simulate` request, sent as MessagePack.
///
/// Field order follows the wire key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateRequest {
    #[serde(rename = "allow-empty-signatures", default, skip_serializing_if = "is_false")]
    pub allow_empty_signatures: bool,
    #[serde(rename = "exec-trace-config", default)]
    pub exec_trace_config: ExecTraceConfig,
    #[serde(rename = "txn-groups")]
    pub txn_groups: Vec<SimulateRequestGroup>,
}

impl SimulateRequest {
    /// A traced simulation of one group whose members may be unsigned.
    pub fn traced_group(txns: Vec<SignedTransaction>) -> Self {
        Self {
            allow_empty_signatures: true,
            exec_trace_config: ExecTraceConfig {
                enable: true,
                scratch_change: true,
                stack_change: true,
                state_change: true,
            },
            txn_groups: vec![SimulateRequestGroup { txns }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateRequestGroup {
    pub txns: Vec<SignedTransaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecTraceConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable: bool,
    #[serde(rename = "scratch-change", default, skip_serializing_if = "is_false")]
    pub scratch_change: bool,
    #[serde(rename = "stack-change", default, skip_serializing_if = "is_false")]
    pub stack_change: bool,
    #[serde(rename = "state-change", default, skip_serializing_if = "is_false")]
    pub state_change: bool,
}

/// `POST /v2/transactions/simulate?format=json` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulateResponse {
    #[serde(rename = "last-round", default)]
    pub last_round: u64,
    #[serde(rename = "txn-groups", default)]
    pub txn_groups: Vec<SimulateGroupResult>,
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulateGroupResult {
    #[serde(rename = "txn-results", default)]
    pub txn_results: Vec<SimulateTxnResult>,
    #[serde(rename = "failure-message", default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    /// Path to the failing transaction: group index first, then inner indexes.
    #[serde(rename = "failed-at", default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<Vec<u64>>,
}

impl SimulateGroupResult {
    /// Index of the top-level member that failed, if any.
    pub fn failed_index(&self) -> Option<usize> {
        self.failed_at
            .as_ref()
            .and_then(|path| path.first())
            .and_then(|i| usize::try_from(*i).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulateTxnResult {
    #[serde(rename = "txn-result", default)]
    pub txn_result: serde_json::Value,
    #[serde(rename = "exec-trace", default, skip_serializing_if = "Option::is_none")]
    pub exec_trace: Option<ExecTrace>,
    #[serde(rename = "app-budget-consumed", default, skip_serializing_if = "Option::is_none")]
    pub app_budget_consumed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecTrace {
    #[serde(rename = "approval-program-trace", default)]
    pub approval_program_trace: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceStep {
    pub pc: u64,
    #[serde(rename = "stack-additions", default)]
    pub stack_additions: Vec<AvmValue>,
    #[serde(rename = "stack-pop-count", default)]
    pub stack_pop_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvmValue {
    /// `1` for bytes, `2` for uint.
    #[serde(rename = "type")]
    pub kind: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uint: Option<u64>,
}

impl std::fmt::Display for AvmValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, &self.bytes, self.uint) {
            (1, Some(b), _) => write!(f, "b64:{}", b),
            (1, None, _) => f.write_str("b64:"),
            (_, _, u) => write!(f, "{}", u.unwrap_or(0)),
        }
    }
}

impl std::fmt::Display for TraceStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pc={:<5} pop={}", self.pc, self.stack_pop_count)?;
        if !self.stack_additions.is_empty() {
            let pushed: Vec<String> = self.stack_additions.iter().map(|v| v.to_string()).collect();
            write!(f, " push=[{}]", pushed.join(", "))?;
        }
        Ok(())
    }
}
