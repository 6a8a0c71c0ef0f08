// Path: crates/client/src/game.rs
//! End-to-end game flows: read the contract state, claim the throne, deploy.
//!
//! Every attempt re-reads the contract state and captures a single `now`, so
//! the split that is signed is the split the contract will check.

use crate::dryrun::{DryRunInspector, DryRunReport, DRYRUN_DIR};
use crate::error::ClientError;
use crate::ledger::Ledger;
use crate::submitter::{Confirmation, Submitter};
use chrono::{DateTime, Utc};
use koa_crypto::Account;
use koa_tx::deploy::{build_create_app, build_fund_app};
use koa_tx::state::decode_raw_state;
use koa_tx::{build_become_king_group, BecomeKingRequest, Pricing, SplitOverride};
use koa_types::app::{Address, ContractState, Digest};
use koa_types::prelude::OptionExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rounds to wait for a coronation or deployment to commit.
pub const DEFAULT_WAIT_ROUNDS: u64 = 5;

/// Approval program source shipped with the client.
pub const APPROVAL_TEAL: &str = include_str!("../../../contracts/approval.teal");
/// Clear-state program source shipped with the client.
pub const CLEAR_TEAL: &str = include_str!("../../../contracts/clear.teal");

#[derive(Debug, Clone)]
pub struct ClaimOptions {
    /// Simulate the group and persist the request before submitting.
    pub debug: bool,
    pub wait_rounds: u64,
    pub dryrun_dir: PathBuf,
    /// Wall-clock bound on submission plus the confirmation wait.
    pub deadline: Option<Duration>,
    /// Deliberately corrupts the split. Negative testing only.
    pub split_override: Option<SplitOverride>,
}

impl Default for ClaimOptions {
    fn default() -> Self {
        Self {
            debug: false,
            wait_rounds: DEFAULT_WAIT_ROUNDS,
            dryrun_dir: PathBuf::from(DRYRUN_DIR),
            deadline: None,
            split_override: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub pricing: Pricing,
    pub group_id: Digest,
    pub confirmation: Confirmation,
    /// Present when the claim ran with `debug`.
    pub dry_run: Option<DryRunReport>,
}

pub struct KingOfAlgo<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
    app_id: u64,
}

impl<'a, L: Ledger + ?Sized> KingOfAlgo<'a, L> {
    pub fn new(ledger: &'a L, app_id: u64) -> Self {
        Self { ledger, app_id }
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// The contract's own account, which receives the compensation payment.
    pub fn app_address(&self) -> Address {
        Address::for_application(self.app_id)
    }

    /// Reads a fresh snapshot through the contract creator's account.
    pub async fn read_state(&self, creator: &Address) -> Result<ContractState, ClientError> {
        let raw = self
            .ledger
            .read_contract_key_values(creator, self.app_id)
            .await?;
        Ok(decode_raw_state(&raw)?)
    }

    pub async fn balance(&self, address: &Address) -> Result<u64, ClientError> {
        self.ledger.account_balance(address).await
    }

    /// Reads the current state and claims the throne for `challenger`.
    pub async fn become_king(
        &self,
        creator: &Address,
        challenger: &Account,
        message: &str,
        options: &ClaimOptions,
    ) -> Result<ClaimOutcome, ClientError> {
        let state = self.read_state(creator).await?;
        self.become_king_with_state(state, challenger, message, options, Utc::now())
            .await
    }

    /// Claims the throne against an already-read snapshot and a captured `now`.
    pub async fn become_king_with_state(
        &self,
        state: ContractState,
        challenger: &Account,
        message: &str,
        options: &ClaimOptions,
        now: DateTime<Utc>,
    ) -> Result<ClaimOutcome, ClientError> {
        let params = self.ledger.suggested_params().await?;
        let request = BecomeKingRequest {
            params,
            state,
            challenger,
            message: message.to_string(),
            app_id: self.app_id,
            split_override: options.split_override.clone(),
        };
        let built = build_become_king_group(&request, now)?;

        let dry_run = if options.debug {
            let inspector = DryRunInspector::new(self.ledger, &options.dryrun_dir);
            let report = inspector.inspect(&built.group, now).await?;
            if !report.would_commit() {
                log::warn!("dry run predicts rejection:\n{}", report);
            }
            Some(report)
        } else {
            None
        };

        let mut submitter = Submitter::new(self.ledger);
        if let Some(deadline) = options.deadline {
            submitter = submitter.with_deadline(deadline);
        }
        let confirmation = submitter
            .submit_and_wait(&built.group.wire, options.wait_rounds)
            .await?;

        tracing::info!(
            target: "game",
            app_id = self.app_id,
            king = %challenger.address(),
            paid = built.pricing.pay_amount,
            round = confirmation.confirmed_round,
            "throne claimed"
        );
        Ok(ClaimOutcome {
            pricing: built.pricing,
            group_id: built.group.group_id,
            confirmation,
            dry_run,
        })
    }
}

/// Result of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub app_id: u64,
    pub app_address: Address,
    pub create_tx_id: String,
    pub fund_tx_id: String,
}

/// Compiles both programs, creates the application and seeds its account.
///
/// The contract account receives its minimum balance up front so the first
/// compensation payment does not have to cover it.
pub async fn deploy<L: Ledger + ?Sized>(
    ledger: &L,
    creator: &Account,
    approval_source: &[u8],
    clear_source: &[u8],
    reign_period: Duration,
    wait_rounds: u64,
) -> Result<Deployment, ClientError> {
    let approval = ledger.compile(approval_source).await?;
    let clear = ledger.compile(clear_source).await?;
    tracing::debug!(
        target: "deploy",
        approval_len = approval.len(),
        clear_len = clear.len(),
        "compiled programs"
    );

    let submitter = Submitter::new(ledger);
    let params = ledger.suggested_params().await?;
    let create = build_create_app(&params, creator, approval, clear, reign_period.as_secs())?;
    let created = submitter.submit_and_wait(&create.wire, wait_rounds).await?;
    let app_id = created.application_index.required(ClientError::Incomplete {
        context: "deploy".to_string(),
        reason: format!("transaction {} did not report an application id", created.tx_id),
    })?;
    tracing::info!(target: "deploy", app_id, tx_id = %created.tx_id, "application created");

    let params = ledger.suggested_params().await?;
    let fund = build_fund_app(&params, creator, app_id)?;
    let funded = submitter.submit_and_wait(&fund.wire, wait_rounds).await?;
    tracing::info!(target: "deploy", app_id, tx_id = %funded.tx_id, "contract account funded");

    Ok(Deployment {
        app_id,
        app_address: Address::for_application(app_id),
        create_tx_id: created.tx_id,
        fund_tx_id: funded.tx_id,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdArtifact {
    #[serde(rename = "AppID")]
    pub app_id: u64,
}

/// Persists `{"AppID": n}` as `<dir>/new-app-<timestamp>`.
pub fn save_app_id(dir: &Path, app_id: u64, now: DateTime<Utc>) -> Result<PathBuf, ClientError> {
    let path = dir.join(format!("new-app-{}", now.format("%Y-%m-%dT%H-%M-%SZ")));
    let body = serde_json::to_vec(&AppIdArtifact { app_id })
        .map_err(|e| ClientError::encoding("encoding deployment artifact", e))?;
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, body)?;
    Ok(path)
}
