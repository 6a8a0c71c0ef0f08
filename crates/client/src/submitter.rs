// Path: crates/client/src/submitter.rs
//! Hands signed groups to the ledger and waits for finality.
//!
//! Submission happens exactly once per call. Only the confirmation wait is
//! safe to repeat: every failure after the node accepted the group is a
//! [`TimeoutError`] carrying the transaction id, and the caller may call
//! [`Submitter::await_confirmation`] again with that id.

use crate::error::ClientError;
use crate::ledger::LedgerWrite;
use koa_telemetry::Timer;
use koa_tx::SignedGroup;
use koa_types::error::{SubmissionError, TimeoutError};
use std::time::{Duration, Instant};

/// What the node reported once a transaction was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_id: String,
    pub confirmed_round: u64,
    /// Set when the transaction created an application.
    pub application_index: Option<u64>,
}

pub struct Submitter<'a, L: LedgerWrite + ?Sized> {
    ledger: &'a L,
    deadline: Option<Duration>,
}

impl<'a, L: LedgerWrite + ?Sized> Submitter<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            deadline: None,
        }
    }

    /// Bounds submission and the confirmation wait by wall-clock time as well as rounds.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Submits `signed` and returns the id the node assigned to the first member.
    pub async fn submit(&self, signed: &[u8]) -> Result<String, ClientError> {
        self.submit_within(signed, self.deadline).await
    }

    /// Submits `signed` and waits up to `max_rounds` rounds for it to commit.
    ///
    /// With a deadline, the whole call shares one wall-clock budget.
    pub async fn submit_and_wait(
        &self,
        signed: &[u8],
        max_rounds: u64,
    ) -> Result<Confirmation, ClientError> {
        let started = Instant::now();
        let tx_id = self.submit_within(signed, self.deadline).await?;
        let remaining = self.deadline.map(|d| d.saturating_sub(started.elapsed()));
        self.confirm_within(&tx_id, max_rounds, remaining).await
    }

    /// Polls until `tx_id` is committed, dropped, or the budget runs out.
    pub async fn await_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
    ) -> Result<Confirmation, ClientError> {
        self.confirm_within(tx_id, max_rounds, self.deadline).await
    }

    async fn submit_within(
        &self,
        signed: &[u8],
        budget: Option<Duration>,
    ) -> Result<String, ClientError> {
        let _timer = Timer::logged("submit");
        let tx_id = match budget {
            None => self.ledger.submit(signed).await?,
            Some(budget) => match tokio::time::timeout(budget, self.ledger.submit(signed)).await {
                Ok(result) => result?,
                Err(_) => {
                    // The node may still accept the group.
                    let tx_id = first_tx_id(signed)?;
                    tracing::warn!(target: "submit", %tx_id, "submission deadline passed");
                    return Err(TimeoutError::Deadline {
                        tx_id,
                        elapsed_ms: millis(budget),
                    }
                    .into());
                }
            },
        };
        tracing::info!(target: "submit", %tx_id, bytes = signed.len(), "group accepted by node");
        Ok(tx_id)
    }

    async fn confirm_within(
        &self,
        tx_id: &str,
        max_rounds: u64,
        budget: Option<Duration>,
    ) -> Result<Confirmation, ClientError> {
        let _timer = Timer::logged("confirm");
        let Some(budget) = budget else {
            return self.wait_rounds(tx_id, max_rounds).await;
        };

        let started = Instant::now();
        match tokio::time::timeout(budget, self.wait_rounds(tx_id, max_rounds)).await {
            Ok(result) => result,
            Err(_) => {
                let elapsed_ms = millis(started.elapsed());
                tracing::warn!(target: "submit", %tx_id, elapsed_ms, "confirmation deadline passed");
                Err(TimeoutError::Deadline {
                    tx_id: tx_id.to_string(),
                    elapsed_ms,
                }
                .into())
            }
        }
    }

    async fn wait_rounds(&self, tx_id: &str, max_rounds: u64) -> Result<Confirmation, ClientError> {
        let status = self
            .ledger
            .status()
            .await
            .map_err(|e| poll_failure(tx_id, e))?;
        let start_round = status.last_round.saturating_add(1);
        let mut current = start_round;

        while current < start_round.saturating_add(max_rounds) {
            // A pending lookup can fail when a load balancer routes it to another
            // node; the next round tries again.
            match self.ledger.pending_transaction(tx_id).await {
                Ok(pending) if pending.is_confirmed() => {
                    tracing::info!(
                        target: "submit",
                        %tx_id,
                        round = pending.confirmed_round,
                        "transaction confirmed"
                    );
                    return Ok(Confirmation {
                        tx_id: tx_id.to_string(),
                        confirmed_round: pending.confirmed_round,
                        application_index: pending.application_index,
                    });
                }
                Ok(pending) if !pending.pool_error.is_empty() => {
                    tracing::warn!(target: "submit", %tx_id, reason = %pending.pool_error, "dropped from pool");
                    return Err(SubmissionError::PoolRejected {
                        tx_id: tx_id.to_string(),
                        reason: pending.pool_error,
                    }
                    .into());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(target: "submit", %tx_id, error = %e, "pending lookup failed");
                }
            }

            self.ledger
                .wait_for_block_after(current)
                .await
                .map_err(|e| poll_failure(tx_id, e))?;
            current = current.saturating_add(1);
        }

        tracing::warn!(target: "submit", %tx_id, rounds = max_rounds, "not confirmed within budget");
        Err(TimeoutError::Rounds {
            tx_id: tx_id.to_string(),
            rounds: max_rounds,
        }
        .into())
    }
}

fn poll_failure(tx_id: &str, err: ClientError) -> ClientError {
    tracing::warn!(target: "submit", %tx_id, error = %err, "polling failed after submission");
    TimeoutError::Poll {
        tx_id: tx_id.to_string(),
        reason: err.to_string(),
    }
    .into()
}

fn first_tx_id(signed: &[u8]) -> Result<String, ClientError> {
    let members = SignedGroup::decode_wire(signed)?;
    let first = members
        .first()
        .ok_or_else(|| ClientError::encoding("submit", "empty group"))?;
    first
        .txn
        .id()
        .map_err(|e| ClientError::encoding("computing transaction id", e))
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
