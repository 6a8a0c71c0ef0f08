// Path: crates/client/src/dryrun.rs
//! Debug path: simulate a signed group without committing it.
//!
//! Every inspection persists the request payload as
//! `<dir>/dryrun-<UTC timestamp>.msgp` so it can be replayed against a node
//! later, then reports a per-member verdict with the approval-program trace.

use crate::algod::models::{SimulateRequest, SimulateResponse, SimulateTxnResult};
use crate::error::ClientError;
use crate::ledger::Simulator;
use chrono::{DateTime, Utc};
use koa_tx::SignedGroup;
use koa_types::codec;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Default directory for persisted simulation requests.
pub const DRYRUN_DIR: &str = "dryruns";

/// The simulated outcome of one group member.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub index: usize,
    pub tx_id: String,
    pub rejected: bool,
    /// Rendered approval-program trace, one step per line. Empty for payments.
    pub trace: String,
    pub app_budget_consumed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DryRunReport {
    /// Where the request payload was written.
    pub request_path: PathBuf,
    pub outcomes: Vec<OperationOutcome>,
    pub failure_message: Option<String>,
}

impl DryRunReport {
    pub fn would_commit(&self) -> bool {
        self.failure_message.is_none() && self.outcomes.iter().all(|o| !o.rejected)
    }

    pub fn rejected(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| o.rejected)
    }
}

impl fmt::Display for DryRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.would_commit() {
            return writeln!(f, "simulation passed ({} operations)", self.outcomes.len());
        }
        if let Some(msg) = &self.failure_message {
            writeln!(f, "simulation failed: {}", msg)?;
        }
        for outcome in self.rejected() {
            writeln!(f, "Failed app call in {} ({}):", outcome.index, outcome.tx_id)?;
            writeln!(f, "{}", outcome.trace)?;
        }
        Ok(())
    }
}

pub struct DryRunInspector<'a, S: Simulator + ?Sized> {
    simulator: &'a S,
    dir: PathBuf,
}

impl<'a, S: Simulator + ?Sized> DryRunInspector<'a, S> {
    pub fn new(simulator: &'a S, dir: impl Into<PathBuf>) -> Self {
        Self {
            simulator,
            dir: dir.into(),
        }
    }

    /// Simulates `group` and reports which members the contract would reject.
    ///
    /// The members are sent without signatures.
    pub async fn inspect(
        &self,
        group: &SignedGroup,
        now: DateTime<Utc>,
    ) -> Result<DryRunReport, ClientError> {
        let request = SimulateRequest::traced_group(group.unsigned());
        let request_path = self.persist(&request, now)?;
        tracing::info!(target: "dryrun", path = %request_path.display(), members = group.len(), "simulating group");

        let response = self.simulator.simulate(&request).await?;
        let report = build_report(group, request_path, response);
        for outcome in report.rejected() {
            tracing::warn!(
                target: "dryrun",
                index = outcome.index,
                tx_id = %outcome.tx_id,
                "simulated operation rejected"
            );
        }
        Ok(report)
    }

    fn persist(&self, request: &SimulateRequest, now: DateTime<Utc>) -> Result<PathBuf, ClientError> {
        let bytes = codec::to_bytes_canonical(request)
            .map_err(|e| ClientError::encoding("encoding simulate request", e))?;
        std::fs::create_dir_all(&self.dir)?;
        write_unique(&self.dir, &file_stem(now), &bytes)
    }
}

fn file_stem(now: DateTime<Utc>) -> String {
    format!("dryrun-{}", now.format("%Y-%m-%dT%H-%M-%S%.6fZ"))
}

/// Writes `bytes` to `<stem>.msgp`, or `<stem>-<n>.msgp` when that name is taken.
fn write_unique(dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf, ClientError> {
    for n in 0u32.. {
        let name = if n == 0 {
            format!("{}.msgp", stem)
        } else {
            format!("{}-{}.msgp", stem, n)
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(ClientError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        "no free dry-run file name",
    )))
}

fn build_report(group: &SignedGroup, request_path: PathBuf, response: SimulateResponse) -> DryRunReport {
    let result = response.txn_groups.into_iter().next().unwrap_or_default();
    let failed = result.failed_index();

    let mut results = result.txn_results.into_iter();
    let outcomes = group
        .tx_ids
        .iter()
        .enumerate()
        .map(|(index, tx_id)| {
            let txn_result = results.next().unwrap_or_default();
            OperationOutcome {
                index,
                tx_id: tx_id.clone(),
                rejected: failed == Some(index),
                trace: render_trace(&txn_result),
                app_budget_consumed: txn_result.app_budget_consumed,
            }
        })
        .collect();

    DryRunReport {
        request_path,
        outcomes,
        failure_message: result.failure_message,
    }
}

fn render_trace(result: &SimulateTxnResult) -> String {
    result
        .exec_trace
        .as_ref()
        .map(|trace| {
            trace
                .approval_program_trace
                .iter()
                .map(|step| step.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
