// Path: crates/client/src/lib.rs
//! # King of Algo Client Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote robust
//! error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # King of Algo Client
//!
//! Talks to the ledger node: reads contract state, submits signed groups and
//! waits for finality, simulates groups for debugging, and deploys the contract.
//! The node is reached through the traits in [`ledger`], so every flow can run
//! against [`algod::AlgodClient`] or any other implementation.

pub mod algod;
pub mod dryrun;
pub mod error;
pub mod game;
pub mod ledger;
pub mod submitter;

pub use algod::AlgodClient;
pub use dryrun::{DryRunInspector, DryRunReport};
pub use error::ClientError;
pub use game::{deploy, save_app_id, ClaimOptions, ClaimOutcome, Deployment, KingOfAlgo};
pub use ledger::{Ledger, LedgerRead, LedgerWrite, ProgramCompiler, Simulator};
pub use submitter::{Confirmation, Submitter};
