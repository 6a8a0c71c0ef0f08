// Path: crates/telemetry/src/lib.rs
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

//! # King of Algo Telemetry
//!
//! Structured logging initialization and scope timing for the client and CLI.

/// The initialization routine for global structured logging.
pub mod init;
/// Abstract sinks that receive measured durations.
pub mod sinks;
/// A simple RAII timer for measuring the duration of a scope.
pub mod time;

pub use sinks::{LatencySink, TracingSink};
pub use time::Timer;
