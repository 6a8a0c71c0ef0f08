// Path: crates/types/src/app/mod.rs
//! Core application-level data structures shared across the workspace.

mod address;
mod bytes;
mod digest;
mod state;
mod transaction;

pub use address::*;
pub use digest::*;
pub use state::*;
pub use transaction::*;
