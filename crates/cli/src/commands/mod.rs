// Path: crates/cli/src/commands/mod.rs

pub mod balance;
pub mod claim;
pub mod config;
pub mod deploy;
pub mod keys;
pub mod state;
