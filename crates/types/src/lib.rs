// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # King of Algo Types
//!
//! This crate is the foundational library for the King of Algo client, containing the
//! on-chain wire model, the decoded contract state, error types, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `koa-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. It owns the canonical
//! definition of shared types like `Transaction`, `SignedTransaction`, `Address`,
//! and `ContractState`, so that signing, grouping and submission all agree on the
//! exact bytes that reach the network.

/// Core application-level data structures like `Transaction`, `Address` and `ContractState`.
pub mod app;
/// The canonical, deterministic binary codec for everything that is hashed or signed.
pub mod codec;
/// Client configuration structures (`KoaConfig`, `AlgodConfig`).
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants for the contract's global-state keys, method names and note tags.
pub mod keys;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
