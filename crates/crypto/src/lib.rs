// Path: crates/crypto/src/lib.rs
//! # King of Algo Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # King of Algo Cryptography
//!
//! Ed25519 key pairs, account loading from base64 keys or 25-word mnemonics,
//! and transaction signing.

pub mod account;
pub mod error;
pub mod mnemonic;
pub mod sign;

pub use account::Account;
