// Path: crates/crypto/src/error.rs
//! Local error types for the `koa-crypto` crate.

// Re-export the canonical error type from the types crate.
pub use koa_types::error::CryptoError;
