// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for everything the network hashes or signs.
//!
//! This module provides thin wrappers around `rmp-serde` (MessagePack). The network
//! expects maps with string keys in lexicographic order and with every zero-valued
//! field omitted, so all wire structs declare their fields in sorted key order and
//! mark optional fields with `skip_serializing_if`. Centralizing the codec here keeps
//! transaction ids, group ids and signatures byte-for-byte consistent across crates.

use serde::{de::DeserializeOwned, Serialize};

/// Encodes a value into its canonical MessagePack representation (named maps).
///
/// This function must be used for all data that is included in a hash or a signature.
pub fn to_bytes_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, String> {
    rmp_serde::to_vec_named(v).map_err(|e| format!("canonical encode failed: {}", e))
}

/// Decodes a single value from a canonical byte representation.
///
/// Fails if the buffer is malformed or if any bytes remain after the value.
pub fn from_bytes_canonical<T: DeserializeOwned>(b: &[u8]) -> Result<T, String> {
    let mut rd = b;
    let value = rmp_serde::from_read(&mut rd)
        .map_err(|e| format!("canonical decode failed: {}", e))?;
    if !rd.is_empty() {
        return Err(format!(
            "canonical decode failed: {} trailing bytes",
            rd.len()
        ));
    }
    Ok(value)
}

/// Decodes a stream of back-to-back encoded values, as produced when a signed
/// transaction group is concatenated for submission.
pub fn from_bytes_concatenated<T: DeserializeOwned>(b: &[u8]) -> Result<Vec<T>, String> {
    let mut rd = b;
    let mut out = Vec::new();
    while !rd.is_empty() {
        let value = rmp_serde::from_read(&mut rd)
            .map_err(|e| format!("canonical decode failed at item {}: {}", out.len(), e))?;
        out.push(value);
    }
    Ok(out)
}
