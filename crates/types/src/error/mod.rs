// Path: crates/types/src/error/mod.rs
//! Core error types for the King of Algo client.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while turning raw ledger key/values into a `ContractState`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte string had the wrong length for the field it populates.
    #[error("Invalid length for '{field}': expected {expected} bytes, got {got}")]
    InvalidLength {
        /// The field being decoded.
        field: &'static str,
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        got: usize,
    },
    /// A textual address failed base32 or checksum validation.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
    /// The transport encoding (base64 as served by the node) was malformed.
    #[error("Transport decoding failed for {context}: {reason}")]
    Transport {
        /// What was being decoded.
        context: String,
        /// The underlying failure.
        reason: String,
    },
    /// A scalar value does not fit the field it populates.
    #[error("Value {value} is out of range for '{field}'")]
    OutOfRange {
        /// The field being decoded.
        field: &'static str,
        /// The offending value.
        value: u64,
    },
    /// The canonical binary codec failed.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "DECODE_INVALID_LENGTH",
            Self::InvalidAddress(_) => "DECODE_INVALID_ADDRESS",
            Self::Transport { .. } => "DECODE_TRANSPORT",
            Self::OutOfRange { .. } => "DECODE_OUT_OF_RANGE",
            Self::Codec(_) => "DECODE_CODEC",
        }
    }
}

/// Errors raised while constructing, grouping or signing a transaction group.
///
/// These are never retryable: the same inputs will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A single transaction failed construction-time validation.
    #[error("Invalid transaction: {0}")]
    Invalid(String),
    /// The economic split could not be computed.
    #[error("Pricing failed: {0}")]
    Pricing(String),
    /// Computing or assigning the group identifier failed.
    #[error("Grouping failed: {0}")]
    Grouping(String),
    /// Signing a transaction failed.
    #[error("Signing failed: {0}")]
    Signing(String),
    /// Encoding a transaction for the wire failed.
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl ErrorCode for BuildError {
    fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "BUILD_INVALID_TXN",
            Self::Pricing(_) => "BUILD_PRICING",
            Self::Grouping(_) => "BUILD_GROUPING",
            Self::Signing(_) => "BUILD_SIGNING",
            Self::Encoding(_) => "BUILD_ENCODING",
        }
    }
}

impl From<CryptoError> for BuildError {
    fn from(e: CryptoError) -> Self {
        BuildError::Signing(e.to_string())
    }
}

/// Errors returned when the node or the contract rejects a submitted group.
///
/// Submissions are never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The node refused the group at submission time (including contract rejection).
    #[error("Node rejected submission (HTTP {status}): {message}")]
    Rejected {
        /// The HTTP status returned by the node.
        status: u16,
        /// The node's error message.
        message: String,
    },
    /// The transaction was accepted and later evicted from the pool.
    #[error("Transaction {tx_id} was dropped from the pool: {reason}")]
    PoolRejected {
        /// The transaction id.
        tx_id: String,
        /// The pool error reported by the node.
        reason: String,
    },
}

impl ErrorCode for SubmissionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "SUBMIT_REJECTED",
            Self::PoolRejected { .. } => "SUBMIT_POOL_REJECTED",
        }
    }
}

/// Errors returned when finality was not observed within the caller's budget.
///
/// The transaction may still confirm; callers can re-poll with the same id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeoutError {
    /// The round budget was exhausted.
    #[error("Transaction {tx_id} not confirmed after {rounds} rounds")]
    Rounds {
        /// The transaction id being awaited.
        tx_id: String,
        /// The number of rounds waited.
        rounds: u64,
    },
    /// The caller's wall-clock deadline elapsed.
    #[error("Transaction {tx_id} not confirmed before the {elapsed_ms}ms deadline")]
    Deadline {
        /// The transaction id being awaited.
        tx_id: String,
        /// The deadline in milliseconds.
        elapsed_ms: u64,
    },
    /// The node could not be polled after the transaction was accepted.
    #[error("Transaction {tx_id} accepted but polling failed: {reason}")]
    Poll {
        /// The transaction id being awaited.
        tx_id: String,
        /// The polling failure.
        reason: String,
    },
}

impl TimeoutError {
    /// The id of the transaction that was being awaited.
    pub fn tx_id(&self) -> &str {
        match self {
            Self::Rounds { tx_id, .. }
            | Self::Deadline { tx_id, .. }
            | Self::Poll { tx_id, .. } => tx_id,
        }
    }
}

impl ErrorCode for TimeoutError {
    fn code(&self) -> &'static str {
        match self {
            Self::Rounds { .. } => "TIMEOUT_ROUNDS",
            Self::Deadline { .. } => "TIMEOUT_DEADLINE",
            Self::Poll { .. } => "TIMEOUT_POLL",
        }
    }
}

/// Errors related to cryptographic primitives and key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The signature failed cryptographic verification.
    #[error("Signature verification failed")]
    VerificationFailed,
    /// The provided key material is malformed.
    #[error("Invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed.
    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),
    /// A mnemonic phrase was malformed or failed its checksum.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::VerificationFailed => "CRYPTO_VERIFICATION_FAILED",
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidMnemonic(_) => "CRYPTO_INVALID_MNEMONIC",
        }
    }
}

/// Errors raised while loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for `KoaConfig`.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// A required value was absent.
    #[error("Missing config value: {0}")]
    Missing(&'static str),
    /// A value was present but invalid.
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// The offending field or variable.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Missing(_) => "CONFIG_MISSING",
            Self::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}
