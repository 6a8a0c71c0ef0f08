// Path: crates/client/src/error.rs
//! The unified error type for every ledger-facing flow.

use koa_types::error::{
    BuildError, ConfigError, CryptoError, DecodeError, ErrorCode, SubmissionError, TimeoutError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The node could not be reached or answered with something unusable.
    #[error("Transport error during {context}: {reason}")]
    Transport { context: String, reason: String },
    /// The node answered with a non-success status outside the submission path.
    #[error("Node returned HTTP {status} for {context}: {body}")]
    Http {
        context: String,
        status: u16,
        body: String,
    },
    /// A request or artifact could not be encoded locally.
    #[error("Encoding error during {context}: {reason}")]
    Encoding { context: String, reason: String },
    /// The node accepted the request but its answer lacks a required field.
    #[error("Incomplete node response for {context}: {reason}")]
    Incomplete { context: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn transport(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encoding(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Encoding {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures where asking the node again may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl ErrorCode for ClientError {
    fn code(&self) -> &'static str {
        match self {
            Self::Decode(e) => e.code(),
            Self::Build(e) => e.code(),
            Self::Submission(e) => e.code(),
            Self::Timeout(e) => e.code(),
            Self::Crypto(e) => e.code(),
            Self::Config(e) => e.code(),
            Self::Transport { .. } => "CLIENT_TRANSPORT",
            Self::Http { .. } => "CLIENT_HTTP",
            Self::Encoding { .. } => "CLIENT_ENCODING",
            Self::Incomplete { .. } => "CLIENT_INCOMPLETE",
            Self::Io(_) => "CLIENT_IO",
        }
    }
}
