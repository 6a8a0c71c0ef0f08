// Path: crates/types/src/app/digest.rs
use super::bytes::FixedBytesVisitor;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha512_256};
use std::fmt;
use std::str::FromStr;

/// Length of a SHA-512/256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Computes SHA-512/256, the hash used for addresses, transaction ids and group ids.
pub fn sha512_256(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha512_256::digest(data).into()
}

/// A 32-byte digest such as a group id or the genesis hash.
///
/// Encoded as `bin` on the wire and as base64 in human-readable formats.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    /// Hashes `data` with SHA-512/256.
    pub fn hash(data: &[u8]) -> Self {
        Self(sha512_256(data))
    }

    /// True for the all-zero digest, which the wire format omits.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&B64.encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

impl FromStr for Digest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = B64
            .decode(s)
            .map_err(|e| format!("invalid base64 digest: {}", e))?;
        let bytes: [u8; DIGEST_LEN] = raw
            .as_slice()
            .try_into()
            .map_err(|_| format!("digest must be {} bytes, got {}", DIGEST_LEN, raw.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        } else {
            deserializer
                .deserialize_bytes(FixedBytesVisitor::<DIGEST_LEN>)
                .map(Self)
        }
    }
}
