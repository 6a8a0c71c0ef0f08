// Path: crates/types/src/app/address.rs
use super::bytes::FixedBytesVisitor;
use super::digest::sha512_256;
use crate::error::DecodeError;
use data_encoding::BASE32_NOPAD;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a raw address (an Ed25519 public key or a hash) in bytes.
pub const ADDRESS_LEN: usize = 32;
/// Length of the checksummed, base32 text form of an address.
pub const ADDRESS_STRING_LEN: usize = 58;
const CHECKSUM_LEN: usize = 4;
const APP_ID_PREFIX: &[u8] = b"appID";

/// A 32-byte account address.
///
/// The text form is base32 (no padding) of the raw bytes followed by the last
/// four bytes of their SHA-512/256 hash. On the wire it is encoded as `bin`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address. Used as "no account" in optional wire fields.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Builds an address from a raw 32-byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| DecodeError::InvalidLength {
            field: "address",
            expected: ADDRESS_LEN,
            got: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    /// Derives the escrow account controlled by an application.
    pub fn for_application(app_id: u64) -> Self {
        let mut preimage = Vec::with_capacity(APP_ID_PREFIX.len() + 8);
        preimage.extend_from_slice(APP_ID_PREFIX);
        preimage.extend_from_slice(&app_id.to_be_bytes());
        Self(sha512_256(&preimage))
    }

    /// True for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let [.., a, b, c, d] = sha512_256(&self.0);
        [a, b, c, d]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::with_capacity(ADDRESS_LEN + CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&buf))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_STRING_LEN {
            return Err(DecodeError::InvalidAddress(s.to_string()));
        }
        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|_| DecodeError::InvalidAddress(s.to_string()))?;
        if raw.len() != ADDRESS_LEN + CHECKSUM_LEN {
            return Err(DecodeError::InvalidAddress(s.to_string()));
        }
        let (key, checksum) = raw.split_at(ADDRESS_LEN);
        let addr = Self::from_slice(key)?;
        if addr.checksum() != checksum {
            return Err(DecodeError::InvalidAddress(s.to_string()));
        }
        Ok(addr)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        } else {
            deserializer
                .deserialize_bytes(FixedBytesVisitor::<ADDRESS_LEN>)
                .map(Self)
        }
    }
}
