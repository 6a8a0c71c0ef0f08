// Path: crates/types/src/app/state.rs
use super::address::Address;
use crate::error::DecodeError;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value kind tag the node uses for byte-string global-state entries.
pub const VALUE_KIND_BYTES: u64 = 1;
/// Value kind tag the node uses for unsigned-integer global-state entries.
pub const VALUE_KIND_UINT: u64 = 2;

/// An immutable snapshot of the contract's global state.
///
/// Produced fresh on every read. Absent keys leave the corresponding field at
/// its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractState {
    /// Fee recipient, fixed at contract creation.
    pub admin: Address,
    /// Current title holder. `None` when the throne is vacant.
    pub king: Option<Address>,
    /// End of the current king's protection period.
    pub end_of_reign: DateTime<Utc>,
    /// Price to dethrone the current king while the reign is active.
    pub king_price: u64,
    /// Price to become king when no reign is active.
    pub init_price: u64,
    /// Percentage (0-100) of the price routed to the dethroned king.
    pub reward_multiplier: u64,
    /// Percentage (0-100) of the price routed to the admin.
    pub admin_fee: u64,
    /// Protection window granted to a new king, in seconds.
    pub reign_period: u64,
}

impl ContractState {
    /// True when a king currently holds the throne.
    pub fn king_is_set(&self) -> bool {
        self.king.is_some()
    }
}

/// A global-state value as served by the node's REST API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawValue {
    /// `1` for bytes, `2` for uint.
    #[serde(rename = "type")]
    pub kind: u64,
    /// Base64-encoded byte value.
    #[serde(default)]
    pub bytes: String,
    /// Unsigned-integer value.
    #[serde(default)]
    pub uint: u64,
}

/// A raw global-state entry with a base64-encoded key, as served by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKeyValue {
    /// Base64-encoded key.
    pub key: String,
    /// The typed value.
    pub value: RawValue,
}

impl RawKeyValue {
    /// Builds a byte-string entry, encoding key and value the way the node does.
    pub fn bytes(key: &[u8], value: &[u8]) -> Self {
        Self {
            key: B64.encode(key),
            value: RawValue {
                kind: VALUE_KIND_BYTES,
                bytes: B64.encode(value),
                uint: 0,
            },
        }
    }

    /// Builds an unsigned-integer entry.
    pub fn uint(key: &[u8], value: u64) -> Self {
        Self {
            key: B64.encode(key),
            value: RawValue {
                kind: VALUE_KIND_UINT,
                bytes: String::new(),
                uint: value,
            },
        }
    }
}

/// A decoded global-state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    /// An unsigned integer.
    Uint(u64),
    /// A byte string.
    Bytes(Vec<u8>),
}

/// A global-state entry with its transport encoding removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// The raw key.
    pub key: Vec<u8>,
    /// The typed value.
    pub value: StateValue,
}

impl TryFrom<&RawKeyValue> for StateEntry {
    type Error = DecodeError;

    fn try_from(raw: &RawKeyValue) -> Result<Self, Self::Error> {
        let key = B64.decode(&raw.key).map_err(|e| DecodeError::Transport {
            context: format!("key '{}'", raw.key),
            reason: e.to_string(),
        })?;
        let value = match raw.value.kind {
            VALUE_KIND_BYTES => {
                let bytes = B64.decode(&raw.value.bytes).map_err(|e| DecodeError::Transport {
                    context: format!("value of key '{}'", String::from_utf8_lossy(&key)),
                    reason: e.to_string(),
                })?;
                StateValue::Bytes(bytes)
            }
            VALUE_KIND_UINT => StateValue::Uint(raw.value.uint),
            other => {
                return Err(DecodeError::Transport {
                    context: format!("value of key '{}'", String::from_utf8_lossy(&key)),
                    reason: format!("unknown value type {}", other),
                })
            }
        };
        Ok(Self { key, value })
    }
}
