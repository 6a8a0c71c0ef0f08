// Path: crates/tx/src/state.rs
//! Decodes the contract's global state into a typed [`ContractState`] snapshot.

use chrono::{DateTime, Utc};
use koa_types::app::{Address, ContractState, RawKeyValue, StateEntry, StateValue};
use koa_types::error::DecodeError;
use koa_types::keys::{
    ADMIN_FEE_KEY, ADMIN_KEY, END_OF_REIGN_KEY, INIT_PRICE_KEY, KING_KEY, KING_PRICE_KEY,
    REIGN_PERIOD_KEY, REWARD_MULTIPLIER_KEY,
};

/// Decodes global-state entries as served by the node (base64 keys and bytes).
pub fn decode_raw_state(entries: &[RawKeyValue]) -> Result<ContractState, DecodeError> {
    let decoded = entries
        .iter()
        .map(StateEntry::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    decode_state(&decoded)
}

/// Decodes global-state entries into a snapshot.
///
/// Entry order is irrelevant and unknown keys are ignored. Keys that are absent
/// leave their field at its zero value. A value of the wrong kind reads as empty
/// bytes or zero.
pub fn decode_state(entries: &[StateEntry]) -> Result<ContractState, DecodeError> {
    let mut state = ContractState::default();

    for entry in entries {
        match entry.key.as_slice() {
            KING_KEY => {
                state.king = decode_optional_address("king", bytes_of(entry))?;
            }
            ADMIN_KEY => {
                state.admin = decode_optional_address("admin", bytes_of(entry))?.unwrap_or_default();
            }
            END_OF_REIGN_KEY => {
                state.end_of_reign = decode_timestamp(uint_of(entry))?;
            }
            KING_PRICE_KEY => state.king_price = uint_of(entry),
            INIT_PRICE_KEY => state.init_price = uint_of(entry),
            REWARD_MULTIPLIER_KEY => state.reward_multiplier = uint_of(entry),
            ADMIN_FEE_KEY => state.admin_fee = uint_of(entry),
            REIGN_PERIOD_KEY => state.reign_period = uint_of(entry),
            other => {
                tracing::trace!(target: "state", key = %String::from_utf8_lossy(other), "ignoring unknown key");
            }
        }
    }

    tracing::debug!(
        target: "state",
        king = ?state.king,
        king_price = state.king_price,
        init_price = state.init_price,
        end_of_reign = %state.end_of_reign,
        "decoded contract state"
    );
    Ok(state)
}

fn bytes_of(entry: &StateEntry) -> &[u8] {
    match &entry.value {
        StateValue::Bytes(b) => b.as_slice(),
        StateValue::Uint(_) => {
            warn_kind(entry, "bytes");
            &[]
        }
    }
}

fn uint_of(entry: &StateEntry) -> u64 {
    match entry.value {
        StateValue::Uint(v) => v,
        StateValue::Bytes(_) => {
            warn_kind(entry, "uint");
            0
        }
    }
}

fn warn_kind(entry: &StateEntry, expected: &str) {
    tracing::warn!(
        target: "state",
        key = %String::from_utf8_lossy(&entry.key),
        expected,
        "global-state value has unexpected kind"
    );
}

fn decode_optional_address(
    field: &'static str,
    raw: &[u8],
) -> Result<Option<Address>, DecodeError> {
    if raw.is_empty() {
        return Ok(None);
    }
    Address::from_slice(raw)
        .map(Some)
        .map_err(|_| DecodeError::InvalidLength {
            field,
            expected: koa_types::app::ADDRESS_LEN,
            got: raw.len(),
        })
}

fn decode_timestamp(secs: u64) -> Result<DateTime<Utc>, DecodeError> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .ok_or(DecodeError::OutOfRange {
            field: "end_of_reign_timestamp",
            value: secs,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state(king: &[u8]) -> Vec<RawKeyValue> {
        vec![
            RawKeyValue::bytes(KING_KEY, king),
            RawKeyValue::bytes(ADMIN_KEY, &[1u8; 32]),
            RawKeyValue::uint(END_OF_REIGN_KEY, 1_700_000_000),
            RawKeyValue::uint(KING_PRICE_KEY, 200_000),
            RawKeyValue::uint(INIT_PRICE_KEY, 100_000),
            RawKeyValue::uint(REWARD_MULTIPLIER_KEY, 75),
            RawKeyValue::uint(ADMIN_FEE_KEY, 5),
            RawKeyValue::uint(REIGN_PERIOD_KEY, 3600),
        ]
    }

    #[test]
    fn decodes_every_known_key() {
        let state = decode_raw_state(&full_state(&[2u8; 32])).unwrap();
        assert_eq!(state.king, Some(Address([2u8; 32])));
        assert_eq!(state.admin, Address([1u8; 32]));
        assert_eq!(state.end_of_reign.timestamp(), 1_700_000_000);
        assert_eq!(state.king_price, 200_000);
        assert_eq!(state.init_price, 100_000);
        assert_eq!(state.reward_multiplier, 75);
        assert_eq!(state.admin_fee, 5);
        assert_eq!(state.reign_period, 3600);
    }

    #[test]
    fn empty_king_means_no_king() {
        let state = decode_raw_state(&full_state(b"")).unwrap();
        assert_eq!(state.king, None);
        assert!(!state.king_is_set());
    }

    #[test]
    fn order_and_unknown_keys_do_not_matter() {
        let mut entries = full_state(&[2u8; 32]);
        let expected = decode_raw_state(&entries).unwrap();

        entries.reverse();
        entries.push(RawKeyValue::uint(b"unrelated", 42));
        entries.push(RawKeyValue::bytes(b"notes", b"hello"));
        let decoded = decode_raw_state(&entries).unwrap();
        assert_eq!(decoded, expected);

        // Decoding is idempotent.
        assert_eq!(decode_raw_state(&entries).unwrap(), decoded);
    }

    #[test]
    fn absent_keys_yield_zero_values() {
        let state = decode_raw_state(&[RawKeyValue::uint(KING_PRICE_KEY, 7)]).unwrap();
        assert_eq!(state.king_price, 7);
        assert_eq!(state.admin, Address::ZERO);
        assert_eq!(state.init_price, 0);
        assert_eq!(state.end_of_reign.timestamp(), 0);
        assert_eq!(decode_raw_state(&[]).unwrap(), ContractState::default());
    }

    #[test]
    fn wrong_address_length_is_rejected() {
        let err = decode_raw_state(&full_state(&[2u8; 31])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidLength {
                field: "king",
                expected: 32,
                got: 31
            }
        );
    }

    #[test]
    fn bad_transport_encoding_is_rejected() {
        let mut entries = full_state(&[2u8; 32]);
        entries[1].value.bytes = "not*base64".to_string();
        assert!(matches!(
            decode_raw_state(&entries),
            Err(DecodeError::Transport { .. })
        ));
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let entries = [StateEntry {
            key: END_OF_REIGN_KEY.to_vec(),
            value: StateValue::Uint(u64::MAX),
        }];
        assert!(matches!(
            decode_state(&entries),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn wrong_kind_reads_as_zero_value() {
        let entries = [
            StateEntry {
                key: KING_KEY.to_vec(),
                value: StateValue::Uint(5),
            },
            StateEntry {
                key: KING_PRICE_KEY.to_vec(),
                value: StateValue::Bytes(vec![1]),
            },
        ];
        let state = decode_state(&entries).unwrap();
        assert_eq!(state.king, None);
        assert_eq!(state.king_price, 0);
    }
}
