// Path: crates/types/src/app/transaction.rs
use super::address::Address;
use super::bytes::FixedBytesVisitor;
use super::digest::Digest;
use crate::codec::to_bytes_canonical;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use data_encoding::BASE32_NOPAD;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_bytes::ByteBuf;
use std::fmt;

/// Network minimum fee per transaction, in base units.
pub const MIN_TXN_FEE: u64 = 1000;
/// Bytes a signature adds to an encoded transaction, used for fee estimation.
pub const SIGNATURE_OVERHEAD: usize = 75;
/// Maximum note length accepted by the network.
pub const MAX_NOTE_BYTES: usize = 1024;
/// Maximum number of application arguments.
pub const MAX_APP_ARGS: usize = 16;
/// Maximum combined length of all application arguments.
pub const MAX_APP_TOTAL_ARG_LEN: usize = 2048;
/// Maximum number of foreign accounts an application call may reference.
pub const MAX_APP_ACCOUNTS: usize = 4;
/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

const TX_DOMAIN: &[u8] = b"TX";
const GROUP_DOMAIN: &[u8] = b"TG";

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// The transaction type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TxType {
    /// A plain payment.
    #[default]
    #[serde(rename = "pay")]
    Payment,
    /// An application call (including creation).
    #[serde(rename = "appl")]
    ApplicationCall,
}

/// What an application call does after the approval program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnCompletion {
    /// Only run the approval program.
    #[default]
    NoOp,
    /// Opt the sender into local state.
    OptIn,
    /// Close out the sender's local state.
    CloseOut,
    /// Clear the sender's local state unconditionally.
    ClearState,
    /// Replace the application's programs.
    UpdateApplication,
    /// Delete the application.
    DeleteApplication,
}

impl OnCompletion {
    /// The numeric wire value.
    pub fn as_u64(self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
            Self::CloseOut => 2,
            Self::ClearState => 3,
            Self::UpdateApplication => 4,
            Self::DeleteApplication => 5,
        }
    }

    fn is_noop(&self) -> bool {
        *self == Self::NoOp
    }
}

impl Serialize for OnCompletion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.as_u64())
    }
}

impl<'de> Deserialize<'de> for OnCompletion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u64::deserialize(deserializer)? {
            0 => Ok(Self::NoOp),
            1 => Ok(Self::OptIn),
            2 => Ok(Self::CloseOut),
            3 => Ok(Self::ClearState),
            4 => Ok(Self::UpdateApplication),
            5 => Ok(Self::DeleteApplication),
            other => Err(de::Error::custom(format!(
                "unknown on-completion value {}",
                other
            ))),
        }
    }
}

/// Storage an application reserves in global or local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSchema {
    /// Number of byte-slice slots.
    #[serde(rename = "nbs", skip_serializing_if = "is_zero")]
    pub num_byte_slices: u64,
    /// Number of uint slots.
    #[serde(rename = "nui", skip_serializing_if = "is_zero")]
    pub num_uints: u64,
}

impl StateSchema {
    fn is_empty(&self) -> bool {
        self.num_byte_slices == 0 && self.num_uints == 0
    }
}

/// An unsigned transaction in its canonical wire shape.
///
/// Fields are declared in the lexicographic order of their wire keys and every
/// zero value is omitted, so `to_bytes_canonical` yields the exact bytes that are
/// hashed and signed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    /// Payment amount.
    #[serde(rename = "amt", skip_serializing_if = "is_zero")]
    pub amount: u64,
    /// Application arguments.
    #[serde(rename = "apaa", skip_serializing_if = "Vec::is_empty")]
    pub app_args: Vec<ByteBuf>,
    /// Application on-completion action.
    #[serde(rename = "apan", skip_serializing_if = "OnCompletion::is_noop")]
    pub on_completion: OnCompletion,
    /// Approval program bytecode (creation only).
    #[serde(rename = "apap", with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    pub approval_program: Vec<u8>,
    /// Foreign accounts referenced by an application call.
    #[serde(rename = "apat", skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Address>,
    /// Global state schema (creation only).
    #[serde(rename = "apgs", skip_serializing_if = "StateSchema::is_empty")]
    pub global_schema: StateSchema,
    /// Application id. Zero creates a new application.
    #[serde(rename = "apid", skip_serializing_if = "is_zero")]
    pub app_id: u64,
    /// Local state schema (creation only).
    #[serde(rename = "apls", skip_serializing_if = "StateSchema::is_empty")]
    pub local_schema: StateSchema,
    /// Clear-state program bytecode (creation only).
    #[serde(rename = "apsu", with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    pub clear_program: Vec<u8>,
    /// Fee paid by the sender.
    #[serde(rename = "fee", skip_serializing_if = "is_zero")]
    pub fee: u64,
    /// First round the transaction is valid.
    #[serde(rename = "fv", skip_serializing_if = "is_zero")]
    pub first_valid: u64,
    /// Genesis id of the target network.
    #[serde(rename = "gen", skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,
    /// Genesis hash of the target network.
    #[serde(rename = "gh", skip_serializing_if = "Digest::is_zero")]
    pub genesis_hash: Digest,
    /// Atomic group identifier.
    #[serde(rename = "grp", skip_serializing_if = "Digest::is_zero")]
    pub group: Digest,
    /// Last round the transaction is valid.
    #[serde(rename = "lv", skip_serializing_if = "is_zero")]
    pub last_valid: u64,
    /// Free-form note.
    #[serde(rename = "note", with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<u8>,
    /// Payment receiver.
    #[serde(rename = "rcv", skip_serializing_if = "Address::is_zero")]
    pub receiver: Address,
    /// New authorized signer for the sender account.
    #[serde(rename = "rekey", skip_serializing_if = "Address::is_zero")]
    pub rekey_to: Address,
    /// Sender.
    #[serde(rename = "snd", skip_serializing_if = "Address::is_zero")]
    pub sender: Address,
    /// Transaction type.
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

impl Transaction {
    /// Canonical MessagePack encoding.
    pub fn encode(&self) -> Result<Vec<u8>, String> {
        to_bytes_canonical(self)
    }

    /// The domain-separated bytes that are hashed for the id and signed.
    pub fn bytes_to_sign(&self) -> Result<Vec<u8>, String> {
        let body = self.encode()?;
        let mut out = Vec::with_capacity(TX_DOMAIN.len() + body.len());
        out.extend_from_slice(TX_DOMAIN);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// The raw 32-byte transaction id.
    pub fn raw_id(&self) -> Result<Digest, String> {
        Ok(Digest::hash(&self.bytes_to_sign()?))
    }

    /// The transaction id in its base32 text form.
    pub fn id(&self) -> Result<String, String> {
        Ok(BASE32_NOPAD.encode(self.raw_id()?.as_bytes()))
    }

    /// Estimated size once signed, used by the per-byte fee rule.
    pub fn estimate_size(&self) -> Result<usize, String> {
        Ok(self.encode()?.len() + SIGNATURE_OVERHEAD)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", B64.encode(self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&B64.encode(self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let raw = B64.decode(&s).map_err(de::Error::custom)?;
            let bytes: [u8; SIGNATURE_LEN] = raw
                .as_slice()
                .try_into()
                .map_err(|_| de::Error::invalid_length(raw.len(), &"64 bytes"))?;
            Ok(Self(bytes))
        } else {
            deserializer
                .deserialize_bytes(FixedBytesVisitor::<SIGNATURE_LEN>)
                .map(Self)
        }
    }
}

/// A transaction with its signature. The signature is omitted for simulation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedTransaction {
    /// The sender's signature over `Transaction::bytes_to_sign`.
    #[serde(rename = "sig", skip_serializing_if = "Option::is_none")]
    pub sig: Option<Signature>,
    /// The signed transaction.
    #[serde(rename = "txn")]
    pub txn: Transaction,
}

impl SignedTransaction {
    /// Wraps an unsigned transaction with no signature.
    pub fn unsigned(txn: Transaction) -> Self {
        Self { sig: None, txn }
    }

    /// Canonical MessagePack encoding.
    pub fn encode(&self) -> Result<Vec<u8>, String> {
        to_bytes_canonical(self)
    }

    /// The id of the inner transaction.
    pub fn id(&self) -> Result<String, String> {
        self.txn.id()
    }
}

/// The preimage of an atomic group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxGroup {
    /// Raw ids of the member transactions, each computed with an empty group field.
    #[serde(rename = "txlist")]
    pub tx_ids: Vec<Digest>,
}

impl TxGroup {
    /// Hashes the group preimage into the identifier embedded in every member.
    pub fn id(&self) -> Result<Digest, String> {
        let body = to_bytes_canonical(self)?;
        let mut preimage = Vec::with_capacity(GROUP_DOMAIN.len() + body.len());
        preimage.extend_from_slice(GROUP_DOMAIN);
        preimage.extend_from_slice(&body);
        Ok(Digest::hash(&preimage))
    }
}

/// Network parameters needed to build a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Fee per byte, or the absolute fee when `flat_fee` is set.
    pub fee: u64,
    /// The network's minimum fee per transaction.
    pub min_fee: u64,
    /// Whether `fee` is an absolute fee rather than a per-byte rate.
    pub flat_fee: bool,
    /// First valid round.
    pub first_valid: u64,
    /// Last valid round.
    pub last_valid: u64,
    /// Genesis id.
    pub genesis_id: String,
    /// Genesis hash.
    pub genesis_hash: Digest,
    /// Consensus protocol version reported by the node.
    pub consensus_version: String,
}

impl SuggestedParams {
    /// The network minimum fee, falling back to `MIN_TXN_FEE` when the node reports none.
    pub fn min_fee_or_default(&self) -> u64 {
        if self.min_fee == 0 {
            MIN_TXN_FEE
        } else {
            self.min_fee
        }
    }

    /// Returns a copy that charges exactly `fee`.
    pub fn with_flat_fee(&self, fee: u64) -> Self {
        Self {
            fee,
            flat_fee: true,
            ..self.clone()
        }
    }
}
