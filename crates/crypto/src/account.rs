// Path: crates/crypto/src/account.rs
//! A signing account: an Ed25519 key pair plus its checksummed address.

use crate::error::CryptoError;
use crate::mnemonic;
use crate::sign::eddsa::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SEED_LEN};
use crate::sign::{SerializableKey, SigningKeyPair, VerifyingKey};
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use koa_types::app::{Address, Signature, SignedTransaction, Transaction};
use koa_types::config::KeyMaterial;
use zeroize::Zeroizing;

/// An account that can sign transactions.
#[derive(Clone, Debug)]
pub struct Account {
    keypair: Ed25519KeyPair,
    address: Address,
}

impl Account {
    /// Creates a fresh random account.
    pub fn generate() -> Self {
        Self::from_keypair(Ed25519KeyPair::generate())
    }

    /// Creates an account from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self::from_keypair(Ed25519KeyPair::from_seed(seed))
    }

    fn from_keypair(keypair: Ed25519KeyPair) -> Self {
        let address = Address(keypair.public_key_bytes());
        Self { keypair, address }
    }

    /// Loads an account from a base64 private key.
    ///
    /// Accepts the 64-byte `seed || public key` form or a bare 32-byte seed. For
    /// the 64-byte form the embedded public key must match the seed.
    pub fn from_private_key(encoded: &str) -> Result<Self, CryptoError> {
        let raw = Zeroizing::new(
            B64.decode(encoded.trim())
                .map_err(|e| CryptoError::InvalidKey(format!("private key is not base64: {}", e)))?,
        );
        match raw.len() {
            SEED_LEN => {
                let seed: [u8; SEED_LEN] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| CryptoError::InvalidKey("bad seed length".to_string()))?;
                Ok(Self::from_seed(&Zeroizing::new(seed)))
            }
            64 => {
                let (seed, public) = raw.split_at(SEED_LEN);
                let seed: [u8; SEED_LEN] = seed
                    .try_into()
                    .map_err(|_| CryptoError::InvalidKey("bad seed length".to_string()))?;
                let account = Self::from_seed(&Zeroizing::new(seed));
                if account.address.as_bytes().as_slice() != public {
                    return Err(CryptoError::InvalidKey(
                        "public key half does not match the seed".to_string(),
                    ));
                }
                Ok(account)
            }
            other => Err(CryptoError::InvalidKey(format!(
                "private key must be 32 or 64 bytes, got {}",
                other
            ))),
        }
    }

    /// Loads an account from a 25-word mnemonic.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, CryptoError> {
        let seed = mnemonic::to_key(phrase)?;
        Ok(Self::from_seed(&seed))
    }

    /// Loads an account from configured key material, preferring the private key.
    pub fn from_key_material(material: &KeyMaterial) -> Result<Self, CryptoError> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(key) = non_empty(&material.private_key) {
            log::debug!("loading account from private key");
            return Self::from_private_key(&key);
        }
        if let Some(words) = non_empty(&material.mnemonic_words) {
            log::debug!("loading account from mnemonic");
            return Self::from_mnemonic(&words);
        }
        Err(CryptoError::InvalidKey(
            "no private_key or mnemonic_words configured".to_string(),
        ))
    }

    /// The account's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The 25-word mnemonic for this account.
    pub fn mnemonic(&self) -> Result<Zeroizing<String>, CryptoError> {
        mnemonic::from_key(&self.keypair.seed()).map(Zeroizing::new)
    }

    /// The base64 `seed || public key` private key.
    pub fn private_key_base64(&self) -> Zeroizing<String> {
        let mut raw = Zeroizing::new(Vec::with_capacity(64));
        raw.extend_from_slice(&*self.keypair.seed());
        raw.extend_from_slice(self.address.as_bytes());
        Zeroizing::new(B64.encode(raw.as_slice()))
    }

    /// Signs a transaction over its domain-separated canonical encoding.
    pub fn sign_transaction(&self, txn: Transaction) -> Result<SignedTransaction, CryptoError> {
        let message = txn
            .bytes_to_sign()
            .map_err(|e| CryptoError::InvalidSignature(format!("cannot encode transaction: {}", e)))?;
        let sig = self.keypair.sign(&message)?;
        Ok(SignedTransaction {
            sig: Some(Signature(sig.to_array())),
            txn,
        })
    }
}

/// Checks that a signed transaction carries a valid signature by its sender.
pub fn verify_transaction(stx: &SignedTransaction) -> Result<(), CryptoError> {
    let sig = stx
        .sig
        .as_ref()
        .ok_or_else(|| CryptoError::InvalidSignature("transaction is unsigned".to_string()))?;
    let public = Ed25519PublicKey::from_bytes(stx.txn.sender.as_bytes())?;
    let signature = Ed25519Signature::from_bytes(&sig.0)?;
    let message = stx
        .txn
        .bytes_to_sign()
        .map_err(|e| CryptoError::InvalidSignature(format!("cannot encode transaction: {}", e)))?;
    public.verify(&message, &signature)
}
