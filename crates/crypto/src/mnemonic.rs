// Path: crates/crypto/src/mnemonic.rs
//! 25-word mnemonic encoding of a 32-byte Ed25519 seed.
//!
//! The seed is packed little-endian into 11-bit indices over the BIP-39 English
//! word list, giving 24 words. A 25th checksum word is the first 11 bits of the
//! SHA-512/256 hash of the seed.

use crate::error::CryptoError;
use crate::sign::eddsa::SEED_LEN;
use bip39::Language;
use koa_types::app::sha512_256;
use zeroize::Zeroizing;

/// Number of words in a mnemonic, including the checksum word.
pub const MNEMONIC_WORDS: usize = 25;
const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = (1 << BITS_PER_WORD) - 1;

/// Encodes a seed as a 25-word phrase.
pub fn from_key(seed: &[u8; SEED_LEN]) -> Result<String, CryptoError> {
    let mut indices = to_u11(seed);
    indices.push(checksum_index(seed)?);
    let words = indices
        .iter()
        .map(|&i| word_at(i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(words.join(" "))
}

/// Decodes a 25-word phrase back into the seed, verifying the checksum word.
pub fn to_key(phrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>, CryptoError> {
    let words: Vec<String> = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(CryptoError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_WORDS,
            words.len()
        )));
    }

    let mut indices = Vec::with_capacity(MNEMONIC_WORDS);
    for word in &words {
        let index = Language::English
            .find_word(word)
            .ok_or_else(|| CryptoError::InvalidMnemonic(format!("unknown word '{}'", word)))?;
        indices.push(index);
    }
    let checksum = indices
        .pop()
        .ok_or_else(|| CryptoError::InvalidMnemonic("empty phrase".to_string()))?;

    // 24 words carry 264 bits: the seed plus one byte that must be zero.
    let bytes = Zeroizing::new(from_u11(&indices));
    let (seed_bytes, padding) = bytes.split_at(SEED_LEN.min(bytes.len()));
    if padding != [0u8] {
        return Err(CryptoError::InvalidMnemonic(
            "phrase does not encode a 32-byte key".to_string(),
        ));
    }
    let seed: [u8; SEED_LEN] = seed_bytes.try_into().map_err(|_| {
        CryptoError::InvalidMnemonic("phrase does not encode a 32-byte key".to_string())
    })?;
    let seed = Zeroizing::new(seed);

    if checksum_index(&seed)? != checksum {
        return Err(CryptoError::InvalidMnemonic("checksum word mismatch".to_string()));
    }
    Ok(seed)
}

fn word_at(index: u16) -> Result<&'static str, CryptoError> {
    Language::English
        .word_list()
        .get(usize::from(index))
        .copied()
        .ok_or_else(|| CryptoError::InvalidMnemonic(format!("word index {} out of range", index)))
}

fn checksum_index(seed: &[u8; SEED_LEN]) -> Result<u16, CryptoError> {
    let [h0, h1, ..] = sha512_256(seed);
    to_u11(&[h0, h1])
        .first()
        .copied()
        .ok_or_else(|| CryptoError::InvalidMnemonic("empty checksum".to_string()))
}

fn to_u11(bytes: &[u8]) -> Vec<u16> {
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    for &b in bytes {
        buffer |= u32::from(b) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push((buffer & WORD_MASK) as u16);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push((buffer & WORD_MASK) as u16);
    }
    out
}

fn from_u11(indices: &[u16]) -> Vec<u8> {
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(indices.len() * 11 / 8 + 1);
    for &i in indices {
        buffer |= u32::from(i) << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push(buffer as u8);
    }
    out
}
