// Path: crates/crypto/src/sign/eddsa/tests/mod.rs
use super::*;

#[test]
fn test_keypair_generation() {
    let keypair = Ed25519KeyPair::generate();
    let message = b"Test message";

    // Sign
    let signature = keypair.sign(message).unwrap();

    // Verify
    let public_key = keypair.public_key();
    assert!(public_key.verify(message, &signature).is_ok());
}

#[test]
fn test_rfc8032_test_vector_one() {
    // RFC 8032 section 7.1, TEST 1 (empty message)
    let seed: [u8; 32] = [
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ];
    let expected_public: [u8; 32] = [
        0xd7, 0x5a, 0x98, 0x01, 0x82, 0xb1, 0x0a, 0xb7, 0xd5, 0x4b, 0xfe, 0xd3, 0xc9, 0x64, 0x07,
        0x3a, 0x0e, 0xe1, 0x72, 0xf3, 0xda, 0xa6, 0x23, 0x25, 0xaf, 0x02, 0x1a, 0x68, 0xf7, 0x07,
        0x51, 0x1a,
    ];
    let keypair = Ed25519KeyPair::from_seed(&seed);
    assert_eq!(keypair.public_key_bytes(), expected_public);

    let signature = keypair.sign(b"").unwrap();
    assert!(keypair.public_key().verify(b"", &signature).is_ok());
}

#[test]
fn test_serialization_roundtrip() {
    let keypair = Ed25519KeyPair::generate();

    let public_bytes = keypair.public_key().to_bytes();
    let private_bytes = keypair.private_key().to_bytes();
    assert_eq!(public_bytes.len(), 32);
    assert_eq!(private_bytes.len(), 32); // Just the seed

    let public_key = Ed25519PublicKey::from_bytes(&public_bytes).unwrap();
    let private_key = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();
    assert_eq!(public_key, private_key.public_key());
    assert!(Ed25519PrivateKey::from_bytes(&private_bytes[..31]).is_err());
}

#[test]
fn test_signatures_are_deterministic() {
    let original = Ed25519KeyPair::generate();
    let message = b"claim_throne";

    let reloaded = Ed25519KeyPair::from_seed(&original.seed());
    assert_eq!(
        original.sign(message).unwrap().to_array(),
        reloaded.sign(message).unwrap().to_array()
    );
}

#[test]
fn test_wrong_key_and_tampered_message_fail() {
    let keypair1 = Ed25519KeyPair::generate();
    let keypair2 = Ed25519KeyPair::generate();
    let signature = keypair1.sign(b"Original message").unwrap();

    assert_eq!(
        keypair2.public_key().verify(b"Original message", &signature),
        Err(CryptoError::VerificationFailed)
    );
    assert!(keypair1
        .public_key()
        .verify(b"Tampered message", &signature)
        .is_err());

    let parsed = Ed25519Signature::from_bytes(&signature.to_bytes()).unwrap();
    assert_eq!(parsed, signature);
}
