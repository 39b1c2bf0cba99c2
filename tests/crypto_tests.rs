//! Integration tests for the hashing and AES-256-GCM primitives.

use proptest::prelude::*;
use strippedchain::crypto::encryption::{decrypt, encrypt, seal, KEY_LEN, NONCE_LEN, TAG_LEN};
use strippedchain::crypto::hash::{digest_eq, hash, is_hex_digest};
use strippedchain::errors::ChainError;

// ---------------------------------------------------------------------------
// Hasher
// ---------------------------------------------------------------------------

#[test]
fn hash_matches_known_vectors() {
    assert_eq!(
        hash(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        hash(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn hash_output_is_lowercase_hex() {
    let digest = hash(b"strippedchain");
    assert!(is_hex_digest(&digest));
    assert_eq!(digest, digest.to_lowercase());
    assert!(digest_eq(&digest, &hash(b"strippedchain")));
    assert!(!digest_eq(&digest, &hash(b"strippedchain!")));
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; KEY_LEN];
    let plaintext = b"quarterly-report.csv contents";

    let payload = encrypt(&key, plaintext).expect("encrypt should succeed");

    // Ciphertext carries the 16-byte tag.
    assert_eq!(payload.ciphertext().len(), plaintext.len() + TAG_LEN);
    assert_eq!(payload.nonce().len(), NONCE_LEN);

    let recovered =
        decrypt(&key, payload.nonce(), payload.ciphertext()).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn seal_generates_fresh_key_and_nonce() {
    let a = seal(b"same").unwrap();
    let b = seal(b"same").unwrap();

    assert_ne!(a.key(), b.key());
    assert_ne!(a.nonce(), b.nonce());
    assert_ne!(a.ciphertext(), b.ciphertext());
    assert_eq!(a.open().unwrap(), b"same");
}

#[test]
fn empty_plaintext_roundtrips() {
    let payload = seal(b"").unwrap();
    assert_eq!(payload.ciphertext().len(), TAG_LEN);
    assert!(payload.open().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn decrypt_with_wrong_key_fails() {
    let payload = encrypt(&[0x11u8; KEY_LEN], b"TOP_SECRET=42").unwrap();
    let result = decrypt(&[0x22u8; KEY_LEN], payload.nonce(), payload.ciphertext());
    assert!(matches!(result, Err(ChainError::AuthenticationFailed)));
}

#[test]
fn decrypt_with_wrong_nonce_fails() {
    let payload = seal(b"data").unwrap();
    let mut nonce = *payload.nonce();
    nonce[0] ^= 0x01;
    let result = decrypt(payload.key(), &nonce, payload.ciphertext());
    assert!(matches!(result, Err(ChainError::AuthenticationFailed)));
}

#[test]
fn any_flipped_bit_is_detected() {
    let payload = seal(b"tamper-evident").unwrap();
    let original = payload.ciphertext().to_vec();

    for byte in 0..original.len() {
        let mut tampered = original.clone();
        tampered[byte] ^= 0x80;
        let result = decrypt(payload.key(), payload.nonce(), &tampered);
        assert!(
            matches!(result, Err(ChainError::AuthenticationFailed)),
            "flip at byte {byte} went unnoticed"
        );
    }
}

#[test]
fn truncated_ciphertext_is_rejected() {
    let payload = seal(b"data").unwrap();
    let result = decrypt(payload.key(), payload.nonce(), &payload.ciphertext()[..TAG_LEN - 1]);
    assert!(matches!(result, Err(ChainError::Truncated)));
}

#[test]
fn bad_key_length_is_rejected() {
    assert!(matches!(
        encrypt(&[0u8; 16], b"data"),
        Err(ChainError::InvalidKeyLength(16))
    ));
    let payload = seal(b"data").unwrap();
    assert!(matches!(
        decrypt(&[0u8; 31], payload.nonce(), payload.ciphertext()),
        Err(ChainError::InvalidKeyLength(31))
    ));
}

#[test]
fn bad_nonce_length_is_rejected() {
    let payload = seal(b"data").unwrap();
    assert!(matches!(
        decrypt(payload.key(), &[0u8; 8], payload.ciphertext()),
        Err(ChainError::InvalidArgument(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn roundtrip_arbitrary_plaintext(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let payload = seal(&data).unwrap();
        prop_assert_eq!(payload.ciphertext().len(), data.len() + TAG_LEN);
        prop_assert_eq!(payload.open().unwrap(), data);
    }
}
