//! Integration tests for the Lockbox crypto module.

use lockbox::crypto::keys::{AesKey, Seed};
use lockbox::crypto::password::hash_password_with_cost;
use lockbox::crypto::{derive_key, open, open_with, seal, seal_with, verify_password, Encoding, Salt};
use lockbox::errors::LockboxError;

fn salt() -> Salt {
    Salt::new(&[0x5Au8; 32]).expect("32-byte salt")
}

// ---------------------------------------------------------------------------
// Seal / open round-trip
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let key = AesKey::new([0xABu8; 32]);
    let payloads: [&[u8]; 4] = [b"", b"x", b"hunter2", &[0u8; 4096]];

    for plaintext in payloads {
        let sealed = seal(&key, plaintext).expect("seal should succeed");
        let recovered = open(&key, &sealed).expect("open should succeed");
        assert_eq!(recovered, plaintext);
    }
}

#[test]
fn seal_produces_different_blob_each_time() {
    let key = AesKey::new([0xCDu8; 32]);
    let plaintext = b"same plaintext";

    let a = seal(&key, plaintext).expect("seal 1");
    let b = seal(&key, plaintext).expect("seal 2");

    // Each call draws a new random nonce.
    assert_ne!(a, b, "two seals of the same plaintext must differ");
}

#[test]
fn open_with_wrong_key_is_authentication_failure() {
    let sealed = seal(&AesKey::new([0x11u8; 32]), b"TOP_SECRET").expect("seal");
    let result = open(&AesKey::new([0x22u8; 32]), &sealed);
    assert!(matches!(result, Err(LockboxError::AuthenticationFailed)));
}

#[test]
fn every_flipped_byte_is_detected() {
    let key = AesKey::new([0x33u8; 32]);
    let sealed = seal(&key, b"attack at dawn").expect("seal");
    let raw = base64_decode(&sealed);

    for i in 0..raw.len() {
        let mut tampered = raw.clone();
        tampered[i] ^= 0x01;
        let result = open(&key, &base64_encode(&tampered));
        assert!(
            matches!(result, Err(LockboxError::AuthenticationFailed)),
            "byte {i} flip was not detected"
        );
    }
}

#[test]
fn short_or_undecodable_input_is_malformed() {
    let key = AesKey::new([0x44u8; 32]);

    // 27 bytes: one short of nonce + tag.
    let short = base64_encode(&[0u8; 27]);
    assert!(matches!(open(&key, &short), Err(LockboxError::Malformed(_))));
    assert!(matches!(open(&key, "not base64!"), Err(LockboxError::Malformed(_))));
    assert!(matches!(open(&key, ""), Err(LockboxError::Malformed(_))));
}

#[test]
fn hex_encoding_is_explicit() {
    let key = AesKey::new([0x55u8; 32]);
    let sealed = seal_with(&key, b"legacy", Encoding::Hex).expect("seal hex");

    assert!(sealed.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        open_with(&key, &sealed, Encoding::Hex).expect("open hex"),
        b"legacy"
    );
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let seed = Seed::generate();

    let a = derive_key(&seed, b"mastahpass", &salt());
    let b = derive_key(&seed, b"mastahpass", &salt());
    assert_eq!(a, b, "same inputs must give the same key");

    let other = derive_key(&seed, b"mastahpass2", &salt());
    assert_ne!(a, other, "different passphrase must give a different key");

    let other_seed = derive_key(&Seed::generate(), b"mastahpass", &salt());
    assert_ne!(a, other_seed, "different seed must give a different key");
}

#[test]
fn derived_key_opens_what_it_sealed() {
    let seed = Seed::new([7u8; 32]);
    let key = derive_key(&seed, b"mastahpass", &salt());
    let sealed = seal(&key, b"payload").expect("seal");

    let again = derive_key(&seed, b"mastahpass", &salt());
    assert_eq!(open(&again, &sealed).expect("open"), b"payload");

    let wrong = derive_key(&seed, b"wrong", &salt());
    assert!(matches!(open(&wrong, &sealed), Err(LockboxError::AuthenticationFailed)));
}

#[test]
fn salt_must_be_32_bytes() {
    assert!(matches!(
        Salt::new(&[0u8; 31]),
        Err(LockboxError::SaltMisconfigured(_))
    ));
    assert!(matches!(
        Salt::new(&[0u8; 33]),
        Err(LockboxError::SaltMisconfigured(_))
    ));
}

// ---------------------------------------------------------------------------
// Password hash
// ---------------------------------------------------------------------------

#[test]
fn password_hash_verifies_only_the_right_password() {
    let hash = hash_password_with_cost(b"mastahpass", 4).expect("hash");
    assert!(verify_password(&hash, b"mastahpass"));
    assert!(!verify_password(&hash, b"mastahpas"));
    assert!(!verify_password(b"not a bcrypt hash", b"mastahpass"));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base64_decode(text: &str) -> Vec<u8> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .expect("valid base64")
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
