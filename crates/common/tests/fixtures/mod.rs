//! Shared key fixtures for envelope integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use common::crypto::{KeyPair, DEFAULT_KEY_BITS};

static KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();
static OTHER_KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();

/// The recipient key pair, generated once per test binary
pub fn key_pair() -> &'static KeyPair {
    KEY_PAIR.get_or_init(|| KeyPair::generate(DEFAULT_KEY_BITS).unwrap())
}

/// A second, unrelated key pair
pub fn other_key_pair() -> &'static KeyPair {
    OTHER_KEY_PAIR.get_or_init(|| KeyPair::generate(DEFAULT_KEY_BITS).unwrap())
}

/// Flip a single bit, addressed from the start of `bytes`
pub fn flip_bit(bytes: &mut [u8], bit: usize) {
    bytes[bit / 8] ^= 1 << (bit % 8);
}
