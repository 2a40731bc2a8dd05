//! Cryptographic primitives for algotric
//!
//! - **Content encryption**: AES-256-GCM with a fresh key and nonce per message ([`secret`])
//! - **Key pairs**: RSA keys with PEM interchange ([`keys`])
//! - **Key wrapping**: RSA-OAEP over SHA-256 for the per-message key ([`key_wrap`])
//!
//! Every operation that consumes randomness has a `*_with_rng` form taking any
//! `rand_core::CryptoRngCore`, and a plain form that uses `OsRng`. `OsRng` holds
//! no state and can be used from any number of threads at once.

pub mod key_wrap;
pub mod keys;
mod rng;
pub mod secret;

pub use key_wrap::{
    max_wrap_len, unwrap_key, unwrap_key_with_rng, wrap_key, wrap_key_with_rng, KeyWrapError,
};
pub use keys::{
    KeyError, KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS,
};
pub use secret::{
    decrypt, encrypt, encrypt_with_rng, AuthenticatedCiphertext, Secret, SecretError,
    SymmetricOutput, NONCE_SIZE, SECRET_SIZE, TAG_SIZE,
};
