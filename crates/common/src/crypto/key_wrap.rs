//! Key wrapping with RSA-OAEP (SHA-256)
//!
//! RSA only ever encrypts short symmetric keys here. Bulk data goes through
//! [`super::secret`]; OAEP capacity is bounded by the modulus:
//!
//! ```text
//! capacity = modulus_bytes - 2 * hash_len - 2    (190 bytes for RSA-2048)
//! ```
//!
//! Unwrapping uses blinded decryption, and every failure collapses into the
//! single [`KeyWrapError::UnwrapFailed`] so callers cannot learn whether the
//! length, the padding or the key was wrong.

use rand_core::{CryptoRngCore, OsRng};
use rsa::traits::PublicKeyParts;
use rsa::Oaep;
use sha2::Sha256;

use zeroize::Zeroizing;

use super::keys::{PublicKey, SecretKey};
use super::rng::GuardedRng;

/// Output size of the OAEP hash (SHA-256) in bytes
pub const OAEP_HASH_SIZE: usize = 32;

/// Errors that can occur while wrapping or unwrapping a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyWrapError {
    #[error("payload of {len} bytes exceeds the {capacity}-byte OAEP capacity")]
    PayloadTooLarge { len: usize, capacity: usize },
    #[error("key unwrap failed")]
    UnwrapFailed,
    #[error("secure randomness unavailable")]
    EntropyUnavailable,
    #[error("public key rejected by the RSA backend")]
    InvalidPublicKey,
}

/// Largest secret, in bytes, that `public` can wrap
pub fn max_wrap_len(public: &PublicKey) -> usize {
    public.size().saturating_sub(2 * OAEP_HASH_SIZE + 2)
}

/// Wrap `secret` for the holder of `public`, drawing OAEP seeds from `OsRng`
pub fn wrap_key(public: &PublicKey, secret: &[u8]) -> Result<Vec<u8>, KeyWrapError> {
    wrap_key_with_rng(&mut OsRng, public, secret)
}

/// Wrap `secret` for the holder of `public`
///
/// # Errors
///
/// Returns `PayloadTooLarge` if `secret` exceeds [`max_wrap_len`].
pub fn wrap_key_with_rng<R>(
    rng: &mut R,
    public: &PublicKey,
    secret: &[u8],
) -> Result<Vec<u8>, KeyWrapError>
where
    R: CryptoRngCore,
{
    let capacity = max_wrap_len(public);
    if secret.len() > capacity {
        return Err(KeyWrapError::PayloadTooLarge {
            len: secret.len(),
            capacity,
        });
    }

    let mut guarded = GuardedRng::new(rng);
    let wrapped = public.encrypt(&mut guarded, Oaep::new::<Sha256>(), secret);
    if guarded.failed() {
        return Err(KeyWrapError::EntropyUnavailable);
    }

    wrapped.map_err(|e| match e {
        rsa::Error::MessageTooLong => KeyWrapError::PayloadTooLarge {
            len: secret.len(),
            capacity,
        },
        _ => KeyWrapError::InvalidPublicKey,
    })
}

/// Recover a wrapped secret with `secret_key`, blinding with `OsRng`
pub fn unwrap_key(
    secret_key: &SecretKey,
    wrapped: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeyWrapError> {
    unwrap_key_with_rng(&mut OsRng, secret_key, wrapped)
}

/// Recover a wrapped secret with `secret_key`
///
/// # Errors
///
/// Returns `UnwrapFailed` for any mismatch: wrong key, wrong length, corrupted
/// padding. The cause is not reported.
pub fn unwrap_key_with_rng<R>(
    rng: &mut R,
    secret_key: &SecretKey,
    wrapped: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeyWrapError>
where
    R: CryptoRngCore,
{
    let mut guarded = GuardedRng::new(rng);
    let unwrapped = secret_key.decrypt_blinded(&mut guarded, Oaep::new::<Sha256>(), wrapped);
    if guarded.failed() {
        return Err(KeyWrapError::EntropyUnavailable);
    }

    unwrapped
        .map(Zeroizing::new)
        .map_err(|_| KeyWrapError::UnwrapFailed)
}
