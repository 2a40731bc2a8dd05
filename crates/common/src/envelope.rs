//! Hybrid envelope encryption
//!
//! `seal` encrypts the payload under a fresh AES-256-GCM key and wraps that key
//! for the recipient with RSA-OAEP. `open` reverses it: unwrap first, then
//! verify and decrypt. Calls share no state.
//!
//! # Transport Format
//!
//! ```text
//! {
//!   "enc_key":    base64(RSA-OAEP(aes_key)),
//!   "nonce":      base64(12-byte GCM nonce),
//!   "tag":        base64(16-byte GCM tag),
//!   "ciphertext": base64(AES-256-GCM(plaintext))
//! }
//! ```
//!
//! All four keys are required; unknown keys are rejected. Field order does
//! not matter.

use rand_core::{CryptoRngCore, OsRng};
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::crypto::key_wrap::{self, KeyWrapError};
use crate::crypto::keys::{PublicKey, SecretKey};
use crate::crypto::secret::{self, SecretError, SymmetricOutput};

/// Errors that can occur while sealing or opening an envelope
///
/// `MalformedEnvelope` means the input could not even be parsed.
/// `AuthenticationFailed` and `UnwrapFailed` mean it parsed but is
/// cryptographically invalid. `PayloadTooLarge` is API misuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("secure randomness unavailable")]
    EntropyUnavailable,
    #[error("payload of {len} bytes exceeds the {capacity}-byte OAEP capacity")]
    PayloadTooLarge { len: usize, capacity: usize },
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("key unwrap failed")]
    UnwrapFailed,
    #[error("public key rejected by the RSA backend")]
    InvalidPublicKey,
}

impl From<SecretError> for EnvelopeError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::EntropyUnavailable => EnvelopeError::EntropyUnavailable,
            SecretError::AuthenticationFailed | SecretError::InvalidLength { .. } => {
                EnvelopeError::AuthenticationFailed
            }
        }
    }
}

impl From<KeyWrapError> for EnvelopeError {
    fn from(err: KeyWrapError) -> Self {
        match err {
            KeyWrapError::PayloadTooLarge { len, capacity } => {
                EnvelopeError::PayloadTooLarge { len, capacity }
            }
            KeyWrapError::UnwrapFailed => EnvelopeError::UnwrapFailed,
            KeyWrapError::EntropyUnavailable => EnvelopeError::EntropyUnavailable,
            KeyWrapError::InvalidPublicKey => EnvelopeError::InvalidPublicKey,
        }
    }
}

/// The unit exchanged between the sealing and the opening party
///
/// Holds raw bytes; base64 only exists at the serde boundary. An envelope is
/// only meaningful to the holder of the private key matching the public key
/// that sealed it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// The AES key, wrapped with RSA-OAEP
    #[serde_as(as = "Base64")]
    pub enc_key: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub nonce: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub tag: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse the JSON transport form
    ///
    /// # Errors
    ///
    /// Returns `MalformedEnvelope` for invalid JSON, a missing field, a
    /// non-string or non-base64 field, or an unknown field.
    pub fn from_json(json: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(json).map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))
    }

    /// Parse the JSON transport form from raw bytes
    ///
    /// Input that is not valid UTF-8 is `MalformedEnvelope`, never repaired.
    pub fn from_slice(json: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(json).map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))
    }

    /// Parse an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, EnvelopeError> {
        serde_json::from_value(value).map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<serde_json::Value> for Envelope {
    type Error = EnvelopeError;
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Seal `plaintext` for the holder of `public`, drawing randomness from `OsRng`
pub fn seal(public: &PublicKey, plaintext: &[u8]) -> Result<Envelope, EnvelopeError> {
    seal_with_rng(&mut OsRng, public, plaintext)
}

/// Seal `plaintext` for the holder of `public`
///
/// Mints a fresh AES key and nonce, encrypts, then wraps the key. Inputs are
/// never mutated. Given the same generator state the output is identical,
/// otherwise every call differs.
#[tracing::instrument(skip_all, fields(len = plaintext.len()))]
pub fn seal_with_rng<R>(
    rng: &mut R,
    public: &PublicKey,
    plaintext: &[u8],
) -> Result<Envelope, EnvelopeError>
where
    R: CryptoRngCore,
{
    let SymmetricOutput {
        secret,
        nonce,
        sealed,
    } = secret::encrypt_with_rng(rng, plaintext)?;
    let enc_key = key_wrap::wrap_key_with_rng(rng, public, secret.bytes())?;

    tracing::debug!(
        recipient = %public.fingerprint(),
        ciphertext_len = sealed.ciphertext.len(),
        "sealed envelope"
    );

    Ok(Envelope {
        enc_key,
        nonce: nonce.to_vec(),
        tag: sealed.tag.to_vec(),
        ciphertext: sealed.ciphertext,
    })
}

/// Open `envelope` with `secret_key`, blinding with `OsRng`
pub fn open(secret_key: &SecretKey, envelope: &Envelope) -> Result<Vec<u8>, EnvelopeError> {
    open_with_rng(&mut OsRng, secret_key, envelope)
}

/// Open `envelope` with `secret_key`
///
/// # Errors
///
/// - `UnwrapFailed` if the wrapped key does not belong to `secret_key` or was altered
/// - `AuthenticationFailed` if the nonce, tag or ciphertext was altered
///
/// No plaintext, partial or otherwise, is returned on failure.
#[tracing::instrument(skip_all, fields(len = envelope.ciphertext.len()))]
pub fn open_with_rng<R>(
    rng: &mut R,
    secret_key: &SecretKey,
    envelope: &Envelope,
) -> Result<Vec<u8>, EnvelopeError>
where
    R: CryptoRngCore,
{
    let key = key_wrap::unwrap_key_with_rng(rng, secret_key, &envelope.enc_key)?;
    let plaintext = secret::decrypt(&key, &envelope.nonce, &envelope.ciphertext, &envelope.tag)?;

    tracing::debug!("opened envelope");
    Ok(plaintext)
}

/// Decode the JSON transport form, then open it
///
/// A malformed payload fails before any cryptographic work is attempted.
pub fn open_json(secret_key: &SecretKey, json: &str) -> Result<Vec<u8>, EnvelopeError> {
    let envelope = Envelope::from_json(json)?;
    open(secret_key, &envelope)
}
