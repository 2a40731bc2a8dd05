//! Content encryption using AES-256-GCM
//!
//! Every encryption mints a fresh 256-bit key and a fresh 96-bit nonce from the
//! injected CSPRNG. The tag is kept detached from the ciphertext so the two can
//! travel as separate envelope fields.

use std::fmt;

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce, Tag};
use rand_core::{CryptoRngCore, OsRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of an AES-256 key in bytes
pub const SECRET_SIZE: usize = 32;
/// Size of an AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;
/// Size of an AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during symmetric encryption/decryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    #[error("secure randomness unavailable")]
    EntropyUnavailable,
    /// Tag mismatch or malformed key/nonce/tag lengths. Never carries plaintext.
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("invalid secret size, expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A 256-bit AES-GCM key
///
/// The `Debug` impl never prints key bytes. Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; SECRET_SIZE]);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Secret {}

impl From<[u8; SECRET_SIZE]> for Secret {
    fn from(bytes: [u8; SECRET_SIZE]) -> Self {
        Secret(bytes)
    }
}

/// Ciphertext with its detached authentication tag
///
/// `ciphertext` always has the length of the plaintext it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCiphertext {
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_SIZE],
}

/// Everything one call to [`encrypt`] produces
#[derive(Debug, Clone)]
pub struct SymmetricOutput {
    pub secret: Secret,
    pub nonce: [u8; NONCE_SIZE],
    pub sealed: AuthenticatedCiphertext,
}

impl Secret {
    /// Generate a new random secret from the operating system's CSPRNG
    pub fn generate() -> Result<Self, SecretError> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generate a new random secret from the given CSPRNG
    pub fn generate_with_rng<R>(rng: &mut R) -> Result<Self, SecretError>
    where
        R: CryptoRngCore,
    {
        let mut secret = Self([0u8; SECRET_SIZE]);
        rng.try_fill_bytes(&mut secret.0)
            .map_err(|_| SecretError::EntropyUnavailable)?;
        Ok(secret)
    }

    /// Create a secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `SECRET_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != SECRET_SIZE {
            return Err(SecretError::InvalidLength {
                expected: SECRET_SIZE,
                actual: data.len(),
            });
        }
        let mut secret = Self([0u8; SECRET_SIZE]);
        secret.0.copy_from_slice(data);
        Ok(secret)
    }

    /// Get a reference to the secret key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }

    /// Encrypt `plaintext` under this key with a freshly drawn nonce
    ///
    /// No associated data is bound. Returns the nonce alongside the
    /// ciphertext and its detached tag.
    pub fn encrypt_detached<R>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<([u8; NONCE_SIZE], AuthenticatedCiphertext), SecretError>
    where
        R: CryptoRngCore,
    {
        let mut nonce = [0u8; NONCE_SIZE];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|_| SecretError::EntropyUnavailable)?;

        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher()
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
            // only reachable for plaintexts beyond the GCM length limit (~64 GiB)
            .map_err(|_| SecretError::AuthenticationFailed)?;

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);

        Ok((
            nonce,
            AuthenticatedCiphertext {
                ciphertext: buffer,
                tag: tag_bytes,
            },
        ))
    }

    /// Verify the tag and decrypt
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the tag does not verify. The partially
    /// decrypted buffer is dropped, never returned.
    pub fn decrypt_detached(
        &self,
        nonce: &[u8; NONCE_SIZE],
        sealed: &AuthenticatedCiphertext,
    ) -> Result<Vec<u8>, SecretError> {
        let mut buffer = sealed.ciphertext.clone();
        self.cipher()
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                b"",
                &mut buffer,
                Tag::from_slice(&sealed.tag),
            )
            .map_err(|_| SecretError::AuthenticationFailed)?;
        Ok(buffer)
    }
}

/// Encrypt `plaintext` under a brand new key and nonce drawn from `OsRng`
pub fn encrypt(plaintext: &[u8]) -> Result<SymmetricOutput, SecretError> {
    encrypt_with_rng(&mut OsRng, plaintext)
}

/// Encrypt `plaintext` under a brand new key and nonce drawn from `rng`
///
/// `rng` must be a cryptographically secure generator. Seeded generators are
/// for reproducibility tests only.
pub fn encrypt_with_rng<R>(rng: &mut R, plaintext: &[u8]) -> Result<SymmetricOutput, SecretError>
where
    R: CryptoRngCore,
{
    let secret = Secret::generate_with_rng(rng)?;
    let (nonce, sealed) = secret.encrypt_detached(rng, plaintext)?;
    Ok(SymmetricOutput {
        secret,
        nonce,
        sealed,
    })
}

/// Decrypt raw envelope material
///
/// Wrong key, nonce or tag lengths are reported as `AuthenticationFailed`,
/// the same as a tag mismatch.
pub fn decrypt(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, SecretError> {
    let secret = Secret::from_slice(key).map_err(|_| SecretError::AuthenticationFailed)?;
    let nonce: [u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| SecretError::AuthenticationFailed)?;
    let tag: [u8; TAG_SIZE] = tag
        .try_into()
        .map_err(|_| SecretError::AuthenticationFailed)?;

    secret.decrypt_detached(
        &nonce,
        &AuthenticatedCiphertext {
            ciphertext: ciphertext.to_vec(),
            tag,
        },
    )
}
