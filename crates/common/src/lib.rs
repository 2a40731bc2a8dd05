/**
 * Cryptographic types and operations.
 *  - AES-256-GCM content encryption
 *  - RSA key pairs and PEM interchange
 *  - RSA-OAEP key wrapping
 */
pub mod crypto;
/**
 * The hybrid envelope protocol: seal/open
 *  and the JSON transport format.
 */
pub mod envelope;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

#[cfg(test)]
mod testkit;

pub mod prelude {
    pub use crate::crypto::{KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS};
    pub use crate::envelope::{open, open_json, seal, Envelope, EnvelopeError};
    pub use crate::version::build_info;
}
