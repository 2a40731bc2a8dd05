//! Any single-bit alteration of a sealed envelope must be detected

mod fixtures;

use common::envelope::{open, seal, Envelope, EnvelopeError};
use proptest::prelude::*;

use fixtures::{flip_bit, key_pair};

const PLAINTEXT: &[u8] = b"integrity protected payload, 64 bytes long for the tamper tests!";

fn sealed() -> Envelope {
    seal(key_pair().public(), PLAINTEXT).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn flipped_ciphertext_bit_fails_authentication(bit in 0usize..PLAINTEXT.len() * 8) {
        let mut envelope = sealed();
        flip_bit(&mut envelope.ciphertext, bit);
        prop_assert_eq!(open(key_pair().secret(), &envelope), Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn flipped_tag_bit_fails_authentication(bit in 0usize..128) {
        let mut envelope = sealed();
        flip_bit(&mut envelope.tag, bit);
        prop_assert_eq!(open(key_pair().secret(), &envelope), Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn flipped_nonce_bit_fails_authentication(bit in 0usize..96) {
        let mut envelope = sealed();
        flip_bit(&mut envelope.nonce, bit);
        prop_assert_eq!(open(key_pair().secret(), &envelope), Err(EnvelopeError::AuthenticationFailed));
    }

    #[test]
    fn flipped_wrapped_key_bit_fails_unwrap(bit in 0usize..2048) {
        let mut envelope = sealed();
        flip_bit(&mut envelope.enc_key, bit);
        prop_assert_eq!(open(key_pair().secret(), &envelope), Err(EnvelopeError::UnwrapFailed));
    }

    #[test]
    fn arbitrary_payloads_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let envelope = seal(key_pair().public(), &plaintext).unwrap();
        prop_assert_eq!(envelope.ciphertext.len(), plaintext.len());
        prop_assert_eq!(open(key_pair().secret(), &envelope).unwrap(), plaintext);
    }
}

#[test]
fn test_swapped_wrapped_keys_are_rejected() {
    let mut a = sealed();
    let b = sealed();
    a.enc_key = b.enc_key;

    // a valid wrapped key for the wrong payload unwraps fine, then fails GCM
    assert_eq!(
        open(key_pair().secret(), &a),
        Err(EnvelopeError::AuthenticationFailed)
    );
}
