//! Fallible randomness for the RSA backend
//!
//! `rsa` draws OAEP seeds, blinding factors and prime candidates through the
//! infallible `fill_bytes`, and most generators panic there when entropy runs
//! out. [`GuardedRng`] routes every draw through `try_fill_bytes` instead.
//! After the first failure it records the error and serves a SHA-256 counter
//! stream so the backend still terminates; the caller must check
//! [`GuardedRng::failed`] and discard whatever the backend produced.

use rand_core::{impls, CryptoRng, CryptoRngCore, RngCore};
use sha2::{Digest, Sha256};

pub(crate) struct GuardedRng<'a, R> {
    inner: &'a mut R,
    failed: bool,
    counter: u64,
}

impl<'a, R> GuardedRng<'a, R>
where
    R: CryptoRngCore,
{
    pub(crate) fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            failed: false,
            counter: 0,
        }
    }

    /// Whether any draw fell back to the filler stream
    pub(crate) fn failed(&self) -> bool {
        self.failed
    }

    fn fill_fallback(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(32) {
            let block = Sha256::digest(self.counter.to_le_bytes());
            self.counter = self.counter.wrapping_add(1);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

impl<R> RngCore for GuardedRng<'_, R>
where
    R: CryptoRngCore,
{
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.failed || self.inner.try_fill_bytes(dest).is_err() {
            self.failed = true;
            self.fill_fallback(dest);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<R> CryptoRng for GuardedRng<'_, R> where R: CryptoRngCore {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testkit::{BudgetRng, FailingRng};

    #[test]
    fn test_passes_through_healthy_source() {
        let mut inner = BudgetRng::new(64);
        let mut rng = GuardedRng::new(&mut inner);

        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        assert!(!rng.failed());
        assert_eq!(inner.remaining(), 32);
    }

    #[test]
    fn test_failure_is_recorded_not_panicked() {
        let mut inner = FailingRng;
        let mut rng = GuardedRng::new(&mut inner);

        let mut buf = [0u8; 40];
        rng.fill_bytes(&mut buf);
        let _ = rng.next_u64();

        assert!(rng.failed());
        assert_ne!(buf, [0u8; 40]);
    }

    #[test]
    fn test_stays_failed_after_exhaustion() {
        let mut inner = BudgetRng::new(8);
        let mut rng = GuardedRng::new(&mut inner);

        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        assert!(rng.failed());

        let mut small = [0u8; 4];
        rng.fill_bytes(&mut small);
        assert!(rng.failed());
    }
}
