//! Shared fixtures for unit tests
//!
//! RSA key generation dominates test time, so each test binary generates its
//! two key pairs once and hands out references.

use std::sync::OnceLock;

use rand_core::{CryptoRng, RngCore};

use crate::crypto::{KeyPair, DEFAULT_KEY_BITS};

static KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();
static OTHER_KEY_PAIR: OnceLock<KeyPair> = OnceLock::new();

pub fn key_pair() -> &'static KeyPair {
    KEY_PAIR.get_or_init(|| KeyPair::generate(DEFAULT_KEY_BITS).unwrap())
}

pub fn other_key_pair() -> &'static KeyPair {
    OTHER_KEY_PAIR.get_or_init(|| KeyPair::generate(DEFAULT_KEY_BITS).unwrap())
}

/// An entropy source that is always exhausted
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("FailingRng has no entropy")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("FailingRng has no entropy")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("FailingRng has no entropy")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy source unavailable"))
    }
}

impl CryptoRng for FailingRng {}

/// An entropy source that serves `budget` bytes, then fails
///
/// Like `OsRng`, the infallible methods panic once the source is dry.
pub struct BudgetRng {
    remaining: usize,
    counter: u8,
}

impl BudgetRng {
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: budget,
            counter: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl RngCore for BudgetRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.try_fill_bytes(dest) {
            panic!("BudgetRng exhausted: {}", e)
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if dest.len() > self.remaining {
            self.remaining = 0;
            return Err(rand_core::Error::new("entropy budget exhausted"));
        }
        self.remaining -= dest.len();
        for byte in dest.iter_mut() {
            self.counter = self.counter.wrapping_mul(31).wrapping_add(7);
            *byte = self.counter;
        }
        Ok(())
    }
}

impl CryptoRng for BudgetRng {}
