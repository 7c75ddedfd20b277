//! Confidence jitter sources.
//!
//! Confidence is a base value plus a small bounded offset. The offset comes
//! from an injected source so a classification can always be replayed.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Supplies the confidence offset for one request.
pub trait JitterSource {
    /// A value in `min..=max`. Implementations must tolerate `min == max`.
    fn next_jitter(&mut self, request_id: Uuid, min: u8, max: u8) -> u8;
}

/// Jitter drawn from any `rand` generator.
pub struct RngJitter<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> JitterSource for RngJitter<R> {
    fn next_jitter(&mut self, _request_id: Uuid, min: u8, max: u8) -> u8 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Jitter derived from the request id alone.
///
/// The same request id always yields the same offset, so a result can be
/// reproduced from its id without storing generator state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestJitter;

impl JitterSource for DigestJitter {
    fn next_jitter(&mut self, request_id: Uuid, min: u8, max: u8) -> u8 {
        if min >= max {
            return min;
        }
        let digest = Sha256::digest(request_id.as_bytes());
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let span = (max - min) as u64 + 1;
        min + (u64::from_be_bytes(word) % span) as u8
    }
}

/// Always the same offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub u8);

impl JitterSource for FixedJitter {
    fn next_jitter(&mut self, _request_id: Uuid, min: u8, max: u8) -> u8 {
        self.0.clamp(min, max.max(min))
    }
}
