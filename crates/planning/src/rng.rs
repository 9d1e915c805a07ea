//! Seedable RNG for the optimizer.
//!
//! Wraps `ChaCha8Rng` so a given seed produces the same candidate vectors on
//! every platform. Nothing in the crate draws from `rand::thread_rng()`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed used when the optimizer config does not name one.
pub const DEFAULT_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// PlanningRng
// ---------------------------------------------------------------------------

/// Deterministic random source. Use `rng.0` as a `rand::Rng`.
#[derive(Debug, Clone)]
pub struct PlanningRng(pub ChaCha8Rng);

impl Default for PlanningRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl PlanningRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
