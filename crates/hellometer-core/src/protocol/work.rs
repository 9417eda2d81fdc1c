//! Simulated work plan: base duration plus uniform jitter.
//!
//! Jitter is drawn from `[0, max(1, base/2 + 1))` milliseconds, so it is
//! always defined (and always zero) for `base = 0`.

use std::time::Duration;

use rand::Rng;

/// Exclusive upper bound of the jitter draw, in milliseconds.
pub fn jitter_upper_bound_ms(base_ms: u32) -> u32 {
    (base_ms / 2 + 1).max(1)
}

/// How long one request sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPlan {
    pub base_ms: u32,
    pub jitter_ms: u32,
}

impl WorkPlan {
    /// Draw a plan using the thread-local RNG.
    pub fn draw(base_ms: u32) -> Self {
        Self::draw_with(&mut rand::thread_rng(), base_ms)
    }

    pub fn draw_with<R: Rng + ?Sized>(rng: &mut R, base_ms: u32) -> Self {
        let jitter_ms = rng.gen_range(0..jitter_upper_bound_ms(base_ms));
        Self { base_ms, jitter_ms }
    }

    pub fn total_ms(&self) -> u64 {
        u64::from(self.base_ms) + u64::from(self.jitter_ms)
    }

    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms())
    }
}
