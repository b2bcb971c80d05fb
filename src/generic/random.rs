//! A source of pseudorandom numbers.
//!
//! Specifically, PCG32 (the XSH-RR output function over a 64-bit linear congruential generator) as described at <https://www.pcg-random.org/>, implemented to satisfy the [RngCore] trait.
//!
//! Each [context](crate::context) stores a source of rng, used when choosing an atom or polarity for a decision.
//! The context is paramaterised to anything which satisfies the [Rng](rand::Rng) trait, though a [Context](crate::context::Context) fixes the source to [Pcg32].
//!
//! ```rust
//! # use otter_smt::generic::random::Pcg32;
//! # use rand::{Rng, SeedableRng};
//! let mut rng = Pcg32::from_seed(7_u64.to_le_bytes());
//! let roll = rng.random_range(1..=6);
//! assert!((1..=6).contains(&roll));
//! ```

use rand::SeedableRng;
use rand_core::{impls, RngCore};

const MULTIPLIER: u64 = 6364136223846793005;

/// The stream selected by every seed.
const STREAM: u64 = 1442695040888963407;

/// State and increment.
#[derive(Clone, Debug)]
pub struct Pcg32 {
    state: u64,
    increment: u64,
}

impl Default for Pcg32 {
    fn default() -> Self {
        Pcg32::from_seed(0_u64.to_le_bytes())
    }
}

impl Pcg32 {
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(self.increment);
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.step();

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rotation = (old_state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for Pcg32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut rng = Pcg32 {
            state: 0,
            increment: (STREAM << 1) | 1,
        };
        rng.step();
        rng.state = rng.state.wrapping_add(u64::from_le_bytes(seed));
        rng.step();
        rng
    }
}
