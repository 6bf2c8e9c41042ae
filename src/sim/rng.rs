//! Injectable randomness
//!
//! Spawn placement, spawn archetype, order contents and AI personality are the
//! only random decisions in the simulation. They all go through one
//! [`RandomSource`] owned by the world, so a seeded or scripted source makes a
//! run fully reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// The single source of randomness consumed by the simulation
pub trait RandomSource {
    /// Uniform float in [0, 1)
    fn next_f32(&mut self) -> f32;
    /// Uniform integer in [0, bound); returns 0 when `bound` is 0
    fn below(&mut self, bound: u32) -> u32;
}

/// Pcg32 seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of unit floats, cycling when exhausted.
///
/// `below(n)` maps the next value `v` to `floor(v * n)`, so a script of
/// `[0.0]` always picks the first option and zero jitter.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<f32>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    fn advance(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 0.999_999)
    }
}

impl RandomSource for SequenceRng {
    fn next_f32(&mut self) -> f32 {
        self.advance()
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let v = self.advance();
        ((v * bound as f32) as u32).min(bound - 1)
    }
}
