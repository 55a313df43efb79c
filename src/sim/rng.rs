//! Seeded linear congruential generator for level content
//!
//! The recurrence is fixed so that a level index always produces the same
//! layout. The step is a pure function; `SeededRng` is a `Copy` wrapper, so a
//! generator can be snapshotted and replayed by value.

use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// One LCG step: returns the value in [0, 1) and the next seed
#[inline]
pub fn lcg_step(seed: u64) -> (f64, u64) {
    // (a*b) mod m == ((a mod m)*b) mod m, so reducing first keeps this in range
    let next = ((seed % MODULUS) * MULTIPLIER + INCREMENT) % MODULUS;
    (next as f64 / MODULUS as f64, next)
}

/// Deterministic random stream from an integer seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    seed: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Current internal seed (the state to replay from)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f64 {
        let (value, seed) = lcg_step(self.seed);
        self.seed = seed;
        value
    }

    /// Integer in [min, max], inclusive
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        (self.next() * f64::from(max - min + 1)).floor() as i32 + min
    }

    /// True with the given probability
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }
}
