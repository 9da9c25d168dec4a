//! RNG module - the random source behind tile spawning
//!
//! Spawning is the only randomness in the game, so it goes through the small
//! [`TileRng`] trait instead of an ambient global generator. [`SimpleRng`] is a
//! seedable LCG: the same seed always produces the same game.

/// Random source used by [`crate::spawn_random_tile`].
pub trait TileRng {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, max)
    ///
    /// Takes the high bits of `next_u32` (multiply-shift), which matters for LCGs
    /// whose low bits cycle quickly. `max` must be non-zero.
    fn next_range(&mut self, max: u32) -> u32 {
        assert!(max > 0, "next_range called with an empty range");
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Returns true with probability `percent / 100`.
    fn chance_percent(&mut self, percent: u32) -> bool {
        self.next_range(100) < percent
    }
}

impl<R: TileRng + ?Sized> TileRng for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current generator state (used to restart with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl TileRng for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
