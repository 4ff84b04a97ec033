//! RNG module - deterministic random source for piece generation
//!
//! A small LCG is enough here: the only consumer is the catalog, which needs a
//! uniform pick among seven shapes and reproducible games for a given seed.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce a degenerate first value
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits, which are the well-mixed ones in an LCG.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (for restarting with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds_and_hits_every_value() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [0u32; 7];

        for _ in 0..7000 {
            let v = rng.next_range(7);
            assert!(v < 7);
            seen[v as usize] += 1;
        }

        // Roughly uniform: every bucket well above zero.
        for (i, count) in seen.iter().enumerate() {
            assert!(*count > 700, "bucket {} only hit {} times", i, count);
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }
}
