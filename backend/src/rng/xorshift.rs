//! xorshift64* random number generator
//!
//! xorshift64* passes TestU01's BigCrush with 64-bit state and output.
//! Same seed → same sequence, so synthetic logs are reproducible.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use atm_queue_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let service_minutes = rng.exponential(1.0 / 3.0); // mean 3 minutes
/// assert!(service_minutes >= 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed (zero is mapped to one)
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Random index in `[0, len)`
    ///
    /// # Panics
    /// Panics if `len` is zero
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "len must be positive");
        (self.next() % len as u64) as usize
    }

    /// Random f64 in `[0.0, 1.0)`
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Bernoulli trial with success probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Exponential sample with the given rate (mean `1 / rate`)
    ///
    /// # Panics
    /// Panics if `rate` is not positive
    pub fn exponential(&mut self, rate: f64) -> f64 {
        assert!(rate > 0.0, "rate must be positive");
        // 1 - u lies in (0, 1], so ln is finite
        -(1.0 - self.next_f64()).ln() / rate
    }

    /// Current state, usable as a seed to resume the sequence
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "len must be positive")]
    fn test_index_empty_panics() {
        RngManager::new(12345).index(0);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);
        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val), "next_f64() produced {}", val);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);
        for _ in 0..100 {
            assert_eq!(rng1.exponential(2.0), rng2.exponential(2.0));
        }
    }

    #[test]
    fn test_exponential_mean() {
        let mut rng = RngManager::new(7);
        let n = 50_000;
        let mean = (0..n).map(|_| rng.exponential(0.5)).sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.1, "mean was {}", mean);
    }
}
