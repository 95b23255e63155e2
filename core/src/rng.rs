//! Deterministic random number generation for fixture data.
//!
//! RULE: the fixture generator never calls a platform RNG.
//! All randomness flows through SeededRng streams derived from one
//! master seed, so the same seed always yields the same record set.
//!
//! Each stream is seeded from (master_seed XOR stream_index * golden ratio).
//! Adding a stream never changes the existing streams' output.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SeededRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn for_stream(master_seed: u64, stream: FixtureStream) -> Self {
        Self::new(master_seed, stream as u64).with_name(stream.name())
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [min, max], inclusive on both ends.
    pub fn int_between(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let offset = match max.abs_diff(min).checked_add(1) {
            Some(span) => self.next_u64_below(span),
            None => self.inner.next_u64(),
        };
        // min + offset <= max, so the wrapped sum is the exact result.
        min.wrapping_add(offset as i64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }
}

/// Stable stream assignments for the fixture generator.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum FixtureStream {
    Contracts = 0,
    Assistance = 1,
}

impl FixtureStream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contracts => "contracts",
            Self::Assistance => "assistance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::for_stream(7, FixtureStream::Contracts);
        let mut b = SeededRng::for_stream(7, FixtureStream::Contracts);
        for _ in 0..32 {
            assert_eq!(a.next_u64_below(1_000_000), b.next_u64_below(1_000_000));
        }
    }

    #[test]
    fn streams_diverge() {
        let mut a = SeededRng::for_stream(7, FixtureStream::Contracts);
        let mut b = SeededRng::for_stream(7, FixtureStream::Assistance);
        let draws_a: Vec<u64> = (0..8).map(|_| a.next_u64_below(u64::MAX)).collect();
        let draws_b: Vec<u64> = (0..8).map(|_| b.next_u64_below(u64::MAX)).collect();
        assert_ne!(draws_a, draws_b);
        assert_eq!(a.name, "contracts");
    }

    #[test]
    fn int_between_stays_in_bounds() {
        let mut rng = SeededRng::new(99, 0);
        for _ in 0..1000 {
            let v = rng.int_between(50_000, 2_000_000);
            assert!((50_000..=2_000_000).contains(&v));
        }
        assert_eq!(rng.int_between(5, 5), 5);
    }

    #[test]
    fn int_between_handles_extreme_bounds() {
        let mut rng = SeededRng::new(3, 0);
        for _ in 0..100 {
            let v = rng.int_between(i64::MIN, 1_000_000);
            assert!(v <= 1_000_000);
            rng.int_between(i64::MIN, i64::MAX);
            let w = rng.int_between(-10, 10);
            assert!((-10..=10).contains(&w));
        }
    }
}
