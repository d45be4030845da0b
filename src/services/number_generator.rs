//! Account number generation.
//!
//! Numbers are drawn uniformly from `[0, upper)`. They are not checked for
//! uniqueness.

use std::{num::NonZeroU32, sync::Mutex};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Default exclusive upper bound for generated account numbers.
pub const DEFAULT_ACCOUNT_NUMBER_RANGE: NonZeroU32 = NonZeroU32::new(100_000).unwrap();

/// Source of account numbers for new accounts.
pub trait AccountNumberGenerator: Send + Sync {
    fn next_number(&self) -> i64;
}

/// Draws from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomAccountNumbers {
    upper: i64,
}

impl RandomAccountNumbers {
    pub fn new(upper: NonZeroU32) -> Self {
        Self {
            upper: i64::from(upper.get()),
        }
    }
}

impl Default for RandomAccountNumbers {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_NUMBER_RANGE)
    }
}

impl AccountNumberGenerator for RandomAccountNumbers {
    fn next_number(&self) -> i64 {
        rand::rng().random_range(0..self.upper)
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug)]
pub struct SeededAccountNumbers {
    rng: Mutex<StdRng>,
    upper: i64,
}

impl SeededAccountNumbers {
    pub fn new(seed: u64, upper: NonZeroU32) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            upper: i64::from(upper.get()),
        }
    }
}

impl AccountNumberGenerator for SeededAccountNumbers {
    fn next_number(&self) -> i64 {
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(upper: u32) -> NonZeroU32 {
        NonZeroU32::new(upper).unwrap()
    }

    #[test]
    fn random_numbers_stay_in_range() {
        let generator = RandomAccountNumbers::new(range(10));
        for _ in 0..1000 {
            let number = generator.next_number();
            assert!((0..10).contains(&number));
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = SeededAccountNumbers::new(42, DEFAULT_ACCOUNT_NUMBER_RANGE);
        let b = SeededAccountNumbers::new(42, DEFAULT_ACCOUNT_NUMBER_RANGE);

        let first: Vec<i64> = (0..5).map(|_| a.next_number()).collect();
        let second: Vec<i64> = (0..5).map(|_| b.next_number()).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|n| (0..100_000).contains(n)));
    }

    #[test]
    fn range_of_one_always_gives_zero() {
        let random = RandomAccountNumbers::new(range(1));
        let seeded = SeededAccountNumbers::new(9, range(1));
        for _ in 0..100 {
            assert_eq!(random.next_number(), 0);
            assert_eq!(seeded.next_number(), 0);
        }
    }

    #[test]
    fn full_u32_range_is_accepted() {
        let generator = SeededAccountNumbers::new(3, range(u32::MAX));
        for _ in 0..100 {
            assert!((0..i64::from(u32::MAX)).contains(&generator.next_number()));
        }
    }
}
