//! Random Source Adapters

use crate::ports::RandomSource;
use parking_lot::Mutex;
use rand::Rng;

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn random_usize(&self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..max)
    }
}

/// Deterministic source for tests.
///
/// Replays `values` in order and then repeats the last one, so a short script
/// can force code collisions.
#[derive(Debug)]
pub struct FixedRandomSource {
    values: Vec<usize>,
    cursor: Mutex<usize>,
}

impl FixedRandomSource {
    pub fn new(values: Vec<usize>) -> Self {
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }

    /// Always returns the same value.
    pub fn constant(value: usize) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedRandomSource {
    fn random_usize(&self, max: usize) -> usize {
        if max == 0 || self.values.is_empty() {
            return 0;
        }
        let mut cursor = self.cursor.lock();
        let value = self.values[(*cursor).min(self.values.len() - 1)];
        *cursor += 1;
        value % max
    }
}
