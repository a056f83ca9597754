//! Weighted discrete choice
//!
//! A table of `(weight, value)` pairs sampled with one uniform draw over
//! `[0, total)`; the first entry whose cumulative weight exceeds the draw wins.

use rand::Rng;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(u32, T)>,
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new(entries: Vec<(u32, T)>) -> Result<Self, ConfigError> {
        let total = entries
            .iter()
            .try_fold(0u32, |acc, (w, _)| acc.checked_add(*w))
            .ok_or(ConfigError::WeightOverflow)?;
        if total == 0 {
            return Err(ConfigError::EmptyWeights);
        }
        Ok(Self { entries, total })
    }

    /// Resolve a draw in `[0, total)` to its bucket
    pub fn pick(&self, draw: u32) -> T {
        let mut cumulative = 0;
        for &(weight, value) in &self.entries {
            cumulative += weight;
            if draw < cumulative {
                return value;
            }
        }
        // Only reachable for draws >= total; clamp to the last weighted entry.
        self.entries
            .iter()
            .rev()
            .find(|(w, _)| *w > 0)
            .map(|(_, v)| *v)
            .unwrap_or(self.entries[0].1)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let draw = rng.random_range(0..self.total);
        self.pick(draw)
    }
}
