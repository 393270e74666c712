//! ## Explicit representation
//! Counts cardinality exactly in [0..N] range, where `N` is the configured explicit threshold.
//!
//! Stores raw 64-bit hashes in a sorted vector, which keeps equal sets bit-for-bit equal
//! regardless of insertion order. An empty explicit representation is the empty estimator.

use std::mem::{size_of, size_of_val};

use crate::config::PrecisionConfig;
use crate::representation::RepresentationTrait;

/// Explicit representation container
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Explicit {
    items: Vec<u64>,
}

impl Explicit {
    /// Return stored hashes in ascending order
    #[inline]
    pub(crate) fn items(&self) -> &[u64] {
        &self.items
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl RepresentationTrait for Explicit {
    /// Insert hash keeping items sorted.
    /// Returns false when the hash is new and explicit threshold is reached.
    #[inline]
    fn insert_hash(&mut self, hash: u64, config: &PrecisionConfig) -> bool {
        match self.items.binary_search(&hash) {
            Ok(_) => true,
            Err(_) if self.items.len() >= config.explicit_threshold() => false,
            Err(pos) => {
                self.items.insert(pos, hash);
                true
            }
        }
    }

    /// Exact number of distinct hashes
    #[inline]
    fn cardinality(&self, _config: &PrecisionConfig) -> f64 {
        self.items.len() as f64
    }

    /// Registers the stored hashes would occupy, zero ranks skipped
    fn registers(&self, config: &PrecisionConfig) -> Vec<(u32, u8)> {
        self.items
            .iter()
            .map(|&h| config.index_and_rank(h))
            .filter(|&(_, rank)| rank > 0)
            .collect()
    }

    #[inline]
    fn size_of(&self) -> usize {
        size_of::<Vec<u64>>() + size_of_val(self.items.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplicitThreshold;

    #[test]
    fn test_insert_sorted_and_deduplicated() {
        let config = PrecisionConfig::canonical();
        let mut explicit = Explicit::default();
        for h in [30, 10, 20, 10, 30] {
            assert!(explicit.insert_hash(h, &config));
        }
        assert_eq!(explicit.items(), &[10, 20, 30]);
        assert_eq!(explicit.cardinality(&config), 3.0);
    }

    #[test]
    fn test_insert_rejected_at_threshold() {
        let config = PrecisionConfig::canonical()
            .with_explicit_threshold(ExplicitThreshold::Exponent(2))
            .unwrap();
        let mut explicit = Explicit::default();
        assert!(explicit.insert_hash(1, &config));
        assert!(explicit.insert_hash(2, &config));
        // duplicates are still accepted once full
        assert!(explicit.insert_hash(2, &config));
        assert!(!explicit.insert_hash(3, &config));
        assert_eq!(explicit.items(), &[1, 2]);
    }

    #[test]
    fn test_registers_skip_zero_rank() {
        let config = PrecisionConfig::canonical();
        let mut explicit = Explicit::default();
        for h in [0x4005, 0x0fff, 0x1003] {
            assert!(explicit.insert_hash(h, &config));
        }
        assert_eq!(explicit.registers(&config), vec![(3, 1), (5, 3)]);
    }
}
