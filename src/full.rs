//! ## Full representation
//! Allows to estimate large cardinality with `M` HyperLogLog registers of `W` width,
//! where `M` and `W` come from the estimator's [`PrecisionConfig`].
//!
//! [Original HyperLogLog++ paper](https://static.googleusercontent.com/media/research.google.com/en//pubs/archive/40671.pdf)
//!
//! Registers are bit-packed into `u32` words, `W` bits per register, with one extra
//! word at the end for branchless register updates (see `set_register` for more details).

use std::mem::{size_of, size_of_val};

use crate::beta::loglog_beta;
use crate::config::PrecisionConfig;
use crate::representation::RepresentationTrait;

/// Full representation container
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Full {
    words: Vec<u32>,
}

impl Full {
    /// Create new instance of `Full` representation with all registers set to zero
    #[inline]
    pub(crate) fn new(config: &PrecisionConfig) -> Self {
        let bits = config.registers() * usize::from(config.regwidth());
        Self {
            words: vec![0u32; bits.div_ceil(32) + 1],
        }
    }

    /// Get HyperLogLog `idx` register
    #[inline]
    pub(crate) fn get_register(&self, idx: u32, width: u8) -> u8 {
        let width = usize::from(width);
        let bit_idx = (idx as usize) * width;
        let u32_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &self.words[u32_idx..u32_idx + 2];
        let bits_1 = width.min(32 - bit_pos);
        let bits_2 = width - bits_1;
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;

        (((bits[0] >> bit_pos) & mask_1) | ((bits[1] & mask_2) << bits_1)) as u8
    }

    /// Set HyperLogLog `idx` register to new value `rank`
    #[inline]
    fn set_register(&mut self, idx: u32, width: u8, rank: u8) {
        let width = usize::from(width);
        let rank = u32::from(rank);
        let bit_idx = (idx as usize) * width;
        let u32_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &mut self.words[u32_idx..u32_idx + 2];
        let bits_1 = width.min(32 - bit_pos);
        let bits_2 = width - bits_1;
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;

        // Unconditionally update two `u32` elements based on `rank` bits and masks
        bits[0] &= !(mask_1 << bit_pos);
        bits[0] |= (rank & mask_1) << bit_pos;
        bits[1] &= !mask_2;
        bits[1] |= (rank >> bits_1) & mask_2;
    }

    /// Raise register `idx` to `rank` if it is larger than the current one
    #[inline]
    pub(crate) fn update(&mut self, idx: u32, rank: u8, width: u8) {
        if rank > self.get_register(idx, width) {
            self.set_register(idx, width, rank);
        }
    }

    /// Merge two `Full` representations by taking per-register maximum
    #[inline]
    pub(crate) fn merge(&mut self, rhs: &Full, config: &PrecisionConfig) {
        let width = config.regwidth();
        for idx in 0..config.registers() as u32 {
            let rhs_rank = rhs.get_register(idx, width);
            if rhs_rank > self.get_register(idx, width) {
                self.set_register(idx, width, rhs_rank);
            }
        }
    }

    /// Iterate all registers, including zero ones
    #[inline]
    pub(crate) fn iter<'a>(&'a self, config: &PrecisionConfig) -> impl Iterator<Item = u8> + 'a {
        let width = config.regwidth();
        (0..config.registers() as u32).map(move |idx| self.get_register(idx, width))
    }
}

impl RepresentationTrait for Full {
    /// Insert hash into `Full` representation, which never runs out of capacity.
    #[inline]
    fn insert_hash(&mut self, hash: u64, config: &PrecisionConfig) -> bool {
        let (idx, rank) = config.index_and_rank(hash);
        self.update(idx, rank, config.regwidth());
        true
    }

    /// Return cardinality estimate of `Full` representation
    fn cardinality(&self, config: &PrecisionConfig) -> f64 {
        let (zeros, sum) = self.iter(config).fold((0usize, 0.0f64), |(zeros, sum), rank| {
            (zeros + usize::from(rank == 0), sum + 2f64.powi(-i32::from(rank)))
        });
        loglog_beta(config.log2m(), zeros, sum)
    }

    fn registers(&self, config: &PrecisionConfig) -> Vec<(u32, u8)> {
        self.iter(config)
            .zip(0u32..)
            .filter(|&(rank, _)| rank > 0)
            .map(|(rank, idx)| (idx, rank))
            .collect()
    }

    /// Return memory size of `Full`
    #[inline]
    fn size_of(&self) -> usize {
        size_of::<Vec<u32>>() + size_of_val(self.words.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4, 1)]
    #[test_case(4, 7)]
    #[test_case(12, 5)]
    #[test_case(12, 6)]
    #[test_case(10, 8)]
    fn test_registers_do_not_overlap(log2m: u8, regwidth: u8) {
        let config = PrecisionConfig::new(log2m, regwidth).unwrap();
        let mut full = Full::new(&config);
        let max = config.max_rank();
        // fill every third register with a rank derived from its index
        let expected = |idx: u32| if idx % 3 == 0 { (idx % u32::from(max)) as u8 + 1 } else { 0 };
        for idx in 0..config.registers() as u32 {
            full.update(idx, expected(idx), regwidth);
        }
        for idx in 0..config.registers() as u32 {
            assert_eq!(full.get_register(idx, regwidth), expected(idx), "register {idx}");
        }
        // extra word stays untouched
        assert_eq!(full.words.last(), Some(&0));
    }

    #[test]
    fn test_update_never_lowers() {
        let config = PrecisionConfig::canonical();
        let mut full = Full::new(&config);
        full.update(100, 7, 5);
        full.update(100, 3, 5);
        assert_eq!(full.get_register(100, 5), 7);
    }

    #[test]
    fn test_merge_takes_max() {
        let config = PrecisionConfig::canonical();
        let mut lhs = Full::new(&config);
        let mut rhs = Full::new(&config);
        lhs.update(1, 4, 5);
        lhs.update(2, 1, 5);
        rhs.update(1, 2, 5);
        rhs.update(2, 9, 5);
        rhs.update(4095, 31, 5);
        lhs.merge(&rhs, &config);
        assert_eq!(lhs.registers(&config), vec![(1, 4), (2, 9), (4095, 31)]);
    }
}
