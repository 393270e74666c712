//! ## Sparse representation
//! Stores only non-zero HyperLogLog registers as an ordered `index -> rank` map.
//! Used while the encoded sparse form stays smaller than the full register array.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem::size_of;

use crate::beta::loglog_beta;
use crate::config::PrecisionConfig;
use crate::representation::RepresentationTrait;

/// Sparse representation container
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Sparse {
    registers: BTreeMap<u32, u8>,
}

impl Sparse {
    /// Raise register `idx` to `rank`.
    /// Returns false when a new register would exceed `threshold`.
    #[inline]
    pub(crate) fn update(&mut self, idx: u32, rank: u8, threshold: usize) -> bool {
        if rank == 0 {
            return true;
        }
        let len = self.registers.len();
        match self.registers.entry(idx) {
            Entry::Occupied(mut e) => {
                if rank > *e.get() {
                    e.insert(rank);
                }
                true
            }
            Entry::Vacant(_) if len >= threshold => false,
            Entry::Vacant(e) => {
                e.insert(rank);
                true
            }
        }
    }

    /// Number of non-zero registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.registers.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Iterate non-zero registers in ascending index order
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.registers.iter().map(|(&idx, &rank)| (idx, rank))
    }
}

impl RepresentationTrait for Sparse {
    #[inline]
    fn insert_hash(&mut self, hash: u64, config: &PrecisionConfig) -> bool {
        let (idx, rank) = config.index_and_rank(hash);
        // sparse representation only exists when threshold is configured
        let threshold = config.sparse_threshold().unwrap_or(0);
        self.update(idx, rank, threshold)
    }

    fn cardinality(&self, config: &PrecisionConfig) -> f64 {
        let zeros = config.registers() - self.registers.len();
        let sum = zeros as f64
            + self
                .registers
                .values()
                .map(|&rank| 2f64.powi(-i32::from(rank)))
                .sum::<f64>();
        loglog_beta(config.log2m(), zeros, sum)
    }

    fn registers(&self, _config: &PrecisionConfig) -> Vec<(u32, u8)> {
        self.iter().collect()
    }

    #[inline]
    fn size_of(&self) -> usize {
        size_of::<BTreeMap<u32, u8>>() + self.registers.len() * (size_of::<u32>() + size_of::<u8>())
    }
}

impl FromIterator<(u32, u8)> for Sparse {
    /// Collect registers keeping maximum rank per index and skipping zero ranks
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        let mut sparse = Sparse::default();
        for (idx, rank) in iter {
            sparse.update(idx, rank, usize::MAX);
        }
        sparse
    }
}
