use enum_dispatch::enum_dispatch;

use crate::config::PrecisionConfig;
use crate::explicit::Explicit;
use crate::full::Full;
use crate::sparse::Sparse;

/// Representation types supported by `Estimator`.
///
/// The representation is always canonical for the estimator's content:
/// - `Explicit` while the hash set fits the explicit threshold (empty estimator included),
/// - `Sparse` while non-zero registers fit the sparse threshold,
/// - `Full` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[enum_dispatch]
pub(crate) enum Representation {
    Explicit(Explicit),
    Sparse(Sparse),
    Full(Full),
}

/// Representation trait which must be implemented by all representations.
#[enum_dispatch(Representation)]
pub(crate) trait RepresentationTrait {
    /// Insert hash, returning false if the representation must be promoted first.
    fn insert_hash(&mut self, hash: u64, config: &PrecisionConfig) -> bool;
    fn cardinality(&self, config: &PrecisionConfig) -> f64;
    /// Non-zero `(index, rank)` registers of the representation
    fn registers(&self, config: &PrecisionConfig) -> Vec<(u32, u8)>;
    fn size_of(&self) -> usize;
}

/// Physical layout of an estimator, shared by memory and the binary encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Empty = 1,
    Explicit = 2,
    Sparse = 3,
    Full = 4,
}

impl TryFrom<u8> for Layout {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Layout::Empty),
            2 => Ok(Layout::Explicit),
            3 => Ok(Layout::Sparse),
            4 => Ok(Layout::Full),
            other => Err(other),
        }
    }
}

impl Representation {
    /// Return layout of the representation
    #[inline]
    pub(crate) fn layout(&self) -> Layout {
        match self {
            Representation::Explicit(e) if e.is_empty() => Layout::Empty,
            Representation::Explicit(_) => Layout::Explicit,
            Representation::Sparse(_) => Layout::Sparse,
            Representation::Full(_) => Layout::Full,
        }
    }

    /// Build canonical register representation from (possibly repeated) registers.
    ///
    /// Zero registers collapse to the empty explicit representation.
    pub(crate) fn from_registers(
        config: &PrecisionConfig,
        registers: impl IntoIterator<Item = (u32, u8)>,
    ) -> Self {
        let sparse: Sparse = registers.into_iter().collect();
        if sparse.is_empty() {
            return Representation::Explicit(Explicit::default());
        }
        match config.sparse_threshold() {
            Some(threshold) if sparse.len() <= threshold => Representation::Sparse(sparse),
            _ => {
                let mut full = Full::new(config);
                for (idx, rank) in sparse.iter() {
                    full.update(idx, rank, config.regwidth());
                }
                Representation::Full(full)
            }
        }
    }
}

impl Default for Representation {
    fn default() -> Self {
        Representation::Explicit(Explicit::default())
    }
}
