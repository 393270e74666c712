//! HyperLogLog cardinality estimator with value semantics.
//!
//! # Data-structure design rationale
//!
//! ## Low memory footprint
//! Depending on how many distinct elements were inserted, the estimator uses one of three
//! representations (see [`Layout`]):
//! - explicit: sorted raw 64-bit hashes, exact cardinality up to the explicit threshold,
//! - sparse: only non-zero registers, while smaller than the full register array,
//! - full: `M = 2^log2m` registers of `regwidth` bits bit-packed into `u32` words.
//!
//! ## Deterministic unions
//! The representation is a function of the estimator's content only, never of the
//! order of inserts or merges. Therefore `a.union(&b) == b.union(&a)` and union is
//! associative bit-for-bit, including the encoded form.
//!
//! ## High accuracy
//! - In explicit range cardinality is counted exactly (within hash collisions chance).
//! - In register range HyperLogLog is used with LogLog-Beta bias correction.
//!   Expected error is `1.04 / sqrt(M)`, e.g. 1.62% for `log2m = 12`.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use tracing::trace;
use wyhash::WyHash;

use crate::codec;
use crate::config::PrecisionConfig;
use crate::error::{DecodeError, Error};
use crate::representation::{Layout, Representation, RepresentationTrait};

/// HyperLogLog estimator of distinct elements count
#[derive(Clone, PartialEq, Eq)]
pub struct Estimator {
    config: PrecisionConfig,
    repr: Representation,
}

impl Estimator {
    /// Creates new empty estimator with canonical configuration
    #[inline]
    pub fn new() -> Self {
        Self::empty(PrecisionConfig::canonical())
    }

    /// Creates new empty estimator for given configuration
    #[inline]
    pub fn empty(config: PrecisionConfig) -> Self {
        Self {
            config,
            repr: Representation::default(),
        }
    }

    /// Creates estimator from an already canonical representation
    #[inline]
    pub(crate) fn from_parts(config: PrecisionConfig, repr: Representation) -> Self {
        Self { config, repr }
    }

    #[inline]
    pub fn config(&self) -> PrecisionConfig {
        self.config
    }

    /// Return current layout of the estimator
    #[inline]
    pub fn layout(&self) -> Layout {
        self.repr.layout()
    }

    #[inline]
    pub(crate) fn representation(&self) -> &Representation {
        &self.repr
    }

    /// Insert a hashable item into `Estimator`
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let hash = BuildHasherDefault::<WyHash>::default().hash_one(item);
        self.insert_hash(hash);
    }

    /// Insert hash into `Estimator`
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        if !self.repr.insert_hash(hash, &self.config) {
            let pending = self.config.index_and_rank(hash);
            self.promote(pending);
        }
    }

    /// Return cardinality estimate
    #[inline]
    pub fn cardinality(&self) -> f64 {
        self.repr.cardinality(&self.config)
    }

    /// Return cardinality estimate rounded to the nearest integer
    #[inline]
    pub fn estimate(&self) -> usize {
        (self.cardinality() + 0.5) as usize
    }

    /// Merge `rhs` into this estimator, leaving `rhs` untouched.
    ///
    /// Fails with [`Error::ConfigMismatch`] if the configurations differ.
    pub fn merge(&mut self, rhs: &Self) -> Result<(), Error> {
        if self.config != rhs.config {
            return Err(Error::ConfigMismatch {
                left: self.config,
                right: rhs.config,
            });
        }

        match &rhs.repr {
            Representation::Explicit(explicit) => {
                // when `rhs` has explicit representation - just insert its hashes into `self`
                for &h in explicit.items() {
                    self.insert_hash(h);
                }
            }
            rhs_repr => match self.repr {
                Representation::Explicit(ref mut explicit) => {
                    // when `self` has explicit representation - save its hashes,
                    // make copy of `rhs` registers into `self` and then insert saved hashes
                    let saved = std::mem::take(explicit);
                    self.repr = rhs_repr.clone();
                    for &h in saved.items() {
                        self.insert_hash(h);
                    }
                }
                Representation::Full(ref mut lhs) => match rhs_repr {
                    Representation::Full(full) => lhs.merge(full, &self.config),
                    _ => {
                        for (idx, rank) in rhs_repr.registers(&self.config) {
                            lhs.update(idx, rank, self.config.regwidth());
                        }
                    }
                },
                Representation::Sparse(_) => {
                    for (idx, rank) in rhs_repr.registers(&self.config) {
                        self.update_register(idx, rank);
                    }
                }
            },
        }

        Ok(())
    }

    /// Return union of two estimators as a new estimator
    pub fn union(&self, rhs: &Self) -> Result<Self, Error> {
        let mut result = self.clone();
        result.merge(rhs)?;
        Ok(result)
    }

    /// Encode estimator into its binary form
    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Decode estimator from its binary form
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(bytes)
    }

    /// Return memory size of `Estimator`
    pub fn size_of(&self) -> usize {
        std::mem::size_of::<PrecisionConfig>() + self.repr.size_of()
    }

    /// Raise a single register, promoting sparse representation when it runs out of room
    fn update_register(&mut self, idx: u32, rank: u8) {
        let updated = match self.repr {
            Representation::Sparse(ref mut sparse) => {
                sparse.update(idx, rank, self.config.sparse_threshold().unwrap_or(0))
            }
            Representation::Full(ref mut full) => {
                full.update(idx, rank, self.config.regwidth());
                true
            }
            Representation::Explicit(_) => false,
        };
        if !updated {
            self.promote((idx, rank));
        }
    }

    /// Rebuild representation from current registers plus the `pending` one
    fn promote(&mut self, pending: (u32, u8)) {
        let from = self.repr.layout();
        let mut registers = self.repr.registers(&self.config);
        registers.push(pending);
        self.repr = Representation::from_registers(&self.config, registers);
        trace!(?from, to = ?self.repr.layout(), "promoted estimator representation");
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Estimator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ layout: {:?}, estimate: {}, size: {} }}",
            self.layout(),
            self.estimate(),
            self.size_of()
        )
    }
}
