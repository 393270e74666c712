//! Precision configuration of an [`Estimator`](crate::Estimator).
//!
//! The configuration is defined by four parameters:
//! - `log2m`: number of bits used for register indices, in [4..18] range,
//!   giving `m = 2^log2m` registers.
//! - `regwidth`: number of bits per register, in [1..8] range.
//! - `expthresh`: capacity of the explicit representation (exact set of hashes)
//!   before switching to registers.
//! - `sparse`: whether registers are first stored sparsely (only non-zero ones).
//!
//! Expected error of the register representations is `1.04 / sqrt(m)`:
//!   log2m = 10: 3.25%
//!   log2m = 12: 1.62%
//!   log2m = 14: 0.81%

use std::fmt::{Display, Formatter};

use crate::error::ConfigError;

/// Smallest supported `log2m`, bound by the LogLog-Beta coefficient table
pub const MIN_LOG2M: u8 = 4;
/// Largest supported `log2m`, bound by the LogLog-Beta coefficient table
pub const MAX_LOG2M: u8 = 18;
/// Largest supported register width
pub const MAX_REGWIDTH: u8 = 8;
/// Largest explicit threshold exponent
pub const MAX_EXPLICIT_EXPONENT: u8 = 18;

/// Capacity policy of the explicit representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplicitThreshold {
    /// Keep hashes explicitly while they take no more bytes than full registers
    Auto,
    /// Go straight to registers
    Disabled,
    /// Keep up to `2^(k - 1)` hashes explicitly
    Exponent(u8),
}

/// Validated estimator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecisionConfig {
    log2m: u8,
    regwidth: u8,
    expthresh: ExplicitThreshold,
    sparse: bool,
}

impl PrecisionConfig {
    /// Create a configuration with auto explicit threshold and sparse representation enabled
    pub fn new(log2m: u8, regwidth: u8) -> Result<Self, ConfigError> {
        if !(MIN_LOG2M..=MAX_LOG2M).contains(&log2m) {
            return Err(ConfigError::Log2mOutOfRange(log2m));
        }
        if !(1..=MAX_REGWIDTH).contains(&regwidth) {
            return Err(ConfigError::RegwidthOutOfRange(regwidth));
        }
        Ok(Self {
            log2m,
            regwidth,
            expthresh: ExplicitThreshold::Auto,
            sparse: true,
        })
    }

    /// Return configuration with given explicit threshold
    pub fn with_explicit_threshold(
        mut self,
        expthresh: ExplicitThreshold,
    ) -> Result<Self, ConfigError> {
        if let ExplicitThreshold::Exponent(k) = expthresh {
            if !(1..=MAX_EXPLICIT_EXPONENT).contains(&k) {
                return Err(ConfigError::ExplicitExponentOutOfRange(k));
            }
        }
        self.expthresh = expthresh;
        Ok(self)
    }

    /// Return configuration with sparse representation enabled or disabled
    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    /// Canonical aggregation configuration: 4096 registers of 5 bits,
    /// up to 128 explicit hashes, sparse representation disabled.
    pub const fn canonical() -> Self {
        Self {
            log2m: 12,
            regwidth: 5,
            expthresh: ExplicitThreshold::Exponent(8),
            sparse: false,
        }
    }

    #[inline]
    pub fn log2m(&self) -> u8 {
        self.log2m
    }

    #[inline]
    pub fn regwidth(&self) -> u8 {
        self.regwidth
    }

    #[inline]
    pub fn explicit(&self) -> ExplicitThreshold {
        self.expthresh
    }

    #[inline]
    pub fn sparse(&self) -> bool {
        self.sparse
    }

    /// Number of registers
    #[inline]
    pub fn registers(&self) -> usize {
        1 << self.log2m
    }

    /// Largest rank a register can hold: bounded by both register width
    /// and number of hash bits left after the register index.
    #[inline]
    pub fn max_rank(&self) -> u8 {
        let by_width = (1u32 << self.regwidth) - 1;
        let by_hash = 64 - u32::from(self.log2m);
        // at most 255, so always fits
        by_width.min(by_hash) as u8
    }

    /// Number of bytes used by the full representation
    #[inline]
    pub(crate) fn full_bytes(&self) -> usize {
        (self.registers() * usize::from(self.regwidth)).div_ceil(8)
    }

    /// Maximum number of hashes held by the explicit representation
    pub fn explicit_threshold(&self) -> usize {
        match self.expthresh {
            ExplicitThreshold::Auto => self.full_bytes() / 8,
            ExplicitThreshold::Disabled => 0,
            ExplicitThreshold::Exponent(k) => 1 << (k - 1),
        }
    }

    /// Maximum number of non-zero registers held by the sparse representation,
    /// chosen so that the sparse encoding stays strictly smaller than the full one.
    pub fn sparse_threshold(&self) -> Option<usize> {
        if !self.sparse {
            return None;
        }
        let full_bits = self.registers() * usize::from(self.regwidth);
        Some((full_bits - 1) / self.sparse_entry_bits())
    }

    /// Number of bits of a single encoded sparse entry
    #[inline]
    pub(crate) fn sparse_entry_bits(&self) -> usize {
        usize::from(self.log2m) + usize::from(self.regwidth)
    }

    /// Split hash into register index (lowest `log2m` bits) and rank
    /// (position of the lowest set bit among remaining bits).
    #[inline]
    pub(crate) fn index_and_rank(&self, hash: u64) -> (u32, u8) {
        let idx = (hash & ((1 << self.log2m) - 1)) as u32;
        let substream = hash >> self.log2m;
        if substream == 0 {
            return (idx, 0);
        }
        let rank = (substream.trailing_zeros() + 1).min(u32::from(self.max_rank()));
        (idx, rank as u8)
    }
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Display for PrecisionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let expthresh = match self.expthresh {
            ExplicitThreshold::Auto => "auto".to_string(),
            ExplicitThreshold::Disabled => "disabled".to_string(),
            ExplicitThreshold::Exponent(k) => k.to_string(),
        };
        write!(
            f,
            "{{ log2m: {}, regwidth: {}, expthresh: {}, sparse: {} }}",
            self.log2m, self.regwidth, expthresh, self.sparse
        )
    }
}
