//! Error types shared by the estimator, its codec and the aggregation pipeline.

use thiserror::Error;

use crate::config::PrecisionConfig;

/// Aggregation and estimator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot union estimators with different configurations: {left} vs {right}")]
    ConfigMismatch {
        left: PrecisionConfig,
        right: PrecisionConfig,
    },

    #[error("invalid estimator configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("failed to decode estimator: {0}")]
    Decode(#[from] DecodeError),

    #[error("sum of action counts overflows a 64-bit signed integer")]
    Overflow,

    #[error("invalid conversion record at column {column}: {reason}")]
    InvalidRecord { column: usize, reason: &'static str },
}

/// Precision parameter validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("log2m must be in [4..18], got {0}")]
    Log2mOutOfRange(u8),

    #[error("regwidth must be in [1..8], got {0}")]
    RegwidthOutOfRange(u8),

    #[error("explicit threshold exponent must be in [1..18], got {0}")]
    ExplicitExponentOutOfRange(u8),
}

/// Binary estimator decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown layout {0}")]
    UnknownLayout(u8),

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error("invalid payload: {0}")]
    InvalidPayload(&'static str),

    #[error("invalid configuration in header: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("register {index} holds {value}, above maximum rank {max}")]
    RegisterOverflow { index: u32, value: u8, max: u8 },
}
