//! Conversion statistics record and its decoding from host rows.
//!
//! A host row is a tuple of at least five columns:
//! - 0     - record id, ignored
//! - 1     - conversion type (text)
//! - 2     - ignored
//! - 3     - exact action count (64-bit integer)
//! - 4     - encoded estimator of unique actions (bytes)
//! - 5..   - ignored
//!
//! Ignored columns are never read, so hosts may pass wider rows.

use crate::error::{DecodeError, Error};
use crate::estimator::Estimator;
use crate::host::Value;

pub const CONVERSION_TYPE_COLUMN: usize = 1;
pub const ACTION_COUNT_COLUMN: usize = 3;
pub const ACTION_UU_COUNT_COLUMN: usize = 4;
/// Columns passed through unread
pub const IGNORED_COLUMNS: [usize; 3] = [0, 2, 5];

/// Per-record conversion statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord {
    conversion_type: String,
    action_count: i64,
    action_uu_count: Vec<u8>,
}

impl ConversionRecord {
    /// Create record from an in-memory estimator
    pub fn new(conversion_type: impl Into<String>, action_count: i64, estimator: &Estimator) -> Self {
        Self::from_encoded(conversion_type, action_count, estimator.to_bytes())
    }

    /// Create record from an already encoded estimator
    pub fn from_encoded(
        conversion_type: impl Into<String>,
        action_count: i64,
        action_uu_count: Vec<u8>,
    ) -> Self {
        Self {
            conversion_type: conversion_type.into(),
            action_count,
            action_uu_count,
        }
    }

    #[inline]
    pub fn conversion_type(&self) -> &str {
        &self.conversion_type
    }

    #[inline]
    pub fn action_count(&self) -> i64 {
        self.action_count
    }

    /// Encoded estimator of unique actions
    #[inline]
    pub fn encoded_estimator(&self) -> &[u8] {
        &self.action_uu_count
    }

    /// Decode estimator of unique actions
    pub fn estimator(&self) -> Result<Estimator, DecodeError> {
        Estimator::from_bytes(&self.action_uu_count)
    }

    /// Decode a host row reading only the conversion type and action count columns.
    ///
    /// The estimator column is left unread and the record carries no encoded estimator,
    /// so [`ConversionRecord::estimator`] fails on it.
    pub fn counts_from_row(row: &[Value]) -> Result<Self, Error> {
        let (conversion_type, action_count) = read_counts(row)?;
        Ok(Self::from_encoded(conversion_type, action_count, Vec::new()))
    }
}

impl TryFrom<&[Value]> for ConversionRecord {
    type Error = Error;

    fn try_from(row: &[Value]) -> Result<Self, Self::Error> {
        let (conversion_type, action_count) = read_counts(row)?;
        let action_uu_count = match column(row, ACTION_UU_COUNT_COLUMN)? {
            Value::Bytes(bytes) => bytes.clone(),
            other => return Err(unexpected(ACTION_UU_COUNT_COLUMN, other, "expected bytes")),
        };

        Ok(Self {
            conversion_type,
            action_count,
            action_uu_count,
        })
    }
}

fn read_counts(row: &[Value]) -> Result<(String, i64), Error> {
    let conversion_type = match column(row, CONVERSION_TYPE_COLUMN)? {
        Value::Text(text) => text.clone(),
        other => return Err(unexpected(CONVERSION_TYPE_COLUMN, other, "expected text")),
    };
    let action_count = match column(row, ACTION_COUNT_COLUMN)? {
        Value::Int(count) => *count,
        other => return Err(unexpected(ACTION_COUNT_COLUMN, other, "expected integer")),
    };
    Ok((conversion_type, action_count))
}

#[inline]
fn column(row: &[Value], idx: usize) -> Result<&Value, Error> {
    row.get(idx).ok_or(Error::InvalidRecord {
        column: idx,
        reason: "missing column",
    })
}

#[inline]
fn unexpected(column: usize, value: &Value, reason: &'static str) -> Error {
    match value {
        Value::Null => Error::InvalidRecord {
            column,
            reason: "unexpected null",
        },
        _ => Error::InvalidRecord { column, reason },
    }
}
