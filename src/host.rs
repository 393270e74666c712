//! Host entry points.
//!
//! The host hands over conversion statistics as rows of dynamically typed [`Value`]s
//! and goal types as strings. Rows are decoded into [`ConversionRecord`]s up front,
//! so a malformed row fails the call before any aggregation happens. Each entry point
//! validates only the columns it reads: the sum never touches the estimator column.

use tracing::debug;

use crate::aggregate::{sum_action_count, union_action_count};
use crate::error::Error;
use crate::filter::GoalTypeSet;
use crate::record::ConversionRecord;

/// Single column value of a host row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Sum action counts of rows whose conversion type is one of `goal_types`.
pub fn sum_conv_action_count<R, G>(rows: &[R], goal_types: &[G]) -> Result<i64, Error>
where
    R: AsRef<[Value]>,
    G: AsRef<str>,
{
    let (records, goals) = prepare(rows, goal_types, ConversionRecord::counts_from_row)?;
    sum_action_count(&records, &goals)
}

/// Union unique action estimators of rows whose conversion type is one of `goal_types`.
///
/// Returns the merged estimator in its encoded form.
pub fn union_conv_action_count<R, G>(rows: &[R], goal_types: &[G]) -> Result<Vec<u8>, Error>
where
    R: AsRef<[Value]>,
    G: AsRef<str>,
{
    let (records, goals) = prepare(rows, goal_types, |row| ConversionRecord::try_from(row))?;
    let union = union_action_count(&records, &goals)?;
    Ok(union.to_bytes())
}

fn prepare<R, G, F>(
    rows: &[R],
    goal_types: &[G],
    decode: F,
) -> Result<(Vec<ConversionRecord>, GoalTypeSet), Error>
where
    R: AsRef<[Value]>,
    G: AsRef<str>,
    F: Fn(&[Value]) -> Result<ConversionRecord, Error>,
{
    let records = rows
        .iter()
        .map(|row| decode(row.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let goals: GoalTypeSet = goal_types.iter().map(|goal| goal.as_ref()).collect();
    debug!(rows = records.len(), goals = goals.len(), "decoded host rows");
    Ok((records, goals))
}
