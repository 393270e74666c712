//! `conversion-cardinality` aggregates per-goal conversion statistics.
//!
//! Each conversion record carries an exact action count and a HyperLogLog estimator of
//! unique actions. Records are filtered by a set of goal types, then either their counts
//! are summed exactly or their estimators are merged into a single estimator.
//!
//! The estimator uses HyperLogLog with LogLog-Beta bias correction and switches between
//! explicit, sparse and full representations to keep small sets small.
mod beta;
pub mod aggregate;
pub mod codec;
pub mod config;
pub mod error;
pub mod estimator;
mod explicit;
pub mod filter;
mod full;
pub mod host;
pub mod record;
mod representation;
#[cfg(feature = "with_serde")]
mod serde;
mod sparse;

pub use aggregate::{sum_action_count, union_action_count, union_action_count_with};
pub use config::{ExplicitThreshold, PrecisionConfig};
pub use error::{ConfigError, DecodeError, Error};
pub use estimator::Estimator;
pub use filter::{filter_records, GoalTypeSet};
pub use host::{sum_conv_action_count, union_conv_action_count, Value};
pub use record::ConversionRecord;
pub use representation::Layout;
