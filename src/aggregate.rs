//! Aggregation pipeline: a single pass of goal type filtering folded into either
//! an exact action count sum or a union of unique action estimators.
//!
//! Both aggregations are all-or-nothing: the first error aborts the pass and no
//! partial result is returned. Input records are only read.

use tracing::{debug, trace};

use crate::config::PrecisionConfig;
use crate::error::Error;
use crate::estimator::Estimator;
use crate::filter::{filter_records, GoalTypeSet};
use crate::record::ConversionRecord;

/// Sum action counts of records matching `goals`.
///
/// Fails with [`Error::Overflow`] instead of wrapping when the sum leaves the `i64` range.
pub fn sum_action_count<'a, I>(records: I, goals: &'a GoalTypeSet) -> Result<i64, Error>
where
    I: IntoIterator<Item = &'a ConversionRecord>,
    I::IntoIter: 'a,
{
    let (matched, sum) = filter_records(records, goals).try_fold(
        (0usize, 0i64),
        |(matched, sum), record| {
            let sum = sum
                .checked_add(record.action_count())
                .ok_or(Error::Overflow)?;
            Ok::<_, Error>((matched + 1, sum))
        },
    )?;
    debug!(matched, sum, goals = goals.len(), "summed action counts");
    Ok(sum)
}

/// Union unique action estimators of records matching `goals`,
/// starting from an empty estimator with canonical configuration.
pub fn union_action_count<'a, I>(records: I, goals: &'a GoalTypeSet) -> Result<Estimator, Error>
where
    I: IntoIterator<Item = &'a ConversionRecord>,
    I::IntoIter: 'a,
{
    union_action_count_with(records, goals, PrecisionConfig::canonical())
}

/// Union unique action estimators of records matching `goals`,
/// starting from an empty estimator with given configuration.
///
/// Every matching record's estimator must share `config`, otherwise
/// [`Error::ConfigMismatch`] is returned.
pub fn union_action_count_with<'a, I>(
    records: I,
    goals: &'a GoalTypeSet,
    config: PrecisionConfig,
) -> Result<Estimator, Error>
where
    I: IntoIterator<Item = &'a ConversionRecord>,
    I::IntoIter: 'a,
{
    let (matched, union) = filter_records(records, goals).try_fold(
        (0usize, Estimator::empty(config)),
        |(matched, mut union), record| {
            let estimator = record.estimator()?;
            trace!(
                conversion_type = record.conversion_type(),
                layout = ?estimator.layout(),
                "merging record estimator"
            );
            union.merge(&estimator)?;
            Ok::<_, Error>((matched + 1, union))
        },
    )?;
    debug!(matched, layout = ?union.layout(), goals = goals.len(), "merged unique action estimators");
    Ok(union)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplicitThreshold;
    use crate::error::DecodeError;
    use crate::estimator::tests::estimator_with;
    use crate::representation::Layout;
    use test_case::test_case;

    fn goals(goals: &[&str]) -> GoalTypeSet {
        goals.iter().copied().collect()
    }

    fn record(conversion_type: &str, action_count: i64) -> ConversionRecord {
        ConversionRecord::new(conversion_type, action_count, &Estimator::new())
    }

    #[test_case(&[] => 0; "no goals")]
    #[test_case(&["A"] => 3; "single goal")]
    #[test_case(&["A", "B"] => 8; "both goals")]
    #[test_case(&["C"] => 0; "no match")]
    fn test_sum_action_count(goal_types: &[&str]) -> i64 {
        let records = vec![record("A", 3), record("B", 5)];
        sum_action_count(&records, &goals(goal_types)).unwrap()
    }

    #[test]
    fn test_sum_empty_records() {
        assert_eq!(sum_action_count(&Vec::<ConversionRecord>::new(), &goals(&["A"])), Ok(0));
    }

    #[test]
    fn test_sum_negative_counts() {
        let records = vec![record("A", i64::MIN), record("A", i64::MAX), record("A", -1)];
        assert_eq!(sum_action_count(&records, &goals(&["A"])), Ok(-2));
    }

    #[test]
    fn test_sum_overflow() {
        let records = vec![record("A", i64::MAX), record("B", 1), record("A", 1)];
        assert_eq!(sum_action_count(&records, &goals(&["A", "B"])), Err(Error::Overflow));
        // filtered out records never take part in the sum
        assert_eq!(sum_action_count(&records, &goals(&["A"])), Err(Error::Overflow));
        assert_eq!(sum_action_count(&records, &goals(&["B"])), Ok(1));

        let records = vec![record("A", i64::MIN), record("A", -1)];
        assert_eq!(sum_action_count(&records, &goals(&["A"])), Err(Error::Overflow));
    }

    #[test]
    fn test_sum_ignores_estimator() {
        let records = vec![ConversionRecord::from_encoded("A", 4, vec![0xff, 0xff])];
        assert_eq!(sum_action_count(&records, &goals(&["A"])), Ok(4));
    }

    #[test]
    fn test_union_no_match_is_empty() {
        let config = PrecisionConfig::canonical();
        let records = vec![ConversionRecord::new("A", 1, &estimator_with(config, 0..100))];
        let union = union_action_count(&records, &goals(&["B"])).unwrap();
        assert_eq!(union, Estimator::empty(config));
        assert_eq!(union.cardinality(), 0.0);
        assert_eq!(union.layout(), Layout::Empty);
    }

    #[test]
    fn test_union_same_elements() {
        let config = PrecisionConfig::canonical();
        let records = vec![
            ConversionRecord::new("A", 10_000, &estimator_with(config, 0..10_000)),
            ConversionRecord::new("B", 10_000, &estimator_with(config, 0..10_000)),
        ];
        let union = union_action_count(&records, &goals(&["A", "B"])).unwrap();
        let relative_error = (union.cardinality() - 10_000.0).abs() / 10_000.0;
        assert!(relative_error < 0.02, "{union:?}");
    }

    #[test]
    fn test_union_filters_and_merges() {
        let config = PrecisionConfig::canonical();
        let records = vec![
            ConversionRecord::new("A", 1, &estimator_with(config, 0..50)),
            ConversionRecord::new("B", 1, &estimator_with(config, 1_000..1_500)),
            ConversionRecord::new("A", 1, &estimator_with(config, 25..100)),
        ];
        let union = union_action_count(&records, &goals(&["A"])).unwrap();
        assert_eq!(union, estimator_with(config, 0..100));
        assert_eq!(union.layout(), Layout::Explicit);
        assert_eq!(union.estimate(), 100);
    }

    #[test]
    fn test_union_order_independent() {
        let config = PrecisionConfig::canonical();
        let mut records: Vec<_> = [(0, 40), (30, 200), (150, 5_000), (4_000, 4_050)]
            .iter()
            .map(|&(from, to)| ConversionRecord::new("A", 1, &estimator_with(config, from..to)))
            .collect();
        let forward = union_action_count(&records, &goals(&["A"])).unwrap();
        records.reverse();
        let backward = union_action_count(&records, &goals(&["A"])).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.to_bytes(), backward.to_bytes());
        assert_eq!(forward, estimator_with(config, 0..5_000));
    }

    #[test]
    fn test_union_decode_error_aborts() {
        let config = PrecisionConfig::canonical();
        let records = vec![
            ConversionRecord::new("A", 1, &estimator_with(config, 0..10)),
            ConversionRecord::from_encoded("A", 1, vec![0x21, 0x8c, 0x08]),
        ];
        assert_eq!(
            union_action_count(&records, &goals(&["A"])),
            Err(Error::Decode(DecodeError::UnsupportedVersion(2)))
        );
        // malformed estimator of a filtered out record is never read
        assert!(union_action_count(&records[..1], &goals(&["A"])).is_ok());
    }

    #[test]
    fn test_union_config_mismatch() {
        let other = PrecisionConfig::canonical()
            .with_explicit_threshold(ExplicitThreshold::Auto)
            .unwrap();
        let records = vec![ConversionRecord::new("A", 1, &estimator_with(other, 0..10))];
        assert_eq!(
            union_action_count(&records, &goals(&["A"])),
            Err(Error::ConfigMismatch {
                left: PrecisionConfig::canonical(),
                right: other,
            })
        );
        let union = union_action_count_with(&records, &goals(&["A"]), other).unwrap();
        assert_eq!(union, estimator_with(other, 0..10));
    }
}
