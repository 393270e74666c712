//! Goal type set and record filter.

use std::collections::HashSet;

use crate::record::ConversionRecord;

/// Set of accepted conversion types, matched by exact byte equality
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTypeSet {
    goals: HashSet<String>,
}

impl GoalTypeSet {
    #[inline]
    pub fn contains(&self, conversion_type: &str) -> bool {
        self.goals.contains(conversion_type)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GoalTypeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            goals: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lazily select records whose conversion type is one of `goals`, preserving order
pub fn filter_records<'a, I>(
    records: I,
    goals: &'a GoalTypeSet,
) -> impl Iterator<Item = &'a ConversionRecord> + 'a
where
    I: IntoIterator<Item = &'a ConversionRecord>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .filter(move |record| goals.contains(record.conversion_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::Estimator;
    use test_case::test_case;

    fn records() -> Vec<ConversionRecord> {
        ["A", "B", "a", "A", "C", "B "]
            .iter()
            .enumerate()
            .map(|(i, t)| ConversionRecord::new(*t, i as i64, &Estimator::new()))
            .collect()
    }

    #[test_case(&[] => Vec::<i64>::new(); "no goals")]
    #[test_case(&["A"] => vec![0, 3]; "single goal")]
    #[test_case(&["B", "A"] => vec![0, 1, 3]; "order follows records")]
    #[test_case(&["A", "A", "A"] => vec![0, 3]; "duplicate goals")]
    #[test_case(&["a"] => vec![2]; "case sensitive")]
    #[test_case(&["B "] => vec![5]; "whitespace significant")]
    #[test_case(&["D"] => Vec::<i64>::new(); "no match")]
    fn test_filter(goals: &[&str]) -> Vec<i64> {
        let records = records();
        let goals: GoalTypeSet = goals.iter().copied().collect();
        filter_records(&records, &goals)
            .map(|r| r.action_count())
            .collect()
    }

    #[test]
    fn test_filter_empty_records() {
        let goals: GoalTypeSet = ["A"].into_iter().collect();
        assert_eq!(filter_records(&Vec::<ConversionRecord>::new(), &goals).count(), 0);
    }

    #[test]
    fn test_goal_set_deduplicates() {
        let goals: GoalTypeSet = vec!["x".to_string(), "y".to_string(), "x".to_string()]
            .into_iter()
            .collect();
        assert_eq!(goals.len(), 2);
        assert!(goals.contains("x"));
        assert!(!goals.contains("z"));
    }
}
