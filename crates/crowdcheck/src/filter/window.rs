//! Windowed deduplication join of timed records against assessment periods.
//!
//! A record joins a period when it starts on or before the period's last day
//! and ends on or after the period's first day, so a deadline at midnight of
//! the first day still joins. Among all joined
//! (record, period) pairs sharing a key, the survivor is the one with the
//! earliest record start, then the greatest period label, then the lowest row.

use std::cmp::Ordering;
use std::hash::Hash;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::rules::AssessmentPeriod;

/// A record eligible for the period join.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRecord<K> {
    /// Deduplication key, e.g. the campaign id.
    pub key: K,
    /// Row index in the source table.
    pub row: usize,
    /// Launch timestamp.
    pub start: NaiveDateTime,
    /// Deadline timestamp.
    pub end: NaiveDateTime,
}

/// The surviving (row, period) pair for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodMatch {
    /// Row index in the source table.
    pub row: usize,
    /// Index into the period slice passed to [`deduplicate_by_period`].
    pub period: usize,
}

/// Whether a record joins a period.
pub fn overlaps<K>(record: &TimedRecord<K>, period: &AssessmentPeriod) -> bool {
    record.start.date() <= period.end && record.end.date() >= period.start
}

/// Keep one joined (record, period) pair per key.
///
/// Output is ordered by the first appearance of each key in `records`. Keys
/// with no joining period produce nothing.
pub fn deduplicate_by_period<K>(
    records: &[TimedRecord<K>],
    periods: &[AssessmentPeriod],
) -> Vec<PeriodMatch>
where
    K: Eq + Hash,
{
    let mut best: IndexMap<&K, (&TimedRecord<K>, usize)> = IndexMap::new();

    for record in records {
        for (period_idx, period) in periods.iter().enumerate() {
            if !overlaps(record, period) {
                continue;
            }

            best.entry(&record.key)
                .and_modify(|current| {
                    if rank(record, period, current.0, &periods[current.1]) == Ordering::Less {
                        *current = (record, period_idx);
                    }
                })
                .or_insert((record, period_idx));
        }
    }

    best.into_values()
        .map(|(record, period)| PeriodMatch {
            row: record.row,
            period,
        })
        .collect()
}

/// Ordering of candidates within a key: `Less` ranks first.
fn rank<K>(
    a: &TimedRecord<K>,
    a_period: &AssessmentPeriod,
    b: &TimedRecord<K>,
    b_period: &AssessmentPeriod,
) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b_period.label.cmp(&a_period.label))
        .then_with(|| a.row.cmp(&b.row))
}
