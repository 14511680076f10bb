//! Availability index: "may person P serve job J on date D at all?"
//!
//! Hard rules, evaluated in order; the first failure is reported:
//!
//! 1. the person is active,
//! 2. the person is qualified for the job,
//! 3. no per-job exclusion flag applies,
//! 4. no unavailability record covers the date.
//!
//! Absolute date ranges are merged into a sorted interval set per person
//! so a stabbing query is a binary search, logarithmic in the number of
//! ranges. Recurring records are checked per record against the
//! (month, day) envelope; rosters carry at most a handful per person.
//!
//! Side-effect free; safe to call concurrently.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Job, Person, Unavailability};

/// Why a person cannot serve a job on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    Inactive,
    NotQualified,
    ExcludedFromJob,
    Unavailable,
}

/// Sorted, merged, non-overlapping closed intervals.
#[derive(Debug, Clone, Default)]
struct IntervalSet {
    spans: Vec<(NaiveDate, NaiveDate)>,
}

impl IntervalSet {
    fn build(mut ranges: Vec<(NaiveDate, NaiveDate)>) -> Self {
        ranges.retain(|(start, end)| start <= end);
        ranges.sort();

        let mut spans: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match spans.last_mut() {
                Some(last) if start <= last.1.succ_opt().unwrap_or(last.1) => {
                    last.1 = last.1.max(end);
                }
                _ => spans.push((start, end)),
            }
        }
        Self { spans }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        let idx = self.spans.partition_point(|(start, _)| *start <= date);
        idx > 0 && self.spans[idx - 1].1 >= date
    }
}

/// Precomputed per-person unavailability, plus the eligibility rule chain.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    absolute: BTreeMap<String, IntervalSet>,
    recurring: BTreeMap<String, Vec<Unavailability>>,
}

impl AvailabilityIndex {
    pub fn build(records: &[Unavailability]) -> Self {
        let mut absolute_ranges: BTreeMap<String, Vec<(NaiveDate, NaiveDate)>> = BTreeMap::new();
        let mut recurring: BTreeMap<String, Vec<Unavailability>> = BTreeMap::new();

        for record in records {
            if record.recurring {
                recurring
                    .entry(record.person_id.clone())
                    .or_default()
                    .push(record.clone());
            } else {
                absolute_ranges
                    .entry(record.person_id.clone())
                    .or_default()
                    .push((record.start_date, record.end_date));
            }
        }

        let absolute = absolute_ranges
            .into_iter()
            .map(|(person_id, ranges)| (person_id, IntervalSet::build(ranges)))
            .collect();

        Self { absolute, recurring }
    }

    /// Whether any unavailability record covers the date for this person.
    pub fn is_blocked(&self, person_id: &str, date: NaiveDate) -> bool {
        if let Some(set) = self.absolute.get(person_id) {
            if set.contains(date) {
                return true;
            }
        }
        if let Some(records) = self.recurring.get(person_id) {
            if records.iter().any(|r| r.covers(date)) {
                return true;
            }
        }
        false
    }

    /// Full eligibility rule chain for one (person, job, date).
    pub fn is_eligible(
        &self,
        person: &Person,
        job: &Job,
        date: NaiveDate,
    ) -> Result<(), IneligibleReason> {
        if !person.active {
            return Err(IneligibleReason::Inactive);
        }
        if !person.is_qualified_for(&job.id) {
            return Err(IneligibleReason::NotQualified);
        }
        if is_excluded(person, job) {
            return Err(IneligibleReason::ExcludedFromJob);
        }
        if self.is_blocked(&person.id, date) {
            return Err(IneligibleReason::Unavailable);
        }
        Ok(())
    }
}

/// Per-job exclusion flags. Matched on the job name so the flags keep
/// working whatever opaque id the collaborator assigns.
pub(crate) fn is_excluded(person: &Person, job: &Job) -> bool {
    (person.exclude_monaguillos && job.name.eq_ignore_ascii_case("monaguillos"))
        || (person.exclude_lectores && job.name.eq_ignore_ascii_case("lectores"))
}
