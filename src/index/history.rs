//! History index: per-person assignment statistics.
//!
//! Built once per generation from the append-only history log, then fed
//! every assignment the builder commits so that later slots in the same
//! run see earlier decisions.
//!
//! # Rotation bags
//!
//! The bag for (person, job) is the set of position numbers the person
//! has not yet performed in the current rotation cycle. Cycles are
//! derived lazily from history rather than persisted: walking the
//! per-job position history most-recent-first, the first repeated
//! position marks the cycle boundary. An empty bag refills to the full
//! position set, which starts the next cycle.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::prior_month;
use crate::models::AssignmentRecord;

#[derive(Debug, Clone, Default)]
struct PersonHistory {
    /// All assignments, sorted by (date, job, position).
    entries: Vec<(NaiveDate, String, u32)>,
    /// Distinct dates served, for consecutive-week runs.
    dates: BTreeSet<NaiveDate>,
}

impl PersonHistory {
    fn insert(&mut self, date: NaiveDate, job_id: String, position: u32) {
        let entry = (date, job_id, position);
        let idx = self.entries.partition_point(|e| *e <= entry);
        self.entries.insert(idx, entry);
        self.dates.insert(date);
    }
}

/// Queryable assignment history, updatable during a run.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    people: BTreeMap<String, PersonHistory>,
}

impl HistoryIndex {
    pub fn build(records: &[AssignmentRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.record(record.clone());
        }
        index
    }

    /// Registers one assignment (historical or committed mid-run).
    pub fn record(&mut self, record: AssignmentRecord) {
        self.people
            .entry(record.person_id)
            .or_default()
            .insert(record.service_date, record.job_id, record.position);
    }

    fn person(&self, person_id: &str) -> Option<&PersonHistory> {
        self.people.get(person_id)
    }

    /// Total assignments across all years.
    pub fn count_total(&self, person_id: &str) -> u32 {
        self.person(person_id)
            .map_or(0, |h| h.entries.len() as u32)
    }

    /// Assignments whose service date falls in the given year.
    pub fn count_this_year(&self, person_id: &str, year: i32) -> u32 {
        self.person(person_id).map_or(0, |h| {
            h.entries.iter().filter(|(d, _, _)| d.year() == year).count() as u32
        })
    }

    /// Assignments to one job in the given year.
    pub fn count_by_job_this_year(&self, person_id: &str, job_id: &str, year: i32) -> u32 {
        self.person(person_id).map_or(0, |h| {
            h.entries
                .iter()
                .filter(|(d, j, _)| d.year() == year && j == job_id)
                .count() as u32
        })
    }

    /// Per-job assignment tallies for the given year, sorted by job id.
    pub fn counts_by_job_in_year(&self, person_id: &str, year: i32) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        if let Some(h) = self.person(person_id) {
            for (d, job_id, _) in &h.entries {
                if d.year() == year {
                    *counts.entry(job_id.clone()).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Most recent service date, any job.
    pub fn last_service_date(&self, person_id: &str) -> Option<NaiveDate> {
        self.person(person_id)?.dates.iter().next_back().copied()
    }

    /// Length of the unbroken run of weekly assignments ending on the
    /// Sunday strictly before `date`.
    pub fn consecutive_weeks_ending_at(&self, person_id: &str, date: NaiveDate) -> u32 {
        let Some(h) = self.person(person_id) else {
            return 0;
        };
        let mut run = 0;
        let Some(mut cursor) = date.checked_sub_days(Days::new(7)) else {
            return 0;
        };
        while h.dates.contains(&cursor) {
            run += 1;
            match cursor.checked_sub_days(Days::new(7)) {
                Some(prev) => cursor = prev,
                None => break,
            }
        }
        run
    }

    /// Whether the person served this job anywhere in (year, month).
    pub fn served_in_month(&self, person_id: &str, job_id: &str, year: i32, month: u32) -> bool {
        self.person(person_id).is_some_and(|h| {
            h.entries
                .iter()
                .any(|(d, j, _)| j == job_id && d.year() == year && d.month() == month)
        })
    }

    /// Whether the person served this job in the calendar month
    /// immediately preceding (year, month), wrapping January back to
    /// the previous December.
    pub fn served_in_prior_month(
        &self,
        person_id: &str,
        job_id: &str,
        year: i32,
        month: u32,
    ) -> bool {
        let (prior_year, prior) = prior_month(year, month);
        self.served_in_month(person_id, job_id, prior_year, prior)
    }

    /// Positions of the job this person has not yet performed in the
    /// current rotation cycle. Never empty: a completed cycle refills
    /// the bag to the full `1..=position_count` set.
    pub fn rotation_bag(
        &self,
        person_id: &str,
        job_id: &str,
        position_count: u32,
    ) -> BTreeSet<u32> {
        let full: BTreeSet<u32> = (1..=position_count).collect();
        let Some(h) = self.person(person_id) else {
            return full;
        };

        // Walk most-recent-first; the first repeat is the cycle boundary.
        let mut seen: BTreeSet<u32> = BTreeSet::new();
        for (_, j, position) in h.entries.iter().rev() {
            if j != job_id {
                continue;
            }
            if !seen.insert(*position) {
                break;
            }
        }

        let bag: BTreeSet<u32> = full.difference(&seen).copied().collect();
        if bag.is_empty() {
            full
        } else {
            bag
        }
    }
}
