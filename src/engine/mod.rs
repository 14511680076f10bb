//! The schedule engine: generation, draft edits, and fairness reporting.
//!
//! The engine is transport-agnostic and does no I/O. Callers load an
//! immutable [`Snapshot`] of the roster, jobs, sibling groups,
//! unavailability, and history, then ask a configured
//! [`ScheduleGenerator`] for a month. Concurrent callers must serialize
//! on the target (year, month); the engine itself is single-threaded and
//! CPU-only.
//!
//! Given an identical snapshot, request, and configuration, the output
//! is byte-identical across runs and platforms.

mod edit;
mod fairness;
mod generate;

pub use edit::Edit;
pub use fairness::fairness;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{EditError, GenerateError};
use crate::models::{
    AssignmentRecord, Job, Person, Schedule, SchedulePreview, SiblingGroup, Unavailability,
};
use crate::scoring::ScoreWeights;

/// What month to plan, and under what title.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub year: i32,
    pub month: u32,
    /// Defaults to "<Month> <year>".
    pub name: Option<String>,
}

impl GenerateRequest {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Immutable input bundle for one generation call.
///
/// Construction sorts every collection by id so that all downstream
/// iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    people: Vec<Person>,
    jobs: Vec<Job>,
    sibling_groups: Vec<SiblingGroup>,
    unavailability: Vec<Unavailability>,
    history: Vec<AssignmentRecord>,
}

impl Snapshot {
    pub fn new(
        mut people: Vec<Person>,
        mut jobs: Vec<Job>,
        mut sibling_groups: Vec<SiblingGroup>,
        mut unavailability: Vec<Unavailability>,
        mut history: Vec<AssignmentRecord>,
    ) -> Self {
        people.sort_by(|a, b| a.id.cmp(&b.id));
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        for job in &mut jobs {
            job.positions.sort_by_key(|p| p.position_number);
        }
        sibling_groups.sort_by(|a, b| a.id.cmp(&b.id));
        unavailability.sort_by(|a, b| {
            (&a.person_id, a.start_date, a.end_date).cmp(&(&b.person_id, b.start_date, b.end_date))
        });
        history.sort();

        Self {
            people,
            jobs,
            sibling_groups,
            unavailability,
            history,
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn sibling_groups(&self) -> &[SiblingGroup] {
        &self.sibling_groups
    }

    pub fn unavailability(&self) -> &[Unavailability] {
        &self.unavailability
    }

    pub fn history(&self) -> &[AssignmentRecord] {
        &self.history
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people
            .binary_search_by(|p| p.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.people[idx])
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs
            .binary_search_by(|j| j.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.jobs[idx])
    }

    /// Active jobs in id order.
    pub fn active_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.active)
    }
}

/// Cooperative cancellation flag, checked at each service-date boundary.
/// Cancellation discards all partial state; no partial schedule escapes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Which job pairs exclude each other on a single service date.
///
/// The default is that every pair is exclusive: a person cannot both
/// read and serve on the same Sunday. A narrower table lists the
/// exclusive pairs explicitly; unlisted pairs may share a person.
#[derive(Debug, Clone)]
pub struct DayExclusivity {
    table: ExclusivityTable,
}

#[derive(Debug, Clone)]
enum ExclusivityTable {
    AllPairs,
    Pairs(BTreeSet<(String, String)>),
}

impl Default for DayExclusivity {
    fn default() -> Self {
        Self::all_pairs()
    }
}

impl DayExclusivity {
    /// Every distinct job pair is exclusive (the default).
    pub fn all_pairs() -> Self {
        Self {
            table: ExclusivityTable::AllPairs,
        }
    }

    /// Only the listed pairs are exclusive. Order within a pair does
    /// not matter.
    pub fn pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let table = pairs
            .into_iter()
            .map(|(a, b)| {
                let (a, b) = (a.into(), b.into());
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        Self {
            table: ExclusivityTable::Pairs(table),
        }
    }

    /// Whether two distinct jobs exclude each other on one date.
    pub fn is_exclusive(&self, job_a: &str, job_b: &str) -> bool {
        if job_a == job_b {
            return false;
        }
        match &self.table {
            ExclusivityTable::AllPairs => true,
            ExclusivityTable::Pairs(pairs) => {
                let key = if job_a <= job_b {
                    (job_a.to_string(), job_b.to_string())
                } else {
                    (job_b.to_string(), job_a.to_string())
                };
                pairs.contains(&key)
            }
        }
    }
}

/// The orchestrator. Configuration is fixed for the lifetime of one
/// generator; build a new one to change weights or the exclusion table.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    pub(crate) weights: ScoreWeights,
    pub(crate) exclusivity: DayExclusivity,
}

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_exclusivity(mut self, exclusivity: DayExclusivity) -> Self {
        self.exclusivity = exclusivity;
        self
    }

    /// Generates a draft schedule for the requested month.
    pub fn generate(
        &self,
        snapshot: &Snapshot,
        request: &GenerateRequest,
    ) -> Result<SchedulePreview, GenerateError> {
        self.generate_cancellable(snapshot, request, &CancelToken::new())
    }

    /// Like [`generate`](Self::generate), interruptible at each
    /// service-date boundary.
    pub fn generate_cancellable(
        &self,
        snapshot: &Snapshot,
        request: &GenerateRequest,
        cancel: &CancelToken,
    ) -> Result<SchedulePreview, GenerateError> {
        generate::run(self, snapshot, request, cancel)
    }

    /// Checks a draft edit without applying it.
    pub fn validate_edit(
        &self,
        snapshot: &Snapshot,
        schedule: &Schedule,
        edit: &Edit,
    ) -> Result<(), EditError> {
        edit::validate(self, snapshot, schedule, edit)
    }

    /// Validates and applies a draft edit, returning a new schedule
    /// value. A rejected edit leaves the input untouched.
    pub fn apply_edit(
        &self,
        snapshot: &Snapshot,
        schedule: &Schedule,
        edit: &Edit,
    ) -> Result<Schedule, EditError> {
        edit::apply(self, snapshot, schedule, edit)
    }
}
