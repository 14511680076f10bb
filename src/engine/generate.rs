//! Schedule generation.
//!
//! # Algorithm
//!
//! 1. Materialize one slot per (Sunday, active job, position).
//! 2. Visit dates ascending; within a date, jobs scarcest-first (fewest
//!    eligible qualified people); within a job, positions ascending.
//! 3. For each slot, filter candidates through the hard rules, score the
//!    survivors, and commit the best into the working history so later
//!    slots see the decision.
//! 4. A slot with no candidate stays empty and yields a conflict; the
//!    run continues.
//!
//! Greedy and priority-driven, not optimal; determinism is the
//! correctness requirement here, so every iteration order is fixed by
//! the sorted snapshot.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use super::fairness::fairness_from_index;
use super::{CancelToken, GenerateRequest, ScheduleGenerator, Snapshot};
use crate::calendar::{month_name, sundays_of_month};
use crate::error::GenerateError;
use crate::index::{AvailabilityIndex, HistoryIndex, IneligibleReason, SiblingIndex};
use crate::models::{
    Assignment, AssignmentRecord, Conflict, ConflictKind, Job, NearMissReason, Person, Schedule,
    SchedulePreview, ServiceDate,
};
use crate::scoring::{Candidate, FairnessScorer, ScoreContext};
use crate::validation::validate_snapshot;

/// Two floats within this distance are a tie and fall through to the
/// deterministic tie-break chain.
const SCORE_EPSILON: f64 = 1e-9;

/// Near-miss reasons in candidate-filter evaluation order.
const REASON_ORDER: [NearMissReason; 7] = [
    NearMissReason::ExcludedFromJob,
    NearMissReason::Unavailable,
    NearMissReason::WeeklyCapReached,
    NearMissReason::AlreadyServedThisMonth,
    NearMissReason::ServedPriorMonth,
    NearMissReason::DayExclusive,
    NearMissReason::SiblingSeparate,
];

pub(super) fn run(
    generator: &ScheduleGenerator,
    snapshot: &Snapshot,
    request: &GenerateRequest,
    cancel: &CancelToken,
) -> Result<SchedulePreview, GenerateError> {
    let sundays = sundays_of_month(request.year, request.month)?;
    validate_snapshot(snapshot).map_err(GenerateError::InvalidSnapshot)?;

    let availability = AvailabilityIndex::build(snapshot.unavailability());
    let siblings = SiblingIndex::build(snapshot.sibling_groups());
    let scorer = FairnessScorer::new(&generator.weights);
    let mut working = HistoryIndex::build(snapshot.history());

    let schedule_id = format!("sched-{:04}-{:02}", request.year, request.month);
    let name = request
        .name
        .clone()
        .unwrap_or_else(|| format!("{} {}", month_name(request.month), request.year));
    let mut schedule = Schedule::draft(&schedule_id, name, request.year, request.month);
    let mut conflicts: Vec<Conflict> = Vec::new();

    for sunday in &sundays {
        if cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        let service_date_id = format!("sd-{sunday}");
        let mut assignments: Vec<Assignment> = Vec::new();
        // person -> job committed on this date
        let mut on_date: BTreeMap<String, String> = BTreeMap::new();

        for job in jobs_by_scarcity(snapshot, &availability, *sunday) {
            for position in &job.positions {
                let mut assignment =
                    Assignment::empty(&service_date_id, &job.id, position.position_number);
                assignment.job_name = Some(job.name.clone());
                assignment.position_name = Some(position.name.clone());

                match fill_slot(
                    generator,
                    snapshot,
                    &availability,
                    &siblings,
                    &working,
                    &scorer,
                    &on_date,
                    *sunday,
                    job,
                    position.position_number,
                ) {
                    SlotOutcome::Filled { person, score } => {
                        debug!(
                            date = %sunday,
                            job = %job.id,
                            position = position.position_number,
                            person = %person.id,
                            score,
                            "slot filled"
                        );
                        assignment.person_id = Some(person.id.clone());
                        assignment.person_name = Some(person.full_name());
                        working.record(AssignmentRecord::new(
                            &person.id,
                            &job.id,
                            *sunday,
                            position.position_number,
                        ));
                        on_date.insert(person.id.clone(), job.id.clone());
                    }
                    SlotOutcome::Empty { dominant_reason } => {
                        debug!(
                            date = %sunday,
                            job = %job.id,
                            position = position.position_number,
                            ?dominant_reason,
                            "slot left empty"
                        );
                        conflicts.push(Conflict {
                            service_date: *sunday,
                            job_id: job.id.clone(),
                            position: position.position_number,
                            kind: ConflictKind::InsufficientPeople,
                            dominant_reason,
                            message: format!(
                                "no eligible candidate for {} position {} on {}",
                                job.name, position.position_number, sunday
                            ),
                        });
                    }
                }

                assignments.push(assignment);
            }
        }

        // Present in stable (job, position) order regardless of the
        // scarcity order used for filling
        assignments.sort_by(|a, b| {
            (a.job_id.as_str(), a.position).cmp(&(b.job_id.as_str(), b.position))
        });

        schedule.service_dates.push(ServiceDate {
            id: service_date_id,
            schedule_id: schedule_id.clone(),
            service_date: *sunday,
            notes: None,
            assignments,
        });
    }

    let fairness_scores =
        fairness_from_index(&working, snapshot.people(), snapshot.jobs(), request.year);

    info!(
        year = request.year,
        month = request.month,
        dates = schedule.service_dates.len(),
        conflicts = conflicts.len(),
        "schedule generated"
    );

    Ok(SchedulePreview {
        schedule,
        conflicts,
        fairness_scores,
    })
}

/// Active jobs ordered scarcest-first for one date: jobs with the fewest
/// eligible qualified people get first pick. Ties fall back to job id.
fn jobs_by_scarcity<'a>(
    snapshot: &'a Snapshot,
    availability: &AvailabilityIndex,
    date: NaiveDate,
) -> Vec<&'a Job> {
    let mut jobs: Vec<(usize, &Job)> = snapshot
        .active_jobs()
        .map(|job| {
            let eligible = snapshot
                .people()
                .iter()
                .filter(|person| availability.is_eligible(person, job, date).is_ok())
                .count();
            (eligible, job)
        })
        .collect();
    jobs.sort_by(|a, b| (a.0, a.1.id.as_str()).cmp(&(b.0, b.1.id.as_str())));
    jobs.into_iter().map(|(_, job)| job).collect()
}

enum SlotOutcome<'a> {
    Filled {
        person: &'a Person,
        score: f64,
    },
    Empty {
        dominant_reason: Option<NearMissReason>,
    },
}

struct ScoredCandidate<'a> {
    person: &'a Person,
    score: f64,
    bag_size: usize,
    count_this_year: u32,
    last_service_date: Option<NaiveDate>,
}

impl ScoredCandidate<'_> {
    /// Strictly better than `other`. Ties on score break by smaller
    /// rotation bag (most constrained), fewer assignments this year,
    /// earlier last service date (never-served sorts earliest), then
    /// person id.
    fn ranks_above(&self, other: &Self) -> bool {
        if (self.score - other.score).abs() > SCORE_EPSILON {
            return self.score > other.score;
        }
        (
            self.bag_size,
            self.count_this_year,
            self.last_service_date,
            self.person.id.as_str(),
        ) < (
            other.bag_size,
            other.count_this_year,
            other.last_service_date,
            other.person.id.as_str(),
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_slot<'a>(
    generator: &ScheduleGenerator,
    snapshot: &'a Snapshot,
    availability: &AvailabilityIndex,
    siblings: &SiblingIndex,
    working: &HistoryIndex,
    scorer: &FairnessScorer,
    on_date: &BTreeMap<String, String>,
    date: NaiveDate,
    job: &Job,
    position: u32,
) -> SlotOutcome<'a> {
    let assigned_on_date: BTreeSet<String> = on_date.keys().cloned().collect();
    let context = ScoreContext {
        date,
        job,
        history: working,
        siblings,
        assigned_on_date: &assigned_on_date,
    };

    let mut eliminations: BTreeMap<NearMissReason, u32> = BTreeMap::new();
    let mut best: Option<ScoredCandidate<'a>> = None;

    for person in snapshot.people() {
        if !person.active || !person.is_qualified_for(&job.id) {
            continue;
        }

        let reason = first_failing_rule(
            generator, availability, siblings, working, on_date, date, job, person,
        );
        if let Some(reason) = reason {
            *eliminations.entry(reason).or_insert(0) += 1;
            continue;
        }

        let bag = working.rotation_bag(&person.id, &job.id, job.people_required);
        let candidate = Candidate {
            person,
            position,
            bag: &bag,
        };
        let scored = ScoredCandidate {
            person,
            score: scorer.score(&candidate, &context),
            bag_size: bag.len(),
            count_this_year: working.count_this_year(&person.id, date.year()),
            last_service_date: working.last_service_date(&person.id),
        };

        best = match best {
            Some(current) if !scored.ranks_above(&current) => Some(current),
            _ => Some(scored),
        };
    }

    match best {
        Some(winner) => SlotOutcome::Filled {
            person: winner.person,
            score: winner.score,
        },
        None => SlotOutcome::Empty {
            dominant_reason: dominant_reason(&eliminations),
        },
    }
}

/// Runs the hard-constraint chain for one candidate, in evaluation
/// order. Returns the first failing rule, or `None` for a survivor.
#[allow(clippy::too_many_arguments)]
fn first_failing_rule(
    generator: &ScheduleGenerator,
    availability: &AvailabilityIndex,
    siblings: &SiblingIndex,
    working: &HistoryIndex,
    on_date: &BTreeMap<String, String>,
    date: NaiveDate,
    job: &Job,
    person: &Person,
) -> Option<NearMissReason> {
    match availability.is_eligible(person, job, date) {
        Ok(()) => {}
        Err(IneligibleReason::ExcludedFromJob) => return Some(NearMissReason::ExcludedFromJob),
        Err(IneligibleReason::Unavailable) => return Some(NearMissReason::Unavailable),
        // Active and qualified are pre-filtered by the caller
        Err(_) => return Some(NearMissReason::Unavailable),
    }

    if working.consecutive_weeks_ending_at(&person.id, date) >= person.max_consecutive_weeks {
        return Some(NearMissReason::WeeklyCapReached);
    }

    if working.served_in_month(&person.id, &job.id, date.year(), date.month()) {
        return Some(NearMissReason::AlreadyServedThisMonth);
    }

    if job.consecutive_month_restricted
        && working.served_in_prior_month(&person.id, &job.id, date.year(), date.month())
    {
        return Some(NearMissReason::ServedPriorMonth);
    }

    if let Some(other_job) = on_date.get(&person.id) {
        if generator.exclusivity.is_exclusive(other_job, &job.id) {
            return Some(NearMissReason::DayExclusive);
        }
    }

    if siblings
        .separate_partners(&person.id)
        .iter()
        .any(|partner| on_date.contains_key(partner))
    {
        return Some(NearMissReason::SiblingSeparate);
    }

    None
}

/// The reason that eliminated the most otherwise-eligible people; ties
/// go to the earliest rule in evaluation order.
fn dominant_reason(eliminations: &BTreeMap<NearMissReason, u32>) -> Option<NearMissReason> {
    let mut dominant: Option<(NearMissReason, u32)> = None;
    for reason in REASON_ORDER {
        if let Some(&count) = eliminations.get(&reason) {
            if dominant.map_or(true, |(_, best)| count > best) {
                dominant = Some((reason, count));
            }
        }
    }
    dominant.map(|(reason, _)| reason)
}
