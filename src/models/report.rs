//! Generation output: preview, conflicts, and fairness reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Schedule;

/// What a generation call hands back: the draft schedule, the slots it
/// could not fill, and the fairness standing after this run. The caller
/// may persist the preview verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePreview {
    pub schedule: Schedule,
    pub conflicts: Vec<Conflict>,
    pub fairness_scores: Vec<FairnessScore>,
}

/// Classification of generation conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A slot had no eligible candidate and was left empty.
    InsufficientPeople,
}

/// The candidate-filter rule that eliminated the most otherwise-eligible
/// people for a conflicted slot. Listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearMissReason {
    ExcludedFromJob,
    Unavailable,
    WeeklyCapReached,
    AlreadyServedThisMonth,
    ServedPriorMonth,
    DayExclusive,
    SiblingSeparate,
}

/// A slot-level shortfall, recovered locally: generation continues and
/// the slot stays empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub service_date: NaiveDate,
    pub job_id: String,
    pub position: u32,
    pub kind: ConflictKind,
    /// The strongest near-miss reason, when any candidate got as far as
    /// the filter chain at all.
    pub dominant_reason: Option<NearMissReason>,
    pub message: String,
}

/// Per-job assignment tally for one person and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignmentCount {
    pub job_id: String,
    pub job_name: String,
    pub count: u32,
}

/// One person's standing in the fairness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessScore {
    pub person_id: String,
    pub person_name: String,
    pub total_assignments: u32,
    pub assignments_this_year: u32,
    pub assignments_by_job: Vec<JobAssignmentCount>,
    pub last_assignment_date: Option<NaiveDate>,
    /// Higher means more overdue for an assignment.
    pub fairness_score: f64,
}
