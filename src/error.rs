//! Error taxonomy for the engine.
//!
//! Three independent failure families, one enum each:
//!
//! - [`GenerateError`]: fatal problems with a generation request or its
//!   input snapshot. Slot-level shortfalls are *not* errors; they are
//!   reported as conflicts inside the preview.
//! - [`EditError`]: rejection of a draft edit. Hard-constraint failures
//!   carry a [`ConstraintViolation`] with the person, the slot, and a
//!   stable message key for the caller's localization layer.
//! - [`StateError`]: invalid schedule lifecycle transitions.

use serde::{Deserialize, Serialize};

use crate::models::{EmptySlot, ScheduleStatus, SlotKey};
use crate::validation::ValidationError;

/// Fatal errors for a generation call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),

    #[error(
        "year {0} is outside the supported range {min}..={max}",
        min = crate::calendar::MIN_YEAR,
        max = crate::calendar::MAX_YEAR
    )]
    YearOutOfRange(i32),

    #[error("input snapshot failed integrity checks ({0:?})")]
    InvalidSnapshot(Vec<ValidationError>),

    #[error("generation was cancelled")]
    Cancelled,
}

/// Hard-constraint categories for rejected edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NotQualified,
    Unavailable,
    ExcludedFromJob,
    ExceedsConsecutiveWeeks,
    AlreadyAssignedThisMonth,
    ConsecutiveMonthForbidden,
    DayExclusivityViolation,
    SiblingSeparateViolation,
    DuplicatePersonOnSchedule,
}

impl ViolationKind {
    /// Stable localization key; rendering is the caller's job.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::NotQualified => "edit.not_qualified",
            Self::Unavailable => "edit.unavailable",
            Self::ExcludedFromJob => "edit.excluded_from_job",
            Self::ExceedsConsecutiveWeeks => "edit.exceeds_consecutive_weeks",
            Self::AlreadyAssignedThisMonth => "edit.already_assigned_this_month",
            Self::ConsecutiveMonthForbidden => "edit.consecutive_month_forbidden",
            Self::DayExclusivityViolation => "edit.day_exclusivity",
            Self::SiblingSeparateViolation => "edit.sibling_separate",
            Self::DuplicatePersonOnSchedule => "edit.duplicate_person",
        }
    }
}

/// A hard-constraint failure for a specific person and slot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message_key}: person {person_id} at {slot}")]
pub struct ConstraintViolation {
    pub kind: ViolationKind,
    pub person_id: String,
    pub slot: SlotKey,
    pub message_key: &'static str,
}

impl ConstraintViolation {
    pub fn new(kind: ViolationKind, person_id: impl Into<String>, slot: SlotKey) -> Self {
        Self {
            kind,
            person_id: person_id.into(),
            slot,
            message_key: kind.message_key(),
        }
    }

    /// Same as [`new`](Self::new) with an overriding message key.
    pub(crate) fn with_key(
        kind: ViolationKind,
        person_id: impl Into<String>,
        slot: SlotKey,
        message_key: &'static str,
    ) -> Self {
        Self {
            kind,
            person_id: person_id.into(),
            slot,
            message_key,
        }
    }
}

/// Rejection of a draft edit. Edits fail atomically: a rejected edit
/// leaves the schedule untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("schedule is {0:?}; edits require DRAFT")]
    NotDraft(ScheduleStatus),

    #[error("no slot {0} in this schedule")]
    SlotNotFound(SlotKey),

    #[error("slot {0} is empty")]
    SlotEmpty(SlotKey),

    #[error("slot {0} is already occupied")]
    SlotOccupied(SlotKey),

    #[error("unknown person {0}")]
    UnknownPerson(String),

    #[error(transparent)]
    Violation(#[from] ConstraintViolation),
}

/// Invalid schedule lifecycle transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("schedule is {0:?}; expected DRAFT")]
    NotDraft(ScheduleStatus),

    #[error("schedule has {count} unfilled slots", count = .empty_slots.len())]
    Incomplete { empty_slots: Vec<EmptySlot> },

    #[error("schedule is already published")]
    AlreadyPublished,

    #[error("only PUBLISHED schedules can be archived")]
    NotPublished,
}
