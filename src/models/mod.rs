//! Roster scheduling domain models.
//!
//! The engine treats Person, Job, SiblingGroup, and Unavailability as
//! read-only inputs for the duration of one generation call; Schedule,
//! ServiceDate, and Assignment are what it produces. AssignmentRecord is
//! the append-only history row written when a schedule is published.

mod job;
mod person;
mod report;
mod schedule;
mod sibling;
mod unavailability;

pub use job::{Job, Position};
pub use person::{Person, PreferredFrequency};
pub use report::{
    Conflict, ConflictKind, FairnessScore, JobAssignmentCount, NearMissReason, SchedulePreview,
};
pub use schedule::{
    Assignment, AssignmentRecord, Completeness, EmptySlot, Schedule, ScheduleStatus, ServiceDate,
    SlotKey,
};
pub use sibling::{PairingRule, SiblingGroup};
pub use unavailability::Unavailability;
