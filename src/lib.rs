//! Volunteer roster scheduling engine.
//!
//! Assigns a pool of volunteers to the jobs of recurring weekly service
//! dates: given a target month, the roster, qualifications,
//! availability, sibling-group rules, and past assignments, it proposes
//! a schedule that respects every hard constraint, distributes work
//! fairly over the year, and rotates each person through the positions
//! of every job they serve.
//!
//! # Modules
//!
//! - **`models`**: domain types: `Person`, `Job`, `SiblingGroup`,
//!   `Unavailability`, `Schedule`, `Assignment`, `AssignmentRecord`
//! - **`calendar`**: service-date resolution (Sundays of a month)
//! - **`index`**: availability, history, and sibling indices built once
//!   per generation
//! - **`scoring`**: weighted fairness scoring of candidate tuples
//! - **`engine`**: the schedule builder, draft edits, and fairness
//!   reporting
//! - **`validation`**: snapshot integrity checks
//!
//! # Usage
//!
//! ```
//! use rota::{GenerateRequest, Job, Person, ScheduleGenerator, Snapshot};
//!
//! let snapshot = Snapshot::new(
//!     (1..=8)
//!         .map(|i| {
//!             Person::new(format!("p{i}"), "Person", i.to_string())
//!                 .with_qualified_job("monaguillos")
//!         })
//!         .collect(),
//!     vec![Job::new("monaguillos", "Monaguillos", 4)],
//!     Vec::new(),
//!     Vec::new(),
//!     Vec::new(),
//! );
//!
//! let preview = ScheduleGenerator::new()
//!     .generate(&snapshot, &GenerateRequest::new(2026, 2))
//!     .unwrap();
//! assert_eq!(preview.schedule.service_dates.len(), 4);
//! ```
//!
//! The engine is CPU-only and does no I/O: callers load the snapshot,
//! persist the preview, and serialize concurrent calls per (year,
//! month). Given identical inputs, output is byte-identical.

pub mod calendar;
pub mod engine;
pub mod error;
pub mod index;
pub mod models;
pub mod scoring;
pub mod validation;

pub use engine::{
    fairness, CancelToken, DayExclusivity, Edit, GenerateRequest, ScheduleGenerator, Snapshot,
};
pub use error::{ConstraintViolation, EditError, GenerateError, StateError, ViolationKind};
pub use models::{
    Assignment, AssignmentRecord, Completeness, Conflict, ConflictKind, EmptySlot, FairnessScore,
    Job, JobAssignmentCount, NearMissReason, PairingRule, Person, Position, PreferredFrequency,
    Schedule, SchedulePreview, ScheduleStatus, ServiceDate, SiblingGroup, SlotKey, Unavailability,
};
pub use scoring::ScoreWeights;
