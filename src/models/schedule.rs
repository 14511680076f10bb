//! Schedule, service dates, assignments, and the publish lifecycle.
//!
//! A schedule exclusively owns its service dates; each service date
//! exclusively owns its assignments. A slot is the triple
//! (service date, job, position); an assignment is a slot plus the
//! person filling it, where `person_id = None` denotes an empty slot
//! reserved for later filling.
//!
//! # Lifecycle
//!
//! ```text
//! (create) -> DRAFT -- publish --> PUBLISHED -- archive --> ARCHIVED
//! ```
//!
//! Publishing requires completeness (no empty slots) and yields the
//! append-only history rows exactly once; a second publish is rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Schedule lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleStatus {
    Draft,
    Published,
    Archived,
}

/// Coordinates of one slot: the unit the builder fills.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub service_date_id: String,
    pub job_id: String,
    pub position: u32,
}

impl SlotKey {
    pub fn new(service_date_id: impl Into<String>, job_id: impl Into<String>, position: u32) -> Self {
        Self {
            service_date_id: service_date_id.into(),
            job_id: job_id.into(),
            position,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.service_date_id, self.job_id, self.position)
    }
}

/// A slot together with the person filling it (possibly empty).
///
/// `person_name`, `job_name`, and `position_name` are presentational
/// denormalizations; the engine never keys off them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub service_date_id: String,
    pub job_id: String,
    pub position: u32,
    pub person_id: Option<String>,
    pub manual_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_name: Option<String>,
}

impl Assignment {
    /// Creates an empty slot.
    pub fn empty(
        service_date_id: impl Into<String>,
        job_id: impl Into<String>,
        position: u32,
    ) -> Self {
        let service_date_id = service_date_id.into();
        let job_id = job_id.into();
        let id = format!("{service_date_id}:{job_id}:{position}");
        Self {
            id,
            service_date_id,
            job_id,
            position,
            person_id: None,
            manual_override: false,
            person_name: None,
            job_name: None,
            position_name: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.person_id.is_none()
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(&self.service_date_id, &self.job_id, self.position)
    }
}

/// One calendar date of a schedule, owning its assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDate {
    pub id: String,
    pub schedule_id: String,
    pub service_date: NaiveDate,
    pub notes: Option<String>,
    pub assignments: Vec<Assignment>,
}

/// An append-only history row, written when a schedule is published.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub person_id: String,
    pub job_id: String,
    pub service_date: NaiveDate,
    pub position: u32,
}

impl AssignmentRecord {
    pub fn new(
        person_id: impl Into<String>,
        job_id: impl Into<String>,
        service_date: NaiveDate,
        position: u32,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            job_id: job_id.into(),
            service_date,
            position,
        }
    }
}

/// Human-readable coordinates of an unfilled slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptySlot {
    pub service_date: NaiveDate,
    pub job_name: String,
    pub position_name: String,
}

/// Result of the completeness predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Completeness {
    Complete,
    Incomplete { empty_slots: Vec<EmptySlot> },
}

/// A monthly schedule. `(year, month)` is unique across schedules; the
/// collaborator's storage enforces that invariant on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub status: ScheduleStatus,
    pub service_dates: Vec<ServiceDate>,
}

impl Schedule {
    /// Creates an empty draft.
    pub fn draft(id: impl Into<String>, name: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            year,
            month,
            status: ScheduleStatus::Draft,
            service_dates: Vec::new(),
        }
    }

    /// Looks up an assignment by slot coordinates.
    pub fn assignment(&self, slot: &SlotKey) -> Option<&Assignment> {
        self.service_dates
            .iter()
            .find(|sd| sd.id == slot.service_date_id)?
            .assignments
            .iter()
            .find(|a| a.job_id == slot.job_id && a.position == slot.position)
    }

    pub(crate) fn assignment_mut(&mut self, slot: &SlotKey) -> Option<&mut Assignment> {
        self.service_dates
            .iter_mut()
            .find(|sd| sd.id == slot.service_date_id)?
            .assignments
            .iter_mut()
            .find(|a| a.job_id == slot.job_id && a.position == slot.position)
    }

    /// The service date owning the given slot.
    pub fn service_date_of(&self, slot: &SlotKey) -> Option<&ServiceDate> {
        self.service_dates
            .iter()
            .find(|sd| sd.id == slot.service_date_id)
    }

    /// All assignments across all service dates.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.service_dates.iter().flat_map(|sd| sd.assignments.iter())
    }

    /// Whether every slot has a person.
    pub fn is_complete(&self) -> bool {
        self.assignments().all(|a| !a.is_empty())
    }

    /// Completeness with human-readable coordinates for every empty slot.
    pub fn completeness(&self) -> Completeness {
        let empty_slots: Vec<EmptySlot> = self
            .service_dates
            .iter()
            .flat_map(|sd| {
                sd.assignments
                    .iter()
                    .filter(|a| a.is_empty())
                    .map(|a| EmptySlot {
                        service_date: sd.service_date,
                        job_name: a.job_name.clone().unwrap_or_else(|| a.job_id.clone()),
                        position_name: a
                            .position_name
                            .clone()
                            .unwrap_or_else(|| a.position.to_string()),
                    })
            })
            .collect();

        if empty_slots.is_empty() {
            Completeness::Complete
        } else {
            Completeness::Incomplete { empty_slots }
        }
    }

    /// DRAFT -> PUBLISHED.
    ///
    /// Requires completeness. Returns the published schedule together
    /// with the history rows to append; the caller persists both in one
    /// transaction. Re-publishing is rejected, so history is appended
    /// exactly once.
    pub fn publish(&self) -> Result<(Schedule, Vec<AssignmentRecord>), StateError> {
        match self.status {
            ScheduleStatus::Draft => {}
            ScheduleStatus::Published => return Err(StateError::AlreadyPublished),
            ScheduleStatus::Archived => return Err(StateError::NotDraft(self.status)),
        }

        if let Completeness::Incomplete { empty_slots } = self.completeness() {
            return Err(StateError::Incomplete { empty_slots });
        }

        let mut records: Vec<AssignmentRecord> = self
            .service_dates
            .iter()
            .flat_map(|sd| {
                sd.assignments.iter().filter_map(|a| {
                    a.person_id.as_ref().map(|person_id| {
                        AssignmentRecord::new(person_id, &a.job_id, sd.service_date, a.position)
                    })
                })
            })
            .collect();
        records.sort();

        let mut published = self.clone();
        published.status = ScheduleStatus::Published;
        Ok((published, records))
    }

    /// PUBLISHED -> ARCHIVED.
    pub fn archive(&self) -> Result<Schedule, StateError> {
        if self.status != ScheduleStatus::Published {
            return Err(StateError::NotPublished);
        }
        let mut archived = self.clone();
        archived.status = ScheduleStatus::Archived;
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_schedule() -> Schedule {
        let mut schedule = Schedule::draft("sched-2026-02", "February 2026", 2026, 2);
        let mut sd = ServiceDate {
            id: "sd-2026-02-15".into(),
            schedule_id: schedule.id.clone(),
            service_date: date(2026, 2, 15),
            notes: None,
            assignments: Vec::new(),
        };
        for position in 1..=2 {
            let mut a = Assignment::empty(&sd.id, "monaguillos", position);
            a.job_name = Some("Monaguillos".into());
            a.position_name = Some(format!("Monaguillo {position}"));
            sd.assignments.push(a);
        }
        schedule.service_dates.push(sd);
        schedule
    }

    fn fill(schedule: &mut Schedule, position: u32, person_id: &str) {
        let slot = SlotKey::new("sd-2026-02-15", "monaguillos", position);
        let a = schedule.assignment_mut(&slot).unwrap();
        a.person_id = Some(person_id.into());
    }

    #[test]
    fn test_slot_lookup() {
        let schedule = sample_schedule();
        let slot = SlotKey::new("sd-2026-02-15", "monaguillos", 2);
        assert!(schedule.assignment(&slot).is_some());
        let missing = SlotKey::new("sd-2026-02-15", "lectores", 1);
        assert!(schedule.assignment(&missing).is_none());
    }

    #[test]
    fn test_completeness_reports_coordinates() {
        let mut schedule = sample_schedule();
        fill(&mut schedule, 1, "p1");

        match schedule.completeness() {
            Completeness::Incomplete { empty_slots } => {
                assert_eq!(empty_slots.len(), 1);
                assert_eq!(empty_slots[0].service_date, date(2026, 2, 15));
                assert_eq!(empty_slots[0].job_name, "Monaguillos");
                assert_eq!(empty_slots[0].position_name, "Monaguillo 2");
            }
            Completeness::Complete => panic!("expected incomplete"),
        }
    }

    #[test]
    fn test_publish_rejects_incomplete() {
        let schedule = sample_schedule();
        match schedule.publish() {
            Err(StateError::Incomplete { empty_slots }) => assert_eq!(empty_slots.len(), 2),
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_publish_emits_history_once() {
        let mut schedule = sample_schedule();
        fill(&mut schedule, 1, "p1");
        fill(&mut schedule, 2, "p2");

        let (published, records) = schedule.publish().unwrap();
        assert_eq!(published.status, ScheduleStatus::Published);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].person_id, "p1");
        assert_eq!(records[0].service_date, date(2026, 2, 15));

        // Duplicate publish is a state conflict and emits nothing
        assert_eq!(published.publish().unwrap_err(), StateError::AlreadyPublished);
    }

    #[test]
    fn test_archive_requires_published() {
        let mut schedule = sample_schedule();
        assert_eq!(schedule.archive().unwrap_err(), StateError::NotPublished);

        fill(&mut schedule, 1, "p1");
        fill(&mut schedule, 2, "p2");
        let (published, _) = schedule.publish().unwrap();
        let archived = published.archive().unwrap();
        assert_eq!(archived.status, ScheduleStatus::Archived);
        assert_eq!(archived.archive().unwrap_err(), StateError::NotPublished);
    }
}
