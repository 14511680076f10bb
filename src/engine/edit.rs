//! Draft edits: replace, clear, swap, and move.
//!
//! Edits are pure: validation never mutates, and `apply` returns a new
//! schedule value. A rejected edit leaves the input untouched, so swaps
//! and moves are all-or-nothing.
//!
//! Manual edits bypass the soft scoring entirely but still enforce every
//! hard rule, including once-per-job-per-month. Slots vacated by the
//! same edit are ignored during validation so a swap does not collide
//! with itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ScheduleGenerator, Snapshot};
use crate::error::{ConstraintViolation, EditError, ViolationKind};
use crate::index::{AvailabilityIndex, HistoryIndex, IneligibleReason, SiblingIndex};
use crate::models::{Assignment, AssignmentRecord, Person, Schedule, ScheduleStatus, SlotKey};

/// An edit against a DRAFT schedule (or a preview not yet persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Edit {
    /// Put `person_id` into the slot, displacing any current occupant.
    Replace { slot: SlotKey, person_id: String },
    /// Empty the slot.
    Clear { slot: SlotKey },
    /// Exchange the occupants of two slots.
    Swap { a: SlotKey, b: SlotKey },
    /// Move the occupant of `src` into the empty slot `dst`.
    Move { src: SlotKey, dst: SlotKey },
}

pub(super) fn validate(
    generator: &ScheduleGenerator,
    snapshot: &Snapshot,
    schedule: &Schedule,
    edit: &Edit,
) -> Result<(), EditError> {
    EditContext::new(generator, snapshot, schedule).validate(edit)
}

pub(super) fn apply(
    generator: &ScheduleGenerator,
    snapshot: &Snapshot,
    schedule: &Schedule,
    edit: &Edit,
) -> Result<Schedule, EditError> {
    EditContext::new(generator, snapshot, schedule).apply(edit)
}

/// Indices rebuilt per edit call; rosters are small and edits are rare
/// compared to generation.
struct EditContext<'a> {
    generator: &'a ScheduleGenerator,
    snapshot: &'a Snapshot,
    schedule: &'a Schedule,
    availability: AvailabilityIndex,
    siblings: SiblingIndex,
}

impl<'a> EditContext<'a> {
    fn new(
        generator: &'a ScheduleGenerator,
        snapshot: &'a Snapshot,
        schedule: &'a Schedule,
    ) -> Self {
        Self {
            generator,
            snapshot,
            schedule,
            availability: AvailabilityIndex::build(snapshot.unavailability()),
            siblings: SiblingIndex::build(snapshot.sibling_groups()),
        }
    }

    fn validate(&self, edit: &Edit) -> Result<(), EditError> {
        if self.schedule.status != ScheduleStatus::Draft {
            return Err(EditError::NotDraft(self.schedule.status));
        }

        match edit {
            Edit::Replace { slot, person_id } => {
                self.require_slot(slot)?;
                self.validate_replace(slot, person_id, &[slot.clone()])
            }
            Edit::Clear { slot } => {
                self.require_slot(slot)?;
                Ok(())
            }
            Edit::Swap { a, b } => {
                let person_a = self.occupant(a)?;
                let person_b = self.occupant(b)?;
                let ignore = [a.clone(), b.clone()];
                self.validate_replace(b, &person_a, &ignore)?;
                self.validate_replace(a, &person_b, &ignore)
            }
            Edit::Move { src, dst } => {
                let person = self.occupant(src)?;
                if !self.require_slot(dst)?.is_empty() {
                    return Err(EditError::SlotOccupied(dst.clone()));
                }
                self.validate_replace(dst, &person, &[src.clone(), dst.clone()])
            }
        }
    }

    fn apply(&self, edit: &Edit) -> Result<Schedule, EditError> {
        self.validate(edit)?;

        let mut next = self.schedule.clone();
        match edit {
            Edit::Replace { slot, person_id } => {
                let person = self.require_person(person_id)?;
                write_person(&mut next, slot, person);
            }
            Edit::Clear { slot } => {
                clear_slot(&mut next, slot);
            }
            Edit::Swap { a, b } => {
                let person_a = self.require_person(&self.occupant(a)?)?;
                let person_b = self.require_person(&self.occupant(b)?)?;
                write_person(&mut next, a, person_b);
                write_person(&mut next, b, person_a);
            }
            Edit::Move { src, dst } => {
                let person = self.require_person(&self.occupant(src)?)?;
                write_person(&mut next, dst, person);
                clear_slot(&mut next, src);
            }
        }
        Ok(next)
    }

    /// Hard-rule chain for placing `person_id` into `slot`, ignoring the
    /// occupancy of `ignore` slots (those vacated by the same edit).
    fn validate_replace(
        &self,
        slot: &SlotKey,
        person_id: &str,
        ignore: &[SlotKey],
    ) -> Result<(), EditError> {
        let person = self.require_person(person_id)?;
        let job = self
            .snapshot
            .job(&slot.job_id)
            .ok_or_else(|| EditError::SlotNotFound(slot.clone()))?;
        let date = self
            .schedule
            .service_date_of(slot)
            .ok_or_else(|| EditError::SlotNotFound(slot.clone()))?
            .service_date;

        let violation =
            |kind: ViolationKind| ConstraintViolation::new(kind, person_id, slot.clone());

        self.availability
            .is_eligible(person, job, date)
            .map_err(|reason| match reason {
                IneligibleReason::Inactive => ConstraintViolation::with_key(
                    ViolationKind::NotQualified,
                    person_id,
                    slot.clone(),
                    "edit.person_inactive",
                ),
                IneligibleReason::NotQualified => violation(ViolationKind::NotQualified),
                IneligibleReason::ExcludedFromJob => violation(ViolationKind::ExcludedFromJob),
                IneligibleReason::Unavailable => violation(ViolationKind::Unavailable),
            })?;

        // Same person already in this (date, job) through another slot
        let same_date = self.occupancy_on_date(slot, ignore);
        if same_date
            .iter()
            .any(|(other_person, other_job)| other_person == person_id && *other_job == job.id)
        {
            return Err(violation(ViolationKind::DuplicatePersonOnSchedule).into());
        }

        let index = self.combined_index(ignore);
        if index.consecutive_weeks_ending_at(person_id, date) >= person.max_consecutive_weeks {
            return Err(violation(ViolationKind::ExceedsConsecutiveWeeks).into());
        }
        if index.served_in_month(person_id, &job.id, self.schedule.year, self.schedule.month) {
            return Err(violation(ViolationKind::AlreadyAssignedThisMonth).into());
        }
        if job.consecutive_month_restricted
            && index.served_in_prior_month(
                person_id,
                &job.id,
                self.schedule.year,
                self.schedule.month,
            )
        {
            return Err(violation(ViolationKind::ConsecutiveMonthForbidden).into());
        }

        for (other_person, other_job) in &same_date {
            if other_person == person_id
                && self.generator.exclusivity.is_exclusive(other_job, &job.id)
            {
                return Err(violation(ViolationKind::DayExclusivityViolation).into());
            }
        }

        let partners = self.siblings.separate_partners(person_id);
        if same_date
            .iter()
            .any(|(other_person, _)| partners.contains(other_person))
        {
            return Err(violation(ViolationKind::SiblingSeparateViolation).into());
        }

        Ok(())
    }

    fn require_slot(&self, slot: &SlotKey) -> Result<&Assignment, EditError> {
        self.schedule
            .assignment(slot)
            .ok_or_else(|| EditError::SlotNotFound(slot.clone()))
    }

    fn occupant(&self, slot: &SlotKey) -> Result<String, EditError> {
        self.require_slot(slot)?
            .person_id
            .clone()
            .ok_or_else(|| EditError::SlotEmpty(slot.clone()))
    }

    fn require_person(&self, person_id: &str) -> Result<&'a Person, EditError> {
        self.snapshot
            .person(person_id)
            .ok_or_else(|| EditError::UnknownPerson(person_id.to_string()))
    }

    /// (person, job) pairs occupying the slot's service date, minus the
    /// ignored slots.
    fn occupancy_on_date(&self, slot: &SlotKey, ignore: &[SlotKey]) -> Vec<(String, String)> {
        let ignored: BTreeSet<&SlotKey> = ignore.iter().collect();
        self.schedule
            .service_dates
            .iter()
            .filter(|sd| sd.id == slot.service_date_id)
            .flat_map(|sd| sd.assignments.iter())
            .filter(|a| !ignored.contains(&a.slot_key()))
            .filter_map(|a| {
                a.person_id
                    .as_ref()
                    .map(|person| (person.clone(), a.job_id.clone()))
            })
            .collect()
    }

    /// Snapshot history plus this schedule's assignments, minus the
    /// ignored slots. What the C3 predicates run against during edits.
    fn combined_index(&self, ignore: &[SlotKey]) -> HistoryIndex {
        let ignored: BTreeSet<&SlotKey> = ignore.iter().collect();
        let mut index = HistoryIndex::build(self.snapshot.history());
        for sd in &self.schedule.service_dates {
            for assignment in &sd.assignments {
                if ignored.contains(&assignment.slot_key()) {
                    continue;
                }
                if let Some(person_id) = &assignment.person_id {
                    index.record(AssignmentRecord::new(
                        person_id,
                        &assignment.job_id,
                        sd.service_date,
                        assignment.position,
                    ));
                }
            }
        }
        index
    }
}

fn write_person(schedule: &mut Schedule, slot: &SlotKey, person: &Person) {
    if let Some(assignment) = schedule.assignment_mut(slot) {
        assignment.person_id = Some(person.id.clone());
        assignment.person_name = Some(person.full_name());
        assignment.manual_override = true;
    }
}

fn clear_slot(schedule: &mut Schedule, slot: &SlotKey) {
    if let Some(assignment) = schedule.assignment_mut(slot) {
        assignment.person_id = None;
        assignment.person_name = None;
        // manual_override deliberately untouched
    }
}
