//! Snapshot integrity checks.
//!
//! Run before any slot is visited. Detects:
//! - duplicate person, job, or group ids
//! - references to unknown people or jobs (qualifications, sibling
//!   members, unavailability, history)
//! - position lists that do not match `people_required` or are not
//!   numbered contiguously from 1
//! - inverted absolute unavailability ranges
//!
//! All problems are collected and reported together; any of them is
//! fatal for the generation call.

use std::collections::BTreeSet;

use crate::engine::Snapshot;

/// A snapshot integrity problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of snapshot integrity problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same id.
    DuplicateId,
    /// A reference to a person that is not on the roster.
    UnknownPersonReference,
    /// A reference to a job that does not exist.
    UnknownJobReference,
    /// `positions.len()` differs from `people_required`.
    PositionCountMismatch,
    /// Position numbers are not exactly 1..=people_required.
    NonContiguousPositions,
    /// An absolute unavailability range with `start > end`.
    InvalidDateRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a snapshot before generation.
///
/// Returns `Ok(())` if all checks pass, `Err(errors)` with every
/// detected issue.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut person_ids = BTreeSet::new();
    for person in snapshot.people() {
        if !person_ids.insert(person.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate person id: {}", person.id),
            ));
        }
    }

    let mut job_ids = BTreeSet::new();
    for job in snapshot.jobs() {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate job id: {}", job.id),
            ));
        }

        if job.positions.len() as u32 != job.people_required {
            errors.push(ValidationError::new(
                ValidationErrorKind::PositionCountMismatch,
                format!(
                    "job '{}' requires {} people but defines {} positions",
                    job.id,
                    job.people_required,
                    job.positions.len()
                ),
            ));
        }

        // Positions are sorted at snapshot construction
        let expected: Vec<u32> = (1..=job.positions.len() as u32).collect();
        let actual: Vec<u32> = job.position_numbers().collect();
        if actual != expected {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonContiguousPositions,
                format!("job '{}' positions are numbered {actual:?}", job.id),
            ));
        }
    }

    for person in snapshot.people() {
        for job_id in &person.qualified_job_ids {
            if !job_ids.contains(job_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownJobReference,
                    format!("person '{}' is qualified for unknown job '{job_id}'", person.id),
                ));
            }
        }
    }

    let mut group_ids = BTreeSet::new();
    for group in snapshot.sibling_groups() {
        if !group_ids.insert(group.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate sibling group id: {}", group.id),
            ));
        }
        for member in &group.member_ids {
            if !person_ids.contains(member.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPersonReference,
                    format!("sibling group '{}' lists unknown person '{member}'", group.id),
                ));
            }
        }
    }

    for record in snapshot.unavailability() {
        if !person_ids.contains(record.person_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPersonReference,
                format!("unavailability for unknown person '{}'", record.person_id),
            ));
        }
        if !record.recurring && record.start_date > record.end_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                format!(
                    "unavailability for '{}' has start {} after end {}",
                    record.person_id, record.start_date, record.end_date
                ),
            ));
        }
    }

    for record in snapshot.history() {
        if !person_ids.contains(record.person_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPersonReference,
                format!("history row for unknown person '{}'", record.person_id),
            ));
        }
        if !job_ids.contains(record.job_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownJobReference,
                format!("history row for unknown job '{}'", record.job_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
