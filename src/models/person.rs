//! Person (volunteer) model.
//!
//! A person carries the facts the engine needs to decide eligibility and
//! priority: the active flag, qualified jobs, per-job exclusion flags,
//! the consecutive-week cap, and the soft preferences (serving frequency,
//! preference level) consumed by the fairness scorer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A volunteer on the roster.
///
/// Treated as an immutable input for the duration of one generation call;
/// creation and mutation happen in the collaborating application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person identifier (opaque, stable).
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Inactive people never appear in any candidate set.
    pub active: bool,
    /// How often this person would like to serve.
    pub preferred_frequency: PreferredFrequency,
    /// Maximum run of consecutive service Sundays (at least 1).
    pub max_consecutive_weeks: u32,
    /// Soft priority knob, 1 (reluctant) to 10 (eager).
    pub preference_level: u8,
    /// Never assign to the "Monaguillos" job.
    pub exclude_monaguillos: bool,
    /// Never assign to the "Lectores" job.
    pub exclude_lectores: bool,
    /// Jobs this person is trained for.
    pub qualified_job_ids: BTreeSet<String>,
    /// Contact metadata, unused by the engine.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Preferred serving cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFrequency {
    Weekly,
    #[default]
    Bimonthly,
    Monthly,
}

impl PreferredFrequency {
    /// Ideal gap between assignments, in weeks.
    pub fn target_gap_weeks(&self) -> u32 {
        match self {
            Self::Weekly => 1,
            Self::Bimonthly => 2,
            Self::Monthly => 4,
        }
    }
}

impl Person {
    /// Creates an active person with default preferences.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: true,
            preferred_frequency: PreferredFrequency::default(),
            max_consecutive_weeks: 2,
            preference_level: 5,
            exclude_monaguillos: false,
            exclude_lectores: false,
            qualified_job_ids: BTreeSet::new(),
            email: None,
            phone: None,
            notes: None,
        }
    }

    /// Marks the person inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_frequency(mut self, frequency: PreferredFrequency) -> Self {
        self.preferred_frequency = frequency;
        self
    }

    /// Sets the consecutive-week cap (floored at 1).
    pub fn with_max_consecutive_weeks(mut self, weeks: u32) -> Self {
        self.max_consecutive_weeks = weeks.max(1);
        self
    }

    /// Sets the preference level (clamped to 1..=10).
    pub fn with_preference_level(mut self, level: u8) -> Self {
        self.preference_level = level.clamp(1, 10);
        self
    }

    /// Adds one qualified job.
    pub fn with_qualified_job(mut self, job_id: impl Into<String>) -> Self {
        self.qualified_job_ids.insert(job_id.into());
        self
    }

    /// Adds several qualified jobs.
    pub fn with_qualified_jobs<I, S>(mut self, job_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualified_job_ids
            .extend(job_ids.into_iter().map(Into::into));
        self
    }

    pub fn excluding_monaguillos(mut self) -> Self {
        self.exclude_monaguillos = true;
        self
    }

    pub fn excluding_lectores(mut self) -> Self {
        self.exclude_lectores = true;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether this person is trained for the given job.
    pub fn is_qualified_for(&self, job_id: &str) -> bool {
        self.qualified_job_ids.contains(job_id)
    }

    /// "First Last", as denormalized into assignment rows.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_builder() {
        let p = Person::new("p1", "Ana", "García")
            .with_frequency(PreferredFrequency::Monthly)
            .with_max_consecutive_weeks(3)
            .with_preference_level(8)
            .with_qualified_jobs(["monaguillos", "lectores"])
            .excluding_lectores();

        assert_eq!(p.id, "p1");
        assert!(p.active);
        assert_eq!(p.preferred_frequency, PreferredFrequency::Monthly);
        assert_eq!(p.max_consecutive_weeks, 3);
        assert_eq!(p.preference_level, 8);
        assert!(p.is_qualified_for("monaguillos"));
        assert!(!p.is_qualified_for("coro"));
        assert!(p.exclude_lectores);
        assert!(!p.exclude_monaguillos);
        assert_eq!(p.full_name(), "Ana García");
    }

    #[test]
    fn test_clamping() {
        let p = Person::new("p1", "A", "B")
            .with_max_consecutive_weeks(0)
            .with_preference_level(99);
        assert_eq!(p.max_consecutive_weeks, 1);
        assert_eq!(p.preference_level, 10);
    }

    #[test]
    fn test_frequency_targets() {
        assert_eq!(PreferredFrequency::Weekly.target_gap_weeks(), 1);
        assert_eq!(PreferredFrequency::Bimonthly.target_gap_weeks(), 2);
        assert_eq!(PreferredFrequency::Monthly.target_gap_weeks(), 4);
    }
}
