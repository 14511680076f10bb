//! Job and position models.
//!
//! A job is a role category filled by `people_required` persons per
//! service date, split into an ordered list of positions whose semantic
//! role is fixed (position 1 is not interchangeable with position 2).
//!
//! Jobs are plain data with behavior flags; no trait hierarchy. The
//! `consecutive_month_restricted` flag marks jobs whose servers must
//! skip a month between appearances.

use serde::{Deserialize, Serialize};

/// A numbered sub-role within a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique within the job, contiguous from 1.
    pub position_number: u32,
    /// Fixed semantic name, e.g. "Monaguillo 3".
    pub name: String,
}

impl Position {
    pub fn new(position_number: u32, name: impl Into<String>) -> Self {
        Self {
            position_number,
            name: name.into(),
        }
    }
}

/// A role category offered on every service date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier (opaque, stable).
    pub id: String,
    pub name: String,
    /// How many persons fill this job per date. Invariant: equals
    /// `positions.len()`.
    pub people_required: u32,
    pub active: bool,
    /// A person serving this job in month M may not serve it in M+1.
    pub consecutive_month_restricted: bool,
    /// Ordered by `position_number`, contiguous from 1.
    pub positions: Vec<Position>,
}

impl Job {
    /// Creates an active job with default position names
    /// ("Name 1" .. "Name N").
    pub fn new(id: impl Into<String>, name: impl Into<String>, people_required: u32) -> Self {
        let name = name.into();
        let people_required = people_required.max(1);
        let positions = (1..=people_required)
            .map(|n| Position::new(n, format!("{name} {n}")))
            .collect();
        Self {
            id: id.into(),
            name,
            people_required,
            active: true,
            consecutive_month_restricted: false,
            positions,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Tags the job with the consecutive-month restriction.
    pub fn month_restricted(mut self) -> Self {
        self.consecutive_month_restricted = true;
        self
    }

    /// Replaces the default position names, in position order. The count
    /// must match `people_required`; extra names are ignored and missing
    /// ones keep their defaults.
    pub fn with_position_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (position, name) in self.positions.iter_mut().zip(names) {
            position.name = name.into();
        }
        self
    }

    /// Looks up a position by number.
    pub fn position(&self, position_number: u32) -> Option<&Position> {
        self.positions
            .iter()
            .find(|p| p.position_number == position_number)
    }

    /// Position numbers in ascending order.
    pub fn position_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.positions.iter().map(|p| p.position_number)
    }
}
