//! Fairness scoring for candidate (person, date, job, position) tuples.
//!
//! Each scoring dimension is a [`ScoreTerm`]; the [`FairnessScorer`]
//! combines them as a weighted sum with tunable [`ScoreWeights`]. Higher
//! scores win. Weights are plain configuration threaded through the
//! generator for one run; there is no global state.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling" (weighted
//! multi-criteria dispatching).

mod terms;

pub use terms::{FairShare, Frequency, Preference, Recency, RotationBag, SiblingBonus};

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::index::{HistoryIndex, SiblingIndex};
use crate::models::{Job, Person};

/// Term weights for one generation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub fair: f64,
    pub recency: f64,
    pub preference: f64,
    pub frequency: f64,
    pub sibling: f64,
    pub rotation: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            fair: 0.70,
            recency: 0.20,
            preference: 0.10,
            frequency: 0.10,
            sibling: 0.15,
            rotation: 0.30,
        }
    }
}

/// One candidate for the slot being scored.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub person: &'a Person,
    /// Position number of the slot under consideration.
    pub position: u32,
    /// The person's rotation bag for the slot's job.
    pub bag: &'a BTreeSet<u32>,
}

/// Everything a term may consult about the slot's surroundings.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub date: NaiveDate,
    pub job: &'a Job,
    pub history: &'a HistoryIndex,
    pub siblings: &'a SiblingIndex,
    /// People already assigned anywhere on this service date.
    pub assigned_on_date: &'a BTreeSet<String>,
}

impl ScoreContext<'_> {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Whole and fractional weeks since the person's last assignment.
    pub fn gap_weeks(&self, person_id: &str) -> Option<f64> {
        let last = self.history.last_service_date(person_id)?;
        Some((self.date - last).num_days() as f64 / 7.0)
    }
}

/// A scoring dimension.
///
/// # Score Convention
/// **Higher score = stronger claim on the slot.** Terms return values
/// in 0.0..=1.0; weighting happens in the scorer.
pub trait ScoreTerm: Send + Sync + Debug {
    /// Term name (e.g. "fair_share").
    fn name(&self) -> &'static str;

    /// Evaluates this dimension for one candidate.
    fn evaluate(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64;
}

#[derive(Clone)]
struct WeightedTerm {
    term: Arc<dyn ScoreTerm>,
    weight: f64,
}

/// Weighted-sum combination of all scoring terms.
#[derive(Clone)]
pub struct FairnessScorer {
    terms: Vec<WeightedTerm>,
}

impl FairnessScorer {
    /// Builds the standard six-term scorer with the given weights.
    pub fn new(weights: &ScoreWeights) -> Self {
        let mut scorer = Self { terms: Vec::new() };
        scorer.push(FairShare, weights.fair);
        scorer.push(Recency, weights.recency);
        scorer.push(Preference, weights.preference);
        scorer.push(Frequency, weights.frequency);
        scorer.push(SiblingBonus, weights.sibling);
        scorer.push(RotationBag, weights.rotation);
        scorer
    }

    fn push<T: ScoreTerm + 'static>(&mut self, term: T, weight: f64) {
        self.terms.push(WeightedTerm {
            term: Arc::new(term),
            weight,
        });
    }

    /// Weighted total for one candidate.
    pub fn score(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64 {
        self.terms
            .iter()
            .map(|wt| wt.term.evaluate(candidate, context) * wt.weight)
            .sum()
    }

    /// Per-term contributions, for logging and diagnostics.
    pub fn breakdown(
        &self,
        candidate: &Candidate<'_>,
        context: &ScoreContext<'_>,
    ) -> Vec<(&'static str, f64)> {
        self.terms
            .iter()
            .map(|wt| (wt.term.name(), wt.term.evaluate(candidate, context) * wt.weight))
            .collect()
    }
}

impl Debug for FairnessScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FairnessScorer")
            .field(
                "terms",
                &self
                    .terms
                    .iter()
                    .map(|wt| format!("{}(w={})", wt.term.name(), wt.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fresh_person_scores_fair_plus_preference_plus_bag() {
        let person = Person::new("p1", "A", "B").with_qualified_job("monaguillos");
        let job = Job::new("monaguillos", "Monaguillos", 4);
        let history = HistoryIndex::default();
        let siblings = SiblingIndex::default();
        let assigned = BTreeSet::new();
        let bag: BTreeSet<u32> = (1..=4).collect();

        let candidate = Candidate {
            person: &person,
            position: 1,
            bag: &bag,
        };
        let context = ScoreContext {
            date: date(2026, 2, 1),
            job: &job,
            history: &history,
            siblings: &siblings,
            assigned_on_date: &assigned,
        };

        let scorer = FairnessScorer::new(&ScoreWeights::default());
        // fair 0.70*1.0 + preference 0.10*0.5 + rotation 0.30*1.0;
        // recency, frequency, sibling are all zero for a fresh person
        let expected = 0.70 + 0.05 + 0.30;
        assert!((scorer.score(&candidate, &context) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_names() {
        let person = Person::new("p1", "A", "B");
        let job = Job::new("j", "J", 2);
        let history = HistoryIndex::default();
        let siblings = SiblingIndex::default();
        let assigned = BTreeSet::new();
        let bag = BTreeSet::from([1, 2]);

        let candidate = Candidate {
            person: &person,
            position: 2,
            bag: &bag,
        };
        let context = ScoreContext {
            date: date(2026, 2, 1),
            job: &job,
            history: &history,
            siblings: &siblings,
            assigned_on_date: &assigned,
        };

        let scorer = FairnessScorer::new(&ScoreWeights::default());
        let names: Vec<_> = scorer
            .breakdown(&candidate, &context)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "fair_share",
                "recency",
                "preference",
                "frequency",
                "sibling_bonus",
                "rotation_bag"
            ]
        );
    }

    #[test]
    fn test_gap_weeks() {
        let mut history = HistoryIndex::default();
        history.record(AssignmentRecord::new("p1", "j", date(2026, 1, 4), 1));
        let job = Job::new("j", "J", 1);
        let siblings = SiblingIndex::default();
        let assigned = BTreeSet::new();
        let context = ScoreContext {
            date: date(2026, 2, 1),
            job: &job,
            history: &history,
            siblings: &siblings,
            assigned_on_date: &assigned,
        };
        assert_eq!(context.gap_weeks("p1"), Some(4.0));
        assert_eq!(context.gap_weeks("p2"), None);
    }
}
