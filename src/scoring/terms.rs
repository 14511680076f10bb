//! The six scoring dimensions.
//!
//! All terms return values in 0.0..=1.0; the scorer applies the weights.

use super::{Candidate, ScoreContext, ScoreTerm};

/// Fewer assignments this year means a stronger claim: 1 / (count + 1).
#[derive(Debug, Clone, Copy)]
pub struct FairShare;

impl ScoreTerm for FairShare {
    fn name(&self) -> &'static str {
        "fair_share"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64 {
        let count = context
            .history
            .count_this_year(&candidate.person.id, context.year());
        1.0 / (count as f64 + 1.0)
    }
}

/// The longer since the last assignment, the stronger the claim.
/// Zero for people who have never served; otherwise
/// clamp((gap_weeks - 1) / 12, 0, 1).
#[derive(Debug, Clone, Copy)]
pub struct Recency;

impl ScoreTerm for Recency {
    fn name(&self) -> &'static str {
        "recency"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64 {
        match context.gap_weeks(&candidate.person.id) {
            None => 0.0,
            Some(gap_weeks) => ((gap_weeks - 1.0) / 12.0).clamp(0.0, 1.0),
        }
    }
}

/// Normalized preference level: level / 10.
#[derive(Debug, Clone, Copy)]
pub struct Preference;

impl ScoreTerm for Preference {
    fn name(&self) -> &'static str {
        "preference"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &ScoreContext<'_>) -> f64 {
        candidate.person.preference_level as f64 / 10.0
    }
}

/// How well the current gap matches the preferred cadence. Peaks at 1
/// when the gap equals the target (weekly=1, bimonthly=2, monthly=4)
/// and decays linearly to 0 at twice the target and at zero. Zero when
/// the person has never served: there is no gap to match.
#[derive(Debug, Clone, Copy)]
pub struct Frequency;

impl ScoreTerm for Frequency {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64 {
        let Some(gap_weeks) = context.gap_weeks(&candidate.person.id) else {
            return 0.0;
        };
        let target = candidate.person.preferred_frequency.target_gap_weeks() as f64;
        (1.0 - (gap_weeks - target).abs() / target).clamp(0.0, 1.0)
    }
}

/// Bonus when a TOGETHER-linked sibling is already on this date.
#[derive(Debug, Clone, Copy)]
pub struct SiblingBonus;

impl ScoreTerm for SiblingBonus {
    fn name(&self) -> &'static str {
        "sibling_bonus"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &ScoreContext<'_>) -> f64 {
        let partners = context.siblings.together_partners(&candidate.person.id);
        if partners
            .iter()
            .any(|sibling| context.assigned_on_date.contains(sibling))
        {
            1.0
        } else {
            0.0
        }
    }
}

/// The rotation driver: 1 when the slot's position is still in the
/// person's bag for this job, 0 once they have already performed it in
/// the current cycle.
#[derive(Debug, Clone, Copy)]
pub struct RotationBag;

impl ScoreTerm for RotationBag {
    fn name(&self) -> &'static str {
        "rotation_bag"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &ScoreContext<'_>) -> f64 {
        if candidate.bag.contains(&candidate.position) {
            1.0
        } else {
            0.0
        }
    }
}
