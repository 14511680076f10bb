//! Fairness reporting.
//!
//! Summarizes each active person's standing for a year: total and
//! this-year assignment counts, per-job tallies, last service date, and
//! the fairness score (higher = more overdue). Sorted most-overdue
//! first, person id as the deterministic tiebreak.

use crate::index::HistoryIndex;
use crate::models::{FairnessScore, Job, JobAssignmentCount, Person};

use super::Snapshot;

/// Fairness report over the snapshot's history.
pub fn fairness(snapshot: &Snapshot, year: i32) -> Vec<FairnessScore> {
    let index = HistoryIndex::build(snapshot.history());
    fairness_from_index(&index, snapshot.people(), snapshot.jobs(), year)
}

pub(crate) fn fairness_from_index(
    index: &HistoryIndex,
    people: &[Person],
    jobs: &[Job],
    year: i32,
) -> Vec<FairnessScore> {
    let mut scores: Vec<FairnessScore> = people
        .iter()
        .filter(|person| person.active)
        .map(|person| {
            let total_assignments = index.count_total(&person.id);
            let assignments_this_year = index.count_this_year(&person.id, year);

            let fairness_score = if total_assignments == 0 {
                1.0
            } else {
                1.0 / (assignments_this_year as f64 + 1.0)
            };

            let assignments_by_job = index
                .counts_by_job_in_year(&person.id, year)
                .into_iter()
                .map(|(job_id, count)| {
                    let job_name = jobs
                        .iter()
                        .find(|job| job.id == job_id)
                        .map(|job| job.name.clone())
                        .unwrap_or_else(|| job_id.clone());
                    JobAssignmentCount {
                        job_id,
                        job_name,
                        count,
                    }
                })
                .collect();

            FairnessScore {
                person_id: person.id.clone(),
                person_name: person.full_name(),
                total_assignments,
                assignments_this_year,
                assignments_by_job,
                last_assignment_date: index.last_service_date(&person.id),
                fairness_score,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.fairness_score
            .total_cmp(&a.fairness_score)
            .then_with(|| a.person_id.cmp(&b.person_id))
    });
    scores
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::AssignmentRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Person::new("p1", "Ana", "García").with_qualified_job("monaguillos"),
                Person::new("p2", "Bea", "López").with_qualified_job("monaguillos"),
                Person::new("p3", "Cruz", "Ruiz")
                    .with_qualified_job("monaguillos")
                    .inactive(),
            ],
            vec![Job::new("monaguillos", "Monaguillos", 4)],
            Vec::new(),
            Vec::new(),
            vec![
                AssignmentRecord::new("p1", "monaguillos", date(2025, 11, 2), 1),
                AssignmentRecord::new("p1", "monaguillos", date(2026, 1, 4), 2),
                AssignmentRecord::new("p1", "monaguillos", date(2026, 1, 18), 3),
            ],
        )
    }

    #[test]
    fn test_report_counts_and_order() {
        let scores = fairness(&snapshot(), 2026);

        // Inactive people are not reported
        assert_eq!(scores.len(), 2);

        // p2 never served: score 1.0, sorts first
        assert_eq!(scores[0].person_id, "p2");
        assert_eq!(scores[0].fairness_score, 1.0);
        assert_eq!(scores[0].total_assignments, 0);
        assert!(scores[0].last_assignment_date.is_none());

        let p1 = &scores[1];
        assert_eq!(p1.person_id, "p1");
        assert_eq!(p1.total_assignments, 3);
        assert_eq!(p1.assignments_this_year, 2);
        assert_eq!(p1.last_assignment_date, Some(date(2026, 1, 18)));
        assert!((p1.fairness_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(p1.assignments_by_job.len(), 1);
        assert_eq!(p1.assignments_by_job[0].job_name, "Monaguillos");
        assert_eq!(p1.assignments_by_job[0].count, 2);
    }

    #[test]
    fn test_never_served_beats_served_even_with_zero_this_year() {
        // p1 served only last year: year count 0 gives score 1/1 = 1.0,
        // tying the never-served p2; person id breaks the tie
        let snapshot = Snapshot::new(
            vec![
                Person::new("p1", "A", "A").with_qualified_job("j"),
                Person::new("p2", "B", "B").with_qualified_job("j"),
            ],
            vec![Job::new("j", "J", 1)],
            Vec::new(),
            Vec::new(),
            vec![AssignmentRecord::new("p1", "j", date(2025, 6, 1), 1)],
        );
        let scores = fairness(&snapshot, 2026);
        assert_eq!(scores[0].person_id, "p1");
        assert_eq!(scores[1].person_id, "p2");
        assert_eq!(scores[0].fairness_score, scores[1].fairness_score);
    }
}
