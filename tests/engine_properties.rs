//! Universal engine invariants over randomized rosters.
//!
//! Every property generates an arbitrary (but internally consistent)
//! snapshot for February 2026, with January history, and checks one
//! invariant of the emitted preview.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;
use rota::{
    AssignmentRecord, GenerateRequest, Job, PairingRule, Person, ScheduleGenerator,
    SchedulePreview, SiblingGroup, Snapshot, StateError, Unavailability,
};

const JANUARY_SUNDAYS: [u32; 4] = [4, 11, 18, 25];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn person_id(idx: usize) -> String {
    format!("p{idx:02}")
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    let people = prop::collection::vec(
        (
            prop::bool::weighted(0.85), // active
            prop::bool::weighted(0.85), // qualified for monaguillos
            prop::bool::weighted(0.6),  // qualified for lectores
            1u32..=3,                   // max consecutive weeks
            1u8..=10,                   // preference level
        ),
        4..10,
    );
    let unavailability = prop::collection::vec(
        (0usize..16, 1u32..=22, 0u64..=6, any::<bool>()),
        0..6,
    );
    let history = prop::collection::vec(
        (0usize..16, 0usize..4, any::<bool>(), 0u32..8),
        0..12,
    );
    let separate_pair = prop::option::of((0usize..16, 0usize..16));

    (people, unavailability, history, separate_pair).prop_map(
        |(rows, unavailability, history, separate_pair)| {
            let count = rows.len();
            let people: Vec<Person> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (active, monaguillos, lectores, max_weeks, level))| {
                    let mut person = Person::new(person_id(i), "Person", format!("{i:02}"))
                        .with_max_consecutive_weeks(max_weeks)
                        .with_preference_level(level);
                    if !active {
                        person = person.inactive();
                    }
                    if monaguillos {
                        person = person.with_qualified_job("monaguillos");
                    }
                    if lectores {
                        person = person.with_qualified_job("lectores");
                    }
                    person
                })
                .collect();

            let jobs = vec![
                Job::new("monaguillos", "Monaguillos", 3).month_restricted(),
                Job::new("lectores", "Lectores", 2),
            ];

            let unavailability: Vec<Unavailability> = unavailability
                .into_iter()
                .map(|(idx, start_day, span, recurring)| {
                    let start = date(2026, 2, start_day);
                    let mut record =
                        Unavailability::new(person_id(idx % count), start, start + Days::new(span));
                    if recurring {
                        record = record.recurring();
                    }
                    record
                })
                .collect();

            let history: Vec<AssignmentRecord> = history
                .into_iter()
                .map(|(idx, sunday, lectores, position)| {
                    let (job, positions) = if lectores {
                        ("lectores", 2)
                    } else {
                        ("monaguillos", 3)
                    };
                    AssignmentRecord::new(
                        person_id(idx % count),
                        job,
                        date(2026, 1, JANUARY_SUNDAYS[sunday]),
                        position % positions + 1,
                    )
                })
                .collect();

            let sibling_groups = separate_pair
                .map(|(a, b)| {
                    let (a, b) = (a % count, b % count);
                    if a == b {
                        Vec::new()
                    } else {
                        vec![SiblingGroup::new("g1", "Pair", PairingRule::Separate)
                            .with_members([person_id(a), person_id(b)])]
                    }
                })
                .unwrap_or_default();

            Snapshot::new(people, jobs, sibling_groups, unavailability, history)
        },
    )
}

fn generate(snapshot: &Snapshot) -> SchedulePreview {
    ScheduleGenerator::new()
        .generate(snapshot, &GenerateRequest::new(2026, 2))
        .expect("generated snapshots are valid")
}

/// (person, date) pairs for every filled slot.
fn filled(preview: &SchedulePreview) -> Vec<(String, String, NaiveDate, u32)> {
    preview
        .schedule
        .service_dates
        .iter()
        .flat_map(|sd| {
            sd.assignments.iter().filter_map(move |a| {
                a.person_id
                    .clone()
                    .map(|p| (p, a.job_id.clone(), sd.service_date, a.position))
            })
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn emitted_assignments_pass_every_eligibility_rule(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        for (person_id, job_id, service_date, _) in filled(&preview) {
            let person = snapshot.person(&person_id).expect("person on roster");
            prop_assert!(person.active, "{person_id} is inactive");
            prop_assert!(
                person.is_qualified_for(&job_id),
                "{person_id} not qualified for {job_id}"
            );
            prop_assert!(
                !snapshot
                    .unavailability()
                    .iter()
                    .any(|u| u.person_id == person_id && u.covers(service_date)),
                "{person_id} assigned on blocked date {service_date}"
            );
        }
    }

    #[test]
    fn no_person_serves_twice_on_one_date(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        for sd in &preview.schedule.service_dates {
            let mut seen = BTreeSet::new();
            for assignment in &sd.assignments {
                if let Some(person) = &assignment.person_id {
                    prop_assert!(
                        seen.insert(person.clone()),
                        "{person} appears twice on {}",
                        sd.service_date
                    );
                }
            }
        }
    }

    #[test]
    fn consecutive_week_runs_stay_under_cap(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);

        let mut dates_by_person: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for record in snapshot.history() {
            dates_by_person
                .entry(record.person_id.clone())
                .or_default()
                .insert(record.service_date);
        }
        for (person, _, service_date, _) in filled(&preview) {
            dates_by_person.entry(person).or_default().insert(service_date);
        }

        for (person_id, _, service_date, _) in filled(&preview) {
            let person = snapshot.person(&person_id).unwrap();
            let dates = &dates_by_person[&person_id];
            let mut run = 1u32;
            let mut cursor = service_date;
            while let Some(previous) = cursor.checked_sub_days(Days::new(7)) {
                if !dates.contains(&previous) {
                    break;
                }
                run += 1;
                cursor = previous;
            }
            prop_assert!(
                run <= person.max_consecutive_weeks,
                "{person_id} run of {run} exceeds cap {} ending {service_date}",
                person.max_consecutive_weeks
            );
        }
    }

    #[test]
    fn at_most_one_assignment_per_job_per_month(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        let mut counts: BTreeMap<(String, String), u32> = BTreeMap::new();
        for (person, job, _, _) in filled(&preview) {
            *counts.entry((person, job)).or_insert(0) += 1;
        }
        for ((person, job), count) in counts {
            prop_assert!(count <= 1, "{person} serves {job} {count} times in one month");
        }
    }

    #[test]
    fn restricted_job_skips_prior_month_servers(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        let served_january: BTreeSet<String> = snapshot
            .history()
            .iter()
            .filter(|r| r.job_id == "monaguillos" && r.service_date.month() == 1)
            .map(|r| r.person_id.clone())
            .collect();

        for (person, job, service_date, _) in filled(&preview) {
            if job == "monaguillos" {
                prop_assert!(
                    !served_january.contains(&person),
                    "{person} served monaguillos in January and again on {service_date}"
                );
            }
        }
    }

    #[test]
    fn separate_siblings_never_meet(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        let Some(group) = snapshot.sibling_groups().first() else {
            return Ok(());
        };

        for sd in &preview.schedule.service_dates {
            let on_date: BTreeSet<String> = sd
                .assignments
                .iter()
                .filter_map(|a| a.person_id.clone())
                .collect();
            let present = group
                .member_ids
                .iter()
                .filter(|m| on_date.contains(*m))
                .count();
            prop_assert!(
                present <= 1,
                "SEPARATE siblings together on {}",
                sd.service_date
            );
        }
    }

    #[test]
    fn slot_coverage_is_exact(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        for sd in &preview.schedule.service_dates {
            for job in snapshot.jobs() {
                let mut positions: Vec<u32> = sd
                    .assignments
                    .iter()
                    .filter(|a| a.job_id == job.id)
                    .map(|a| a.position)
                    .collect();
                positions.sort_unstable();
                let expected: Vec<u32> = (1..=job.people_required).collect();
                prop_assert_eq!(positions, expected, "bad coverage for {}", &job.id);
            }
        }
    }

    #[test]
    fn generation_is_deterministic(snapshot in arb_snapshot()) {
        let first = generate(&snapshot);
        let second = generate(&snapshot);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn publish_is_gated_on_completeness(snapshot in arb_snapshot()) {
        let preview = generate(&snapshot);
        match preview.schedule.publish() {
            Ok((published, records)) => {
                prop_assert!(preview.schedule.is_complete());
                prop_assert_eq!(records.len(), filled(&preview).len());
                prop_assert_eq!(
                    published.publish().unwrap_err(),
                    StateError::AlreadyPublished
                );
            }
            Err(StateError::Incomplete { empty_slots }) => {
                prop_assert!(!preview.schedule.is_complete());
                prop_assert!(!empty_slots.is_empty());
            }
            Err(other) => prop_assert!(false, "unexpected state error {other:?}"),
        }
    }
}
