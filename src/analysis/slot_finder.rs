//! Minimal-conflict re-placement search for a single course.
//!
//! # Algorithm
//! For each candidate slot of the target course, count the students of that
//! course who already have another enrolled course assigned to the slot.
//! Rank by (count, label) and return the minimal-count slots.
//!
//! # Complexity
//! O(c * s * k) where c = candidate slots, s = students in the course,
//! k = courses per student.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::availability::CandidateSlots;
use crate::models::{Enrollment, ScheduleAssignment, TimeSlot};

/// Conflict score of placing the target course in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotScore {
    pub slot: TimeSlot,
    /// Students who would be double-booked.
    pub conflict_count: usize,
    /// Student → their other courses already in `slot`.
    pub details: BTreeMap<String, Vec<String>>,
}

/// Candidate slots ranked by conflict count, then by label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRanking {
    pub ranked: Vec<SlotScore>,
    /// Slots achieving the minimum count, in ranked order.
    pub best: Vec<TimeSlot>,
}

impl SlotRanking {
    /// Lowest conflict count, if any candidate exists.
    pub fn min_conflicts(&self) -> Option<usize> {
        self.ranked.first().map(|s| s.conflict_count)
    }
}

/// Scores every candidate slot of `course` against the other courses'
/// current placements.
///
/// The course's own entry in `schedule` is ignored, so the routine works
/// both for unplaced courses and for moving a placed one. Read-only: the
/// schedule is never modified.
pub fn find_min_conflict_slots(
    course: &str,
    schedule: &ScheduleAssignment,
    enrollment: &Enrollment,
    candidates: &CandidateSlots,
) -> SlotRanking {
    let students = enrollment.students_in(course);

    // student → slot → other courses there
    let mut busy: BTreeMap<&str, BTreeMap<TimeSlot, Vec<String>>> = BTreeMap::new();
    for &student in &students {
        let per_slot = busy.entry(student).or_default();
        for other in enrollment.courses_of(student).filter(|c| *c != course) {
            for slot in schedule.slots_of(other) {
                per_slot.entry(slot).or_default().push(other.to_string());
            }
        }
    }

    let mut ranked: Vec<SlotScore> = candidates
        .slots_of(course)
        .map(|slot| {
            let details: BTreeMap<String, Vec<String>> = busy
                .iter()
                .filter_map(|(student, per_slot)| {
                    per_slot
                        .get(&slot)
                        .map(|courses| (student.to_string(), courses.clone()))
                })
                .collect();
            SlotScore {
                slot,
                conflict_count: details.len(),
                details,
            }
        })
        .collect();

    ranked.sort_by(|a, b| match a.conflict_count.cmp(&b.conflict_count) {
        Ordering::Equal => a.slot.label_cmp(&b.slot),
        other => other,
    });

    let best = match ranked.first() {
        Some(first) => {
            let min = first.conflict_count;
            ranked
                .iter()
                .take_while(|s| s.conflict_count == min)
                .map(|s| s.slot)
                .collect()
        }
        None => Vec::new(),
    };

    SlotRanking { ranked, best }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TimeSlot {
        s.parse().unwrap()
    }

    fn fixture() -> (ScheduleAssignment, Enrollment, CandidateSlots) {
        let schedule = ScheduleAssignment::new()
            .with_course("B", [slot("Monday 08:30"), slot("Wednesday 08:30")])
            .with_course("C", [slot("Monday 08:30"), slot("Tuesday 10:30")])
            .with_course("T", [slot("Monday 08:30"), slot("Friday 08:30")]);
        let enrollment = Enrollment::new()
            .with_student("S1", ["T", "B"])
            .with_student("S2", ["T", "B", "C"])
            .with_student("S3", ["T", "C"])
            .with_student("S4", ["B"]);
        let mut cands = CandidateSlots::default();
        cands.insert(
            "T",
            [
                slot("Monday 08:30"),
                slot("Tuesday 10:30"),
                slot("Wednesday 08:30"),
                slot("Thursday 08:30"),
                slot("Friday 08:30"),
            ],
        );
        (schedule, enrollment, cands)
    }

    #[test]
    fn test_counts_and_details() {
        let (schedule, enrollment, cands) = fixture();
        let ranking = find_min_conflict_slots("T", &schedule, &enrollment, &cands);

        let monday = ranking
            .ranked
            .iter()
            .find(|s| s.slot == slot("Monday 08:30"))
            .unwrap();
        assert_eq!(monday.conflict_count, 3);
        assert_eq!(monday.details["S2"], vec!["B".to_string(), "C".to_string()]);
        // S4 is not in T.
        assert!(!monday.details.contains_key("S4"));

        let wednesday = ranking
            .ranked
            .iter()
            .find(|s| s.slot == slot("Wednesday 08:30"))
            .unwrap();
        assert_eq!(wednesday.conflict_count, 2);
    }

    #[test]
    fn test_ranking_order_and_best() {
        let (schedule, enrollment, cands) = fixture();
        let ranking = find_min_conflict_slots("T", &schedule, &enrollment, &cands);

        // Own placement (Friday) does not count against the course.
        // Zero-conflict ties break by label: "Friday 08:30" < "Thursday 08:30".
        assert_eq!(ranking.best, vec![slot("Friday 08:30"), slot("Thursday 08:30")]);
        assert_eq!(ranking.min_conflicts(), Some(0));

        let counts: Vec<usize> = ranking.ranked.iter().map(|s| s.conflict_count).collect();
        assert_eq!(counts, vec![0, 0, 2, 2, 3]);
        // Tuesday 10:30 (S2, S3 via C) and Wednesday 08:30 (S1, S2 via B).
        assert_eq!(ranking.ranked[2].slot, slot("Tuesday 10:30"));
        assert_eq!(ranking.ranked[3].slot, slot("Wednesday 08:30"));
    }

    #[test]
    fn test_deterministic() {
        let (schedule, enrollment, cands) = fixture();
        let first = find_min_conflict_slots("T", &schedule, &enrollment, &cands);
        for _ in 0..5 {
            assert_eq!(find_min_conflict_slots("T", &schedule, &enrollment, &cands), first);
        }
    }

    #[test]
    fn test_unknown_course_has_no_candidates() {
        let (schedule, enrollment, cands) = fixture();
        let ranking = find_min_conflict_slots("Z", &schedule, &enrollment, &cands);
        assert!(ranking.ranked.is_empty());
        assert!(ranking.best.is_empty());
        assert_eq!(ranking.min_conflicts(), None);
    }
}
