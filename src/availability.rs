//! Candidate slot derivation.
//!
//! `candidates(course) = grid - busy(professor(course)) - exclusions`.
//! A professor without a busy entry can teach in every non-excluded slot.
//! An empty candidate set is valid output; the scheduler reports it as
//! infeasible.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{BusySet, Course, Day, SlotGrid, TimeSlot};

/// Course → slots the course may legally occupy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSlots {
    by_course: BTreeMap<String, BTreeSet<TimeSlot>>,
}

impl CandidateSlots {
    /// Derives candidates for every course.
    pub fn build(
        grid: &SlotGrid,
        courses: &[Course],
        busy: &BusySet,
        exclusions: &[TimeSlot],
    ) -> Self {
        let excluded: HashSet<&TimeSlot> = exclusions.iter().collect();
        let open: Vec<TimeSlot> = grid.slots().filter(|s| !excluded.contains(s)).collect();

        let by_course = courses
            .iter()
            .map(|course| {
                let slots = open
                    .iter()
                    .filter(|s| !busy.is_busy(&course.professor_id, s))
                    .copied()
                    .collect();
                (course.id.clone(), slots)
            })
            .collect();
        Self { by_course }
    }

    /// Sets a course's candidates directly (manual overrides, tests).
    pub fn insert(&mut self, course: impl Into<String>, slots: impl IntoIterator<Item = TimeSlot>) {
        self.by_course.insert(course.into(), slots.into_iter().collect());
    }

    /// Candidates of a course; `None` if the course is unknown.
    pub fn get(&self, course: &str) -> Option<&BTreeSet<TimeSlot>> {
        self.by_course.get(course)
    }

    /// Candidates of a course, chronological; empty if unknown.
    pub fn slots_of(&self, course: &str) -> impl Iterator<Item = TimeSlot> + '_ {
        self.by_course
            .get(course)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Distinct days spanned by a course's candidates.
    pub fn days_of(&self, course: &str) -> BTreeSet<Day> {
        self.slots_of(course).map(|s| s.day).collect()
    }

    /// Largest number of pairwise non-adjacent days among the candidates.
    ///
    /// Days are a weekday line, so the greedy earliest-first pick is optimal.
    pub fn non_adjacent_days_of(&self, course: &str) -> usize {
        let mut count = 0;
        let mut last: Option<Day> = None;
        for day in self.days_of(course) {
            if last.map_or(true, |prev| !prev.is_adjacent(day)) {
                count += 1;
                last = Some(day);
            }
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<TimeSlot>)> {
        self.by_course.iter().map(|(c, s)| (c.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.by_course.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_course.is_empty()
    }
}
