//! Timetable (solution) model.
//!
//! A timetable maps each course to the set of slots it meets in. Conflict
//! reports describe where a timetable hurts students or breaks a
//! structural rule.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Day, TimeSlot};

/// Course → assigned slots.
///
/// A timetable produced by the scheduler has exactly `required_sessions`
/// slots per course and at most one slot per course per day. Timetables
/// handed in from outside (manual edits) may violate either; see
/// `analysis::ConflictAnalyzer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleAssignment {
    courses: BTreeMap<String, BTreeSet<TimeSlot>>,
}

impl ScheduleAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a course in a slot.
    pub fn assign(&mut self, course: impl Into<String>, slot: TimeSlot) {
        self.courses.entry(course.into()).or_default().insert(slot);
    }

    pub fn with_course<I>(mut self, course: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = TimeSlot>,
    {
        self.courses.entry(course.into()).or_default().extend(slots);
        self
    }

    /// Slots of a course; empty if unscheduled.
    pub fn slots_of(&self, course: &str) -> impl Iterator<Item = TimeSlot> + '_ {
        self.courses
            .get(course)
            .into_iter()
            .flat_map(|slots| slots.iter().copied())
    }

    pub fn meets_at(&self, course: &str, slot: &TimeSlot) -> bool {
        self.courses
            .get(course)
            .is_some_and(|slots| slots.contains(slot))
    }

    /// Removes a course, returning its previous slots.
    pub fn unassign(&mut self, course: &str) -> Option<BTreeSet<TimeSlot>> {
        self.courses.remove(course)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<TimeSlot>)> {
        self.courses.iter().map(|(c, s)| (c.as_str(), s))
    }

    /// Slot → courses meeting in it.
    pub fn by_slot(&self) -> BTreeMap<TimeSlot, BTreeSet<&str>> {
        let mut map: BTreeMap<TimeSlot, BTreeSet<&str>> = BTreeMap::new();
        for (course, slots) in &self.courses {
            for slot in slots {
                map.entry(*slot).or_default().insert(course.as_str());
            }
        }
        map
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Total number of placed sessions.
    pub fn session_count(&self) -> usize {
        self.courses.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// One student with two or more enrolled courses in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentConflict {
    pub student_id: String,
    pub slot: TimeSlot,
    pub courses: BTreeSet<String>,
}

/// All student conflicts of a timetable, ordered by (student, slot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflicts: Vec<StudentConflict>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of (student, slot) conflict instances.
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Distinct students with at least one conflict.
    pub fn students(&self) -> BTreeSet<&str> {
        self.conflicts
            .iter()
            .map(|c| c.student_id.as_str())
            .collect()
    }

    pub fn for_student<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a StudentConflict> {
        self.conflicts.iter().filter(move |c| c.student_id == student)
    }
}

/// A course meeting more than once on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SameDayViolation {
    pub course_id: String,
    pub day: Day,
    pub sessions: usize,
}

/// A professor teaching two or more courses in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorClash {
    pub professor_id: String,
    pub slot: TimeSlot,
    pub courses: BTreeSet<String>,
}
