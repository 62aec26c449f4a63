//! Registration snapshot and professor busy slots.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::TimeSlot;

/// Student → enrolled courses. Duplicate enrollments collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enrollment {
    students: BTreeMap<String, BTreeSet<String>>,
}

impl Enrollment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one (student, course) registration row.
    pub fn enroll(&mut self, student: impl Into<String>, course: impl Into<String>) {
        self.students
            .entry(student.into())
            .or_default()
            .insert(course.into());
    }

    /// Builder form of [`enroll`](Self::enroll) for a student's whole list.
    pub fn with_student<I, S>(mut self, student: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.students.entry(student.into()).or_default();
        entry.extend(courses.into_iter().map(Into::into));
        self
    }

    /// Courses of one student (empty if unknown).
    pub fn courses_of(&self, student: &str) -> impl Iterator<Item = &str> {
        self.students
            .get(student)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_enrolled(&self, student: &str, course: &str) -> bool {
        self.students
            .get(student)
            .is_some_and(|set| set.contains(course))
    }

    /// (student, courses) pairs in student order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.students.iter().map(|(s, c)| (s.as_str(), c))
    }

    /// Students enrolled in `course`, in id order.
    pub fn students_in(&self, course: &str) -> Vec<&str> {
        self.students
            .iter()
            .filter(|(_, courses)| courses.contains(course))
            .map(|(s, _)| s.as_str())
            .collect()
    }

    /// Course → enrolled students, for every course that has any.
    pub fn rosters(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut map: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (student, courses) in &self.students {
            for course in courses {
                map.entry(course.as_str()).or_default().insert(student.as_str());
            }
        }
        map
    }

    /// Restricts to the students of `course`, keeping their full course lists.
    pub fn cohort_of(&self, course: &str) -> Enrollment {
        let students = self
            .students
            .iter()
            .filter(|(_, courses)| courses.contains(course))
            .map(|(s, c)| (s.clone(), c.clone()))
            .collect();
        Enrollment { students }
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl<S: Into<String>, C: Into<String>> FromIterator<(S, C)> for Enrollment {
    fn from_iter<T: IntoIterator<Item = (S, C)>>(iter: T) -> Self {
        let mut enrollment = Enrollment::new();
        for (student, course) in iter {
            enrollment.enroll(student, course);
        }
        enrollment
    }
}

/// Professor → slots the professor cannot teach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusySet {
    busy: BTreeMap<String, BTreeSet<TimeSlot>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_busy(&mut self, professor: impl Into<String>, slot: TimeSlot) {
        self.busy.entry(professor.into()).or_default().insert(slot);
    }

    pub fn with_busy<I>(mut self, professor: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = TimeSlot>,
    {
        self.busy.entry(professor.into()).or_default().extend(slots);
        self
    }

    /// Busy slots of a professor; `None` when the professor has no entry.
    pub fn slots_of(&self, professor: &str) -> Option<&BTreeSet<TimeSlot>> {
        self.busy.get(professor)
    }

    pub fn is_busy(&self, professor: &str, slot: &TimeSlot) -> bool {
        self.busy
            .get(professor)
            .is_some_and(|slots| slots.contains(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<TimeSlot>)> {
        self.busy.iter().map(|(p, s)| (p.as_str(), s))
    }
}
