//! Per-student timetable view.

use serde::{Deserialize, Serialize};

use super::ConflictAnalyzer;
use crate::models::{Enrollment, ScheduleAssignment, StudentConflict, TimeSlot};

/// One scheduled meeting of a student's course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSession {
    pub course_id: String,
    pub slot: TimeSlot,
}

/// A student's week: every session of their courses plus their conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentTimetable {
    pub student_id: String,
    /// Chronological, then by course id.
    pub sessions: Vec<StudentSession>,
    pub conflicts: Vec<StudentConflict>,
}

impl StudentTimetable {
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Builds one student's timetable. Unknown students get an empty week.
pub fn student_timetable(
    student: &str,
    schedule: &ScheduleAssignment,
    enrollment: &Enrollment,
) -> StudentTimetable {
    let mut sessions: Vec<StudentSession> = enrollment
        .courses_of(student)
        .flat_map(|course| {
            schedule.slots_of(course).map(move |slot| StudentSession {
                course_id: course.to_string(),
                slot,
            })
        })
        .collect();
    sessions.sort_by(|a, b| (a.slot, &a.course_id).cmp(&(b.slot, &b.course_id)));

    let single: Enrollment = enrollment
        .courses_of(student)
        .map(|course| (student, course))
        .collect();
    let conflicts = ConflictAnalyzer::analyze(schedule, &single).conflicts;

    StudentTimetable {
        student_id: student.to_string(),
        sessions,
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TimeSlot {
        s.parse().unwrap()
    }

    #[test]
    fn test_student_week() {
        let schedule = ScheduleAssignment::new()
            .with_course("A", [slot("Monday 08:30"), slot("Wednesday 10:30")])
            .with_course("B", [slot("Monday 08:30"), slot("Thursday 14:30")])
            .with_course("C", [slot("Tuesday 08:30")]);
        let enrollment = Enrollment::new()
            .with_student("S1", ["B", "A"])
            .with_student("S2", ["C"]);

        let week = student_timetable("S1", &schedule, &enrollment);
        let order: Vec<(&str, String)> = week
            .sessions
            .iter()
            .map(|s| (s.course_id.as_str(), s.slot.label()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", "Monday 08:30".to_string()),
                ("B", "Monday 08:30".to_string()),
                ("A", "Wednesday 10:30".to_string()),
                ("B", "Thursday 14:30".to_string()),
            ]
        );
        assert_eq!(week.conflicts.len(), 1);
        assert!(!week.is_conflict_free());

        assert!(student_timetable("S2", &schedule, &enrollment).is_conflict_free());
    }

    #[test]
    fn test_unknown_student() {
        let week = student_timetable("nobody", &ScheduleAssignment::new(), &Enrollment::new());
        assert!(week.sessions.is_empty());
        assert!(week.conflicts.is_empty());
    }
}
