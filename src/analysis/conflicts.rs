//! Independent consistency checks over any timetable.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    ConflictReport, Course, Day, Enrollment, ProfessorClash, SameDayViolation, ScheduleAssignment,
    StudentConflict, TimeSlot,
};

/// Conflict analysis for solver output or hand-edited timetables.
///
/// Every check is a pure function of its inputs.
pub struct ConflictAnalyzer;

impl ConflictAnalyzer {
    /// Students with two or more enrolled courses meeting in the same slot.
    ///
    /// Conflicts come out ordered by (student, slot). Courses a student is
    /// enrolled in but that are not in the timetable are ignored.
    pub fn analyze(schedule: &ScheduleAssignment, enrollment: &Enrollment) -> ConflictReport {
        let mut conflicts = Vec::new();
        for (student, courses) in enrollment.iter() {
            let mut at: BTreeMap<TimeSlot, BTreeSet<String>> = BTreeMap::new();
            for course in courses {
                for slot in schedule.slots_of(course) {
                    at.entry(slot).or_default().insert(course.clone());
                }
            }
            conflicts.extend(
                at.into_iter()
                    .filter(|(_, c)| c.len() > 1)
                    .map(|(slot, courses)| StudentConflict {
                        student_id: student.to_string(),
                        slot,
                        courses,
                    }),
            );
        }
        ConflictReport { conflicts }
    }

    /// Course → day → number of sessions that day.
    pub fn day_counts(schedule: &ScheduleAssignment) -> BTreeMap<&str, BTreeMap<Day, usize>> {
        schedule
            .iter()
            .map(|(course, slots)| {
                let mut per_day: BTreeMap<Day, usize> = BTreeMap::new();
                for slot in slots {
                    *per_day.entry(slot.day).or_insert(0) += 1;
                }
                (course, per_day)
            })
            .collect()
    }

    /// Courses meeting more than once on a day.
    pub fn same_day_violations(schedule: &ScheduleAssignment) -> Vec<SameDayViolation> {
        Self::day_counts(schedule)
            .into_iter()
            .flat_map(|(course, per_day)| {
                per_day
                    .into_iter()
                    .filter(|&(_, n)| n > 1)
                    .map(move |(day, sessions)| SameDayViolation {
                        course_id: course.to_string(),
                        day,
                        sessions,
                    })
            })
            .collect()
    }

    /// Professors teaching two or more courses in one slot.
    ///
    /// `courses` supplies the course → professor mapping; scheduled courses
    /// missing from it are skipped.
    pub fn professor_clashes(schedule: &ScheduleAssignment, courses: &[Course]) -> Vec<ProfessorClash> {
        let mut taught: BTreeMap<(&str, TimeSlot), BTreeSet<String>> = BTreeMap::new();
        for course in courses {
            for slot in schedule.slots_of(&course.id) {
                taught
                    .entry((course.professor_id.as_str(), slot))
                    .or_default()
                    .insert(course.id.clone());
            }
        }

        taught
            .into_iter()
            .filter(|(_, c)| c.len() > 1)
            .map(|((professor, slot), courses)| ProfessorClash {
                professor_id: professor.to_string(),
                slot,
                courses,
            })
            .collect()
    }
}
