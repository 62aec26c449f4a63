//! Turning allocated sections into schedulable courses.
//!
//! After allocation, each section of a course meets at its own times. The
//! scheduler places sections individually once the catalog and enrollment
//! are rewritten in terms of section ids (`MATH101-A`, `MATH101-B`, ...).

use std::collections::HashMap;

use crate::models::{Course, Enrollment, SectionAssignment};

/// Replaces every multi-section course by one single-section course per
/// section.
///
/// Section `n` is taught by `section_professors[(n - 1) % len]` when that
/// list is non-empty, otherwise by the course's own professor. Single-section
/// courses pass through unchanged.
pub fn expand_sections(courses: &[Course]) -> Vec<Course> {
    let mut expanded = Vec::with_capacity(courses.len());
    for course in courses {
        if !course.is_multi_section() {
            expanded.push(course.clone());
            continue;
        }
        for n in 1..=course.section_count {
            let professor = if course.section_professors.is_empty() {
                course.professor_id.clone()
            } else {
                let i = (n as usize - 1) % course.section_professors.len();
                course.section_professors[i].clone()
            };
            let name = if course.name.is_empty() {
                String::new()
            } else {
                format!("{} ({})", course.name, n)
            };
            expanded.push(Course {
                id: SectionAssignment::section_course_id(&course.id, n),
                name,
                professor_id: professor,
                section_count: 1,
                section_professors: Vec::new(),
                ..course.clone()
            });
        }
    }
    expanded
}

/// Rewrites enrollment rows of allocated courses to section ids.
///
/// Rows of courses without an allocation, or students missing from one,
/// are kept as they are.
pub fn sectioned_enrollment(enrollment: &Enrollment, assignments: &[SectionAssignment]) -> Enrollment {
    let by_course: HashMap<&str, &SectionAssignment> = assignments
        .iter()
        .map(|a| (a.course_id.as_str(), a))
        .collect();

    enrollment
        .iter()
        .flat_map(|(student, courses)| {
            let by_course = &by_course;
            courses.iter().map(move |course| {
                let id = by_course
                    .get(course.as_str())
                    .and_then(|a| a.section_of(student))
                    .map(|n| SectionAssignment::section_course_id(course, n))
                    .unwrap_or_else(|| course.clone());
                (student, id)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_rotates_professors() {
        let courses = vec![
            Course::new("MATH", "P1")
                .with_name("Calculus")
                .with_sections(3)
                .with_section_professors(vec!["P1".into(), "P2".into()]),
            Course::new("ART", "P3"),
        ];
        let expanded = expand_sections(&courses);

        let ids: Vec<&str> = expanded.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["MATH-A", "MATH-B", "MATH-C", "ART"]);
        let profs: Vec<&str> = expanded.iter().map(|c| c.professor_id.as_str()).collect();
        assert_eq!(profs, ["P1", "P2", "P1", "P3"]);
        assert!(expanded.iter().all(|c| !c.is_multi_section()));
        assert_eq!(expanded[1].name, "Calculus (2)");
        assert_eq!(expanded[0].required_sessions, 2);
    }

    #[test]
    fn test_expand_without_section_professors() {
        let expanded = expand_sections(&[Course::new("X", "P9").with_sections(2)]);
        assert!(expanded.iter().all(|c| c.professor_id == "P9"));
    }

    #[test]
    fn test_expand_many_sections_keeps_ids_distinct() {
        let expanded = expand_sections(&[Course::new("M", "P1").with_sections(30)]);
        assert_eq!(expanded.len(), 30);

        let ids: std::collections::BTreeSet<&str> =
            expanded.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 30);
        assert_eq!(expanded[25].id, "M-Z");
        assert_eq!(expanded[26].id, "M-AA");
        assert_eq!(expanded[29].id, "M-AD");
        assert!(expanded
            .iter()
            .all(|c| c.id["M-".len()..].chars().all(|ch| ch.is_ascii_uppercase())));
    }

    #[test]
    fn test_sectioned_enrollment() {
        let enrollment = Enrollment::new()
            .with_student("S1", ["MATH", "ART"])
            .with_student("S2", ["MATH"])
            .with_student("S3", ["ART"]);
        let mut alloc = SectionAssignment::new("MATH", 2);
        alloc.students.insert("S1".into(), 1);
        alloc.students.insert("S2".into(), 2);

        let rewritten = sectioned_enrollment(&enrollment, &[alloc]);
        assert!(rewritten.is_enrolled("S1", "MATH-A"));
        assert!(rewritten.is_enrolled("S1", "ART"));
        assert!(rewritten.is_enrolled("S2", "MATH-B"));
        assert!(!rewritten.is_enrolled("S2", "MATH"));
        assert!(rewritten.is_enrolled("S3", "ART"));
    }
}
