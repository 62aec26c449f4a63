//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a [`ProblemInstance`] before any model is
//! built. Detects:
//! - Duplicate or empty IDs
//! - Courses taught by professors missing from the roster
//! - Busy entries for unknown professors
//! - Busy or excluded slots outside the slot grid
//! - Students enrolled in unknown courses
//! - Non-positive session or section counts
//!
//! Every problem found is reported; nothing is silently defaulted.

use crate::models::{Day, ProblemInstance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Path of the offending field, e.g. `courses[2].professor_id`.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An ID is empty or whitespace.
    EmptyId,
    /// A course references a professor not in the roster.
    UnknownProfessor,
    /// A student is enrolled in a course not in the catalog.
    UnknownCourse,
    /// A slot is not part of the slot grid.
    SlotOutsideGrid,
    /// `required_sessions` is zero or exceeds the number of teaching days.
    InvalidSessionCount,
    /// `section_count` is zero.
    InvalidSectionCount,
    /// Balanced sections would exceed the configured maximum size.
    SectionTooLarge,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a timetabling instance.
///
/// Checks:
/// 1. No empty or duplicate professor IDs
/// 2. No empty or duplicate course IDs
/// 3. Every course's professor (and section professors) is in the roster
/// 4. `1 <= required_sessions <= 5` and `section_count >= 1`
/// 5. Busy entries name known professors and slots on the grid
/// 6. Exclusions are slots on the grid
/// 7. Every enrolled course exists
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    let mut professor_ids = HashSet::new();
    for (i, p) in instance.professors.iter().enumerate() {
        if p.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("professors[{i}].id"),
                "Professor ID is empty",
            ));
        } else if !professor_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("professors[{i}].id"),
                format!("Duplicate professor ID: {}", p.id),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    for (i, course) in instance.courses.iter().enumerate() {
        if course.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("courses[{i}].id"),
                "Course ID is empty",
            ));
        } else if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("courses[{i}].id"),
                format!("Duplicate course ID: {}", course.id),
            ));
        }

        if !professor_ids.contains(course.professor_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProfessor,
                format!("courses[{i}].professor_id"),
                format!(
                    "Course '{}' references unknown professor '{}'",
                    course.id, course.professor_id
                ),
            ));
        }

        for (j, prof) in course.section_professors.iter().enumerate() {
            if !professor_ids.contains(prof.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownProfessor,
                    format!("courses[{i}].section_professors[{j}]"),
                    format!("Course '{}' references unknown professor '{prof}'", course.id),
                ));
            }
        }

        if course.required_sessions == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSessionCount,
                format!("courses[{i}].required_sessions"),
                format!("Course '{}' must meet at least once per week", course.id),
            ));
        } else if course.required_sessions as usize > Day::ALL.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSessionCount,
                format!("courses[{i}].required_sessions"),
                format!(
                    "Course '{}' needs {} sessions but a week has only {} teaching days",
                    course.id,
                    course.required_sessions,
                    Day::ALL.len()
                ),
            ));
        }

        if course.section_count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSectionCount,
                format!("courses[{i}].section_count"),
                format!("Course '{}' must have at least one section", course.id),
            ));
        }
    }

    for (professor, slots) in instance.busy.iter() {
        if !professor_ids.contains(professor) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProfessor,
                format!("busy[{professor}]"),
                format!("Busy slots given for unknown professor '{professor}'"),
            ));
        }
        for slot in slots {
            if !instance.grid.contains(slot) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SlotOutsideGrid,
                    format!("busy[{professor}]"),
                    format!("Busy slot '{slot}' is not on the slot grid"),
                ));
            }
        }
    }

    for (i, slot) in instance.exclusions.iter().enumerate() {
        if !instance.grid.contains(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotOutsideGrid,
                format!("exclusions[{i}]"),
                format!("Excluded slot '{slot}' is not on the slot grid"),
            ));
        }
    }

    for (student, courses) in instance.enrollment.iter() {
        for course in courses {
            if !course_ids.contains(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!("enrollment[{student}]"),
                    format!("Student '{student}' is enrolled in unknown course '{course}'"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusySet, Course, Enrollment, Professor, TimeSlot};

    fn sample_instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![Professor::new("P1"), Professor::new("P2")],
            vec![Course::new("A", "P1"), Course::new("B", "P2")],
        )
        .with_enrollment(Enrollment::new().with_student("S1", ["A", "B"]))
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_duplicate_course_id() {
        let mut inst = sample_instance();
        inst.courses.push(Course::new("A", "P2"));

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.field == "courses[2].id"));
    }

    #[test]
    fn test_unknown_professor() {
        let mut inst = sample_instance();
        inst.courses.push(Course::new("C", "NOBODY"));

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::UnknownProfessor
            && e.field == "courses[2].professor_id"));
    }

    #[test]
    fn test_unknown_enrolled_course() {
        let inst = sample_instance()
            .with_enrollment(Enrollment::new().with_student("S9", ["A", "GHOST"]));

        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownCourse);
        assert!(errors[0].message.contains("GHOST"));
    }

    #[test]
    fn test_zero_sessions() {
        let mut inst = sample_instance();
        inst.courses[0].required_sessions = 0;

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSessionCount));
    }

    #[test]
    fn test_too_many_sessions() {
        let mut inst = sample_instance();
        inst.courses[1].required_sessions = 6;

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.field == "courses[1].required_sessions"));
    }

    #[test]
    fn test_zero_sections() {
        let mut inst = sample_instance();
        inst.courses[0].section_count = 0;

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidSectionCount));
    }

    #[test]
    fn test_busy_slot_outside_grid() {
        let off_grid: TimeSlot = "Monday 07:00".parse().unwrap();
        let inst = sample_instance().with_busy(BusySet::new().with_busy("P1", [off_grid]));

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SlotOutsideGrid));
    }

    #[test]
    fn test_busy_for_unknown_professor() {
        let slot: TimeSlot = "Monday 08:30".parse().unwrap();
        let inst = sample_instance().with_busy(BusySet::new().with_busy("GHOST", [slot]));

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownProfessor && e.field == "busy[GHOST]"));
    }

    #[test]
    fn test_multiple_errors() {
        let mut inst = sample_instance();
        inst.courses.push(Course::new("", "NOBODY").with_sessions(0));
        inst.exclusions.push("Friday 20:30".parse().unwrap());

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
