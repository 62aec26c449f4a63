//! Student × course co-enrollment features.

use std::collections::BTreeSet;

use crate::models::Enrollment;

/// Binary feature matrix over the students of one course.
///
/// Row `i` is student `students[i]`; column `j` is 1.0 when that student
/// takes `courses[j]`. Columns span every course any of these students
/// takes, so similarity reflects whole schedules rather than the target
/// course alone.
#[derive(Debug, Clone, PartialEq)]
pub struct CoEnrollmentMatrix {
    students: Vec<String>,
    courses: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl CoEnrollmentMatrix {
    /// Builds the matrix for the students of `course`.
    ///
    /// Students and columns are in id order.
    pub fn build(course: &str, enrollment: &Enrollment) -> Self {
        let cohort = enrollment.cohort_of(course);
        let courses: Vec<String> = cohort
            .iter()
            .flat_map(|(_, taken)| taken.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut students = Vec::with_capacity(cohort.student_count());
        let mut rows = Vec::with_capacity(cohort.student_count());
        for (student, taken) in cohort.iter() {
            students.push(student.to_string());
            rows.push(
                courses
                    .iter()
                    .map(|c| if taken.contains(c) { 1.0 } else { 0.0 })
                    .collect(),
            );
        }

        Self {
            students,
            courses,
            rows,
        }
    }

    pub fn students(&self) -> &[String] {
        &self.students
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_layout() {
        let enrollment = Enrollment::new()
            .with_student("S2", ["MATH", "PHYS"])
            .with_student("S1", ["MATH", "CHEM"])
            .with_student("S3", ["BIO"]);

        let m = CoEnrollmentMatrix::build("MATH", &enrollment);
        assert_eq!(m.students(), ["S1", "S2"]);
        assert_eq!(m.courses(), ["CHEM", "MATH", "PHYS"]);
        assert_eq!(m.rows()[0], vec![1.0, 1.0, 0.0]);
        assert_eq!(m.rows()[1], vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_course() {
        let m = CoEnrollmentMatrix::build("NONE", &Enrollment::new());
        assert!(m.is_empty());
        assert!(m.courses().is_empty());
    }
}
