//! Section allocation pipeline: cluster, then balance.

use rayon::prelude::*;
use tracing::{debug, error, info};

use super::balance::{balance_into_sections, target_sizes};
use super::kmeans::{Clustering, KMeans};
use super::matrix::CoEnrollmentMatrix;
use super::silhouette::silhouette_score;
use crate::config::SectionConfig;
use crate::error::{Result, TimetableError};
use crate::models::{Course, Enrollment, SectionAssignment};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Outcome of the clustering stage for one course.
#[derive(Debug, Clone)]
pub struct CohortClusters {
    /// Chosen cluster count.
    pub k: usize,
    /// Silhouette of the chosen partition (0.0 when no sweep ran).
    pub silhouette: f64,
    /// (student, cluster label), students in id order.
    pub labels: Vec<(String, usize)>,
}

/// Splits a course's students into balanced sections of similar schedules.
///
/// # Example
///
/// ```
/// use u_timetable::models::Enrollment;
/// use u_timetable::sections::SectionAllocator;
///
/// let enrollment: Enrollment = (0..23).map(|i| (format!("S{i:02}"), "MATH101")).collect();
/// let assignment = SectionAllocator::new().allocate("MATH101", &enrollment, 5).unwrap();
///
/// let mut sizes = assignment.sizes();
/// sizes.sort_unstable();
/// assert_eq!(sizes, vec![4, 4, 5, 5, 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionAllocator {
    config: SectionConfig,
}

impl SectionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SectionConfig {
        &self.config
    }

    /// Cluster counts evaluated for `students` students:
    /// `2..=min(max_k, students / 2)`, or just `min(2, students)` below four
    /// students.
    pub fn candidate_ks(&self, students: usize) -> Vec<usize> {
        if students < 4 {
            return vec![students.min(2)];
        }
        let upper = self.config.max_k.min(students / 2).max(2);
        (2..=upper).collect()
    }

    /// Clustering stage: picks K by silhouette and labels every student.
    pub fn cluster(&self, course: &str, enrollment: &Enrollment) -> CohortClusters {
        let matrix = CoEnrollmentMatrix::build(course, enrollment);
        let ks = self.candidate_ks(matrix.len());

        let evaluate = |&k: &usize| -> (usize, Clustering, f64) {
            let clustering = KMeans::new(k)
                .with_n_init(self.config.n_init)
                .with_max_iter(self.config.max_iter)
                .with_seed(self.config.seed)
                .fit(matrix.rows());
            let score = if ks.len() > 1 {
                silhouette_score(matrix.rows(), &clustering.labels)
            } else {
                0.0
            };
            debug!(course, k, silhouette = score, "cluster count evaluated");
            (k, clustering, score)
        };

        let runs: Vec<(usize, Clustering, f64)> = if self.config.parallel && ks.len() > 1 {
            ks.par_iter().map(evaluate).collect()
        } else {
            ks.iter().map(evaluate).collect()
        };

        // `runs` is in ascending K order, so strict `>` keeps the smaller K on ties.
        let mut chosen: Option<(usize, Clustering, f64)> = None;
        for run in runs {
            if chosen.as_ref().map_or(true, |best| run.2 > best.2) {
                chosen = Some(run);
            }
        }

        let (k, clustering, silhouette) = match chosen {
            Some(run) => run,
            None => (0, KMeans::new(0).fit(&[]), 0.0),
        };

        let labels = matrix
            .students()
            .iter()
            .cloned()
            .zip(clustering.labels)
            .collect();
        CohortClusters {
            k,
            silhouette,
            labels,
        }
    }

    /// Splits the students of `course` into `sections` balanced sections.
    ///
    /// # Errors
    /// - `InvalidInput` for zero sections or when the largest section would
    ///   exceed `max_section_size`
    /// - `AllocationMismatch` if the section sizes fail to add up to the
    ///   enrolled head count
    pub fn allocate(
        &self,
        course: &str,
        enrollment: &Enrollment,
        sections: u32,
    ) -> Result<SectionAssignment> {
        if sections == 0 {
            return Err(TimetableError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::InvalidSectionCount,
                format!("sections[{course}]"),
                "Section count must be at least 1",
            )]));
        }

        let total = enrollment.students_in(course).len();
        if let Some(max) = self.config.max_section_size {
            let largest = target_sizes(total, sections).first().copied().unwrap_or(0);
            if largest > max {
                return Err(TimetableError::InvalidInput(vec![ValidationError::new(
                    ValidationErrorKind::SectionTooLarge,
                    format!("sections[{course}]"),
                    format!(
                        "{total} students in {sections} sections needs {largest} per section, limit is {max}"
                    ),
                )]));
            }
        }

        let clusters = self.cluster(course, enrollment);
        let mut assignment = SectionAssignment::new(course, sections);
        assignment.students = balance_into_sections(&clusters.labels, sections);

        let assigned: usize = assignment.sizes().iter().sum();
        if assigned != total || assignment.student_count() != total {
            error!(course, expected = total, assigned, "section sizes do not add up");
            return Err(TimetableError::AllocationMismatch {
                course: course.to_string(),
                expected: total,
                assigned,
            });
        }

        info!(
            course,
            students = total,
            sections,
            k = clusters.k,
            silhouette = clusters.silhouette,
            "sections allocated"
        );
        Ok(assignment)
    }

    /// Allocates every course with more than one section, in catalog order.
    pub fn allocate_all(
        &self,
        courses: &[Course],
        enrollment: &Enrollment,
    ) -> Result<Vec<SectionAssignment>> {
        courses
            .iter()
            .filter(|c| c.is_multi_section())
            .map(|c| self.allocate(&c.id, enrollment, c.section_count))
            .collect()
    }
}
