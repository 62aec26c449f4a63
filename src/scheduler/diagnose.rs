//! Infeasibility detection and diagnosis.
//!
//! A per-course day count catches the common case before any model is
//! built. When a full solve still proves infeasibility, narrower models are
//! re-solved one constraint family at a time to name the cause.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::model::{Families, TimetableModelBuilder};
use crate::availability::CandidateSlots;
use crate::config::SchedulerConfig;
use crate::cp::{BoolSolver, SolveStatus};
use crate::error::{InfeasibilityCause, Result, TimetableError};
use crate::models::{Course, Enrollment};

/// Rejects courses whose candidates span too few usable days.
///
/// A course with `k` sessions needs `k` distinct days, or `k` pairwise
/// non-adjacent days when consecutive-day meetings are forbidden.
pub(crate) fn precheck(
    courses: &[Course],
    candidates: &CandidateSlots,
    config: &SchedulerConfig,
) -> Result<()> {
    let mut offending = Vec::new();
    let mut first_cause = None;

    for course in courses {
        let usable = if config.no_consecutive_days {
            candidates.non_adjacent_days_of(&course.id)
        } else {
            candidates.days_of(&course.id).len()
        };
        let available = usable as u32;

        if available < course.required_sessions {
            warn!(
                course = %course.id,
                needed = course.required_sessions,
                available,
                "course cannot meet on enough distinct days"
            );
            offending.push(course.id.clone());
            first_cause.get_or_insert(InfeasibilityCause::TooFewDays {
                needed: course.required_sessions,
                available,
            });
        }
    }

    match first_cause {
        Some(cause) => Err(TimetableError::InfeasibleModel {
            courses: offending,
            cause,
        }),
        None => Ok(()),
    }
}

/// Names the constraint family behind a proven-infeasible full model.
///
/// Phases, first hit wins:
/// 1. each professor's courses alone, with the no-double-booking rule
/// 2. all courses with the slot capacity limit, professors relaxed
/// 3. otherwise the combination is blamed as a whole
pub(crate) fn diagnose<S: BoolSolver>(
    solver: &S,
    courses: &[Course],
    candidates: &CandidateSlots,
    config: &SchedulerConfig,
) -> TimetableError {
    let budget = config.solver_config();
    let none = Enrollment::new();

    if config.professor_clash {
        let mut by_professor: BTreeMap<&str, Vec<Course>> = BTreeMap::new();
        for course in courses {
            by_professor
                .entry(course.professor_id.as_str())
                .or_default()
                .push(course.clone());
        }

        for (professor, taught) in by_professor.iter().filter(|(_, c)| c.len() > 1) {
            let built = TimetableModelBuilder::new(taught, candidates, &none, config)
                .with_families(Families {
                    professor: true,
                    ..Families::structural()
                })
                .build();
            let result = match solver.solve(&built.model, &budget) {
                Ok(result) => result,
                Err(e) => return e.into(),
            };
            debug!(professor = %professor, status = ?result.status, "professor load check");
            if result.status == SolveStatus::Infeasible {
                return TimetableError::InfeasibleModel {
                    courses: taught.iter().map(|c| c.id.clone()).collect(),
                    cause: InfeasibilityCause::ProfessorOverload {
                        professor_id: professor.to_string(),
                    },
                };
            }
        }
    }

    if let Some(cap) = config.max_courses_per_slot {
        let built = TimetableModelBuilder::new(courses, candidates, &none, config)
            .with_families(Families {
                capacity: true,
                ..Families::structural()
            })
            .build();
        let result = match solver.solve(&built.model, &budget) {
            Ok(result) => result,
            Err(e) => return e.into(),
        };
        debug!(status = ?result.status, "slot capacity check");
        if result.status == SolveStatus::Infeasible {
            return TimetableError::InfeasibleModel {
                courses: courses.iter().map(|c| c.id.clone()).collect(),
                cause: InfeasibilityCause::SlotCapacity {
                    max_courses_per_slot: cap,
                },
            };
        }
    }

    TimetableError::InfeasibleModel {
        courses: courses.iter().map(|c| c.id.clone()).collect(),
        cause: InfeasibilityCause::Unsatisfiable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::HighsSolver;
    use crate::models::TimeSlot;

    fn slot(s: &str) -> TimeSlot {
        s.parse().unwrap()
    }

    #[test]
    fn test_precheck_single_day() {
        let courses = vec![Course::new("A", "P1"), Course::new("B", "P2")];
        let mut cands = CandidateSlots::default();
        cands.insert("A", [slot("Monday 08:30"), slot("Monday 10:30")]);
        cands.insert("B", [slot("Monday 08:30"), slot("Tuesday 08:30")]);

        let err = precheck(&courses, &cands, &SchedulerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            TimetableError::InfeasibleModel {
                courses: vec!["A".into()],
                cause: InfeasibilityCause::TooFewDays {
                    needed: 2,
                    available: 1
                },
            }
        );
    }

    #[test]
    fn test_precheck_consecutive_days() {
        let courses = vec![Course::new("A", "P1")];
        let mut cands = CandidateSlots::default();
        cands.insert("A", [slot("Monday 08:30"), slot("Tuesday 08:30")]);

        assert!(precheck(&courses, &cands, &SchedulerConfig::default()).is_ok());
        let strict = SchedulerConfig::default().with_no_consecutive_days(true);
        assert!(matches!(
            precheck(&courses, &cands, &strict),
            Err(TimetableError::InfeasibleModel {
                cause: InfeasibilityCause::TooFewDays { available: 1, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_diagnose_professor_overload() {
        // Three two-session courses for one professor in five slots.
        let courses = vec![
            Course::new("A", "P1"),
            Course::new("B", "P1"),
            Course::new("C", "P1"),
        ];
        let five = [
            slot("Monday 08:30"),
            slot("Tuesday 08:30"),
            slot("Wednesday 08:30"),
            slot("Thursday 08:30"),
            slot("Friday 08:30"),
        ];
        let mut cands = CandidateSlots::default();
        for c in &courses {
            cands.insert(c.id.clone(), five);
        }
        let config = SchedulerConfig::default().with_time_limit_ms(5_000);

        let err = diagnose(&HighsSolver::new(), &courses, &cands, &config);
        assert!(matches!(
            err,
            TimetableError::InfeasibleModel {
                cause: InfeasibilityCause::ProfessorOverload { ref professor_id },
                ..
            } if professor_id == "P1"
        ));
    }

    #[test]
    fn test_diagnose_slot_capacity() {
        let courses = vec![Course::new("A", "P1"), Course::new("B", "P2")];
        let two = [slot("Monday 08:30"), slot("Tuesday 08:30")];
        let mut cands = CandidateSlots::default();
        cands.insert("A", two);
        cands.insert("B", two);
        let config = SchedulerConfig::default().with_max_courses_per_slot(1);

        let err = diagnose(&HighsSolver::new(), &courses, &cands, &config);
        assert!(matches!(
            err,
            TimetableError::InfeasibleModel {
                cause: InfeasibilityCause::SlotCapacity {
                    max_courses_per_slot: 1
                },
                ..
            }
        ));
    }
}
