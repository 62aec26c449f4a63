//! Weekly timetable construction and KPI evaluation.
//!
//! # Algorithm
//!
//! [`Scheduler`] validates the instance, derives candidate slots, rejects
//! courses that cannot reach enough distinct days, then builds a boolean
//! model (see `model` for the formulation) and minimizes weighted student
//! conflicts with any [`BoolSolver`]. A proven-infeasible model is
//! re-solved in narrower forms to name the cause.
//!
//! # KPI
//!
//! [`TimetableKpi`] summarizes a finished timetable: conflict counts and
//! rate, per-slot load, unused slots.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated
//!   Timetabling"

mod diagnose;
mod kpi;
mod model;

pub use kpi::TimetableKpi;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::availability::CandidateSlots;
use crate::config::SchedulerConfig;
use crate::cp::{BoolSolver, HighsSolver, SolveStatus};
use crate::error::{InfeasibilityCause, Result, TimetableError};
use crate::models::{Course, Enrollment, ProblemInstance, ScheduleAssignment};
use crate::validation::validate_instance;
use model::TimetableModelBuilder;

/// A solved timetable plus solve metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub assignment: ScheduleAssignment,
    /// `Optimal` when proven, `Feasible` when the budget ran out first.
    pub status: SolveStatus,
    /// Weighted objective of `assignment`.
    pub objective: i64,
    /// Number of (course pair, slot) clashes left in the timetable.
    pub student_penalties: usize,
    pub elapsed_ms: u64,
}

impl ScheduleOutcome {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Timetable scheduler over a pluggable solver backend.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Course, Enrollment, ProblemInstance, Professor};
/// use u_timetable::scheduler::Scheduler;
///
/// let instance = ProblemInstance::new(
///     vec![Professor::new("P1"), Professor::new("P2")],
///     vec![Course::new("A", "P1"), Course::new("B", "P2")],
/// )
/// .with_enrollment(Enrollment::new().with_student("S1", ["A", "B"]));
///
/// let outcome = Scheduler::new().solve(&instance).unwrap();
/// assert_eq!(outcome.assignment.session_count(), 4);
/// assert_eq!(outcome.objective, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<S = HighsSolver> {
    solver: S,
    config: SchedulerConfig,
}

impl Scheduler<HighsSolver> {
    /// Creates a scheduler with the bundled HiGHS backend.
    pub fn new() -> Self {
        Self {
            solver: HighsSolver::new(),
            config: SchedulerConfig::default(),
        }
    }
}

impl Default for Scheduler<HighsSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BoolSolver> Scheduler<S> {
    /// Creates a scheduler over a custom solver backend.
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Builds a timetable for a whole problem instance.
    ///
    /// # Errors
    /// - `InvalidInput` when the instance fails validation
    /// - `InfeasibleModel` when the hard constraints cannot all hold
    /// - `SolverTimeout` when the budget runs out before any timetable
    /// - `Model` when the backend rejects the built model
    pub fn solve(&self, instance: &ProblemInstance) -> Result<ScheduleOutcome> {
        if let Err(errors) = validate_instance(instance) {
            warn!(errors = errors.len(), "instance rejected");
            return Err(TimetableError::InvalidInput(errors));
        }

        let candidates = CandidateSlots::build(
            &instance.grid,
            &instance.courses,
            &instance.busy,
            &instance.exclusions,
        );
        self.solve_with_candidates(&instance.courses, &candidates, &instance.enrollment)
    }

    /// Builds a timetable from precomputed candidate slots.
    ///
    /// Courses missing from `candidates` have no legal slot. Enrollment
    /// rows naming unknown courses are ignored.
    pub fn solve_with_candidates(
        &self,
        courses: &[Course],
        candidates: &CandidateSlots,
        enrollment: &Enrollment,
    ) -> Result<ScheduleOutcome> {
        diagnose::precheck(courses, candidates, &self.config)?;

        let built = TimetableModelBuilder::new(courses, candidates, enrollment, &self.config).build();
        info!(
            courses = courses.len(),
            students = enrollment.student_count(),
            vars = built.model.var_count(),
            constraints = built.model.constraint_count(),
            "solving timetable"
        );

        let solution = self
            .solver
            .solve(&built.model, &self.config.solver_config())
            .inspect_err(|e| error!(error = %e, "solver rejected timetable model"))?;
        debug!(status = ?solution.status, nodes = solution.nodes, "solver finished");

        match solution.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {
                let assignment = built.extract(courses, &solution);
                let objective = solution.objective.unwrap_or(0);
                let student_penalties = built.penalties_hit(&solution);
                if solution.status == SolveStatus::Feasible {
                    warn!(
                        elapsed_ms = solution.elapsed_ms,
                        objective, "budget exhausted, returning best timetable found"
                    );
                }
                info!(
                    objective,
                    student_penalties,
                    elapsed_ms = solution.elapsed_ms,
                    "timetable built"
                );
                Ok(ScheduleOutcome {
                    assignment,
                    status: solution.status,
                    objective,
                    student_penalties,
                    elapsed_ms: solution.elapsed_ms,
                })
            }
            SolveStatus::Infeasible => {
                let err = if self.config.diagnose_infeasibility {
                    diagnose::diagnose(&self.solver, courses, candidates, &self.config)
                } else {
                    TimetableError::InfeasibleModel {
                        courses: courses.iter().map(|c| c.id.clone()).collect(),
                        cause: InfeasibilityCause::Unsatisfiable,
                    }
                };
                warn!(error = %err, "timetable infeasible");
                Err(err)
            }
            SolveStatus::Unknown => {
                warn!(elapsed_ms = solution.elapsed_ms, "solver budget exhausted");
                Err(TimetableError::SolverTimeout {
                    elapsed_ms: solution.elapsed_ms,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ConflictAnalyzer;
    use crate::cp::{BoolModel, BoolSolution, ModelError, SolverConfig};
    use crate::models::{BusySet, Day, Professor, SlotGrid, TimeSlot};
    use std::collections::BTreeSet;

    fn slot(s: &str) -> TimeSlot {
        s.parse().unwrap()
    }

    fn professors(n: usize) -> Vec<Professor> {
        (1..=n).map(|i| Professor::new(format!("P{i}"))).collect()
    }

    fn assert_structurally_valid(courses: &[Course], outcome: &ScheduleOutcome) {
        for course in courses {
            let slots: Vec<TimeSlot> = outcome.assignment.slots_of(&course.id).collect();
            assert_eq!(slots.len(), course.required_sessions as usize, "{}", course.id);
            let days: BTreeSet<_> = slots.iter().map(|s| s.day).collect();
            assert_eq!(days.len(), slots.len(), "{} meets twice in a day", course.id);
        }
        assert!(ConflictAnalyzer::same_day_violations(&outcome.assignment).is_empty());
    }

    #[test]
    fn test_small_instance_is_conflict_free() {
        let courses = vec![
            Course::new("A", "P1"),
            Course::new("B", "P2"),
            Course::new("C", "P3").with_sessions(3),
        ];
        let enrollment = Enrollment::new()
            .with_student("S1", ["A", "B"])
            .with_student("S2", ["B", "C"])
            .with_student("S3", ["A", "B", "C"]);
        let instance = ProblemInstance::new(professors(3), courses.clone())
            .with_enrollment(enrollment.clone());

        let outcome = Scheduler::new().solve(&instance).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, 0);
        assert_eq!(outcome.student_penalties, 0);
        assert_structurally_valid(&courses, &outcome);
        assert!(ConflictAnalyzer::analyze(&outcome.assignment, &enrollment).is_clean());
    }

    #[test]
    fn test_empty_enrollment_has_zero_objective() {
        let courses = vec![Course::new("A", "P1"), Course::new("B", "P1")];
        let instance = ProblemInstance::new(professors(1), courses.clone());

        let outcome = Scheduler::new().solve(&instance).unwrap();
        assert_eq!(outcome.objective, 0);
        assert_structurally_valid(&courses, &outcome);
    }

    #[test]
    fn test_forced_conflict_counted() {
        // Both courses can only meet Monday/Tuesday 08:30.
        let courses = vec![Course::new("A", "P1"), Course::new("B", "P2")];
        let mut cands = CandidateSlots::default();
        cands.insert("A", [slot("Monday 08:30"), slot("Tuesday 08:30")]);
        cands.insert("B", [slot("Monday 08:30"), slot("Tuesday 08:30")]);
        let enrollment = Enrollment::new()
            .with_student("S1", ["A", "B"])
            .with_student("S2", ["A", "B"]);
        let config = SchedulerConfig::default().with_shared_student_weighting(true);

        let outcome = Scheduler::new()
            .with_config(config)
            .solve_with_candidates(&courses, &cands, &enrollment)
            .unwrap();
        assert_eq!(outcome.student_penalties, 2);
        // Two shared students per clashing slot.
        assert_eq!(outcome.objective, 4);
        let report = ConflictAnalyzer::analyze(&outcome.assignment, &enrollment);
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn test_busy_professor_avoided() {
        let grid = SlotGrid::standard();
        let free = [slot("Monday 08:30"), slot("Wednesday 08:30")];
        let busy = BusySet::new().with_busy("P1", grid.slots().filter(|s| !free.contains(s)));
        let courses = vec![Course::new("A", "P1")];
        let instance = ProblemInstance::new(professors(1), courses).with_busy(busy);

        let outcome = Scheduler::new().solve(&instance).unwrap();
        let slots: Vec<TimeSlot> = outcome.assignment.slots_of("A").collect();
        assert_eq!(slots, free.to_vec());
    }

    #[test]
    fn test_single_day_course_rejected_before_solving() {
        let grid = SlotGrid::standard();
        let busy = BusySet::new().with_busy("P1", grid.slots().filter(|s| s.day != Day::Monday));
        let instance =
            ProblemInstance::new(professors(1), vec![Course::new("A", "P1")]).with_busy(busy);

        let err = Scheduler::new().solve(&instance).unwrap_err();
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
    fn test_professor_never_double_booked() {
        let courses = vec![
            Course::new("A", "P1"),
            Course::new("B", "P1"),
            Course::new("C", "P1"),
        ];
        let instance = ProblemInstance::new(professors(1), courses.clone());

        let outcome = Scheduler::new().solve(&instance).unwrap();
        assert!(ConflictAnalyzer::professor_clashes(&outcome.assignment, &courses).is_empty());
    }

    #[test]
    fn test_invalid_instance_rejected() {
        let instance = ProblemInstance::new(professors(1), vec![Course::new("A", "P9")]);
        assert!(matches!(
            Scheduler::new().solve(&instance),
            Err(TimetableError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_consecutive_days() {
        let courses = vec![Course::new("A", "P1"), Course::new("B", "P2")];
        let instance = ProblemInstance::new(professors(2), courses.clone());
        let config = SchedulerConfig::default().with_no_consecutive_days(true);

        let outcome = Scheduler::new().with_config(config).solve(&instance).unwrap();
        for course in &courses {
            let days: Vec<_> = outcome.assignment.slots_of(&course.id).map(|s| s.day).collect();
            assert!(!days[0].is_adjacent(days[1]));
        }
    }

    /// Returns the model's hinted assignment as a best-so-far incumbent,
    /// as a backend does when its budget runs out mid-search.
    struct IncumbentOnly;

    impl BoolSolver for IncumbentOnly {
        fn solve(
            &self,
            model: &BoolModel,
            config: &SolverConfig,
        ) -> std::result::Result<BoolSolution, ModelError> {
            let values: Vec<bool> = model.vars().map(|v| model.hint(v).unwrap_or(false)).collect();
            let objective = model.evaluate(&values);
            let status = match objective {
                Some(_) => SolveStatus::Feasible,
                None => SolveStatus::Unknown,
            };
            Ok(BoolSolution {
                status,
                values,
                objective,
                nodes: 0,
                elapsed_ms: config.time_limit_ms,
            })
        }
    }

    /// Runs out of budget before finding anything.
    struct Exhausted;

    impl BoolSolver for Exhausted {
        fn solve(
            &self,
            model: &BoolModel,
            config: &SolverConfig,
        ) -> std::result::Result<BoolSolution, ModelError> {
            Ok(BoolSolution::unsolved(
                SolveStatus::Unknown,
                model,
                config.time_limit_ms,
            ))
        }
    }

    struct Rejecting;

    impl BoolSolver for Rejecting {
        fn solve(
            &self,
            model: &BoolModel,
            _config: &SolverConfig,
        ) -> std::result::Result<BoolSolution, ModelError> {
            Err(ModelError::UnknownVariable {
                constraint: "objective".into(),
                index: model.var_count(),
                vars: model.var_count(),
            })
        }
    }

    fn crowded_week() -> (Vec<Course>, CandidateSlots, Enrollment) {
        // Six sessions in three slots: every slot hosts a clashing pair.
        let courses = vec![
            Course::new("A", "P1"),
            Course::new("B", "P2"),
            Course::new("C", "P3"),
        ];
        let three = [
            slot("Monday 08:30"),
            slot("Tuesday 08:30"),
            slot("Wednesday 08:30"),
        ];
        let mut cands = CandidateSlots::default();
        for c in &courses {
            cands.insert(c.id.clone(), three);
        }
        let enrollment = Enrollment::new().with_student("S1", ["A", "B", "C"]);
        (courses, cands, enrollment)
    }

    #[test]
    fn test_budget_exhausted_returns_best_so_far() {
        let (courses, cands, enrollment) = crowded_week();
        let config = SchedulerConfig::default().with_time_limit_ms(250);

        let outcome = Scheduler::with_solver(IncumbentOnly)
            .with_config(config)
            .solve_with_candidates(&courses, &cands, &enrollment)
            .unwrap();

        assert_eq!(outcome.status, SolveStatus::Feasible);
        assert!(!outcome.is_optimal());
        assert_eq!(outcome.elapsed_ms, 250);
        assert_structurally_valid(&courses, &outcome);

        // Re-derive the clashes from the timetable itself.
        let mut clashes = 0;
        for (i, a) in courses.iter().enumerate() {
            for b in &courses[i + 1..] {
                let theirs: BTreeSet<TimeSlot> = outcome.assignment.slots_of(&b.id).collect();
                clashes += outcome
                    .assignment
                    .slots_of(&a.id)
                    .filter(|s| theirs.contains(s))
                    .count();
            }
        }
        assert_eq!(clashes, 3);
        assert_eq!(outcome.student_penalties, clashes);
        assert_eq!(outcome.objective, clashes as i64);
        assert!(!ConflictAnalyzer::analyze(&outcome.assignment, &enrollment).is_clean());
    }

    #[test]
    fn test_budget_exhausted_without_solution() {
        let (courses, cands, enrollment) = crowded_week();
        let config = SchedulerConfig::default().with_time_limit_ms(250);

        let result = Scheduler::with_solver(Exhausted)
            .with_config(config)
            .solve_with_candidates(&courses, &cands, &enrollment);
        assert!(matches!(
            result,
            Err(TimetableError::SolverTimeout { elapsed_ms: 250 })
        ));
    }

    #[test]
    fn test_rejected_model_is_internal_error() {
        let (courses, cands, enrollment) = crowded_week();

        let err = Scheduler::with_solver(Rejecting)
            .solve_with_candidates(&courses, &cands, &enrollment)
            .unwrap_err();
        assert!(matches!(err, TimetableError::Model(_)));
        assert!(err.is_internal());
    }
}
