//! Crate error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cp::ModelError;
use crate::validation::ValidationError;

/// Result alias for timetabling operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Why a model has no solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfeasibilityCause {
    /// The course's candidate slots span fewer distinct days than it needs
    /// (or, with the consecutive-day rule on, too few non-adjacent days).
    TooFewDays { needed: u32, available: u32 },
    /// A professor's courses cannot all be placed without double-booking.
    ProfessorOverload { professor_id: String },
    /// The per-slot course limit is too tight.
    SlotCapacity { max_courses_per_slot: usize },
    /// Proven infeasible, no narrower cause isolated.
    Unsatisfiable,
}

impl std::fmt::Display for InfeasibilityCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewDays { needed, available } => write!(
                f,
                "needs {needed} sessions on distinct days but candidate slots span {available} usable day(s)"
            ),
            Self::ProfessorOverload { professor_id } => {
                write!(f, "professor '{professor_id}' cannot teach all assigned courses")
            }
            Self::SlotCapacity {
                max_courses_per_slot,
            } => write!(f, "limit of {max_courses_per_slot} courses per slot is too tight"),
            Self::Unsatisfiable => f.write_str("hard constraints cannot be jointly satisfied"),
        }
    }
}

/// Errors surfaced by the timetabling engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimetableError {
    /// Malformed or inconsistent input, rejected before model construction.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// Hard constraints cannot be jointly satisfied.
    #[error("infeasible model for [{}]: {cause}", .courses.join(", "))]
    InfeasibleModel {
        courses: Vec<String>,
        cause: InfeasibilityCause,
    },

    /// Budget exhausted before any feasible timetable was found.
    #[error("solver budget exhausted after {elapsed_ms} ms without a feasible timetable")]
    SolverTimeout { elapsed_ms: u64 },

    /// Section sizes do not add up to the enrolled head count.
    #[error("section allocation for '{course}' placed {assigned} of {expected} students")]
    AllocationMismatch {
        course: String,
        expected: usize,
        assigned: usize,
    },

    /// The built model was rejected by the solver backend.
    #[error("malformed solver model: {0}")]
    Model(#[from] ModelError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl TimetableError {
    /// Whether this error is an internal invariant violation rather than a
    /// property of the input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TimetableError::AllocationMismatch { .. } | TimetableError::Model(_)
        )
    }
}
