//! Per-run input snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{BusySet, Course, Enrollment, Professor, SlotGrid, TimeSlot};

/// Everything one scheduling run consumes.
///
/// Built fresh from the registration snapshot for each run and read-only
/// afterwards; nothing is shared between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Slot universe.
    #[serde(default)]
    pub grid: SlotGrid,
    pub professors: Vec<Professor>,
    pub courses: Vec<Course>,
    #[serde(default)]
    pub busy: BusySet,
    #[serde(default)]
    pub enrollment: Enrollment,
    /// Globally blacked-out slots.
    #[serde(default)]
    pub exclusions: Vec<TimeSlot>,
}

impl ProblemInstance {
    /// Creates an instance on the standard grid.
    pub fn new(professors: Vec<Professor>, courses: Vec<Course>) -> Self {
        Self {
            grid: SlotGrid::standard(),
            professors,
            courses,
            busy: BusySet::new(),
            enrollment: Enrollment::new(),
            exclusions: Vec::new(),
        }
    }

    pub fn with_grid(mut self, grid: SlotGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_busy(mut self, busy: BusySet) -> Self {
        self.busy = busy;
        self
    }

    pub fn with_enrollment(mut self, enrollment: Enrollment) -> Self {
        self.enrollment = enrollment;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<TimeSlot>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Course id → course.
    pub fn course_index(&self) -> HashMap<&str, &Course> {
        self.courses.iter().map(|c| (c.id.as_str(), c)).collect()
    }
}
