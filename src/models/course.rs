//! Course and professor models.
//!
//! A course is taught by one professor and must meet `required_sessions`
//! times per week, each on a different day. Courses with more than one
//! section are split into parallel groups by the section allocator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a course is mandatory for the students taking it.
///
/// Clashes between two required courses can be weighted more heavily
/// than clashes involving an elective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CourseKind {
    Required,
    #[default]
    Elective,
}

/// A course to be placed on the weekly grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier (e.g. `"MATH203"`).
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub name: String,
    /// Teaching professor.
    pub professor_id: String,
    /// Sessions per week; each on a distinct day.
    pub required_sessions: u32,
    /// Number of parallel sections (1 = not split).
    #[serde(default = "default_section_count")]
    pub section_count: u32,
    #[serde(default)]
    pub kind: CourseKind,
    /// Credit value, used by [`SessionPolicy::Credits`].
    #[serde(default)]
    pub credits: Option<u32>,
    /// Professors rotated across sections when the course is expanded.
    /// Empty means every section keeps `professor_id`.
    #[serde(default)]
    pub section_professors: Vec<String>,
}

fn default_section_count() -> u32 {
    1
}

impl Course {
    /// Creates a single-section elective meeting twice a week.
    pub fn new(id: impl Into<String>, professor_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            professor_id: professor_id.into(),
            required_sessions: 2,
            section_count: 1,
            kind: CourseKind::Elective,
            credits: None,
            section_professors: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sessions(mut self, sessions: u32) -> Self {
        self.required_sessions = sessions;
        self
    }

    pub fn with_sections(mut self, sections: u32) -> Self {
        self.section_count = sections;
        self
    }

    pub fn with_kind(mut self, kind: CourseKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the course as required.
    pub fn required(self) -> Self {
        self.with_kind(CourseKind::Required)
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn with_section_professors(mut self, professors: Vec<String>) -> Self {
        self.section_professors = professors;
        self
    }

    /// Whether the course is split into parallel sections.
    #[inline]
    pub fn is_multi_section(&self) -> bool {
        self.section_count > 1
    }
}

/// A professor roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Professor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// How `required_sessions` is derived for a catalog.
///
/// The scheduler only ever reads `Course::required_sessions`; a policy is
/// applied beforehand by whoever assembles the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPolicy {
    /// Every course meets this many times.
    Fixed(u32),
    /// Sessions looked up from credits; courses without credits or with
    /// an unlisted credit value get `fallback`.
    Credits {
        table: BTreeMap<u32, u32>,
        fallback: u32,
    },
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy::Fixed(2)
    }
}

impl SessionPolicy {
    /// Sessions for a single course.
    pub fn sessions_for(&self, course: &Course) -> u32 {
        match self {
            SessionPolicy::Fixed(n) => *n,
            SessionPolicy::Credits { table, fallback } => course
                .credits
                .and_then(|c| table.get(&c).copied())
                .unwrap_or(*fallback),
        }
    }

    /// Overwrites `required_sessions` on every course.
    pub fn apply(&self, courses: &mut [Course]) {
        for course in courses {
            course.required_sessions = self.sessions_for(course);
        }
    }
}
