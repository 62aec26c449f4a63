//! Course timetabling engine.
//!
//! Assigns weekly meeting slots to courses so that every course meets its
//! required number of times on distinct days, no professor is double-booked,
//! and as few students as possible have two enrolled courses at once. Also
//! diagnoses existing timetables and splits large courses into balanced
//! parallel sections.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeSlot`, `SlotGrid`, `Course`,
//!   `Enrollment`, `BusySet`, `ScheduleAssignment`, `SectionAssignment`
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   professors and courses, off-grid slots)
//! - **`availability`**: Candidate slots per course
//! - **`cp`**: Boolean optimization models and the solver capability
//! - **`scheduler`**: Timetable model construction, solving, KPIs
//! - **`analysis`**: Conflict reports and minimal-conflict slot search
//! - **`sections`**: Clustering-based section allocation
//! - **`config`** / **`error`**: Run configuration and the crate error type
//!
//! # Architecture
//!
//! The engine is pure computation over per-run snapshots: no I/O, no global
//! state. Data ingestion and export belong to the caller. The scheduler is
//! generic over [`cp::BoolSolver`], so the bundled HiGHS backend can be
//! replaced without touching the model.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated
//!   Timetabling"
//! - Arthur & Vassilvitskii (2007), "k-means++: The Advantages of Careful
//!   Seeding"

pub mod analysis;
pub mod availability;
pub mod config;
pub mod cp;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod sections;
pub mod validation;

pub use error::{Result, TimetableError};
