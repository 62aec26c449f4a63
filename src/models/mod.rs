//! Timetabling domain models.
//!
//! Plain data types shared by every stage of a run: the weekly slot grid,
//! courses and professors, the registration snapshot, and the outputs
//! (timetable, conflict reports, section assignments).
//!
//! # Domain Mappings
//!
//! | u-timetable | Registrar term |
//! |-------------|----------------|
//! | TimeSlot | Period (day + start time) |
//! | Course | Course offering |
//! | Enrollment | Registration snapshot |
//! | BusySet | Faculty unavailability |
//! | ScheduleAssignment | Timetable |
//! | SectionAssignment | Section roster |

mod course;
mod enrollment;
mod instance;
mod schedule;
mod section;
mod slot;

pub use course::{Course, CourseKind, Professor, SessionPolicy};
pub use enrollment::{BusySet, Enrollment};
pub use instance::ProblemInstance;
pub use schedule::{
    ConflictReport, ProfessorClash, SameDayViolation, ScheduleAssignment, StudentConflict,
};
pub use section::SectionAssignment;
pub use slot::{Day, SlotDef, SlotGrid, SlotParseError, StartTime, TimeSlot};
