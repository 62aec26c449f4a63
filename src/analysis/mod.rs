//! Timetable diagnostics.
//!
//! Read-only checks over any course → slots timetable, whether produced by
//! the scheduler or edited by hand:
//!
//! - [`ConflictAnalyzer`]: student double-bookings, same-day repeats,
//!   professor clashes
//! - [`find_min_conflict_slots`]: best slots to move one course into
//! - [`student_timetable`]: one student's week

mod conflicts;
mod slot_finder;
mod student;

pub use conflicts::ConflictAnalyzer;
pub use slot_finder::{find_min_conflict_slots, SlotRanking, SlotScore};
pub use student::{student_timetable, StudentSession, StudentTimetable};
