//! Timetable quality metrics (KPIs).
//!
//! Computes summary indicators from a finished timetable and the
//! enrollment it serves.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Conflict instances | (student, slot) pairs with two or more courses |
//! | Conflicting students | Students with at least one conflict |
//! | Conflict rate | Conflicting students / enrolled students |
//! | Slot load | Sessions meeting in a slot |
//! | Unused slots | Grid slots with no session |
//!
//! # Reference
//! McCollum et al. (2010), "Setting the Research Agenda in Automated
//! Timetabling: The Second International Timetabling Competition", §3

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::ConflictAnalyzer;
use crate::models::{Enrollment, ScheduleAssignment, SlotGrid, TimeSlot};

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Students with at least one enrollment.
    pub total_students: usize,
    /// Students double-booked at least once.
    pub conflicting_students: usize,
    /// Number of (student, slot) conflicts.
    pub conflict_instances: usize,
    /// Fraction of students with a conflict (0.0..1.0).
    pub conflict_rate: f64,
    /// Sessions placed.
    pub sessions: usize,
    /// Sessions per grid slot.
    pub load_by_slot: BTreeMap<TimeSlot, usize>,
    /// Busiest slot's session count.
    pub max_slot_load: usize,
    /// Mean sessions per grid slot.
    pub avg_slot_load: f64,
    /// Grid slots with no session.
    pub unused_slots: usize,
}

impl TimetableKpi {
    /// Computes KPIs for a timetable over a slot grid.
    ///
    /// Sessions placed outside the grid still count toward conflicts and
    /// `sessions` but not toward the per-slot load figures.
    pub fn calculate(schedule: &ScheduleAssignment, enrollment: &Enrollment, grid: &SlotGrid) -> Self {
        let report = ConflictAnalyzer::analyze(schedule, enrollment);
        let total_students = enrollment.student_count();
        let conflicting_students = report.students().len();

        let by_slot = schedule.by_slot();
        let load_by_slot: BTreeMap<TimeSlot, usize> = grid
            .slots()
            .map(|s| (s, by_slot.get(&s).map_or(0, |c| c.len())))
            .collect();

        let max_slot_load = load_by_slot.values().copied().max().unwrap_or(0);
        let unused_slots = load_by_slot.values().filter(|&&n| n == 0).count();
        let avg_slot_load = if load_by_slot.is_empty() {
            0.0
        } else {
            load_by_slot.values().sum::<usize>() as f64 / load_by_slot.len() as f64
        };

        let conflict_rate = if total_students == 0 {
            0.0
        } else {
            conflicting_students as f64 / total_students as f64
        };

        Self {
            total_students,
            conflicting_students,
            conflict_instances: report.len(),
            conflict_rate,
            sessions: schedule.session_count(),
            load_by_slot,
            max_slot_load,
            avg_slot_load,
            unused_slots,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_conflict_rate: f64, max_slot_load: usize) -> bool {
        self.conflict_rate <= max_conflict_rate && self.max_slot_load <= max_slot_load
    }
}
