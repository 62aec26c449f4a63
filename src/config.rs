//! Run configuration.
//!
//! Policy values (session counts, blackout slots, penalty weights, solver
//! budget) live here instead of in the algorithms. All structs deserialize
//! with defaults for any missing field, so a partial JSON/TOML document is
//! enough.

use serde::{Deserialize, Serialize};

use crate::cp::SolverConfig;
use crate::models::{ProblemInstance, SessionPolicy, TimeSlot};
use crate::scheduler::Scheduler;
use crate::sections::SectionAllocator;

/// Top-level configuration for a timetabling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    pub scheduler: SchedulerConfig,
    pub sections: SectionConfig,
    /// Globally blacked-out slots, merged with the instance's own exclusions.
    pub exclusions: Vec<TimeSlot>,
    /// How `required_sessions` is derived when a catalog is assembled.
    pub sessions: SessionPolicy,
}

impl TimetableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_sections(mut self, sections: SectionConfig) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<TimeSlot>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_sessions(mut self, sessions: SessionPolicy) -> Self {
        self.sessions = sessions;
        self
    }

    /// Applies catalog policy to an instance: overwrites every course's
    /// `required_sessions` from `sessions` and adds the global exclusions.
    pub fn prepare(&self, mut instance: ProblemInstance) -> ProblemInstance {
        self.sessions.apply(&mut instance.courses);
        for slot in &self.exclusions {
            if !instance.exclusions.contains(slot) {
                instance.exclusions.push(*slot);
            }
        }
        instance
    }

    /// Scheduler with the bundled solver and these settings.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new().with_config(self.scheduler.clone())
    }

    pub fn allocator(&self) -> SectionAllocator {
        SectionAllocator::new().with_config(self.sections.clone())
    }
}

/// Scheduler model and solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Wall-clock budget for one solve (ms).
    pub time_limit_ms: u64,
    /// Optional cap on explored search nodes.
    pub node_limit: Option<u64>,
    /// Objective weight of one (course pair, slot) clash.
    pub student_conflict_weight: i64,
    /// Extra weight when both clashing courses are required.
    pub required_clash_weight: i64,
    /// Multiply clash weights by the number of shared students.
    pub weight_by_shared_students: bool,
    /// Slots that cost `non_preferred_weight` per session placed in them.
    pub non_preferred_slots: Vec<TimeSlot>,
    pub non_preferred_weight: i64,
    /// Hard cap on courses meeting in one slot.
    pub max_courses_per_slot: Option<usize>,
    /// Forbid a professor from teaching two courses in one slot.
    pub professor_clash: bool,
    /// Forbid a course from meeting on two adjacent weekdays.
    pub no_consecutive_days: bool,
    /// Run relaxed re-solves to name the cause of an infeasible model.
    pub diagnose_infeasibility: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 30_000,
            node_limit: None,
            student_conflict_weight: 1,
            required_clash_weight: 0,
            weight_by_shared_students: false,
            non_preferred_slots: Vec::new(),
            non_preferred_weight: 0,
            max_courses_per_slot: None,
            professor_clash: true,
            no_consecutive_days: false,
            diagnose_infeasibility: true,
        }
    }
}

impl SchedulerConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_required_clash_weight(mut self, weight: i64) -> Self {
        self.required_clash_weight = weight.max(0);
        self
    }

    pub fn with_shared_student_weighting(mut self, enabled: bool) -> Self {
        self.weight_by_shared_students = enabled;
        self
    }

    pub fn with_non_preferred(mut self, slots: Vec<TimeSlot>, weight: i64) -> Self {
        self.non_preferred_slots = slots;
        self.non_preferred_weight = weight.max(0);
        self
    }

    pub fn with_max_courses_per_slot(mut self, max: usize) -> Self {
        self.max_courses_per_slot = Some(max);
        self
    }

    pub fn with_professor_clash(mut self, enabled: bool) -> Self {
        self.professor_clash = enabled;
        self
    }

    pub fn with_no_consecutive_days(mut self, enabled: bool) -> Self {
        self.no_consecutive_days = enabled;
        self
    }

    pub fn with_diagnosis(mut self, enabled: bool) -> Self {
        self.diagnose_infeasibility = enabled;
        self
    }

    /// Solver budget derived from this config.
    pub fn solver_config(&self) -> SolverConfig {
        let config = SolverConfig::default().with_time_limit_ms(self.time_limit_ms);
        match self.node_limit {
            Some(nodes) => config.with_node_limit(nodes),
            None => config,
        }
    }
}

/// Section allocator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Upper bound of the cluster-count sweep.
    pub max_k: usize,
    /// k-means restarts per K; the lowest-inertia run wins.
    pub n_init: usize,
    /// Lloyd iterations per run.
    pub max_iter: usize,
    /// Base seed for k-means++ initialization.
    pub seed: u64,
    /// Reject allocations whose largest section would exceed this size.
    pub max_section_size: Option<usize>,
    /// Evaluate K candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            max_k: 10,
            n_init: 10,
            max_iter: 300,
            seed: 42,
            max_section_size: None,
            parallel: true,
        }
    }
}

impl SectionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    pub fn with_max_section_size(mut self, max: usize) -> Self {
        self.max_section_size = Some(max);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
