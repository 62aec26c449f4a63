//! Timetable → boolean model translation.
//!
//! # Variables
//! - `x[c, s]` for every course `c` and candidate slot `s`: course meets in `s`.
//! - `p[a, b, s]` for every co-enrolled course pair and shared candidate slot:
//!   penalty, forced true when both `x[a, s]` and `x[b, s]` are.
//!
//! # Constraints
//! - Sessions: `sum_s x[c, s] = required_sessions(c)`
//! - Same day: `sum_{s in day d} x[c, s] <= 1`
//! - Consecutive days (optional): `sum_{s in d or d+1} x[c, s] <= 1`
//! - Professor clash (optional): `sum_{c taught by p} x[c, s] <= 1`
//! - Slot capacity (optional): `sum_c x[c, s] <= cap`
//! - Penalty link: `x[a, s] + x[b, s] - p[a, b, s] <= 1`
//!
//! # Objective
//! `min sum w(a, b) * p[a, b, s] + w_np * sum_{s non-preferred} x[c, s]`
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", §3 (course timetabling)

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::availability::CandidateSlots;
use crate::config::SchedulerConfig;
use crate::cp::{BoolModel, BoolSolution, Cmp, Var};
use crate::models::{Course, CourseKind, Day, Enrollment, ScheduleAssignment, TimeSlot};

/// Which constraint families go into a model.
///
/// Full solves use everything the config enables; infeasibility diagnosis
/// builds narrower models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Families {
    pub professor: bool,
    pub capacity: bool,
    pub objective: bool,
}

impl Families {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            professor: config.professor_clash,
            capacity: config.max_courses_per_slot.is_some(),
            objective: true,
        }
    }

    /// Sessions, same-day, and consecutive-day rules only.
    pub fn structural() -> Self {
        Self {
            professor: false,
            capacity: false,
            objective: false,
        }
    }
}

/// A decision variable: course `course` (index into the course slice)
/// meets in `slot`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub course: usize,
    pub slot: TimeSlot,
    pub var: Var,
}

/// A penalty variable for co-enrolled courses `a` and `b` sharing `slot`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Penalty {
    pub a: usize,
    pub b: usize,
    pub slot: TimeSlot,
    pub var: Var,
}

/// A built model plus the mapping back to timetable terms.
pub(crate) struct TimetableModel {
    pub model: BoolModel,
    pub placements: Vec<Placement>,
    pub penalties: Vec<Penalty>,
}

impl TimetableModel {
    /// Maps true placement variables back to a timetable.
    pub fn extract(&self, courses: &[Course], solution: &BoolSolution) -> ScheduleAssignment {
        let mut schedule = ScheduleAssignment::new();
        for p in &self.placements {
            if solution.value(p.var) {
                schedule.assign(courses[p.course].id.clone(), p.slot);
            }
        }
        schedule
    }

    /// Number of penalty variables set in a solution.
    pub fn penalties_hit(&self, solution: &BoolSolution) -> usize {
        self.penalties
            .iter()
            .filter(|p| solution.value(p.var))
            .count()
    }
}

/// Builds a [`TimetableModel`] from courses, candidates, and enrollment.
pub(crate) struct TimetableModelBuilder<'a> {
    courses: &'a [Course],
    candidates: &'a CandidateSlots,
    enrollment: &'a Enrollment,
    config: &'a SchedulerConfig,
    families: Families,
}

impl<'a> TimetableModelBuilder<'a> {
    pub fn new(
        courses: &'a [Course],
        candidates: &'a CandidateSlots,
        enrollment: &'a Enrollment,
        config: &'a SchedulerConfig,
    ) -> Self {
        Self {
            courses,
            candidates,
            enrollment,
            config,
            families: Families::from_config(config),
        }
    }

    pub fn with_families(mut self, families: Families) -> Self {
        self.families = families;
        self
    }

    pub fn build(&self) -> TimetableModel {
        let mut model = BoolModel::new("timetable");
        let weights = self.pair_weights();
        let mut placements = Vec::new();
        // course index → slot → var
        let mut vars: Vec<BTreeMap<TimeSlot, Var>> = Vec::with_capacity(self.courses.len());

        for (ci, course) in self.courses.iter().enumerate() {
            let mut by_slot = BTreeMap::new();
            for slot in self.candidates.slots_of(&course.id) {
                let var = model.new_var(format!("x[{}@{}]", course.id, slot));
                by_slot.insert(slot, var);
                placements.push(Placement {
                    course: ci,
                    slot,
                    var,
                });
            }
            vars.push(by_slot);
        }

        for (ci, course) in self.courses.iter().enumerate() {
            let by_slot = &vars[ci];
            let all: Vec<Var> = by_slot.values().copied().collect();
            model.add_exactly(
                format!("sessions[{}]", course.id),
                &all,
                course.required_sessions as i64,
            );

            let by_day = group_by_day(by_slot);
            for (day, day_vars) in &by_day {
                if day_vars.len() > 1 {
                    model.add_at_most(format!("same_day[{}@{}]", course.id, day), day_vars, 1);
                }
            }

            if self.config.no_consecutive_days {
                for pair in Day::ALL.windows(2) {
                    let (d1, d2) = (pair[0], pair[1]);
                    let (Some(v1), Some(v2)) = (by_day.get(&d1), by_day.get(&d2)) else {
                        continue;
                    };
                    let both: Vec<Var> = v1.iter().chain(v2).copied().collect();
                    model.add_at_most(format!("consecutive[{}@{d1}-{d2}]", course.id), &both, 1);
                }
            }
        }

        if self.families.professor {
            let mut by_professor: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
            for (ci, course) in self.courses.iter().enumerate() {
                by_professor
                    .entry(course.professor_id.as_str())
                    .or_default()
                    .push(ci);
            }
            for (prof, course_idx) in &by_professor {
                if course_idx.len() < 2 {
                    continue;
                }
                let mut by_slot: BTreeMap<TimeSlot, Vec<Var>> = BTreeMap::new();
                for &ci in course_idx {
                    for (slot, var) in &vars[ci] {
                        by_slot.entry(*slot).or_default().push(*var);
                    }
                }
                for (slot, slot_vars) in &by_slot {
                    if slot_vars.len() > 1 {
                        model.add_at_most(format!("professor[{prof}@{slot}]"), slot_vars, 1);
                    }
                }
            }
        }

        if self.families.capacity {
            if let Some(cap) = self.config.max_courses_per_slot {
                let mut by_slot: BTreeMap<TimeSlot, Vec<Var>> = BTreeMap::new();
                for p in &placements {
                    by_slot.entry(p.slot).or_default().push(p.var);
                }
                for (slot, slot_vars) in &by_slot {
                    if slot_vars.len() > cap {
                        model.add_at_most(format!("capacity[{slot}]"), slot_vars, cap as i64);
                    }
                }
            }
        }

        let mut penalties = Vec::new();
        if self.families.objective {
            for (&(a, b), &weight) in &weights {
                if self.families.professor
                    && self.courses[a].professor_id == self.courses[b].professor_id
                {
                    // Already mutually exclusive per slot.
                    continue;
                }
                for (slot, &va) in &vars[a] {
                    let Some(&vb) = vars[b].get(slot) else {
                        continue;
                    };
                    let p = model.new_var(format!(
                        "p[{}&{}@{}]",
                        self.courses[a].id, self.courses[b].id, slot
                    ));
                    model.add_linear(
                        format!("clash[{}&{}@{}]", self.courses[a].id, self.courses[b].id, slot),
                        vec![(va, 1), (vb, 1), (p, -1)],
                        Cmp::Le,
                        1,
                    );
                    model.minimize([(p, weight)]);
                    penalties.push(Penalty {
                        a,
                        b,
                        slot: *slot,
                        var: p,
                    });
                }
            }

            let non_preferred = self.non_preferred_weight();
            if non_preferred > 0 {
                let avoid: HashSet<&TimeSlot> = self.config.non_preferred_slots.iter().collect();
                model.minimize(
                    placements
                        .iter()
                        .filter(|p| avoid.contains(&p.slot))
                        .map(|p| (p.var, non_preferred)),
                );
            }
        }

        let seed = self.greedy(&vars, &weights);
        for p in &placements {
            if let Some(slots) = &seed[p.course] {
                model.set_hint(p.var, slots.contains(&p.slot));
            }
        }
        for pen in &penalties {
            if let (Some(a), Some(b)) = (&seed[pen.a], &seed[pen.b]) {
                model.set_hint(pen.var, a.contains(&pen.slot) && b.contains(&pen.slot));
            }
        }

        let built = TimetableModel {
            model,
            placements,
            penalties,
        };

        debug!(
            courses = self.courses.len(),
            vars = built.model.var_count(),
            constraints = built.model.constraint_count(),
            penalties = built.penalties.len(),
            "timetable model built"
        );
        built
    }

    /// Per-session cost of a non-preferred slot. Deserialized configs can
    /// carry negative weights, which would reward the slots instead.
    fn non_preferred_weight(&self) -> i64 {
        self.config.non_preferred_weight.max(0)
    }

    /// Objective weight of each co-enrolled course pair `(a, b)`, `a < b`.
    fn pair_weights(&self) -> BTreeMap<(usize, usize), i64> {
        let index: HashMap<&str, usize> = self
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), i))
            .collect();

        let mut shared: BTreeMap<(usize, usize), i64> = BTreeMap::new();
        for (_, courses) in self.enrollment.iter() {
            let idx: Vec<usize> = courses
                .iter()
                .filter_map(|c| index.get(c.as_str()).copied())
                .collect();
            for (i, &a) in idx.iter().enumerate() {
                for &b in &idx[i + 1..] {
                    let key = (a.min(b), a.max(b));
                    *shared.entry(key).or_insert(0) += 1;
                }
            }
        }

        shared
            .into_iter()
            .map(|((a, b), students)| {
                let mut weight = self.config.student_conflict_weight.max(1);
                if self.courses[a].kind == CourseKind::Required
                    && self.courses[b].kind == CourseKind::Required
                {
                    weight += self.config.required_clash_weight.max(0);
                }
                if self.config.weight_by_shared_students {
                    weight *= students;
                }
                ((a, b), weight)
            })
            .collect()
    }

    /// Greedy timetable used as solver hints.
    ///
    /// Most constrained courses go first. Each takes its cheapest slots
    /// (clash weight against already placed courses, then chronological) on
    /// distinct days. A course that cannot be placed gets no hints.
    fn greedy(
        &self,
        vars: &[BTreeMap<TimeSlot, Var>],
        weights: &BTreeMap<(usize, usize), i64>,
    ) -> Vec<Option<BTreeSet<TimeSlot>>> {
        let mut partners: HashMap<usize, Vec<(usize, i64)>> = HashMap::new();
        for (&(a, b), &w) in weights {
            partners.entry(a).or_default().push((b, w));
            partners.entry(b).or_default().push((a, w));
        }
        let avoid: HashSet<&TimeSlot> = self.config.non_preferred_slots.iter().collect();
        let non_preferred = self.non_preferred_weight();

        let mut order: Vec<usize> = (0..self.courses.len()).collect();
        order.sort_by_key(|&ci| (vars[ci].len(), self.courses[ci].id.as_str()));

        let mut chosen: Vec<Option<BTreeSet<TimeSlot>>> = vec![None; self.courses.len()];
        let mut professor_busy: HashSet<(&str, TimeSlot)> = HashSet::new();
        let mut load: HashMap<TimeSlot, usize> = HashMap::new();

        for ci in order {
            let course = &self.courses[ci];
            let mut scored: Vec<(i64, TimeSlot)> = vars[ci]
                .keys()
                .filter(|slot| {
                    !(self.families.professor
                        && professor_busy.contains(&(course.professor_id.as_str(), **slot)))
                })
                .filter(|slot| match (self.families.capacity, self.config.max_courses_per_slot) {
                    (true, Some(cap)) => load.get(*slot).copied().unwrap_or(0) < cap,
                    _ => true,
                })
                .map(|slot| {
                    let clash: i64 = partners
                        .get(&ci)
                        .into_iter()
                        .flatten()
                        .filter(|(other, _)| {
                            chosen[*other].as_ref().is_some_and(|s| s.contains(slot))
                        })
                        .map(|(_, w)| w)
                        .sum();
                    let pref = if avoid.contains(slot) {
                        non_preferred
                    } else {
                        0
                    };
                    (clash + pref, *slot)
                })
                .collect();
            scored.sort();

            let mut picked = BTreeSet::new();
            let mut days: BTreeSet<Day> = BTreeSet::new();
            for (_, slot) in scored {
                if picked.len() == course.required_sessions as usize {
                    break;
                }
                if days.contains(&slot.day) {
                    continue;
                }
                if self.config.no_consecutive_days
                    && days.iter().any(|d| d.is_adjacent(slot.day))
                {
                    continue;
                }
                days.insert(slot.day);
                picked.insert(slot);
            }

            if picked.len() == course.required_sessions as usize {
                for slot in &picked {
                    professor_busy.insert((course.professor_id.as_str(), *slot));
                    *load.entry(*slot).or_insert(0) += 1;
                }
                chosen[ci] = Some(picked);
            }
        }
        chosen
    }
}

fn group_by_day(by_slot: &BTreeMap<TimeSlot, Var>) -> BTreeMap<Day, Vec<Var>> {
    let mut by_day: BTreeMap<Day, Vec<Var>> = BTreeMap::new();
    for (slot, var) in by_slot {
        by_day.entry(slot.day).or_default().push(*var);
    }
    by_day
}
