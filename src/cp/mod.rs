//! Boolean optimization models and solver backends.
//!
//! The scheduler never talks to a concrete solver. It builds a [`BoolModel`]
//! (0/1 variables, integer linear constraints, a linear objective to
//! minimize) and hands it to anything implementing [`BoolSolver`]. Swapping
//! in a SAT, ILP, or CP backend only requires a new `BoolSolver` impl.
//!
//! The bundled backend is [`HighsSolver`], which hands the model to the
//! HiGHS MILP solver through `good_lp`.

mod highs;

pub use highs::HighsSolver;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A model that no backend can accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A term references a variable the model never created.
    #[error("`{constraint}` references variable #{index}, model has {vars}")]
    UnknownVariable {
        constraint: String,
        index: usize,
        vars: usize,
    },
}

/// Handle to a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(u32);

impl Var {
    /// Position of this variable in solution value vectors.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Le,
    Ge,
    Eq,
}

/// `sum(coef * var) <cmp> rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(Var, i64)>,
    pub cmp: Cmp,
    pub rhs: i64,
}

impl LinearConstraint {
    /// Evaluates the left-hand side under a full assignment.
    pub fn activity(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|(v, _)| values.get(v.index()).copied().unwrap_or(false))
            .map(|(_, c)| c)
            .sum()
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let lhs = self.activity(values);
        match self.cmp {
            Cmp::Le => lhs <= self.rhs,
            Cmp::Ge => lhs >= self.rhs,
            Cmp::Eq => lhs == self.rhs,
        }
    }
}

/// A pseudo-boolean optimization model.
#[derive(Debug, Clone, Default)]
pub struct BoolModel {
    name: String,
    var_names: Vec<String>,
    hints: Vec<Option<bool>>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(Var, i64)>,
}

impl BoolModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a boolean variable.
    pub fn new_var(&mut self, name: impl Into<String>) -> Var {
        let var = Var(self.var_names.len() as u32);
        self.var_names.push(name.into());
        self.hints.push(None);
        var
    }

    /// Suggests a value the solver should try first for `var`.
    pub fn set_hint(&mut self, var: Var, value: bool) {
        if let Some(h) = self.hints.get_mut(var.index()) {
            *h = Some(value);
        }
    }

    pub fn hint(&self, var: Var) -> Option<bool> {
        self.hints.get(var.index()).copied().flatten()
    }

    pub fn var_name(&self, var: Var) -> &str {
        self.var_names
            .get(var.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Adds `sum(coef * var) <cmp> rhs`.
    pub fn add_linear(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(Var, i64)>,
        cmp: Cmp,
        rhs: i64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            cmp,
            rhs,
        });
    }

    /// Exactly `k` of `vars` are true.
    pub fn add_exactly(&mut self, name: impl Into<String>, vars: &[Var], k: i64) {
        self.add_linear(name, unit_terms(vars), Cmp::Eq, k);
    }

    /// At most `k` of `vars` are true.
    pub fn add_at_most(&mut self, name: impl Into<String>, vars: &[Var], k: i64) {
        self.add_linear(name, unit_terms(vars), Cmp::Le, k);
    }

    /// At least `k` of `vars` are true.
    pub fn add_at_least(&mut self, name: impl Into<String>, vars: &[Var], k: i64) {
        self.add_linear(name, unit_terms(vars), Cmp::Ge, k);
    }

    /// Adds terms to the minimized objective.
    pub fn minimize(&mut self, terms: impl IntoIterator<Item = (Var, i64)>) {
        self.objective.extend(terms);
    }

    /// All variables, in creation order.
    pub fn vars(&self) -> impl Iterator<Item = Var> {
        (0..self.var_names.len() as u32).map(Var)
    }

    pub fn var_count(&self) -> usize {
        self.var_names.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(Var, i64)] {
        &self.objective
    }

    /// Checks that every term refers to a variable of this model.
    pub fn check(&self) -> Result<(), ModelError> {
        let vars = self.var_count();
        let rows = self
            .constraints
            .iter()
            .map(|c| (c.name.as_str(), c.terms.as_slice()))
            .chain(std::iter::once(("objective", self.objective.as_slice())));
        for (name, terms) in rows {
            if let Some((v, _)) = terms.iter().find(|(v, _)| v.index() >= vars) {
                return Err(ModelError::UnknownVariable {
                    constraint: name.to_string(),
                    index: v.index(),
                    vars,
                });
            }
        }
        Ok(())
    }

    /// Objective value of a full assignment, or `None` if it violates a
    /// constraint.
    pub fn evaluate(&self, values: &[bool]) -> Option<i64> {
        if values.len() != self.var_count() {
            return None;
        }
        if !self.constraints.iter().all(|c| c.is_satisfied(values)) {
            return None;
        }
        Some(
            self.objective
                .iter()
                .filter(|(v, _)| values.get(v.index()).copied().unwrap_or(false))
                .map(|(_, w)| w)
                .sum(),
        )
    }
}

fn unit_terms(vars: &[Var]) -> Vec<(Var, i64)> {
    vars.iter().map(|&v| (v, 1)).collect()
}

/// Solver budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock limit (ms).
    pub time_limit_ms: u64,
    /// Search node limit. `None` = unbounded.
    pub node_limit: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            node_limit: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }
}

/// Outcome classification of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Best possible objective, proven.
    Optimal,
    /// A solution, found before the budget ran out; optimality unproven.
    Feasible,
    /// Proven to have no solution.
    Infeasible,
    /// Budget ran out with no solution and no proof.
    Unknown,
}

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct BoolSolution {
    pub status: SolveStatus,
    /// Variable values (meaningful only when a solution was found).
    pub values: Vec<bool>,
    pub objective: Option<i64>,
    /// Search nodes explored, when the backend reports them.
    pub nodes: u64,
    pub elapsed_ms: u64,
}

impl BoolSolution {
    /// A solve that produced no assignment.
    pub fn unsolved(status: SolveStatus, model: &BoolModel, elapsed_ms: u64) -> Self {
        Self {
            status,
            values: vec![false; model.var_count()],
            objective: None,
            nodes: 0,
            elapsed_ms,
        }
    }

    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Value of a variable in the solution.
    pub fn value(&self, var: Var) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }
}

/// A backend able to minimize a [`BoolModel`] within a budget.
///
/// Implementations must return promptly once the budget is exhausted,
/// reporting the best solution seen so far. Hints are advisory and may be
/// ignored.
pub trait BoolSolver {
    fn solve(&self, model: &BoolModel, config: &SolverConfig)
        -> Result<BoolSolution, ModelError>;
}
