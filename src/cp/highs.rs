//! MILP backend: HiGHS through `good_lp`.
//!
//! Every [`BoolModel`] variable becomes a binary column, every
//! [`LinearConstraint`](super::LinearConstraint) a row, and the objective is
//! minimised as is. The wall-clock and node budgets map onto HiGHS'
//! `time_limit` and `mip_max_nodes` options.
//!
//! The solver's values are rounded and re-checked against the model, so a
//! returned solution is always exact in integer terms.

use std::time::Instant;

use good_lp::solvers::SolutionStatus;
use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::debug;

use super::{
    BoolModel, BoolSolution, BoolSolver, Cmp, ModelError, SolveStatus, SolverConfig, Var,
};

/// Bundled MILP backend.
#[derive(Debug, Clone)]
pub struct HighsSolver {
    random_seed: i32,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self { random_seed: 1234 }
    }

    /// Seed for HiGHS' internal tie-breaking.
    pub fn with_random_seed(mut self, seed: i32) -> Self {
        self.random_seed = seed;
        self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BoolSolver for HighsSolver {
    fn solve(
        &self,
        model: &BoolModel,
        config: &SolverConfig,
    ) -> Result<BoolSolution, ModelError> {
        model.check()?;
        let started = Instant::now();

        // Nothing to decide: the constant rows alone settle feasibility.
        if model.var_count() == 0 {
            let objective = model.evaluate(&[]);
            let status = match objective {
                Some(_) => SolveStatus::Optimal,
                None => SolveStatus::Infeasible,
            };
            return Ok(BoolSolution {
                status,
                values: Vec::new(),
                objective,
                nodes: 0,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = model
            .vars()
            .map(|v| vars.add(variable().binary().name(model.var_name(v))))
            .collect();
        let linear = |terms: &[(Var, i64)]| -> Expression {
            terms
                .iter()
                .map(|&(v, coef)| coef as f64 * xs[v.index()])
                .sum()
        };

        let mut problem = vars
            .minimise(linear(model.objective()))
            // HiGHS is the only good_lp backend enabled.
            .using(default_solver)
            .set_option("output_flag", false)
            .set_option("threads", 1)
            .set_option("random_seed", self.random_seed)
            .set_option("mip_rel_gap", 0.0)
            .set_option("time_limit", config.time_limit_ms as f64 / 1000.0);
        if let Some(nodes) = config.node_limit {
            let nodes = i32::try_from(nodes).unwrap_or(i32::MAX);
            problem = problem.set_option("mip_max_nodes", nodes);
        }

        for c in model.constraints() {
            let lhs = linear(&c.terms);
            let rhs = c.rhs as f64;
            match c.cmp {
                Cmp::Le => problem.add_constraint(constraint!(lhs <= rhs)),
                Cmp::Ge => problem.add_constraint(constraint!(lhs >= rhs)),
                Cmp::Eq => problem.add_constraint(constraint!(lhs == rhs)),
            };
        }

        let outcome = problem.solve();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let solution = match outcome {
            Ok(solution) => {
                let values: Vec<bool> = xs.iter().map(|&x| solution.value(x) > 0.5).collect();
                match model.evaluate(&values) {
                    Some(objective) => {
                        let status = match solution.status() {
                            SolutionStatus::Optimal => SolveStatus::Optimal,
                            _ => SolveStatus::Feasible,
                        };
                        BoolSolution {
                            status,
                            values,
                            objective: Some(objective),
                            nodes: 0,
                            elapsed_ms,
                        }
                    }
                    // Budget ran out before an integer-feasible point.
                    None => BoolSolution::unsolved(SolveStatus::Unknown, model, elapsed_ms),
                }
            }
            Err(ResolutionError::Infeasible) => {
                BoolSolution::unsolved(SolveStatus::Infeasible, model, elapsed_ms)
            }
            Err(err) => {
                debug!(model = model.name(), error = %err, "HiGHS returned no solution");
                BoolSolution::unsolved(SolveStatus::Unknown, model, elapsed_ms)
            }
        };

        debug!(
            model = model.name(),
            vars = model.var_count(),
            constraints = model.constraint_count(),
            elapsed_ms,
            status = ?solution.status,
            objective = ?solution.objective,
            "HiGHS finished"
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(model: &BoolModel) -> BoolSolution {
        HighsSolver::new()
            .solve(model, &SolverConfig::default())
            .unwrap()
    }

    #[test]
    fn test_exactly_k_minimizes_weights() {
        let mut model = BoolModel::new("pick2");
        let vars: Vec<Var> = (0..5).map(|i| model.new_var(format!("x{i}"))).collect();
        model.add_exactly("two", &vars, 2);
        model.minimize(vars.iter().zip([5, 1, 4, 2, 3]).map(|(&v, w)| (v, w)));

        let sol = solve(&model);
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(sol.objective, Some(3));
        assert!(sol.value(vars[1]) && sol.value(vars[3]));
        assert_eq!(model.evaluate(&sol.values), Some(3));
    }

    #[test]
    fn test_infeasible() {
        let mut model = BoolModel::new("bad");
        let a = model.new_var("a");
        let b = model.new_var("b");
        model.add_exactly("both", &[a, b], 2);
        model.add_at_most("not both", &[a, b], 1);

        let sol = solve(&model);
        assert_eq!(sol.status, SolveStatus::Infeasible);
        assert!(!sol.is_solution_found());
        assert_eq!(sol.objective, None);
    }

    #[test]
    fn test_penalty_link() {
        // p >= a + b - 1, with a and b forced: p must be 1.
        let mut model = BoolModel::new("link");
        let a = model.new_var("a");
        let b = model.new_var("b");
        let p = model.new_var("p");
        model.add_at_least("a", &[a], 1);
        model.add_at_least("b", &[b], 1);
        model.add_linear("link", vec![(a, 1), (b, 1), (p, -1)], Cmp::Le, 1);
        model.minimize([(p, 1)]);

        let sol = solve(&model);
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert!(sol.value(p));
        assert_eq!(sol.objective, Some(1));
    }

    #[test]
    fn test_feasibility_without_objective() {
        let mut model = BoolModel::new("sat");
        let vars: Vec<Var> = (0..4).map(|i| model.new_var(format!("x{i}"))).collect();
        model.add_exactly("pair", &vars, 2);
        model.add_at_most("front", &vars[..2], 1);

        let sol = solve(&model);
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(sol.objective, Some(0));
        assert!(model.evaluate(&sol.values).is_some());
    }

    #[test]
    fn test_empty_model() {
        let sol = solve(&BoolModel::new("empty"));
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert!(sol.values.is_empty());
    }

    #[test]
    fn test_constant_row_infeasible() {
        let mut model = BoolModel::new("constant");
        model.add_linear("impossible", Vec::new(), Cmp::Ge, 1);
        assert_eq!(solve(&model).status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_foreign_variable_rejected() {
        let mut other = BoolModel::new("other");
        let _ = other.new_var("a");
        let stray = other.new_var("b");

        let mut model = BoolModel::new("m");
        let a = model.new_var("a");
        model.add_at_most("mixed", &[a, stray], 1);

        let err = HighsSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownVariable {
                constraint: "mixed".into(),
                index: 1,
                vars: 1,
            }
        );
    }
}
