//! Reference solver backend: bounded exhaustive enumeration
//!
//! Exists so the pipeline, the driver's termination policy and the CLI can be
//! exercised without an external MILP dependency. It is deliberately not a
//! general solver: all-binary problems only, with a hard cap on the variable
//! count. Production deployments plug a real branch-and-bound backend into
//! the same [`MilpSolver`] trait.

use std::time::Instant;

use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{MilpSolver, Progress, ProgressCallback, SolverError, TerminationRequest};
use crate::optimize::variable::{VarHandle, VariableType};
use crate::optimize::OptimizationStatus;

const FEASIBILITY_TOLERANCE: f64 = 1e-9;
/// How many assignments are tried between progress reports
const PROGRESS_STRIDE: u64 = 1024;

/// Exhaustive enumerator over all-binary problems
#[derive(Debug)]
pub struct ExhaustiveSolver {
    /// Refuse problems with more variables than this (enumeration is 2^n)
    max_variables: usize,
    /// Wall-clock limit in seconds, set through [`MilpSolver::configure`]
    time_limit: Option<f64>,
    status: OptimizationStatus,
    best_values: Option<Vec<f64>>,
    best_objective: Option<f64>,
    termination: TerminationRequest,
}

impl ExhaustiveSolver {
    /// Create a solver with the default variable limit of 24
    pub fn new() -> Self {
        Self::with_max_variables(24)
    }

    /// Create a solver refusing problems with more than `max_variables`
    /// variables (capped at 63 so the enumeration mask fits in a u64)
    pub fn with_max_variables(max_variables: usize) -> Self {
        ExhaustiveSolver {
            max_variables: max_variables.min(63),
            time_limit: None,
            status: OptimizationStatus::Unoptimized,
            best_values: None,
            best_objective: None,
            termination: TerminationRequest::new(),
        }
    }

    /// Relative gap between the incumbent and the objective bound
    fn gap(incumbent: f64, bound: f64) -> f64 {
        if incumbent == 0.0 {
            if bound == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (bound - incumbent).abs() / incumbent.abs()
        }
    }

    /// Sense-aware bound on the objective: the best value any assignment
    /// could reach if every term could be set independently
    fn objective_bound(problem: &Problem) -> f64 {
        let keep_positive = problem.objective().sense() == ObjectiveSense::Maximize;
        problem
            .objective()
            .terms()
            .iter()
            .map(|term| term.coefficient)
            .filter(|c| (*c > 0.0) == keep_positive)
            .sum()
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpSolver for ExhaustiveSolver {
    fn configure(&mut self, config: &crate::configuration::Configuration) {
        self.time_limit = Some(config.time_limit);
    }

    fn optimize(
        &mut self,
        problem: &Problem,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<(), SolverError> {
        for variable in problem.variables() {
            if variable.variable_type != VariableType::Binary {
                return Err(SolverError::UnsupportedVariableType(
                    variable.variable_type.to_string(),
                ));
            }
        }
        let n = problem.num_variables();
        if n > self.max_variables {
            return Err(SolverError::ProblemTooLarge {
                variables: n,
                limit: self.max_variables,
            });
        }

        self.status = OptimizationStatus::Unoptimized;
        self.best_values = None;
        self.best_objective = None;

        let start = Instant::now();
        let bound = Self::objective_bound(problem);
        let maximize = problem.objective().sense() == ObjectiveSense::Maximize;
        let mut feasible_solutions = 0u64;
        let mut halted = false;
        let mut values = vec![0.0f64; n];

        for mask in 0u64..(1u64 << n) {
            if self.termination.is_requested() {
                halted = true;
                break;
            }
            if mask % PROGRESS_STRIDE == 0 {
                if let Some(limit) = self.time_limit {
                    if start.elapsed().as_secs_f64() > limit {
                        halted = true;
                        break;
                    }
                }
            }
            for (bit, value) in values.iter_mut().enumerate() {
                *value = ((mask >> bit) & 1) as f64;
            }
            // Honor variable bounds so fixed binaries stay fixed
            let in_bounds = problem
                .variables()
                .iter()
                .zip(&values)
                .all(|(var, &v)| v >= var.lower_bound && v <= var.upper_bound);
            if !in_bounds {
                continue;
            }
            let satisfied = problem
                .constraints()
                .all(|(_, constraint)| constraint.is_satisfied(&values, FEASIBILITY_TOLERANCE));
            if !satisfied {
                continue;
            }

            feasible_solutions += 1;
            let objective = problem.objective().evaluate(&values);
            let improved = match self.best_objective {
                None => true,
                Some(best) => {
                    if maximize {
                        objective > best
                    } else {
                        objective < best
                    }
                }
            };
            if improved {
                self.best_objective = Some(objective);
                self.best_values = Some(values.clone());
            }

            if let Some(callback) = progress {
                if improved || mask % PROGRESS_STRIDE == 0 {
                    callback(&Progress {
                        runtime: start.elapsed().as_secs_f64(),
                        gap: Self::gap(self.best_objective.unwrap_or(0.0), bound),
                        feasible_solutions,
                    });
                }
            }
        }

        self.status = match (halted, self.best_objective.is_some()) {
            (true, true) => OptimizationStatus::Suboptimal,
            (true, false) => OptimizationStatus::Unknown,
            (false, true) => OptimizationStatus::Optimal,
            (false, false) => OptimizationStatus::Infeasible,
        };
        Ok(())
    }

    fn status(&self) -> OptimizationStatus {
        self.status
    }

    fn variable_value(&self, variable: VarHandle) -> Option<f64> {
        self.best_values
            .as_ref()
            .and_then(|values| values.get(variable.index()).copied())
    }

    fn objective_value(&self) -> Option<f64> {
        self.best_objective
    }

    fn termination_request(&self) -> TerminationRequest {
        self.termination.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::Variable;

    /// Maximize 3a + 2b subject to a + b <= 1
    fn one_of_two() -> Problem {
        let mut problem = Problem::new_maximization();
        let a = problem.add_new_binary_variable("a").unwrap();
        let b = problem.add_new_binary_variable("b").unwrap();
        problem
            .add_new_upper_bounded_constraint("pick", &[a, b], &[1.0, 1.0], 1.0)
            .unwrap();
        problem.add_linear_objective_term(a, 3.0).unwrap();
        problem.add_linear_objective_term(b, 2.0).unwrap();
        problem
    }

    #[test]
    fn finds_the_optimum() {
        let mut solver = ExhaustiveSolver::new();
        let problem = one_of_two();
        solver.optimize(&problem, None).unwrap();
        assert_eq!(solver.status(), OptimizationStatus::Optimal);
        assert_eq!(solver.objective_value(), Some(3.0));
        let a = problem.variable_by_id("a").unwrap();
        let b = problem.variable_by_id("b").unwrap();
        assert_eq!(solver.variable_value(a), Some(1.0));
        assert_eq!(solver.variable_value(b), Some(0.0));
    }

    #[test]
    fn detects_infeasibility() {
        // a = 1 and a = 0 cannot both hold
        let mut problem = Problem::new_maximization();
        let a = problem.add_new_binary_variable("a").unwrap();
        problem
            .add_new_equality_constraint("on", &[a], &[1.0], 1.0)
            .unwrap();
        problem
            .add_new_equality_constraint("off", &[a], &[1.0], 0.0)
            .unwrap();
        let mut solver = ExhaustiveSolver::new();
        solver.optimize(&problem, None).unwrap();
        assert_eq!(solver.status(), OptimizationStatus::Infeasible);
        assert_eq!(solver.objective_value(), None);
        assert_eq!(solver.variable_value(a), None);
    }

    #[test]
    fn rejects_continuous_variables() {
        let mut problem = Problem::new_maximization();
        problem
            .add_variable(Variable {
                id: "t".to_string(),
                name: None,
                variable_type: VariableType::Continuous,
                lower_bound: 0.0,
                upper_bound: 1.0,
            })
            .unwrap();
        let mut solver = ExhaustiveSolver::new();
        assert_eq!(
            solver.optimize(&problem, None).unwrap_err(),
            SolverError::UnsupportedVariableType("CONTINUOUS".to_string())
        );
    }

    #[test]
    fn rejects_oversized_problems() {
        let mut problem = Problem::new_maximization();
        for i in 0..5 {
            problem
                .add_new_binary_variable(&format!("b{}", i))
                .unwrap();
        }
        let mut solver = ExhaustiveSolver::with_max_variables(4);
        assert_eq!(
            solver.optimize(&problem, None).unwrap_err(),
            SolverError::ProblemTooLarge {
                variables: 5,
                limit: 4
            }
        );
    }

    #[test]
    fn termination_before_search_yields_unknown() {
        let problem = one_of_two();
        let mut solver = ExhaustiveSolver::new();
        solver.termination_request().request();
        solver.optimize(&problem, None).unwrap();
        assert_eq!(solver.status(), OptimizationStatus::Unknown);
        assert_eq!(solver.objective_value(), None);
    }

    #[test]
    fn termination_mid_search_keeps_incumbent() {
        let problem = one_of_two();
        let mut solver = ExhaustiveSolver::new();
        let termination = solver.termination_request();
        // Stop as soon as the first feasible solution is reported; the
        // all-zero assignment is enumerated first.
        let callback = move |_: &Progress| termination.request();
        solver.optimize(&problem, Some(&callback)).unwrap();
        assert_eq!(solver.status(), OptimizationStatus::Suboptimal);
        assert_eq!(solver.objective_value(), Some(0.0));
    }

    #[test]
    fn progress_reports_feasible_solutions() {
        use std::sync::atomic::{AtomicU64, Ordering};
        let problem = one_of_two();
        let mut solver = ExhaustiveSolver::new();
        let seen = AtomicU64::new(0);
        let callback = |p: &Progress| {
            seen.store(p.feasible_solutions, Ordering::Relaxed);
        };
        solver.optimize(&problem, Some(&callback)).unwrap();
        // Reports fire on improvements: the all-zero assignment, then a=1.
        // The non-improving b=1 assignment is counted but not reported.
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }
}
