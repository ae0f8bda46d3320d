//! Solver driver: runs one optimize call with the gap-stability
//! early-termination policy and reports the outcome
//!
//! The policy mirrors how long-running MIP searches behave in practice: once
//! a feasible solution exists, a gap that has stopped moving for a while is
//! a strong signal that further search is wasted time. The driver watches
//! the solver-reported gap through the progress callback and raises a
//! cooperative termination request when it has been flat for longer than the
//! configured stability window. Termination is advisory; the solver returns
//! its best-known solution with a `Suboptimal` status, which is a normal,
//! non-fatal outcome.

use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::configuration::Configuration;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{MilpSolver, Progress, SolverError};
use crate::optimize::OptimizationStatus;

/// Tracks gap movement across progress reports
///
/// Explicit context object updated only through [`GapWatch::observe`]; the
/// driver keeps it behind a mutex because the callback may arrive on any
/// solver thread.
#[derive(Debug, Clone)]
pub struct GapWatch {
    /// Smallest gap movement that counts as an improvement
    epsilon: f64,
    /// Seconds the gap may stay flat before termination is warranted
    window: f64,
    /// Gap at the last observed improvement
    last_gap: f64,
    /// Runtime at which the gap last moved
    last_change: f64,
}

impl GapWatch {
    /// Create a watch with the given improvement epsilon and stability window
    pub fn new(epsilon: f64, window: f64) -> Self {
        GapWatch {
            epsilon,
            window,
            last_gap: f64::INFINITY,
            last_change: 0.0,
        }
    }

    /// Feed one progress report; returns true when termination should be
    /// requested (gap flat past the window, with a feasible solution in hand)
    pub fn observe(&mut self, progress: &Progress) -> bool {
        if progress.feasible_solutions == 0 {
            return false;
        }
        let moved = match (self.last_gap.is_finite(), progress.gap.is_finite()) {
            // Neither the old nor the new gap is measurable; nothing moved
            (false, false) => false,
            (true, true) => (progress.gap - self.last_gap).abs() > self.epsilon,
            _ => true,
        };
        if moved {
            self.last_gap = progress.gap;
            self.last_change = progress.runtime;
            return false;
        }
        progress.runtime - self.last_change > self.window
    }
}

/// Outcome of one driver run
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Terminal solver status (Optimal or Suboptimal)
    pub status: OptimizationStatus,
    /// Objective value of the returned solution
    pub objective_value: f64,
    /// Last gap the solver reported, if any progress report carried one
    pub final_gap: Option<f64>,
    /// Wall-clock seconds spent inside optimize
    pub runtime: f64,
    /// Number of variables in the solved problem
    pub variables: usize,
    /// Number of constraints in the solved problem
    pub constraints: usize,
}

/// Errors surfaced by the driver
#[derive(Error, Debug)]
pub enum SolveError {
    /// The solver proved the model infeasible. A well-formed placement
    /// formulation is always feasible (serving nothing satisfies every
    /// constraint), so this points at a builder defect.
    #[error("solver reported the model infeasible")]
    Infeasible,
    /// The search ended without ever finding a feasible solution
    #[error("solver finished without a feasible solution")]
    NoSolution,
    /// The backend rejected the problem outright
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Configure the solver, run one optimize call, and collect the outcome
///
/// # Parameters
/// - `solver`: the backend; exclusively owned here for the duration of the call
/// - `problem`: the assembled formulation, never mutated
/// - `config`: gap tolerance, time limit and stability policy
pub fn solve<S: MilpSolver>(
    solver: &mut S,
    problem: &Problem,
    config: &Configuration,
) -> Result<SolveReport, SolveError> {
    solver.configure(config);
    let termination = solver.termination_request();
    let watch = Mutex::new(GapWatch::new(config.gap_epsilon, config.stability_window));
    let last_progress = Mutex::new(None::<Progress>);

    let callback = |progress: &Progress| {
        *last_progress.lock().unwrap() = Some(*progress);
        if watch.lock().unwrap().observe(progress) {
            debug!(
                gap = progress.gap,
                runtime = progress.runtime,
                "optimality gap stable, requesting termination"
            );
            termination.request();
        }
    };

    let start = Instant::now();
    solver.optimize(problem, Some(&callback))?;
    let runtime = start.elapsed().as_secs_f64();
    let final_gap = last_progress
        .lock()
        .unwrap()
        .map(|progress| progress.gap)
        .filter(|gap| gap.is_finite());

    match solver.status() {
        OptimizationStatus::Infeasible => Err(SolveError::Infeasible),
        OptimizationStatus::Unknown | OptimizationStatus::Unoptimized => {
            Err(SolveError::NoSolution)
        }
        status @ (OptimizationStatus::Optimal | OptimizationStatus::Suboptimal) => {
            let report = SolveReport {
                status,
                objective_value: solver.objective_value().unwrap_or(0.0),
                final_gap,
                runtime,
                variables: problem.num_variables(),
                constraints: problem.num_constraints(),
            };
            info!(
                ?status,
                objective = report.objective_value,
                runtime = report.runtime,
                "solve finished"
            );
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::model::Instance;
    use crate::optimize::formulation::Formulation;
    use crate::optimize::savings::SavingsMatrix;
    use crate::optimize::solvers::exhaustive::ExhaustiveSolver;
    use crate::optimize::solvers::{ProgressCallback, TerminationRequest};
    use crate::optimize::variable::VarHandle;

    #[test]
    fn gap_watch_ignores_reports_without_feasible_solutions() {
        let mut watch = GapWatch::new(1e-4, 15.0);
        for runtime in 0..100 {
            assert!(!watch.observe(&Progress {
                runtime: runtime as f64,
                gap: f64::INFINITY,
                feasible_solutions: 0,
            }));
        }
    }

    #[test]
    fn gap_watch_resets_on_improvement() {
        let mut watch = GapWatch::new(1e-4, 15.0);
        // Gap improves every 10 time units; the window never elapses
        for step in 0..10 {
            assert!(!watch.observe(&Progress {
                runtime: (step * 10) as f64,
                gap: 1.0 / (step + 1) as f64,
                feasible_solutions: 1,
            }));
        }
    }

    #[test]
    fn gap_watch_fires_after_stable_window() {
        let mut watch = GapWatch::new(1e-4, 15.0);
        assert!(!watch.observe(&Progress {
            runtime: 0.0,
            gap: 0.5,
            feasible_solutions: 1,
        }));
        // Flat gap, still inside the window
        assert!(!watch.observe(&Progress {
            runtime: 14.0,
            gap: 0.5,
            feasible_solutions: 1,
        }));
        // Movement below epsilon does not reset the clock
        assert!(!watch.observe(&Progress {
            runtime: 15.0,
            gap: 0.500_05,
            feasible_solutions: 1,
        }));
        assert!(watch.observe(&Progress {
            runtime: 15.1,
            gap: 0.5,
            feasible_solutions: 1,
        }));
    }

    #[test]
    fn gap_watch_survives_infinite_gaps() {
        let mut watch = GapWatch::new(1e-4, 15.0);
        assert!(!watch.observe(&Progress {
            runtime: 1.0,
            gap: f64::INFINITY,
            feasible_solutions: 1,
        }));
        // Going from unmeasurable to measurable counts as movement
        assert!(!watch.observe(&Progress {
            runtime: 20.0,
            gap: 0.5,
            feasible_solutions: 1,
        }));
        assert!(!watch.observe(&Progress {
            runtime: 30.0,
            gap: 0.5,
            feasible_solutions: 1,
        }));
        assert!(watch.observe(&Progress {
            runtime: 36.0,
            gap: 0.5,
            feasible_solutions: 1,
        }));
    }

    /// Scripted backend replaying a fixed progress sequence, recording
    /// whether the driver raised termination
    struct ScriptedSolver {
        script: Vec<Progress>,
        terminated_at: Option<usize>,
        termination: TerminationRequest,
        status: OptimizationStatus,
    }

    impl ScriptedSolver {
        fn new(script: Vec<Progress>) -> Self {
            ScriptedSolver {
                script,
                terminated_at: None,
                termination: TerminationRequest::new(),
                status: OptimizationStatus::Unoptimized,
            }
        }
    }

    impl MilpSolver for ScriptedSolver {
        fn optimize(
            &mut self,
            _problem: &Problem,
            progress: Option<ProgressCallback<'_>>,
        ) -> Result<(), SolverError> {
            for (step, report) in self.script.iter().enumerate() {
                if self.termination.is_requested() {
                    self.terminated_at = Some(step);
                    self.status = OptimizationStatus::Suboptimal;
                    return Ok(());
                }
                if let Some(callback) = progress {
                    callback(report);
                }
            }
            self.status = OptimizationStatus::Optimal;
            Ok(())
        }

        fn status(&self) -> OptimizationStatus {
            self.status
        }

        fn variable_value(&self, _variable: VarHandle) -> Option<f64> {
            Some(0.0)
        }

        fn objective_value(&self) -> Option<f64> {
            Some(42.0)
        }

        fn termination_request(&self) -> TerminationRequest {
            self.termination.clone()
        }
    }

    fn flat_gap_script() -> Vec<Progress> {
        (0..40)
            .map(|step| Progress {
                runtime: step as f64,
                gap: 0.25,
                feasible_solutions: 1,
            })
            .collect()
    }

    #[test]
    fn driver_requests_termination_on_stable_gap() {
        let problem = Problem::new_maximization();
        let mut solver = ScriptedSolver::new(flat_gap_script());
        let config = Configuration::default();
        let report = solve(&mut solver, &problem, &config).unwrap();
        assert_eq!(report.status, OptimizationStatus::Suboptimal);
        // Gap flat from runtime 0; the 15 s window elapses at step 16
        assert_eq!(solver.terminated_at, Some(17));
    }

    #[test]
    fn driver_lets_improving_searches_run() {
        let script = (0..40)
            .map(|step| Progress {
                runtime: step as f64,
                gap: 1.0 / (step + 1) as f64,
                feasible_solutions: 1,
            })
            .collect();
        let problem = Problem::new_maximization();
        let mut solver = ScriptedSolver::new(script);
        let report = solve(&mut solver, &problem, &Configuration::default()).unwrap();
        assert_eq!(report.status, OptimizationStatus::Optimal);
        assert_eq!(solver.terminated_at, None);
        assert_eq!(report.objective_value, 42.0);
    }

    #[test]
    fn end_to_end_small_instance() {
        let instance = Instance::parse("2 1 1 1 10\n10 10\n100 1\n0 10\n0 0 5\n").unwrap();
        let savings = SavingsMatrix::build(&instance);
        let formulation = Formulation::build(&instance, &savings).unwrap();
        let mut solver = ExhaustiveSolver::new();
        let report = solve(&mut solver, formulation.problem(), &Configuration::default()).unwrap();
        assert_eq!(report.status, OptimizationStatus::Optimal);
        assert_eq!(report.objective_value, 450.0);
        assert_eq!(report.variables, 3);
        assert_eq!(report.constraints, 3);
    }

    #[test]
    fn unknown_status_is_no_solution() {
        let problem = Problem::new_maximization();
        let mut solver = ExhaustiveSolver::new();
        solver.termination_request().request();
        let err = solve(&mut solver, &problem, &Configuration::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }
}
