//! The contract required of an external MILP solver, plus the in-tree
//! reference backend
//!
//! The core never solves anything itself; it hands an immutable
//! [`Problem`](crate::optimize::problem::Problem) to a [`MilpSolver`] and
//! reads status and variable values back. Cancellation is cooperative: the
//! driver clones a [`TerminationRequest`] up front and raises it from the
//! progress callback, and the solver returns its best-known solution when it
//! notices.
pub mod exhaustive;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::configuration::Configuration;
use crate::optimize::problem::Problem;
use crate::optimize::variable::VarHandle;
use crate::optimize::OptimizationStatus;

/// Solver-reported metrics passed to the progress callback
///
/// The callback may be invoked from solver-owned worker threads; it must only
/// read these metrics and (at most) raise a termination request. It must not
/// touch the formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Seconds elapsed since optimize was called
    pub runtime: f64,
    /// Relative optimality gap of the incumbent, infinite before the first
    /// feasible solution
    pub gap: f64,
    /// Number of feasible solutions found so far
    pub feasible_solutions: u64,
}

/// Progress callback signature; `Send + Sync` because the solver may call it
/// from any of its threads
pub type ProgressCallback<'a> = &'a (dyn Fn(&Progress) + Send + Sync);

/// Cloneable cooperative cancellation handle for one solver
///
/// Raising the request is advisory: the solver finishes its current unit of
/// work and returns with its best-known solution.
#[derive(Debug, Clone, Default)]
pub struct TerminationRequest(Arc<AtomicBool>);

impl TerminationRequest {
    /// Create a new, unraised request
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the solver to stop at the next opportunity
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether termination has been requested
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Capability set the core requires from a mixed-integer linear solver
pub trait MilpSolver {
    /// Apply solve parameters (gap tolerance, wall-clock limit) ahead of an
    /// optimize call; backends ignore what they cannot honor
    fn configure(&mut self, _config: &Configuration) {}

    /// Run the optimization; the single blocking call of the pipeline
    ///
    /// # Parameters
    /// - `problem`: the assembled model, exclusively owned by the caller for
    ///   the duration of the call and never mutated by the solver
    /// - `progress`: optional callback receiving solver metrics mid-search
    fn optimize(
        &mut self,
        problem: &Problem,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<(), SolverError>;

    /// Terminal status of the last optimize call
    fn status(&self) -> OptimizationStatus;

    /// Value of a variable in the best-known solution, None if no feasible
    /// solution exists
    fn variable_value(&self, variable: VarHandle) -> Option<f64>;

    /// Objective value of the best-known solution
    fn objective_value(&self) -> Option<f64>;

    /// Cancellation handle honored by the next / current optimize call
    fn termination_request(&self) -> TerminationRequest;
}

/// Errors a solver backend may raise before or during search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The backend does not support a variable type present in the problem
    #[error("solver does not support {0} variables")]
    UnsupportedVariableType(String),
    /// The backend refused the problem because of its size
    #[error("problem too large for this solver: {variables} variables (limit {limit})")]
    ProblemTooLarge {
        /// Number of variables in the rejected problem
        variables: usize,
        /// The backend's variable limit
        limit: usize,
    },
}
