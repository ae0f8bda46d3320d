//! Module for constructing and solving the placement optimization problem

pub mod constraint;
pub mod driver;
pub mod formulation;
pub mod objective;
pub mod problem;
pub mod savings;
pub mod solution;
pub mod solvers;
pub mod variable;

use serde::Serialize;

/// Terminal status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OptimizationStatus {
    /// Problem has not yet attempted to be optimized
    Unoptimized,
    /// The returned solution is optimal (within the configured gap tolerance)
    Optimal,
    /// Search stopped early (time limit or termination request); the returned
    /// solution is the best known but not proven optimal
    Suboptimal,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// Search ended without ever finding a feasible solution
    Unknown,
}
