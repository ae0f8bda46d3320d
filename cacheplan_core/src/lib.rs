//! Core crate of cacheplan, a content placement and request routing optimizer
//! for networks of capacity-limited caches.
//!
//! The pipeline runs strictly forward: parse an [`Instance`], derive the
//! sparse [`SavingsMatrix`](optimize::savings::SavingsMatrix), assemble the
//! placement/routing MILP with
//! [`Formulation`](optimize::formulation::Formulation), hand it to a
//! [`MilpSolver`](optimize::solvers::MilpSolver) through the driver, and
//! extract a [`PlacementSolution`](optimize::solution::PlacementSolution)
//! for serialization.

pub mod configuration;
pub mod instance;
pub mod io;
pub mod optimize;

use thiserror::Error;

pub use crate::configuration::Configuration;
pub use crate::instance::model::Instance;

use crate::optimize::driver::{self, SolveReport};
use crate::optimize::formulation::Formulation;
use crate::optimize::savings::SavingsMatrix;
use crate::optimize::solution::PlacementSolution;
use crate::optimize::solvers::MilpSolver;

/// Top level error for pipeline callers
#[derive(Error, Debug)]
pub enum PlanError {
    /// Malformed instance or submission file
    #[error(transparent)]
    Format(#[from] io::FormatError),
    /// File could not be read or written
    #[error(transparent)]
    Io(#[from] io::IoError),
    /// Formulation construction misuse
    #[error(transparent)]
    Problem(#[from] optimize::problem::ProblemError),
    /// Solving failed or produced nothing to extract
    #[error(transparent)]
    Solve(#[from] optimize::driver::SolveError),
}

/// Run the full optimization pipeline on an already-parsed instance
///
/// # Parameters
/// - `instance`: the parsed problem instance
/// - `solver`: the MILP backend to delegate to
/// - `config`: gap tolerance, wall-clock limit and stability policy
///
/// # Returns
/// The placement decisions together with the driver's [`SolveReport`]
pub fn plan<S: MilpSolver>(
    instance: &Instance,
    solver: &mut S,
    config: &Configuration,
) -> Result<(PlacementSolution, SolveReport), PlanError> {
    let savings = SavingsMatrix::build(instance);
    let formulation = Formulation::build(instance, &savings)?;
    let report = driver::solve(solver, formulation.problem(), config)?;
    let solution = PlacementSolution::extract(solver, &formulation)?;
    Ok((solution, report))
}
