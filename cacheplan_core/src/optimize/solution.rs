//! Extraction of the placement decisions out of a solved model

use std::collections::{BTreeMap, BTreeSet};

use crate::optimize::driver::SolveError;
use crate::optimize::formulation::Formulation;
use crate::optimize::solvers::MilpSolver;
use crate::optimize::OptimizationStatus;

/// Threshold above which a binary variable counts as set, tolerating solver
/// floating-point slack
const PLACEMENT_THRESHOLD: f64 = 0.5;

/// Which videos each cache stores, derived from a solved formulation
///
/// Ordered maps keep the serialization stable (ascending cache ids, ascending
/// video ids). Derived, not stored; discarded once serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementSolution {
    caches: BTreeMap<usize, BTreeSet<usize>>,
}

impl PlacementSolution {
    /// Read the placement variables back from the solver
    ///
    /// Fails with [`SolveError`] when the solver is in a state with nothing
    /// to extract (infeasible, or no feasible solution found).
    pub fn extract<S: MilpSolver>(
        solver: &S,
        formulation: &Formulation,
    ) -> Result<PlacementSolution, SolveError> {
        match solver.status() {
            OptimizationStatus::Infeasible => return Err(SolveError::Infeasible),
            OptimizationStatus::Unknown | OptimizationStatus::Unoptimized => {
                return Err(SolveError::NoSolution)
            }
            OptimizationStatus::Optimal | OptimizationStatus::Suboptimal => {}
        }
        let mut solution = PlacementSolution::default();
        for (video, cache, handle) in formulation.placement_vars() {
            if solver.variable_value(handle).unwrap_or(0.0) > PLACEMENT_THRESHOLD {
                solution.place(cache, video);
            }
        }
        Ok(solution)
    }

    /// Record that `video` is stored on `cache`
    pub fn place(&mut self, cache: usize, video: usize) {
        self.caches.entry(cache).or_default().insert(video);
    }

    /// Number of caches storing at least one video
    pub fn cache_count(&self) -> usize {
        self.caches.len()
    }

    /// Whether nothing is placed anywhere
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// The videos stored on one cache, if any
    pub fn videos_on(&self, cache: usize) -> Option<&BTreeSet<usize>> {
        self.caches.get(&cache)
    }

    /// Iterate over caches with their video sets, ascending by cache id
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> {
        self.caches.iter().map(|(&cache, videos)| (cache, videos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use crate::instance::model::Instance;
    use crate::optimize::driver::solve;
    use crate::optimize::savings::SavingsMatrix;
    use crate::optimize::solvers::exhaustive::ExhaustiveSolver;

    fn solve_instance(input: &str) -> (PlacementSolution, f64) {
        let instance = Instance::parse(input).unwrap();
        let savings = SavingsMatrix::build(&instance);
        let formulation = Formulation::build(&instance, &savings).unwrap();
        let mut solver = ExhaustiveSolver::new();
        let report = solve(&mut solver, formulation.problem(), &Configuration::default()).unwrap();
        let solution = PlacementSolution::extract(&solver, &formulation).unwrap();
        (solution, report.objective_value)
    }

    #[test]
    fn places_the_requested_video() {
        let (solution, objective) = solve_instance("2 1 1 1 10\n10 10\n100 1\n0 10\n0 0 5\n");
        assert_eq!(objective, 450.0);
        assert_eq!(solution.cache_count(), 1);
        assert_eq!(
            solution.videos_on(0),
            Some(&BTreeSet::from([0]))
        );
    }

    #[test]
    fn oversized_videos_leave_caches_empty() {
        // Capacity 5, every video larger: nothing can be placed, objective 0
        let (solution, objective) = solve_instance("2 1 1 1 5\n10 10\n100 1\n0 10\n0 0 5\n");
        assert_eq!(objective, 0.0);
        assert!(solution.is_empty());
    }

    #[test]
    fn extraction_requires_a_solved_model() {
        let instance = Instance::parse("2 1 1 1 10\n10 10\n100 1\n0 10\n0 0 5\n").unwrap();
        let savings = SavingsMatrix::build(&instance);
        let formulation = Formulation::build(&instance, &savings).unwrap();
        let solver = ExhaustiveSolver::new();
        let err = PlacementSolution::extract(&solver, &formulation).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }

    #[test]
    fn capacity_and_coupling_invariants_hold() {
        // Two caches of capacity 30, three videos, several competing requests
        let input = "3 2 4 2 30\n20 20 20\n\
                     1000 2\n0 100\n1 300\n\
                     800 1\n1 50\n\
                     0 0 100\n1 0 80\n2 1 60\n0 1 40\n";
        let instance = Instance::parse(input).unwrap();
        let savings = SavingsMatrix::build(&instance);
        let formulation = Formulation::build(&instance, &savings).unwrap();
        let mut solver = ExhaustiveSolver::new();
        let report = solve(&mut solver, formulation.problem(), &Configuration::default()).unwrap();
        let solution = PlacementSolution::extract(&solver, &formulation).unwrap();

        // Capacity invariant
        for (cache, videos) in solution.iter() {
            let used: u64 = videos.iter().map(|&v| instance.video_size(v)).sum();
            assert!(used <= instance.cache_capacity, "cache {} over capacity", cache);
        }

        // Coupling and single-serve invariants, and objective recomputation
        let mut recomputed = 0.0;
        for request in 0..instance.request_count() {
            let mut served_by = 0;
            for entry in savings.for_request(request) {
                let handle = formulation.routing_var(request, entry.cache).unwrap();
                if solver.variable_value(handle).unwrap() > 0.5 {
                    served_by += 1;
                    let video = instance.requests[request].video;
                    assert!(
                        solution
                            .videos_on(entry.cache)
                            .is_some_and(|videos| videos.contains(&video)),
                        "request {} routed to cache {} which does not store video {}",
                        request,
                        entry.cache,
                        video
                    );
                    assert!(instance.endpoints[instance.requests[request].endpoint]
                        .is_connected(entry.cache));
                    recomputed += entry.saving as f64;
                }
            }
            assert!(served_by <= 1, "request {} served more than once", request);
        }
        assert_eq!(recomputed, report.objective_value);
    }
}
