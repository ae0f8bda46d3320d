//! Builds the placement/routing MILP out of an instance and its savings matrix
//!
//! Variable families:
//! - `x_{v}_{c}`: binary, 1 if video v is stored on cache c. One per
//!   (video, cache) pair.
//! - `y_{r}_{c}`: binary, 1 if request r is served from cache c. Created only
//!   for pairs with a materialized positive saving; all other pairs are
//!   implicitly zero and never become variables or constraints.
//!
//! Constraint families:
//! - `serve_{r}`: sum_c y[r,c] <= 1 (a request may go unserved)
//! - `couple_{r}_{c}`: y[r,c] - x[v(r),c] <= 0
//! - `cap_{c}`: sum_v size[v] * x[v,c] <= X

use indexmap::IndexMap;
use tracing::debug;

use crate::instance::model::Instance;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::savings::SavingsMatrix;
use crate::optimize::variable::VarHandle;

/// The placement/routing formulation, with handle maps for extraction
#[derive(Debug, Clone)]
pub struct Formulation {
    /// The assembled optimization problem
    problem: Problem,
    /// Handle of x[v,c], keyed by (video, cache)
    placement_vars: IndexMap<(usize, usize), VarHandle>,
    /// Handle of y[r,c], keyed by (request, cache); only materialized pairs
    routing_vars: IndexMap<(usize, usize), VarHandle>,
}

impl Formulation {
    /// Build the formulation in a single forward pass
    pub fn build(instance: &Instance, savings: &SavingsMatrix) -> Result<Formulation, ProblemError> {
        let mut problem = Problem::new_maximization();
        let mut placement_vars = IndexMap::new();
        let mut routing_vars = IndexMap::new();

        // Placement variables, one per (video, cache) pair
        for video in 0..instance.video_count() {
            for cache in 0..instance.cache_count {
                let handle = problem.add_new_binary_variable(&format!("x_{}_{}", video, cache))?;
                placement_vars.insert((video, cache), handle);
            }
        }

        // Routing variables and objective, only for beneficial pairs
        for request in 0..instance.request_count() {
            for entry in savings.for_request(request) {
                let handle =
                    problem.add_new_binary_variable(&format!("y_{}_{}", request, entry.cache))?;
                routing_vars.insert((request, entry.cache), handle);
                problem.add_linear_objective_term(handle, entry.saving as f64)?;
            }
        }

        // serve_{r}: each request served by at most one cache
        for request in 0..instance.request_count() {
            let handles: Vec<VarHandle> = savings
                .for_request(request)
                .iter()
                .map(|entry| routing_vars[&(request, entry.cache)])
                .collect();
            if handles.is_empty() {
                continue;
            }
            let coefficients = vec![1.0; handles.len()];
            problem.add_new_upper_bounded_constraint(
                &format!("serve_{}", request),
                &handles,
                &coefficients,
                1.0,
            )?;
        }

        // couple_{r}_{c}: route only to a cache that stores the video
        for (&(request, cache), &routing) in &routing_vars {
            let video = instance.requests[request].video;
            let placement = placement_vars[&(video, cache)];
            problem.add_new_upper_bounded_constraint(
                &format!("couple_{}_{}", request, cache),
                &[routing, placement],
                &[1.0, -1.0],
                0.0,
            )?;
        }

        // cap_{c}: per-cache capacity
        for cache in 0..instance.cache_count {
            let handles: Vec<VarHandle> = (0..instance.video_count())
                .map(|video| placement_vars[&(video, cache)])
                .collect();
            let sizes: Vec<f64> = (0..instance.video_count())
                .map(|video| instance.video_size(video) as f64)
                .collect();
            problem.add_new_upper_bounded_constraint(
                &format!("cap_{}", cache),
                &handles,
                &sizes,
                instance.cache_capacity as f64,
            )?;
        }

        debug!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            routing_pairs = routing_vars.len(),
            "formulation assembled"
        );

        Ok(Formulation {
            problem,
            placement_vars,
            routing_vars,
        })
    }

    /// The assembled problem
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Handle of the placement variable x[video, cache]
    pub fn placement_var(&self, video: usize, cache: usize) -> Option<VarHandle> {
        self.placement_vars.get(&(video, cache)).copied()
    }

    /// Handle of the routing variable y[request, cache], None for
    /// non-materialized pairs
    pub fn routing_var(&self, request: usize, cache: usize) -> Option<VarHandle> {
        self.routing_vars.get(&(request, cache)).copied()
    }

    /// Iterate over all placement variables as (video, cache, handle)
    pub fn placement_vars(&self) -> impl Iterator<Item = (usize, usize, VarHandle)> + '_ {
        self.placement_vars
            .iter()
            .map(|(&(video, cache), &handle)| (video, cache, handle))
    }

    /// Iterate over all materialized routing variables as (request, cache, handle)
    pub fn routing_vars(&self) -> impl Iterator<Item = (usize, usize, VarHandle)> + '_ {
        self.routing_vars
            .iter()
            .map(|(&(request, cache), &handle)| (request, cache, handle))
    }
}
