//! Solve configuration shared by the driver, solver backends, and the CLI

/// Parameters for one solve
///
/// Passed explicitly into [`solve`](crate::optimize::driver::solve); there is
/// no global configuration state.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Relative optimality gap at which a solution counts as optimal
    pub gap_tolerance: f64,
    /// Wall-clock limit for the optimize call, in seconds
    pub time_limit: f64,
    /// How long the gap may stay flat (with a feasible solution in hand)
    /// before the driver requests termination, in seconds
    pub stability_window: f64,
    /// Smallest gap movement that counts as an improvement
    pub gap_epsilon: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            gap_tolerance: 5e-3,
            time_limit: 300.0,
            stability_window: 15.0,
            gap_epsilon: 1e-4,
        }
    }
}
