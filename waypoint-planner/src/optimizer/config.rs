//! Tuning knobs for the waypoint optimizer.

/// Configuration parameters for waypoint optimization.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Maximum number of alternatives returned for the winning waypoint.
    /// Also the number of first-leg itineraries requested from the provider.
    pub max_alternatives: usize,

    /// Maximum number of planning calls in flight at once.
    /// Keep this at or below the provider's concurrency limit.
    pub max_concurrent_plans: usize,
}

impl OptimizerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_alternatives: usize, max_concurrent_plans: usize) -> Self {
        Self {
            max_alternatives,
            max_concurrent_plans,
        }
    }

    pub fn with_max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }

    pub fn with_max_concurrent_plans(mut self, n: usize) -> Self {
        self.max_concurrent_plans = n;
        self
    }

    /// Concurrency for buffered planning streams, at least 1.
    pub(crate) fn concurrency(&self) -> usize {
        self.max_concurrent_plans.max(1)
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_alternatives: 5,
            max_concurrent_plans: 4,
        }
    }
}
