//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedPlanner;
use crate::clock::Clock;
use crate::optimizer::OptimizerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached route planner
    pub planner: Arc<CachedPlanner>,

    /// Waypoint optimizer configuration
    pub config: Arc<OptimizerConfig>,

    /// Source of "now" for requests without a departure time
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new app state sharing the planner's clock.
    pub fn new(planner: CachedPlanner, config: OptimizerConfig) -> Self {
        Self {
            clock: planner.clock(),
            planner: Arc::new(planner),
            config: Arc::new(config),
        }
    }
}
