//! Waypoint route optimizer.
//!
//! Given an origin -> destination request and a set of errand locations,
//! this module answers: "which errand can I fit in with the least extra
//! travel, and what are my options for getting there?"
//!
//! Every candidate is evaluated by planning two legs through the route
//! provider and merging them. Candidates that fail to plan are dropped,
//! never escalated.

mod config;
mod merge;
mod rank;
mod search;

pub use config::OptimizerConfig;
pub use merge::merge_routes;
pub use rank::{rank_by_duration, select_best};
pub use search::{
    Evaluation, ItineraryProvider, LegQuery, OptimizeError, OptimizedRoute, Optimizer,
    PlanRequest, RequestContext,
};

#[cfg(test)]
mod search_tests;
