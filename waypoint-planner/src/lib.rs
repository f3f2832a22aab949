//! Waypoint route planner.
//!
//! Turns raw transit itineraries into structured routes, and answers:
//! "which of my errands can I fit into this trip, and how?"

pub mod assembler;
pub mod cache;
pub mod clock;
pub mod config;
pub mod domain;
pub mod navitia;
pub mod optimizer;
pub mod web;
