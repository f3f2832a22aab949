//! Domain types for the waypoint planner.
//!
//! This module contains the route model produced by the itinerary
//! assembler and consumed by the optimizer, plus the small value types
//! describing travellers, places and tasks.

mod context;
mod error;
mod geo;
mod route;
mod waypoint;

pub use context::{Place, Preferences, TravelerContext};
pub use error::DomainError;
pub use geo::{Coordinates, EARTH_RADIUS_M, haversine_m, leg_distance_m};
pub use route::{LineInfo, Point, PointRole, Route, Segment, SegmentKind, TransitMode};
pub use waypoint::WaypointCandidate;
