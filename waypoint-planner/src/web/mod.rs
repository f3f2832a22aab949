//! Web layer for the waypoint planner.
//!
//! Provides JSON endpoints for planning routes and fitting tasks into them.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
