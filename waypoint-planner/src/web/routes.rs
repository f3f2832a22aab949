//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::domain::{TravelerContext, WaypointCandidate};
use crate::navitia::parse_datetime;
use crate::optimizer::{
    ItineraryProvider, LegQuery, OptimizeError, Optimizer, PlanRequest, RequestContext,
};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/itinerary/plan", post(plan_route))
        .route("/itinerary/optimize", post(optimize_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Resolve the departure time, defaulting to now.
fn resolve_departure(state: &AppState, raw: Option<&str>) -> Result<NaiveDateTime, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_datetime(s).ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid departure time: {s}"),
        }),
        None => Ok(state.clock.now()),
    }
}

fn plan_request(
    state: &AppState,
    origin: String,
    destination: String,
    departure_raw: Option<&str>,
    traveler_id: String,
    preferences: Option<PreferencesRequest>,
) -> Result<PlanRequest, AppError> {
    let mut context = RequestContext::new(TravelerContext::new(traveler_id));
    if let Some(prefs) = preferences {
        context = context.with_preferences(prefs.into());
    }

    let departure = resolve_departure(state, departure_raw)?;
    let request = PlanRequest::new(origin, destination, departure, context);
    request.validate()?;
    Ok(request)
}

/// Plan a route without waypoints.
async fn plan_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: PlanRouteRequest = parse_body(&body)?;
    let max_itineraries = req
        .max_itineraries
        .unwrap_or(1)
        .clamp(1, state.config.max_alternatives.max(1));

    let request = plan_request(
        &state,
        req.origin,
        req.destination,
        req.departure.as_deref(),
        req.traveler_id,
        req.preferences,
    )?;

    let query = LegQuery {
        from: &request.origin_query,
        to: &request.destination_query,
        departure: request.departure,
        max_itineraries,
        context: &request.context,
    };
    let routes = state.planner.plan_itinerary(&query).await?;

    Ok(Json(PlanRouteResponse {
        routes: routes.iter().map(RouteResult::from_route).collect(),
    })
    .into_response())
}

/// Plan a route through the best task.
async fn optimize_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: OptimizeRouteRequest = parse_body(&body)?;
    let candidates: Vec<WaypointCandidate> =
        req.tasks.iter().map(TaskRequest::to_candidate).collect();

    let request = plan_request(
        &state,
        req.origin,
        req.destination,
        req.departure.as_deref(),
        req.traveler_id,
        req.preferences,
    )?;

    let optimizer = Optimizer::new(state.planner.as_ref(), state.config.as_ref());
    let results = optimizer
        .plan_with_best_waypoint(&request, &candidates)
        .await?;

    info!(
        tasks = candidates.len(),
        routes = results.len(),
        "optimized route"
    );

    Ok(Json(OptimizeRouteResponse {
        routes: results
            .iter()
            .map(OptimizedRouteResult::from_optimized)
            .collect(),
    })
    .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
}

impl From<OptimizeError> for AppError {
    fn from(e: OptimizeError) -> Self {
        match e {
            OptimizeError::InvalidRequest(message) => AppError::BadRequest { message },
            OptimizeError::Domain(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            OptimizeError::Planning { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
