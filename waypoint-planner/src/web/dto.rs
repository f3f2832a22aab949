//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Point, Preferences, Route, Segment, WaypointCandidate};
use crate::optimizer::OptimizedRoute;

/// Format for timestamps in responses.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_time(dt: &NaiveDateTime) -> String {
    dt.format(TIME_FORMAT).to_string()
}

/// Travel preference flags.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub comfort_mode: bool,

    #[serde(default)]
    pub eco_mode: bool,
}

impl From<PreferencesRequest> for Preferences {
    fn from(p: PreferencesRequest) -> Self {
        Preferences {
            comfort_mode: p.comfort_mode,
            eco_mode: p.eco_mode,
        }
    }
}

/// Request to plan a route without waypoints.
#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    /// Origin location query (free text or "lat,lon")
    pub origin: String,

    /// Destination location query
    pub destination: String,

    /// Departure time, `YYYYMMDDTHHMMSS` or ISO 8601 (defaults to now)
    pub departure: Option<String>,

    pub traveler_id: String,

    pub preferences: Option<PreferencesRequest>,

    /// Number of alternatives to ask for (defaults to 1)
    pub max_itineraries: Option<usize>,
}

/// A task that may be visited along the way.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    pub id: String,

    pub title: String,

    /// Free-text location of the task
    pub location_query: Option<String>,

    pub lat: Option<f64>,

    pub lon: Option<f64>,

    #[serde(default)]
    pub completed: bool,
}

impl TaskRequest {
    /// Convert to a waypoint candidate. Coordinates need both halves.
    pub fn to_candidate(&self) -> WaypointCandidate {
        WaypointCandidate {
            id: self.id.clone(),
            title: self.title.clone(),
            location_query: self.location_query.clone(),
            coordinates: match (self.lat, self.lon) {
                (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
                _ => None,
            },
            completed: self.completed,
        }
    }
}

/// Request to plan a route through the best task.
#[derive(Debug, Deserialize)]
pub struct OptimizeRouteRequest {
    pub origin: String,

    pub destination: String,

    pub departure: Option<String>,

    pub traveler_id: String,

    pub preferences: Option<PreferencesRequest>,

    #[serde(default)]
    pub tasks: Vec<TaskRequest>,
}

/// Coordinates in a response.
#[derive(Debug, Serialize)]
pub struct CoordinatesResult {
    pub lat: f64,
    pub lon: f64,
}

impl CoordinatesResult {
    fn from_coordinates(c: &Coordinates) -> Self {
        Self {
            lat: c.lat,
            lon: c.lon,
        }
    }
}

/// A point in a segment.
#[derive(Debug, Serialize)]
pub struct PointResult {
    pub sequence: usize,

    /// ORIGIN, DESTINATION, INTERMEDIATE_STOP, ...
    pub role: &'static str,

    pub name: String,

    pub stop_id: Option<String>,

    pub stop_area_id: Option<String>,

    pub coordinates: Option<CoordinatesResult>,

    pub arrival: Option<String>,

    pub departure: Option<String>,
}

impl PointResult {
    pub fn from_point(point: &Point) -> Self {
        Self {
            sequence: point.sequence,
            role: point.role.as_str(),
            name: point.name.clone(),
            stop_id: point.stop_id.clone(),
            stop_area_id: point.stop_area_id.clone(),
            coordinates: point
                .coordinates
                .as_ref()
                .map(CoordinatesResult::from_coordinates),
            arrival: point.arrival.as_ref().map(format_time),
            departure: point.departure.as_ref().map(format_time),
        }
    }
}

/// A segment of a route.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub sequence: usize,

    /// PUBLIC_TRANSPORT, WALKING, TRANSFER or CROW_FLY
    pub kind: &'static str,

    /// METRO, RER, BUS, WALK, ...
    pub mode: &'static str,

    pub line_code: Option<String>,
    pub line_name: Option<String>,
    pub line_color: Option<String>,
    pub network: Option<String>,

    pub departure: Option<String>,
    pub arrival: Option<String>,

    pub duration_secs: Option<i64>,

    pub distance_m: u32,

    pub air_conditioned: bool,

    pub points: Vec<PointResult>,
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            sequence: segment.sequence,
            kind: segment.kind.as_str(),
            mode: segment.mode.as_str(),
            line_code: segment.line.code.clone(),
            line_name: segment.line.name.clone(),
            line_color: segment.line.color.clone(),
            network: segment.line.network.clone(),
            departure: segment.departure.as_ref().map(format_time),
            arrival: segment.arrival.as_ref().map(format_time),
            duration_secs: segment.duration_secs,
            distance_m: segment.distance_m,
            air_conditioned: segment.air_conditioned,
            points: segment.points.iter().map(PointResult::from_point).collect(),
        }
    }
}

/// A planned route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub traveler_id: String,

    pub origin: String,

    pub destination: String,

    pub origin_coordinates: Option<CoordinatesResult>,

    pub destination_coordinates: Option<CoordinatesResult>,

    pub departure: String,

    pub arrival: String,

    pub duration_secs: i64,

    /// Number of changes between vehicles
    pub transfers: usize,

    /// Straight-line distance summed over segments
    pub distance_m: u64,

    pub comfort_mode: bool,

    pub eco_mode: bool,

    pub segments: Vec<SegmentResult>,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            traveler_id: route.traveler_id.clone(),
            origin: route.origin_label.clone(),
            destination: route.destination_label.clone(),
            origin_coordinates: route
                .origin_coordinates
                .as_ref()
                .map(CoordinatesResult::from_coordinates),
            destination_coordinates: route
                .destination_coordinates
                .as_ref()
                .map(CoordinatesResult::from_coordinates),
            departure: format_time(&route.planned_departure),
            arrival: format_time(&route.planned_arrival),
            duration_secs: route.duration_secs(),
            transfers: route.transfer_count(),
            distance_m: route.distance_m(),
            comfort_mode: route.comfort_mode,
            eco_mode: route.eco_mode,
            segments: route
                .segments
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
        }
    }
}

/// Response for plain route planning.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub routes: Vec<RouteResult>,
}

/// A task included in an optimized route.
#[derive(Debug, Serialize)]
pub struct WaypointResult {
    pub id: String,
    pub title: String,
    pub location_query: Option<String>,
}

impl WaypointResult {
    pub fn from_candidate(candidate: &WaypointCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            title: candidate.title.clone(),
            location_query: candidate.resolve_query(),
        }
    }
}

/// A route through a task.
#[derive(Debug, Serialize)]
pub struct OptimizedRouteResult {
    pub total_duration_secs: i64,

    /// Duration of the direct route
    pub base_duration_secs: i64,

    /// Extra time spent on the detour (negative if faster)
    pub detour_secs: i64,

    pub waypoints: Vec<WaypointResult>,

    pub route: RouteResult,
}

impl OptimizedRouteResult {
    pub fn from_optimized(optimized: &OptimizedRoute) -> Self {
        Self {
            total_duration_secs: optimized.total_duration_secs,
            base_duration_secs: optimized.base_duration_secs,
            detour_secs: optimized.detour_seconds(),
            waypoints: optimized
                .waypoints
                .iter()
                .map(WaypointResult::from_candidate)
                .collect(),
            route: RouteResult::from_route(&optimized.route),
        }
    }
}

/// Response for route optimization. Empty when no task fits.
#[derive(Debug, Serialize)]
pub struct OptimizeRouteResponse {
    pub routes: Vec<OptimizedRouteResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
