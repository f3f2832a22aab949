//! Route aggregate: a route owns its segments, a segment owns its points.
//!
//! Routes are built by the itinerary assembler or by merging other routes.
//! Nothing is shared between routes; cloning a `Route` is a deep copy.

use std::fmt;

use chrono::NaiveDateTime;

use super::Coordinates;

/// Navigational kind of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    PublicTransport,
    Walking,
    Transfer,
    /// Never present in an assembled route; waiting legs are dropped.
    Waiting,
    CrowFly,
}

impl SegmentKind {
    /// True for the kinds that imply a change of vehicle on foot.
    pub fn is_on_foot(self) -> bool {
        matches!(self, SegmentKind::Walking | SegmentKind::Transfer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::PublicTransport => "PUBLIC_TRANSPORT",
            SegmentKind::Walking => "WALKING",
            SegmentKind::Transfer => "TRANSFER",
            SegmentKind::Waiting => "WAITING",
            SegmentKind::CrowFly => "CROW_FLY",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved transport mode of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitMode {
    Metro,
    Rer,
    Transilien,
    Tram,
    Bus,
    Walk,
    Bike,
    Taxi,
    Other,
}

impl TransitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitMode::Metro => "METRO",
            TransitMode::Rer => "RER",
            TransitMode::Transilien => "TRANSILIEN",
            TransitMode::Tram => "TRAM",
            TransitMode::Bus => "BUS",
            TransitMode::Walk => "WALK",
            TransitMode::Bike => "BIKE",
            TransitMode::Taxi => "TAXI",
            TransitMode::Other => "OTHER",
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a point within its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRole {
    Origin,
    Destination,
    IntermediateStop,
    WalkingWaypoint,
    TransferArrival,
    TransferDeparture,
}

impl PointRole {
    pub fn as_str(self) -> &'static str {
        match self {
            PointRole::Origin => "ORIGIN",
            PointRole::Destination => "DESTINATION",
            PointRole::IntermediateStop => "INTERMEDIATE_STOP",
            PointRole::WalkingWaypoint => "WALKING_WAYPOINT",
            PointRole::TransferArrival => "TRANSFER_ARRIVAL",
            PointRole::TransferDeparture => "TRANSFER_DEPARTURE",
        }
    }
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line identity as displayed to travellers (e.g. "M1", yellow, RATP).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInfo {
    pub code: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub network: Option<String>,
}

/// A stop or waypoint within a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Zero-based position within the owning segment.
    pub sequence: usize,
    pub role: PointRole,
    pub name: String,
    pub stop_id: Option<String>,
    pub stop_area_id: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub arrival: Option<NaiveDateTime>,
    pub departure: Option<NaiveDateTime>,
}

impl Point {
    /// Create a point with no identifiers, location or timing.
    pub fn new(sequence: usize, role: PointRole, name: impl Into<String>) -> Self {
        Self {
            sequence,
            role,
            name: name.into(),
            stop_id: None,
            stop_area_id: None,
            coordinates: None,
            arrival: None,
            departure: None,
        }
    }
}

/// One classified, surviving leg of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Zero-based position within the owning route.
    pub sequence: usize,
    pub kind: SegmentKind,
    pub mode: TransitMode,
    pub line: LineInfo,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub duration_secs: Option<i64>,
    /// Straight-line distance between the leg endpoints, 0 if unknown.
    pub distance_m: u32,
    pub air_conditioned: bool,
    pub points: Vec<Point>,
}

/// A planned journey from an origin to a destination.
///
/// # Invariants
///
/// For routes produced by the assembler or by
/// [`merge_routes`](crate::optimizer::merge_routes):
///
/// - Segment sequences are `0..n` in order, point sequences `0..m` per segment
/// - Every segment has at least one point
/// - No segment is [`SegmentKind::Waiting`]
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub traveler_id: String,
    pub origin_label: String,
    pub destination_label: String,
    pub origin_coordinates: Option<Coordinates>,
    pub destination_coordinates: Option<Coordinates>,
    pub planned_departure: NaiveDateTime,
    pub planned_arrival: NaiveDateTime,
    pub comfort_mode: bool,
    pub eco_mode: bool,
    pub segments: Vec<Segment>,
}

impl Route {
    /// Planned travel time in seconds, never negative.
    pub fn duration_secs(&self) -> i64 {
        self.planned_arrival
            .signed_duration_since(self.planned_departure)
            .num_seconds()
            .max(0)
    }

    /// Total number of points across all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }

    /// Number of changes between public transport vehicles.
    pub fn transfer_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::PublicTransport)
            .count()
            .saturating_sub(1)
    }

    /// Sum of segment distances in metres.
    pub fn distance_m(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.distance_m)).sum()
    }
}
