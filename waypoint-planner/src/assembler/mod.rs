//! Itinerary assembly: raw provider journeys to [`Route`]s.
//!
//! The assembler tolerates partially populated upstream data. Apart from
//! the up-front check that every required input is present, nothing here
//! fails: missing timestamps fall back to the clock, missing coordinates
//! give zero distances, missing names fall back to placeholders.

mod classify;
mod transfers;

pub use classify::{normalize, segment_kind, transit_mode};
pub use transfers::{is_transfer_boundary, mark_transfers};

use crate::clock::{Clock, SystemClock};
use crate::domain::{
    DomainError, Place, Point, PointRole, Preferences, Route, Segment, SegmentKind,
    TravelerContext, leg_distance_m,
};
use crate::navitia::{RawJourney, RawLeg, RawStopTime};

/// Placeholder for stops the provider didn't name.
const UNKNOWN_STOP: &str = "Unknown stop";

/// Legs shorter than this with identical endpoints collapse to one point.
const STUB_LEG_MAX_SECS: i64 = 60;

/// Inputs to [`ItineraryAssembler::assemble`].
///
/// The first four fields are required; `preferences` is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyInput<'a> {
    pub traveler: Option<&'a TravelerContext>,
    pub origin: Option<&'a Place>,
    pub destination: Option<&'a Place>,
    pub itinerary: Option<&'a RawJourney>,
    pub preferences: Option<&'a Preferences>,
}

impl<'a> AssemblyInput<'a> {
    /// Inputs with all required parts present.
    pub fn new(
        traveler: &'a TravelerContext,
        origin: &'a Place,
        destination: &'a Place,
        itinerary: &'a RawJourney,
    ) -> Self {
        Self {
            traveler: Some(traveler),
            origin: Some(origin),
            destination: Some(destination),
            itinerary: Some(itinerary),
            preferences: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Option<&'a Preferences>) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Converts raw itineraries into routes.
#[derive(Debug, Clone, Default)]
pub struct ItineraryAssembler<C = SystemClock> {
    clock: C,
}

impl<C: Clock> ItineraryAssembler<C> {
    /// Create an assembler using `clock` for missing timestamps.
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Build a route from one raw itinerary.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingInput`] if the traveler, origin,
    /// destination or itinerary is absent.
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> Result<Route, DomainError> {
        let traveler = input
            .traveler
            .ok_or(DomainError::MissingInput("traveler"))?;
        let origin = input.origin.ok_or(DomainError::MissingInput("origin"))?;
        let destination = input
            .destination
            .ok_or(DomainError::MissingInput("destination"))?;
        let itinerary = input
            .itinerary
            .ok_or(DomainError::MissingInput("itinerary"))?;

        let legs = &itinerary.sections;
        let first = legs.first();
        let last = legs.last();

        let planned_departure = itinerary
            .departure()
            .or_else(|| first.and_then(RawLeg::departure))
            .unwrap_or_else(|| self.clock.now());
        let planned_arrival = itinerary
            .arrival()
            .or_else(|| last.and_then(RawLeg::arrival))
            .unwrap_or_else(|| self.clock.now());

        let origin_coordinates = origin
            .coordinates
            .or_else(|| first.and_then(RawLeg::origin_coordinates));
        let destination_coordinates = destination
            .coordinates
            .or_else(|| last.and_then(RawLeg::destination_coordinates));

        let mut segments: Vec<Segment> = Vec::with_capacity(legs.len());
        for leg in legs.iter().filter(|leg| !leg.is_waiting()) {
            if let Some(segment) = build_segment(leg, segments.len()) {
                segments.push(segment);
            }
        }

        mark_transfers(&mut segments);

        let preferences = input.preferences.copied().unwrap_or_default();

        Ok(Route {
            traveler_id: traveler.traveler_id.clone(),
            origin_label: origin.label.clone(),
            destination_label: destination.label.clone(),
            origin_coordinates,
            destination_coordinates,
            planned_departure,
            planned_arrival,
            comfort_mode: preferences.comfort_mode,
            eco_mode: preferences.eco_mode,
            segments,
        })
    }
}

/// Build one segment, or `None` if the leg yields no points.
fn build_segment(leg: &RawLeg, sequence: usize) -> Option<Segment> {
    let kind = segment_kind(leg.section_type().as_ref());
    let mode = transit_mode(leg.commercial_mode().or(leg.section_type_label()));

    let origin_coordinates = leg.origin_coordinates();
    let destination_coordinates = leg.destination_coordinates();
    let distance_m = leg_distance_m(origin_coordinates.as_ref(), destination_coordinates.as_ref());

    let points = match leg.stop_times() {
        [] => endpoint_points(leg),
        stop_times => stop_time_points(stop_times, kind),
    };

    if points.is_empty() {
        return None;
    }

    Some(Segment {
        sequence,
        kind,
        mode,
        line: leg.line_info(),
        departure: leg.departure(),
        arrival: leg.arrival(),
        duration_secs: leg.duration,
        distance_m,
        air_conditioned: leg.air_conditioned(),
        points,
    })
}

/// One point per stop time, in order.
fn stop_time_points(stop_times: &[RawStopTime], kind: SegmentKind) -> Vec<Point> {
    let last = stop_times.len() - 1;

    stop_times
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let role = if i == 0 {
                PointRole::Origin
            } else if i == last {
                PointRole::Destination
            } else if kind.is_on_foot() {
                PointRole::WalkingWaypoint
            } else {
                PointRole::IntermediateStop
            };

            Point {
                sequence: i,
                role,
                name: stop.name().unwrap_or(UNKNOWN_STOP).to_string(),
                stop_id: stop.stop_id().map(str::to_string),
                stop_area_id: stop.stop_area_id().map(str::to_string),
                coordinates: stop.coordinates(),
                arrival: stop.arrival(),
                departure: stop.departure(),
            }
        })
        .collect()
}

/// Origin and (usually) destination points from the leg endpoints.
fn endpoint_points(leg: &RawLeg) -> Vec<Point> {
    let origin_name = leg
        .origin_label()
        .or_else(|| leg.line_name())
        .unwrap_or("Origin");
    let destination_name = leg
        .destination_label()
        .or_else(|| leg.line_name())
        .unwrap_or("Destination");

    let origin = Point {
        sequence: 0,
        role: PointRole::Origin,
        name: origin_name.to_string(),
        stop_id: leg.origin().and_then(|p| p.stop_id()).map(str::to_string),
        stop_area_id: leg
            .origin()
            .and_then(|p| p.stop_area_id())
            .map(str::to_string),
        coordinates: leg.origin_coordinates(),
        arrival: None,
        departure: leg.departure(),
    };

    let is_stub = destination_name == origin_name
        && leg.duration.is_none_or(|secs| secs < STUB_LEG_MAX_SECS);
    if is_stub {
        return vec![origin];
    }

    let destination = Point {
        sequence: 1,
        role: PointRole::Destination,
        name: destination_name.to_string(),
        stop_id: leg
            .destination()
            .and_then(|p| p.stop_id())
            .map(str::to_string),
        stop_area_id: leg
            .destination()
            .and_then(|p| p.stop_area_id())
            .map(str::to_string),
        coordinates: leg.destination_coordinates(),
        arrival: leg.arrival(),
        departure: None,
    };

    vec![origin, destination]
}
