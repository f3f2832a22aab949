//! Stitching independently planned routes into one.

use chrono::NaiveDateTime;

use crate::domain::{DomainError, Route, Segment};

use super::search::RequestContext;

/// Concatenate `routes` into a single route.
///
/// The origin comes from the first route and the destination from the last.
/// Segments are copied in order and renumbered densely across the whole
/// result; points are renumbered within each segment. Roles, names,
/// identifiers, coordinates and timing are kept as-is.
///
/// No check is made that one route ends where the next begins.
///
/// # Errors
///
/// Returns [`DomainError::EmptyMerge`] if `routes` is empty.
pub fn merge_routes(
    context: &RequestContext,
    routes: &[Route],
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
) -> Result<Route, DomainError> {
    let (Some(first), Some(last)) = (routes.first(), routes.last()) else {
        return Err(DomainError::EmptyMerge);
    };

    let segments: Vec<Segment> = routes
        .iter()
        .flat_map(|route| route.segments.iter())
        .enumerate()
        .map(|(sequence, segment)| {
            let mut copy = segment.clone();
            copy.sequence = sequence;
            for (i, point) in copy.points.iter_mut().enumerate() {
                point.sequence = i;
            }
            copy
        })
        .collect();

    let preferences = context.preferences.unwrap_or_default();

    Ok(Route {
        traveler_id: context.traveler.traveler_id.clone(),
        origin_label: first.origin_label.clone(),
        destination_label: last.destination_label.clone(),
        origin_coordinates: first.origin_coordinates,
        destination_coordinates: last.destination_coordinates,
        planned_departure: departure,
        planned_arrival: arrival,
        comfort_mode: preferences.comfort_mode,
        eco_mode: preferences.eco_mode,
        segments,
    })
}
