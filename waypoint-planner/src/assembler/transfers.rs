//! Transfer marking between adjacent segments.

use crate::domain::{PointRole, Segment, SegmentKind};

/// True when the boundary between `current` and `next` is a change.
pub fn is_transfer_boundary(current: SegmentKind, next: SegmentKind) -> bool {
    current.is_on_foot()
        || next.is_on_foot()
        || (current == SegmentKind::PublicTransport && next == SegmentKind::PublicTransport)
}

/// Relabel boundary points between adjacent segments.
///
/// For each qualifying pair, the last point of the earlier segment becomes
/// [`PointRole::TransferArrival`] and the first point of the later segment
/// becomes [`PointRole::TransferDeparture`], overwriting ORIGIN/DESTINATION.
/// Pairs are processed in order, so a single-point segment sitting between
/// two qualifying boundaries ends up as a transfer arrival.
///
/// Operates on freshly assembled segments that nothing else references yet.
pub fn mark_transfers(segments: &mut [Segment]) {
    if segments.len() < 2 {
        return;
    }

    for i in 0..segments.len() - 1 {
        if !is_transfer_boundary(segments[i].kind, segments[i + 1].kind) {
            continue;
        }

        if let Some(point) = segments[i].points.last_mut() {
            point.role = PointRole::TransferArrival;
        }
        if let Some(point) = segments[i + 1].points.first_mut() {
            point.role = PointRole::TransferDeparture;
        }
    }
}
