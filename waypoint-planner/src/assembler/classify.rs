//! Section and mode classification.

use crate::domain::{SegmentKind, TransitMode};
use crate::navitia::SectionType;

/// Map a raw section type to a segment kind.
///
/// Absent and unrecognized types are treated as public transport.
pub fn segment_kind(section: Option<&SectionType>) -> SegmentKind {
    match section {
        Some(SectionType::StreetNetwork | SectionType::Walking) => SegmentKind::Walking,
        Some(SectionType::Transfer) => SegmentKind::Transfer,
        Some(SectionType::CrowFly) => SegmentKind::CrowFly,
        Some(SectionType::Waiting) => SegmentKind::Waiting,
        Some(SectionType::PublicTransport | SectionType::Other(_)) | None => {
            SegmentKind::PublicTransport
        }
    }
}

/// Resolve a transport mode from a commercial mode or section type label.
///
/// The label is compared after trimming, lower-casing and stripping accents,
/// so "Métro", "METRO" and "metro" all resolve the same way.
///
/// # Examples
///
/// ```
/// use waypoint_planner::assembler::transit_mode;
/// use waypoint_planner::domain::TransitMode;
///
/// assert_eq!(transit_mode(Some("Métro")), TransitMode::Metro);
/// assert_eq!(transit_mode(Some("Noctilien")), TransitMode::Bus);
/// assert_eq!(transit_mode(Some("Funiculaire")), TransitMode::Other);
/// assert_eq!(transit_mode(None), TransitMode::Other);
/// ```
pub fn transit_mode(label: Option<&str>) -> TransitMode {
    let Some(label) = label else {
        return TransitMode::Other;
    };

    match normalize(label).as_str() {
        "metro" => TransitMode::Metro,
        "rer" => TransitMode::Rer,
        "train" | "transilien" => TransitMode::Transilien,
        "tramway" | "tram" => TransitMode::Tram,
        "bus" | "noctilien" | "coach" => TransitMode::Bus,
        "walk" | "walking" | "street_network" | "transfer" => TransitMode::Walk,
        "bike" | "cycling" => TransitMode::Bike,
        "taxi" => TransitMode::Taxi,
        _ => TransitMode::Other,
    }
}

/// Trim, lower-case and fold Latin accents to their base letters.
pub fn normalize(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.trim().to_lowercase().chars() {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
            'ç' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'ñ' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => out.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            other => out.push(other),
        }
    }
    out
}
