//! Who is travelling, between which places, with which preferences.

use super::Coordinates;

/// The traveller a route is being planned for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelerContext {
    pub traveler_id: String,
}

impl TravelerContext {
    pub fn new(traveler_id: impl Into<String>) -> Self {
        Self {
            traveler_id: traveler_id.into(),
        }
    }
}

/// A resolved origin or destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: String,
    pub coordinates: Option<Coordinates>,
}

impl Place {
    pub fn new(label: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        Self {
            label: label.into(),
            coordinates,
        }
    }

    /// Build a place from a location query.
    ///
    /// A `"lat,lon"` query carries its own coordinates; free text is kept
    /// as the label only.
    pub fn from_query(query: &str) -> Self {
        Self {
            label: query.to_string(),
            coordinates: Coordinates::parse_query(query),
        }
    }
}

/// Travel preference flags copied onto assembled routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub comfort_mode: bool,
    pub eco_mode: bool,
}
