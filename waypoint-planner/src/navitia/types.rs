//! Navitia journeys API response DTOs.
//!
//! These types map onto the `/journeys` JSON payload. Upstream data is
//! messy: fields are omitted, coordinates arrive as strings, names are
//! blank. Everything is `Option` and the accessor methods normalize
//! "blank" and "unparseable" to `None` so the assembler only has to deal
//! with absence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::domain::{Coordinates, LineInfo};

/// Navitia's compact datetime format, e.g. `20240315T101500`.
pub const NAVITIA_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Equipment code signalling air-conditioned rolling stock.
const AIR_CONDITIONED_EQUIPMENT: &str = "has_air_conditioned";

/// Parse a Navitia datetime, accepting the compact and ISO forms.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, NAVITIA_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Format a datetime for a Navitia query parameter.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(NAVITIA_DATETIME_FORMAT).to_string()
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accept a number, a numeric string, or anything else as absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
        Other(serde_json::Value),
    }

    let value = match Option::<NumOrStr>::deserialize(deserializer)? {
        Some(NumOrStr::Num(v)) => Some(v),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        Some(NumOrStr::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Top-level `/journeys` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneysResponse {
    #[serde(default)]
    pub journeys: Vec<RawJourney>,

    /// Present when Navitia couldn't answer (e.g. no solution).
    pub error: Option<ApiErrorBody>,
}

impl JourneysResponse {
    /// True when the provider reports that no itinerary exists.
    pub fn is_no_solution(&self) -> bool {
        self.error.as_ref().is_some_and(|e| {
            matches!(
                e.id.as_deref(),
                Some("no_solution" | "date_out_of_bounds" | "no_origin_nor_destination")
            )
        })
    }
}

/// Navitia error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub id: Option<String>,
    pub message: Option<String>,
}

/// One itinerary: an ordered list of sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJourney {
    pub departure_date_time: Option<String>,
    pub arrival_date_time: Option<String>,
    #[serde(default)]
    pub sections: Vec<RawLeg>,
}

impl RawJourney {
    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.departure_date_time.as_deref().and_then(parse_datetime)
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.arrival_date_time.as_deref().and_then(parse_datetime)
    }
}

/// Section type as sent by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionType {
    PublicTransport,
    StreetNetwork,
    Walking,
    Transfer,
    Waiting,
    CrowFly,
    Other(String),
}

impl SectionType {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "public_transport" => SectionType::PublicTransport,
            "street_network" => SectionType::StreetNetwork,
            "walking" => SectionType::Walking,
            "transfer" => SectionType::Transfer,
            "waiting" => SectionType::Waiting,
            "crow_fly" => SectionType::CrowFly,
            other => SectionType::Other(other.to_string()),
        }
    }
}

/// One section ("leg") of an itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeg {
    #[serde(rename = "type")]
    pub section_type: Option<String>,

    /// Street network mode (walking, bike, ...). Informational only.
    pub mode: Option<String>,

    pub departure_date_time: Option<String>,
    pub arrival_date_time: Option<String>,

    /// Duration in seconds.
    pub duration: Option<i64>,

    pub from: Option<RawPlace>,
    pub to: Option<RawPlace>,

    pub display_informations: Option<DisplayInformations>,

    pub stop_date_times: Option<Vec<RawStopTime>>,

    /// Explicit flag; some feeds send this instead of an equipment code.
    pub air_conditioned: Option<bool>,
}

impl RawLeg {
    /// Parsed section type, `None` if the provider omitted it.
    pub fn section_type(&self) -> Option<SectionType> {
        non_blank(&self.section_type).map(SectionType::parse)
    }

    /// The raw section type string, trimmed, if not blank.
    pub fn section_type_label(&self) -> Option<&str> {
        non_blank(&self.section_type)
    }

    pub fn is_waiting(&self) -> bool {
        self.section_type() == Some(SectionType::Waiting)
    }

    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.departure_date_time.as_deref().and_then(parse_datetime)
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.arrival_date_time.as_deref().and_then(parse_datetime)
    }

    pub fn commercial_mode(&self) -> Option<&str> {
        self.display_informations
            .as_ref()
            .and_then(|d| non_blank(&d.commercial_mode))
    }

    pub fn line_name(&self) -> Option<&str> {
        self.display_informations
            .as_ref()
            .and_then(|d| non_blank(&d.name))
    }

    pub fn line_info(&self) -> LineInfo {
        match &self.display_informations {
            Some(d) => LineInfo {
                code: non_blank(&d.code).map(str::to_string),
                name: non_blank(&d.name).map(str::to_string),
                color: non_blank(&d.color).map(str::to_string),
                network: non_blank(&d.network).map(str::to_string),
            },
            None => LineInfo::default(),
        }
    }

    pub fn origin(&self) -> Option<&RawPlace> {
        self.from.as_ref()
    }

    pub fn destination(&self) -> Option<&RawPlace> {
        self.to.as_ref()
    }

    pub fn origin_label(&self) -> Option<&str> {
        self.from.as_ref().and_then(RawPlace::label)
    }

    pub fn destination_label(&self) -> Option<&str> {
        self.to.as_ref().and_then(RawPlace::label)
    }

    pub fn origin_coordinates(&self) -> Option<Coordinates> {
        self.from.as_ref().and_then(RawPlace::coordinates)
    }

    pub fn destination_coordinates(&self) -> Option<Coordinates> {
        self.to.as_ref().and_then(RawPlace::coordinates)
    }

    /// Stop times, empty if the provider sent none.
    pub fn stop_times(&self) -> &[RawStopTime] {
        self.stop_date_times.as_deref().unwrap_or(&[])
    }

    pub fn air_conditioned(&self) -> bool {
        self.air_conditioned.unwrap_or(false)
            || self.display_informations.as_ref().is_some_and(|d| {
                d.equipments
                    .iter()
                    .any(|e| e == AIR_CONDITIONED_EQUIPMENT)
            })
    }
}

/// Line display information for a public transport section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayInformations {
    pub commercial_mode: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub network: Option<String>,
    pub direction: Option<String>,
    #[serde(default)]
    pub equipments: Vec<String>,
}

/// A place reference (`from`/`to` of a section).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    pub id: Option<String>,
    pub name: Option<String>,
    pub embedded_type: Option<String>,
    pub stop_point: Option<RawStopPoint>,
    pub address: Option<RawAddress>,
    pub coord: Option<RawCoord>,
}

impl RawPlace {
    pub fn label(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    /// Coordinates from the embedded stop point, address, or the place itself.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.stop_point
            .as_ref()
            .and_then(|sp| sp.coord.as_ref())
            .and_then(RawCoord::to_coordinates)
            .or_else(|| {
                self.address
                    .as_ref()
                    .and_then(|a| a.coord.as_ref())
                    .and_then(RawCoord::to_coordinates)
            })
            .or_else(|| self.coord.as_ref().and_then(RawCoord::to_coordinates))
    }

    pub fn stop_id(&self) -> Option<&str> {
        self.stop_point.as_ref().and_then(|sp| non_blank(&sp.id))
    }

    pub fn stop_area_id(&self) -> Option<&str> {
        self.stop_point.as_ref().and_then(RawStopPoint::stop_area_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStopPoint {
    pub id: Option<String>,
    pub name: Option<String>,
    pub coord: Option<RawCoord>,
    pub stop_area: Option<RawStopArea>,
}

impl RawStopPoint {
    pub fn stop_area_id(&self) -> Option<&str> {
        self.stop_area.as_ref().and_then(|sa| non_blank(&sa.id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStopArea {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAddress {
    pub id: Option<String>,
    pub name: Option<String>,
    pub coord: Option<RawCoord>,
}

/// Coordinates as sent upstream: numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
}

impl RawCoord {
    pub fn to_coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lon?))
    }
}

/// Timing at one stop of a public transport section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStopTime {
    pub stop_point: Option<RawStopPoint>,
    pub arrival_date_time: Option<String>,
    pub departure_date_time: Option<String>,
}

impl RawStopTime {
    pub fn stop_id(&self) -> Option<&str> {
        self.stop_point.as_ref().and_then(|sp| non_blank(&sp.id))
    }

    pub fn stop_area_id(&self) -> Option<&str> {
        self.stop_point.as_ref().and_then(RawStopPoint::stop_area_id)
    }

    pub fn name(&self) -> Option<&str> {
        self.stop_point.as_ref().and_then(|sp| non_blank(&sp.name))
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.stop_point
            .as_ref()
            .and_then(|sp| sp.coord.as_ref())
            .and_then(RawCoord::to_coordinates)
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.arrival_date_time.as_deref().and_then(parse_datetime)
    }

    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.departure_date_time.as_deref().and_then(parse_datetime)
    }
}
