//! Navitia journeys provider.
//!
//! This module provides an HTTP client for the Navitia `/journeys` API,
//! which plans multi-modal public transport itineraries, plus a
//! fixture-backed mock for running without credentials.
//!
//! Key characteristics of Navitia journeys:
//! - A journey is an ordered list of sections (public transport, street
//!   network, transfer, waiting, crow fly)
//! - Datetimes use the compact `YYYYMMDDTHHMMSS` form, local to the coverage
//! - "No route" is reported as an error object, usually with HTTP 404

mod client;
mod error;
mod mock;
mod types;

pub use client::{NavitiaClient, NavitiaConfig};
pub use error::ProviderError;
pub use mock::MockNavitiaClient;
pub use types::{
    ApiErrorBody, DisplayInformations, JourneysResponse, NAVITIA_DATETIME_FORMAT, RawAddress,
    RawCoord, RawJourney, RawLeg, RawPlace, RawStopArea, RawStopPoint, RawStopTime, SectionType,
    format_datetime, parse_datetime,
};
