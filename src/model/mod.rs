//! In-memory GPX 1.1 document model.
//!
//! Ownership is a strict tree rooted at [`Gpx`]. Every invariant is checked
//! when a value is constructed or assigned, so a value of any of these types
//! is always well formed. Collections are append-only.

mod bounds;
mod copyright;
mod document;
mod link;
mod metadata;
mod person;
mod route;
mod track;
mod waypoint;

pub use bounds::Bounds;
pub use copyright::Copyright;
pub use document::Gpx;
pub use link::Link;
pub use metadata::Metadata;
pub use person::{Email, Person};
pub use route::Route;
pub use track::{Track, TrackSegment};
pub use waypoint::{Fix, Waypoint};

use url::Url;

use crate::error::{GpxError, Result};

pub(crate) fn check_latitude(lat: f64) -> Result<f64> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(lat)
    } else {
        Err(GpxError::out_of_range("lat", lat, "[-90, 90]"))
    }
}

pub(crate) fn check_longitude(lon: f64) -> Result<f64> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(lon)
    } else {
        Err(GpxError::out_of_range("lon", lon, "[-180, 180]"))
    }
}

/// Resolves relative references; only the error matters, the result is dropped.
const REFERENCE_BASE: &str = "http://gpx.invalid/";

/// Characters that RFC 3986 never allows unencoded in a URI reference.
const FORBIDDEN_IN_URI: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

/// Check an `xsd:anyURI` value. Absolute URIs and relative references are
/// both accepted and kept as written (trimmed).
pub(crate) fn parse_uri(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let invalid = |reason: String| GpxError::InvalidUri {
        value: value.to_string(),
        reason,
    };

    if let Some(c) = trimmed
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_IN_URI.contains(c))
    {
        return Err(invalid(format!("character {c:?} is not allowed")));
    }

    let base = Url::parse(REFERENCE_BASE).map_err(|e| invalid(e.to_string()))?;
    Url::options()
        .base_url(Some(&base))
        .parse(trimmed)
        .map_err(|e| invalid(e.to_string()))?;
    Ok(trimmed.to_string())
}
