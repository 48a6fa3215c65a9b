use serde::Serialize;

use super::{check_latitude, check_longitude};
use crate::error::{GpxError, Result};

/// Geographic extent of a document, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    minlat: f64,
    minlon: f64,
    maxlat: f64,
    maxlon: f64,
}

impl Bounds {
    /// Fails with `OutOfRange` when a corner is off the globe or min exceeds max.
    pub fn new(minlat: f64, minlon: f64, maxlat: f64, maxlon: f64) -> Result<Self> {
        check_latitude(minlat)?;
        check_latitude(maxlat)?;
        check_longitude(minlon)?;
        check_longitude(maxlon)?;
        if minlat > maxlat {
            return Err(GpxError::out_of_range("minlat", minlat, "<= maxlat"));
        }
        if minlon > maxlon {
            return Err(GpxError::out_of_range("minlon", minlon, "<= maxlon"));
        }
        Ok(Self {
            minlat,
            minlon,
            maxlat,
            maxlon,
        })
    }

    pub fn minlat(&self) -> f64 {
        self.minlat
    }

    pub fn minlon(&self) -> f64 {
        self.minlon
    }

    pub fn maxlat(&self) -> f64 {
        self.maxlat
    }

    pub fn maxlon(&self) -> f64 {
        self.maxlon
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.minlat..=self.maxlat).contains(&lat) && (self.minlon..=self.maxlon).contains(&lon)
    }

    /// GeoJSON bbox order: `[west, south, east, north]`.
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.minlon, self.minlat, self.maxlon, self.maxlat]
    }
}
