use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Link, check_latitude, check_longitude};
use crate::error::{GpxError, Result};

const MAX_DGPSID: i32 = 1023;

/// GPS fix quality at the time a point was recorded (`fixType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fix {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "dgps")]
    Dgps,
    #[serde(rename = "pps")]
    Pps,
}

impl Fix {
    /// Wire value, exactly as the GPX schema spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fix::None => "none",
            Fix::TwoD => "2d",
            Fix::ThreeD => "3d",
            Fix::Dgps => "dgps",
            Fix::Pps => "pps",
        }
    }
}

impl FromStr for Fix {
    type Err = GpxError;

    // Case-sensitive, matching the schema enumeration.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Fix::None),
            "2d" => Ok(Fix::TwoD),
            "3d" => Ok(Fix::ThreeD),
            "dgps" => Ok(Fix::Dgps),
            "pps" => Ok(Fix::Pps),
            other => Err(GpxError::InvalidFixType(other.to_string())),
        }
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single geodetic point (used for wpt, rtept, trkpt).
///
/// Only the position is required. Every other field starts absent, which is
/// distinct from zero: `ele == None` means "no elevation", not sea level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    lat: f64,
    lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    magvar: Option<f64>,
    pub geoidheight: Option<f64>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    links: Vec<Link>,
    pub sym: Option<String>,
    #[serde(rename = "type")]
    pub point_type: Option<String>,
    fix: Option<Fix>,
    pub sat: Option<u32>,
    hdop: Option<f64>,
    vdop: Option<f64>,
    pdop: Option<f64>,
    ageofdgpsdata: Option<f64>,
    dgpsid: Option<u16>,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        Ok(Self {
            lat: check_latitude(lat)?,
            lon: check_longitude(lon)?,
            ele: None,
            time: None,
            magvar: None,
            geoidheight: None,
            name: None,
            cmt: None,
            desc: None,
            src: None,
            links: Vec::new(),
            sym: None,
            point_type: None,
            fix: None,
            sat: None,
            hdop: None,
            vdop: None,
            pdop: None,
            ageofdgpsdata: None,
            dgpsid: None,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Move the point. Nothing changes unless both coordinates are valid.
    pub fn set_position(&mut self, lat: f64, lon: f64) -> Result<()> {
        let lat = check_latitude(lat)?;
        let lon = check_longitude(lon)?;
        self.lat = lat;
        self.lon = lon;
        Ok(())
    }

    pub fn magvar(&self) -> Option<f64> {
        self.magvar
    }

    /// Stored as given, without wrapping into [0, 360).
    pub fn set_magvar(&mut self, degrees: f64) {
        self.magvar = Some(degrees);
    }

    pub fn fix(&self) -> Option<Fix> {
        self.fix
    }

    /// Set the fix from its wire string; anything else fails with `InvalidFixType`.
    pub fn set_fix(&mut self, value: &str) -> Result<()> {
        self.fix = Some(value.parse()?);
        Ok(())
    }

    pub fn set_fix_type(&mut self, fix: Fix) {
        self.fix = Some(fix);
    }

    pub fn dgpsid(&self) -> Option<u16> {
        self.dgpsid
    }

    pub fn set_dgpsid(&mut self, id: i32) -> Result<()> {
        if !(0..=MAX_DGPSID).contains(&id) {
            return Err(GpxError::out_of_range("dgpsid", id, "[0, 1023]"));
        }
        self.dgpsid = Some(id as u16);
        Ok(())
    }

    pub fn hdop(&self) -> Option<f64> {
        self.hdop
    }

    pub fn set_hdop(&mut self, value: f64) -> Result<()> {
        self.hdop = Some(non_negative("hdop", value)?);
        Ok(())
    }

    pub fn vdop(&self) -> Option<f64> {
        self.vdop
    }

    pub fn set_vdop(&mut self, value: f64) -> Result<()> {
        self.vdop = Some(non_negative("vdop", value)?);
        Ok(())
    }

    pub fn pdop(&self) -> Option<f64> {
        self.pdop
    }

    pub fn set_pdop(&mut self, value: f64) -> Result<()> {
        self.pdop = Some(non_negative("pdop", value)?);
        Ok(())
    }

    pub fn ageofdgpsdata(&self) -> Option<f64> {
        self.ageofdgpsdata
    }

    pub fn set_ageofdgpsdata(&mut self, seconds: f64) -> Result<()> {
        self.ageofdgpsdata = Some(non_negative("ageofdgpsdata", seconds)?);
        Ok(())
    }

    /// Append a link. Order is kept and duplicates are allowed.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(GpxError::out_of_range(field, value, ">= 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> Waypoint {
        Waypoint::new(35.6762, 139.6503).unwrap()
    }

    #[test]
    fn test_only_position_is_present() {
        let wp = tokyo();
        assert!((wp.lat() - 35.6762).abs() < 1e-10);
        assert!((wp.lon() - 139.6503).abs() < 1e-10);
        assert!(wp.ele.is_none());
        assert!(wp.time.is_none());
        assert!(wp.magvar().is_none());
        assert!(wp.geoidheight.is_none());
        assert!(wp.name.is_none());
        assert!(wp.cmt.is_none());
        assert!(wp.desc.is_none());
        assert!(wp.src.is_none());
        assert!(wp.links().is_empty());
        assert!(wp.sym.is_none());
        assert!(wp.point_type.is_none());
        assert!(wp.fix().is_none());
        assert!(wp.sat.is_none());
        assert!(wp.hdop().is_none());
        assert!(wp.vdop().is_none());
        assert!(wp.pdop().is_none());
        assert!(wp.ageofdgpsdata().is_none());
        assert!(wp.dgpsid().is_none());
    }

    #[test]
    fn test_zero_elevation_differs_from_absent() {
        let mut wp = tokyo();
        wp.ele = Some(0.0);
        assert_ne!(wp, tokyo());
        assert_eq!(wp.ele, Some(0.0));
    }

    #[test]
    fn test_out_of_range_position() {
        assert!(matches!(
            Waypoint::new(91.0, 0.0),
            Err(GpxError::OutOfRange { field: "lat", .. })
        ));
        assert!(matches!(
            Waypoint::new(0.0, -181.0),
            Err(GpxError::OutOfRange { field: "lon", .. })
        ));
    }

    #[test]
    fn test_set_position_is_all_or_nothing() {
        let mut wp = tokyo();
        assert!(wp.set_position(36.0, 200.0).is_err());
        assert!((wp.lat() - 35.6762).abs() < 1e-10);
        wp.set_position(36.0, 140.0).unwrap();
        assert!((wp.lon() - 140.0).abs() < 1e-10);
    }

    #[test]
    fn test_every_fix_value_round_trips() {
        for value in ["none", "2d", "3d", "dgps", "pps"] {
            let mut wp = tokyo();
            wp.set_fix(value).unwrap();
            assert_eq!(wp.fix().unwrap().as_str(), value);
        }
    }

    #[test]
    fn test_bad_fix_leaves_field_unchanged() {
        let mut wp = tokyo();
        assert!(matches!(wp.set_fix("4d"), Err(GpxError::InvalidFixType(_))));
        assert!(wp.fix().is_none());

        wp.set_fix("3d").unwrap();
        assert!(wp.set_fix("3D").is_err());
        assert!(wp.set_fix("").is_err());
        assert_eq!(wp.fix(), Some(Fix::ThreeD));
    }

    #[test]
    fn test_dgpsid_range() {
        let mut wp = tokyo();
        wp.set_dgpsid(0).unwrap();
        wp.set_dgpsid(1023).unwrap();
        assert_eq!(wp.dgpsid(), Some(1023));

        assert!(matches!(
            wp.set_dgpsid(1024),
            Err(GpxError::OutOfRange { field: "dgpsid", .. })
        ));
        assert!(wp.set_dgpsid(-1).is_err());
        assert_eq!(wp.dgpsid(), Some(1023));
    }

    #[test]
    fn test_dgpsid_failure_on_fresh_point_stays_absent() {
        let mut wp = tokyo();
        assert!(wp.set_dgpsid(1024).is_err());
        assert!(wp.dgpsid().is_none());
    }

    #[test]
    fn test_magvar_stored_as_given() {
        let mut wp = tokyo();
        wp.set_magvar(-12.5);
        assert_eq!(wp.magvar(), Some(-12.5));
        wp.set_magvar(400.0);
        assert_eq!(wp.magvar(), Some(400.0));
    }

    #[test]
    fn test_dop_must_be_non_negative() {
        let mut wp = tokyo();
        wp.set_hdop(1.2).unwrap();
        assert!(wp.set_hdop(-0.1).is_err());
        assert!(wp.set_vdop(f64::NAN).is_err());
        assert!(wp.set_ageofdgpsdata(-3.0).is_err());
        wp.set_pdop(0.0).unwrap();
        assert_eq!(wp.hdop(), Some(1.2));
        assert!(wp.vdop().is_none());
        assert_eq!(wp.pdop(), Some(0.0));
    }

    #[test]
    fn test_fix_serializes_as_wire_string() {
        let json = serde_json::to_value(Fix::TwoD).unwrap();
        assert_eq!(json, "2d");
    }
}
