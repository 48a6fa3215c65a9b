//! GPX 1.1 document model.
//!
//! [`model`] holds the typed document tree. [`parser`] reads GPX XML into it,
//! [`writer`] writes it back, and [`converter`] exports it as GeoJSON. The
//! `wasm_bindgen` functions below expose the same pipeline to JavaScript.

pub mod converter;
pub mod error;
pub mod model;
pub mod options;
pub mod parser;
pub mod writer;

use wasm_bindgen::prelude::*;

pub use crate::error::{GpxError, Result};
pub use crate::model::{
    Bounds, Copyright, Email, Fix, Gpx, Link, Metadata, Person, Route, Track, TrackSegment, Waypoint,
};
use crate::options::ConvertOptions;

/// Convert GPX string to GeoJSON, returned as a JS object.
#[wasm_bindgen(js_name = gpxToGeoJson)]
pub fn gpx_to_geojson(gpx_string: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let gpx = parser::parse_gpx_with(gpx_string, &opts.read_options())?;
    let fc = converter::to_feature_collection(&gpx, &opts);
    serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert GPX string to GeoJSON, returned as a JSON string.
#[wasm_bindgen(js_name = gpxToGeoJsonString)]
pub fn gpx_to_geojson_string(gpx_string: &str, options: JsValue) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let gpx = parser::parse_gpx_with(gpx_string, &opts.read_options())?;
    let fc = converter::to_feature_collection(&gpx, &opts);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse GPX string into the document model, returned as a JS object.
#[wasm_bindgen(js_name = parseGpx)]
pub fn parse_gpx_js(gpx_string: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let gpx = parser::parse_gpx_with(gpx_string, &opts.read_options())?;
    serde_wasm_bindgen::to_value(&gpx).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Re-serialize a GPX string in the GPX 1.1 element layout.
#[wasm_bindgen(js_name = normalizeGpx)]
pub fn normalize_gpx(gpx_string: &str, options: JsValue) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let gpx = parser::parse_gpx_with(gpx_string, &opts.read_options())?;
    Ok(writer::write_gpx(&gpx)?)
}

fn parse_options(options: JsValue) -> std::result::Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
