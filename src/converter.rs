use chrono::{DateTime, SecondsFormat, Utc};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::{Map, Value as JsonValue};

use crate::model::*;
use crate::options::{ConvertOptions, GpxElementType};

/// Convert a GPX document to a GeoJSON FeatureCollection.
///
/// Metadata bounds become the collection `bbox`; document name, description
/// and creator are carried in a `metadata` foreign member.
pub fn to_feature_collection(gpx: &Gpx, opts: &ConvertOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if opts.should_include(GpxElementType::Waypoint) {
        for wpt in gpx.waypoints() {
            features.push(point_feature(wpt, "waypoint", opts));
        }
    }

    if opts.should_include(GpxElementType::Route) {
        for rte in gpx.routes() {
            match rte.points() {
                [] => {}
                [only] => features.push(single_point_feature(only, route_props(rte, opts), opts)),
                points => {
                    let geometry = Value::LineString(line_coords(points, opts));
                    let mut props = route_props(rte, opts);
                    if opts.include_time {
                        insert_coordinate_times(&mut props, times(points));
                    }
                    features.push(feature(geometry, props));
                }
            }
        }
    }

    if opts.should_include(GpxElementType::Track) {
        for trk in gpx.tracks() {
            features.extend(track_to_features(trk, opts));
        }
    }

    let metadata = gpx.metadata();
    FeatureCollection {
        bbox: metadata.and_then(|m| m.bounds).map(|b| b.to_bbox()),
        features,
        foreign_members: document_members(gpx, opts),
    }
}

fn document_members(gpx: &Gpx, opts: &ConvertOptions) -> Option<JsonObject> {
    if !opts.include_metadata {
        return None;
    }
    let mut doc = Map::new();
    doc.insert("creator".to_string(), JsonValue::String(gpx.creator().to_string()));
    if let Some(meta) = gpx.metadata() {
        insert_optional(&mut doc, "name", &meta.name);
        insert_optional(&mut doc, "desc", &meta.desc);
        insert_optional(&mut doc, "keywords", &meta.keywords);
        if let Some(time) = &meta.time {
            doc.insert("time".to_string(), JsonValue::String(format_time(time)));
        }
        insert_links(&mut doc, meta.links());
    }

    let mut members = JsonObject::new();
    members.insert("metadata".to_string(), JsonValue::Object(doc));
    Some(members)
}

fn track_to_features(trk: &Track, opts: &ConvertOptions) -> Vec<Feature> {
    let non_empty_segments: Vec<&TrackSegment> =
        trk.segments().iter().filter(|s| !s.is_empty()).collect();

    // Single point across all segments → Point Feature
    let mut points = trk.points();
    if let (Some(only), None) = (points.next(), points.next()) {
        return vec![single_point_feature(only, track_props(trk, opts), opts)];
    }

    let lines: Vec<&TrackSegment> = non_empty_segments
        .into_iter()
        .filter(|s| s.len() >= 2)
        .collect();

    match lines.as_slice() {
        [] => Vec::new(),
        [seg] => vec![segment_feature(trk, seg, opts)],
        _ if opts.join_track_segments => {
            let geometry = Value::MultiLineString(
                lines.iter().map(|seg| line_coords(seg.points(), opts)).collect(),
            );
            let mut props = track_props(trk, opts);
            if opts.include_time {
                let all_times: Vec<Vec<JsonValue>> =
                    lines.iter().map(|seg| times(seg.points())).collect();
                if all_times.iter().any(|t| t.iter().any(|v| !v.is_null())) {
                    insert_times_value(
                        &mut props,
                        JsonValue::Array(all_times.into_iter().map(JsonValue::Array).collect()),
                    );
                }
            }
            vec![feature(geometry, props)]
        }
        // Each segment as a separate Feature
        _ => lines
            .iter()
            .map(|seg| segment_feature(trk, seg, opts))
            .collect(),
    }
}

fn segment_feature(trk: &Track, seg: &TrackSegment, opts: &ConvertOptions) -> Feature {
    let geometry = Value::LineString(line_coords(seg.points(), opts));
    let mut props = track_props(trk, opts);
    if opts.include_time {
        insert_coordinate_times(&mut props, times(seg.points()));
    }
    feature(geometry, props)
}

fn point_feature(pt: &Waypoint, gpx_type: &str, opts: &ConvertOptions) -> Feature {
    let geometry = Value::Point(point_coords(pt, opts.include_elevation));
    feature(geometry, point_props(pt, gpx_type, opts))
}

/// Point feature for a route or track holding one point. The container's
/// properties win over the point's.
fn single_point_feature(
    pt: &Waypoint,
    container: Map<String, JsonValue>,
    opts: &ConvertOptions,
) -> Feature {
    let geometry = Value::Point(point_coords(pt, opts.include_elevation));
    let mut props = point_props(pt, "", opts);
    props.extend(container);
    feature(geometry, props)
}

fn point_props(pt: &Waypoint, gpx_type: &str, opts: &ConvertOptions) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String(gpx_type.to_string()),
    );
    if opts.include_metadata {
        insert_point_metadata(&mut props, pt);
    }
    props
}

fn feature(value: Value, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn route_props(rte: &Route, opts: &ConvertOptions) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("route".to_string()),
    );

    if opts.include_metadata {
        insert_optional(&mut props, "name", &rte.name);
        insert_optional(&mut props, "cmt", &rte.cmt);
        insert_optional(&mut props, "desc", &rte.desc);
        insert_optional(&mut props, "src", &rte.src);
        insert_optional(&mut props, "type", &rte.route_type);
        if let Some(n) = rte.number {
            props.insert("number".to_string(), JsonValue::Number(n.into()));
        }
        insert_links(&mut props, rte.links());
    }

    props
}

fn track_props(trk: &Track, opts: &ConvertOptions) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("track".to_string()),
    );

    if opts.include_metadata {
        insert_optional(&mut props, "name", &trk.name);
        insert_optional(&mut props, "cmt", &trk.cmt);
        insert_optional(&mut props, "desc", &trk.desc);
        insert_optional(&mut props, "src", &trk.src);
        insert_optional(&mut props, "type", &trk.track_type);
        if let Some(n) = trk.number {
            props.insert("number".to_string(), JsonValue::Number(n.into()));
        }
        insert_links(&mut props, trk.links());
    }

    props
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &Waypoint, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.ele) {
        (true, Some(ele)) => vec![pt.lon(), pt.lat(), ele],
        _ => vec![pt.lon(), pt.lat()],
    }
}

fn line_coords(points: &[Waypoint], opts: &ConvertOptions) -> Vec<Vec<f64>> {
    points
        .iter()
        .map(|pt| point_coords(pt, opts.include_elevation))
        .collect()
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn insert_point_metadata(props: &mut Map<String, JsonValue>, pt: &Waypoint) {
    insert_optional(props, "name", &pt.name);
    insert_optional(props, "cmt", &pt.cmt);
    insert_optional(props, "desc", &pt.desc);
    insert_optional(props, "src", &pt.src);
    insert_optional(props, "sym", &pt.sym);
    insert_optional(props, "type", &pt.point_type);
    insert_number(props, "ele", pt.ele);
    if let Some(time) = &pt.time {
        props.insert("time".to_string(), JsonValue::String(format_time(time)));
    }
    insert_number(props, "magvar", pt.magvar());
    insert_number(props, "geoidheight", pt.geoidheight);
    if let Some(fix) = pt.fix() {
        props.insert("fix".to_string(), JsonValue::String(fix.as_str().to_string()));
    }
    if let Some(sat) = pt.sat {
        props.insert("sat".to_string(), JsonValue::Number(sat.into()));
    }
    insert_number(props, "hdop", pt.hdop());
    insert_number(props, "vdop", pt.vdop());
    insert_number(props, "pdop", pt.pdop());
    insert_number(props, "ageofdgpsdata", pt.ageofdgpsdata());
    if let Some(id) = pt.dgpsid() {
        props.insert("dgpsid".to_string(), JsonValue::Number(id.into()));
    }
    insert_links(props, pt.links());
}

fn insert_optional(props: &mut Map<String, JsonValue>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        props.insert(key.to_string(), JsonValue::String(v.clone()));
    }
}

fn insert_number(props: &mut Map<String, JsonValue>, key: &str, value: Option<f64>) {
    if let Some(n) = value.and_then(serde_json::Number::from_f64) {
        props.insert(key.to_string(), JsonValue::Number(n));
    }
}

fn insert_links(props: &mut Map<String, JsonValue>, links: &[Link]) {
    if links.is_empty() {
        return;
    }
    let links = links
        .iter()
        .map(|link| {
            let mut link_obj = Map::new();
            link_obj.insert(
                "href".to_string(),
                JsonValue::String(link.href().to_string()),
            );
            insert_optional(&mut link_obj, "text", &link.text);
            insert_optional(&mut link_obj, "type", &link.link_type);
            JsonValue::Object(link_obj)
        })
        .collect();
    props.insert("links".to_string(), JsonValue::Array(links));
}

fn times(points: &[Waypoint]) -> Vec<JsonValue> {
    points
        .iter()
        .map(|pt| match &pt.time {
            Some(t) => JsonValue::String(format_time(t)),
            None => JsonValue::Null,
        })
        .collect()
}

/// Only included if at least one time is present.
fn insert_coordinate_times(props: &mut Map<String, JsonValue>, times: Vec<JsonValue>) {
    if times.iter().any(|t| !t.is_null()) {
        insert_times_value(props, JsonValue::Array(times));
    }
}

fn insert_times_value(props: &mut Map<String, JsonValue>, times: JsonValue) {
    let mut coord_props = Map::new();
    coord_props.insert("times".to_string(), times);
    props.insert(
        "coordinateProperties".to_string(),
        JsonValue::Object(coord_props),
    );
}
