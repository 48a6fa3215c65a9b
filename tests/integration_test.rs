use geojson::{FeatureCollection, Value};
use gpx_model::converter::to_feature_collection;
use gpx_model::options::{ConvertOptions, ReadOptions, WriteOptions};
use gpx_model::parser::{parse_gpx, parse_gpx_with};
use gpx_model::writer::write_gpx_with;
use gpx_model::{Fix, GpxError};

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn convert(gpx: &str) -> FeatureCollection {
    let doc = parse_gpx(gpx).unwrap();
    to_feature_collection(&doc, &ConvertOptions::default())
}

// ---- basic/ ----

#[test]
fn test_01_full_waypoint_model() {
    let gpx = parse_gpx_with(&load_fixture("basic/01_full_waypoint.gpx"), &ReadOptions::strict()).unwrap();
    assert_eq!(gpx.creator(), "fixture");
    assert_eq!(gpx.waypoints().len(), 1);

    let pt = &gpx.waypoints()[0];
    assert!((pt.lat() - 35.6586).abs() < 1e-10);
    assert!((pt.lon() - 139.7454).abs() < 1e-10);
    assert_eq!(pt.ele, Some(40.5));
    assert_eq!(pt.magvar(), Some(352.4));
    assert_eq!(pt.geoidheight, Some(36.7));
    assert_eq!(pt.name.as_deref(), Some("Tokyo Tower"));
    assert_eq!(pt.sym.as_deref(), Some("Flag, Blue"));
    assert_eq!(pt.fix(), Some(Fix::ThreeD));
    assert_eq!(pt.sat, Some(11));
    assert_eq!(pt.hdop(), Some(0.8));
    assert_eq!(pt.vdop(), Some(1.1));
    assert_eq!(pt.pdop(), Some(1.4));
    assert_eq!(pt.ageofdgpsdata(), Some(3.0));
    assert_eq!(pt.dgpsid(), Some(1023));

    let link = &pt.links()[0];
    assert_eq!(link.href(), "https://example.com/tokyo-tower");
    assert_eq!(link.text.as_deref(), Some("Tokyo Tower Website"));
    assert_eq!(link.link_type.as_deref(), Some("text/html"));
}

#[test]
fn test_01_full_waypoint_geojson() {
    let fc = convert(&load_fixture("basic/01_full_waypoint.gpx"));
    assert_eq!(fc.features.len(), 1);

    let props = fc.features[0].properties.as_ref().unwrap();
    assert_eq!(props["gpxType"], "waypoint");
    assert_eq!(props["name"], "Tokyo Tower");
    assert_eq!(props["cmt"], "A comment");
    assert_eq!(props["desc"], "A famous landmark in Tokyo");
    assert_eq!(props["src"], "GPS");
    assert_eq!(props["type"], "POI");
    assert_eq!(props["time"], "2025-01-01T12:00:00Z");
    assert_eq!(props["ele"], 40.5);
    assert_eq!(props["fix"], "3d");
    assert_eq!(props["dgpsid"], 1023);
    assert_eq!(props["links"][0]["href"], "https://example.com/tokyo-tower");
}

#[test]
fn test_02_complete_model() {
    let gpx = parse_gpx_with(&load_fixture("basic/02_complete.gpx"), &ReadOptions::strict()).unwrap();

    let meta = gpx.metadata().unwrap();
    assert_eq!(meta.name.as_deref(), Some("Tokyo Day"));
    let author = meta.author.as_ref().unwrap();
    assert_eq!(author.email.as_ref().unwrap().to_string(), "jane@example.com");
    assert_eq!(meta.copyright.as_ref().unwrap().year(), Some(2024));

    // same target twice, kept in order
    let types: Vec<&str> = meta
        .links()
        .iter()
        .map(|l| l.link_type.as_deref().unwrap())
        .collect();
    assert_eq!(types, vec!["self", "alternate"]);
    assert_eq!(meta.links()[0].href(), meta.links()[1].href());

    let route = &gpx.routes()[0];
    assert_eq!(route.points().len(), 3);
    assert_eq!(route.points()[0], route.points()[2]);

    let track = &gpx.tracks()[0];
    assert_eq!(track.segments().len(), 2);
    assert_eq!(track.points().count(), 4);
}

#[test]
fn test_02_complete_geojson() {
    let fc = convert(&load_fixture("basic/02_complete.gpx"));

    let types: Vec<&str> = fc
        .features
        .iter()
        .map(|f| f.properties.as_ref().unwrap()["gpxType"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["waypoint", "route", "track", "track"]);
    assert_eq!(fc.bbox, Some(vec![139.6, 35.6, 139.8, 35.8]));

    let route = &fc.features[1];
    assert_eq!(route.properties.as_ref().unwrap()["number"], 1);
    match &route.geometry.as_ref().unwrap().value {
        Value::LineString(coords) => assert_eq!(coords.len(), 3),
        _ => panic!("Expected LineString"),
    }
}

#[test]
fn test_02_complete_joined_segments() {
    let doc = parse_gpx(&load_fixture("basic/02_complete.gpx")).unwrap();
    let opts = ConvertOptions {
        join_track_segments: true,
        types: Some(vec![gpx_model::options::GpxElementType::Track]),
        ..Default::default()
    };
    let fc = to_feature_collection(&doc, &opts);
    assert_eq!(fc.features.len(), 1);

    let props = fc.features[0].properties.as_ref().unwrap();
    let times = props["coordinateProperties"]["times"].as_array().unwrap();
    assert_eq!(times.len(), 2);
    assert_eq!(times[1][0], "2025-01-01T06:10:00Z");
    match &fc.features[0].geometry.as_ref().unwrap().value {
        Value::MultiLineString(lines) => {
            assert_eq!(lines.len(), 2);
            assert!((lines[1][0][2] - 12.5).abs() < 1e-10);
        }
        _ => panic!("Expected MultiLineString"),
    }
}

#[test]
fn test_02_complete_write_read_round_trip() {
    let original = parse_gpx_with(&load_fixture("basic/02_complete.gpx"), &ReadOptions::strict()).unwrap();
    for indent in [0, 2, 4] {
        let xml = write_gpx_with(&original, &WriteOptions { indent }).unwrap();
        let reparsed = parse_gpx_with(&xml, &ReadOptions::strict()).unwrap();
        assert_eq!(reparsed, original, "round trip with indent {indent}");
    }
}

// ---- edge_cases/ ----

#[test]
fn test_03_invalid_values_lenient() {
    let gpx = parse_gpx(&load_fixture("edge_cases/03_invalid_values.gpx")).unwrap();
    let names: Vec<&str> = gpx
        .waypoints()
        .iter()
        .map(|w| w.name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["Bad fix", "Bad dgps station"]);

    assert!(gpx.waypoints()[0].fix().is_none());
    let pt = &gpx.waypoints()[1];
    assert!(pt.dgpsid().is_none());
    assert!(pt.hdop().is_none());
    assert!(pt.ele.is_none());
}

#[test]
fn test_03_invalid_values_strict() {
    let err = parse_gpx_with(
        &load_fixture("edge_cases/03_invalid_values.gpx"),
        &ReadOptions::strict(),
    )
    .unwrap_err();
    assert!(matches!(err, GpxError::InvalidFixType(ref v) if v == "4d"));
}

// ---- vendor/ ----

#[test]
fn test_04_garmin_extensions() {
    let fc = convert(&load_fixture("vendor/04_garmin_extensions.gpx"));
    assert_eq!(fc.features.len(), 1);

    let props = fc.features[0].properties.as_ref().unwrap();
    assert_eq!(props["name"], "Garmin Activity");
    assert_eq!(props["type"], "running");

    let times = props["coordinateProperties"]["times"].as_array().unwrap();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], "2025-01-01T06:00:00Z");

    let metadata = &fc.foreign_members.as_ref().unwrap()["metadata"];
    assert_eq!(metadata["creator"], "Garmin Connect");
    assert_eq!(metadata["links"][0]["text"], "Garmin Connect");
}

#[test]
fn test_gpx10_document_round_trips_with_its_version() {
    let xml = r#"<gpx xmlns="http://www.topografix.com/GPX/1/0" version="1.0" creator="legacy">
  <name>Old file</name>
  <wpt lat="35.0" lon="139.0"><name>Camp</name><url>http://example.com</url></wpt>
</gpx>"#;
    let original = parse_gpx_with(xml, &ReadOptions::strict()).unwrap();
    let written = write_gpx_with(&original, &WriteOptions::default()).unwrap();
    let reparsed = parse_gpx_with(&written, &ReadOptions::strict()).unwrap();
    assert_eq!(reparsed.version(), "1.0");
    assert_eq!(reparsed, original);
}
