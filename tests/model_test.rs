use gpx_model::{Bounds, Gpx, GpxError, Route, Track, TrackSegment, Waypoint};

#[test]
fn test_document_with_one_waypoint() {
    let mut gpx = Gpx::new("1.1", "test").unwrap();
    let wp = Waypoint::new(37.7, -122.4).unwrap();
    gpx.add_waypoint(wp.clone());

    assert_eq!(gpx.waypoints(), &[wp][..]);
    assert!(gpx.routes().is_empty());
    assert!(gpx.tracks().is_empty());
}

#[test]
fn test_track_segment_points_in_order() {
    let wp1 = Waypoint::new(35.0, 139.0).unwrap();
    let wp2 = Waypoint::new(35.001, 139.001).unwrap();

    let mut track = Track::new();
    let seg1 = track.add_track_segment(TrackSegment::new());
    seg1.add_waypoint(wp1.clone());
    seg1.add_waypoint(wp2.clone());

    let mut expected = TrackSegment::new();
    expected.add_waypoint(wp1);
    expected.add_waypoint(wp2);
    assert_eq!(track.segments(), &[expected][..]);
}

#[test]
fn test_dgpsid_overflow_keeps_previous_value() {
    let mut wp = Waypoint::new(0.0, 0.0).unwrap();
    wp.set_dgpsid(42).unwrap();
    assert!(matches!(
        wp.set_dgpsid(1024),
        Err(GpxError::OutOfRange { .. })
    ));
    assert_eq!(wp.dgpsid(), Some(42));
}

#[test]
fn test_route_append_order_for_many_points() {
    let mut route = Route::new();
    let expected: Vec<Waypoint> = (0..50)
        .map(|i| Waypoint::new(f64::from(i) - 25.0, f64::from(i * 3) - 75.0).unwrap())
        .collect();
    for wp in &expected {
        route.add_waypoint(wp.clone());
    }
    assert_eq!(route.points(), expected.as_slice());
}

#[test]
fn test_inverted_bounds_never_stored() {
    assert!(matches!(
        Bounds::new(10.0, 0.0, -10.0, 1.0),
        Err(GpxError::OutOfRange { .. })
    ));
    assert!(matches!(
        Bounds::new(0.0, 10.0, 1.0, -10.0),
        Err(GpxError::OutOfRange { .. })
    ));
}

#[test]
fn test_identical_tracks_are_independent() {
    let mut seg = TrackSegment::new();
    seg.add_waypoint(Waypoint::new(1.0, 2.0).unwrap());
    let mut a = Track::new();
    a.add_track_segment(seg.clone());
    let b = a.clone();

    a.segment_mut(0).unwrap().add_waypoint(Waypoint::new(3.0, 4.0).unwrap());
    assert_eq!(a.segments()[0].len(), 2);
    assert_eq!(b.segments()[0].len(), 1);
    assert_eq!(b.segments()[0], seg);
}

#[test]
fn test_document_serializes_absent_fields_as_null() {
    let mut gpx = Gpx::new("1.1", "test").unwrap();
    let mut wp = Waypoint::new(35.0, 139.0).unwrap();
    wp.ele = Some(0.0);
    gpx.add_waypoint(wp);

    let json = serde_json::to_value(&gpx).unwrap();
    assert_eq!(json["version"], "1.1");
    assert_eq!(json["waypoints"][0]["ele"], 0.0);
    assert!(json["waypoints"][0]["time"].is_null());
    assert!(json["metadata"].is_null());
}
