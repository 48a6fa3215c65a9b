use serde::Serialize;

use super::{Link, Waypoint};

/// One continuous run of recorded points (`<trkseg>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackSegment {
    points: Vec<Waypoint>,
}

impl TrackSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.points.push(waypoint);
    }

    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A recorded path (`<trk>`), split into segments at recording breaks.
///
/// There is no implicit "current segment": callers append a [`TrackSegment`]
/// and fill it through the handle `add_track_segment` returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Track {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    links: Vec<Link>,
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub track_type: Option<String>,
    segments: Vec<TrackSegment>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment and return the stored copy for further population.
    pub fn add_track_segment(&mut self, segment: TrackSegment) -> &mut TrackSegment {
        self.segments.push(segment);
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    pub fn segment_mut(&mut self, index: usize) -> Option<&mut TrackSegment> {
        self.segments.get_mut(index)
    }

    /// Every point of every segment, in recording order.
    pub fn points(&self) -> impl Iterator<Item = &Waypoint> {
        self.segments.iter().flat_map(|s| s.points.iter())
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}
