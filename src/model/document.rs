use serde::Serialize;

use super::{Metadata, Route, Track, Waypoint};
use crate::error::{GpxError, Result};

/// Root of a GPX document (`<gpx version creator>`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gpx {
    version: String,
    creator: String,
    metadata: Option<Metadata>,
    waypoints: Vec<Waypoint>,
    routes: Vec<Route>,
    tracks: Vec<Track>,
}

impl Gpx {
    /// Both `version` and `creator` must be non-empty.
    pub fn new(version: &str, creator: &str) -> Result<Self> {
        Ok(Self {
            version: required("version", version)?,
            creator: required("creator", creator)?,
            metadata: None,
            waypoints: Vec::new(),
            routes: Vec::new(),
            tracks: Vec::new(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn metadata_mut(&mut self) -> Option<&mut Metadata> {
        self.metadata.as_mut()
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = Some(metadata);
    }

    /// Metadata, created empty on first access.
    pub fn metadata_or_default(&mut self) -> &mut Metadata {
        self.metadata.get_or_insert_with(Metadata::new)
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn add_route(&mut self, route: Route) -> &mut Route {
        self.routes.push(route);
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    pub fn add_track(&mut self, track: Track) -> &mut Track {
        self.tracks.push(track);
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty() && self.routes.is_empty() && self.tracks.is_empty()
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GpxError::MissingRequired {
            element: "gpx",
            field,
        });
    }
    Ok(value.to_string())
}
