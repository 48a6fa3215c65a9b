use serde::Serialize;

use super::{Link, Waypoint};

/// A planned path (`<rte>`): an ordered list of route points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    links: Vec<Link>,
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub route_type: Option<String>,
    points: Vec<Waypoint>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route point. Navigation order is insertion order.
    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.points.push(waypoint);
    }

    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}
