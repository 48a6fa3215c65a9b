use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Bounds, Copyright, Link, Person};

/// Document-level description (`<metadata>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub author: Option<Person>,
    pub copyright: Option<Copyright>,
    links: Vec<Link>,
    pub time: Option<DateTime<Utc>>,
    pub keywords: Option<String>,
    pub bounds: Option<Bounds>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link. Order is kept and duplicates are allowed.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}
