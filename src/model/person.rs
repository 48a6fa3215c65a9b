use serde::Serialize;

use super::Link;
use crate::error::{GpxError, Result};

/// An email address split the way GPX stores it (`<email id="" domain=""/>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    id: String,
    domain: String,
}

impl Email {
    /// Both parts must be non-empty and free of `@`.
    pub fn new(id: &str, domain: &str) -> Result<Self> {
        Ok(Self {
            id: check_part(id)?,
            domain: check_part(domain)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn set_id(&mut self, id: &str) -> Result<()> {
        self.id = check_part(id)?;
        Ok(())
    }

    pub fn set_domain(&mut self, domain: &str) -> Result<()> {
        self.domain = check_part(domain)?;
        Ok(())
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.domain)
    }
}

fn check_part(part: &str) -> Result<String> {
    let part = part.trim();
    if part.is_empty() || part.contains('@') {
        return Err(GpxError::InvalidEmail(part.to_string()));
    }
    Ok(part.to_string())
}

/// A person or organisation (`personType`), used as the metadata author.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub link: Option<Link>,
}

impl Person {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.link.is_none()
    }
}
