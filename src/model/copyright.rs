use chrono::{Datelike, Utc};
use serde::Serialize;

use super::parse_uri;
use crate::error::{GpxError, Result};

const EARLIEST_YEAR: i32 = 1900;

/// Copyright holder, year and license of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Copyright {
    author: String,
    year: Option<i32>,
    license: Option<String>,
}

impl Copyright {
    pub fn new(author: &str, year: Option<i32>, license: Option<&str>) -> Result<Self> {
        Ok(Self {
            author: check_author(author)?,
            year: year.map(check_year).transpose()?,
            license: license.map(parse_uri).transpose()?,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn set_author(&mut self, author: &str) -> Result<()> {
        self.author = check_author(author)?;
        Ok(())
    }

    /// Years from 1900 up to next year are accepted.
    pub fn set_year(&mut self, year: Option<i32>) -> Result<()> {
        self.year = year.map(check_year).transpose()?;
        Ok(())
    }

    pub fn set_license(&mut self, license: Option<&str>) -> Result<()> {
        self.license = license.map(parse_uri).transpose()?;
        Ok(())
    }
}

fn check_author(author: &str) -> Result<String> {
    let author = author.trim();
    if author.is_empty() {
        return Err(GpxError::MissingRequired {
            element: "copyright",
            field: "author",
        });
    }
    Ok(author.to_string())
}

fn check_year(year: i32) -> Result<i32> {
    let latest = Utc::now().year() + 1;
    if (EARLIEST_YEAR..=latest).contains(&year) {
        Ok(year)
    } else {
        Err(GpxError::out_of_range("year", year, "[1900, next year]"))
    }
}
