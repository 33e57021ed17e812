//! Domain types for the appraiser roster search.
//!
//! `SearchFilters` is an immutable value describing one logical query. Pagination
//! is tracked separately by [`Page`], so every page of a query shares the same
//! filters (and therefore the same cache entry).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Default number of rows requested per result page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One of the six search fields accepted by the roster search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    State,
    License,
    LastName,
    FirstName,
    City,
    Zip,
}

impl FilterField {
    /// All fields, in cache-key and form order.
    pub const ALL: [FilterField; 6] = [
        FilterField::State,
        FilterField::License,
        FilterField::LastName,
        FilterField::FirstName,
        FilterField::City,
        FilterField::Zip,
    ];

    /// Field name as used in configuration and tool parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::State => "state",
            FilterField::License => "license",
            FilterField::LastName => "last_name",
            FilterField::FirstName => "first_name",
            FilterField::City => "city",
            FilterField::Zip => "zip",
        }
    }

    /// Name of the form parameter that carries this field.
    pub fn form_name(self) -> &'static str {
        match self {
            FilterField::State => "STATE",
            FilterField::License => "LICENSE",
            FilterField::LastName => "NAME",
            FilterField::FirstName => "FNAME",
            FilterField::City => "CITY",
            FilterField::Zip => "ZIP",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = Error;

    /// Accepts either the field name (`last_name`) or its form name (`NAME`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FilterField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(needle) || f.form_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::InvalidInput(format!("unknown filter field: {s}")))
    }
}

/// Filters for one logical roster query.
///
/// Values are trimmed when set. Pagination is not part of the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchFilters {
    state: String,
    license: String,
    last_name: String,
    first_name: String,
    city: String,
    zip: String,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of these filters with `field` set to `value`.
    pub fn set(mut self, field: FilterField, value: impl AsRef<str>) -> Self {
        *self.slot_mut(field) = value.as_ref().trim().to_string();
        self
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::State => &self.state,
            FilterField::License => &self.license,
            FilterField::LastName => &self.last_name,
            FilterField::FirstName => &self.first_name,
            FilterField::City => &self.city,
            FilterField::Zip => &self.zip,
        }
    }

    /// True when at least one filter field is non-empty.
    pub fn has_any(&self) -> bool {
        FilterField::ALL.into_iter().any(|f| !self.get(f).is_empty())
    }

    /// Field values in [`FilterField::ALL`] order.
    pub fn values(&self) -> [&str; 6] {
        FilterField::ALL.map(|f| self.get(f))
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::State => &mut self.state,
            FilterField::License => &mut self.license,
            FilterField::LastName => &mut self.last_name,
            FilterField::FirstName => &mut self.first_name,
            FilterField::City => &mut self.city,
            FilterField::Zip => &mut self.zip,
        }
    }
}

/// Pagination window sent alongside the filters.
///
/// `max_rows` is the index of the last row requested, so both fields grow by
/// the page size on every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based index of the first row.
    pub start_at: u32,
    pub max_rows: u32,
}

impl Page {
    pub fn first(page_size: u32) -> Self {
        Self { start_at: 1, max_rows: page_size }
    }

    pub fn next(self, page_size: u32) -> Self {
        Self { start_at: self.start_at.saturating_add(page_size), max_rows: self.max_rows.saturating_add(page_size) }
    }
}

/// One licensed appraiser as listed on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AppraiserRecord {
    pub firstname: String,
    /// Middle initials, space-separated.
    ///
    /// A spelled-out middle name contributes its first letter (`MARY ELLEN SMITH` -> `E`).
    pub middlename: String,
    pub lastname: String,
    pub license_number: String,
    pub license_type: String,
    pub expiration: String,
    /// Present only when the address cell carries a company line.
    pub company: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// ZIP+4 extension, empty when the roster lists a plain 5-digit zip.
    pub zip4: String,
}
