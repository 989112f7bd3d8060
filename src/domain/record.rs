//! Flat export records
//!
//! Exporters never see catalogue models directly; each domain object is
//! projected into a [`Record`]: a named set of scalar fields plus at most one
//! WKT geometry and a spatial reference identifier. Records are immutable for
//! the duration of an export.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// A scalar field value carried by a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Raw bytes; only convertible to text when valid UTF-8
    Bytes(Vec<u8>),
    Null,
}

impl ScalarValue {
    /// Convert the value to its text representation.
    ///
    /// Returns `None` when the value has no text form (non-UTF-8 bytes);
    /// the attribute projector substitutes an empty string in that case.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ScalarValue::Text(s) => Some(s.clone()),
            ScalarValue::Integer(i) => Some(i.to_string()),
            ScalarValue::Real(r) => Some(r.to_string()),
            ScalarValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            ScalarValue::Timestamp(t) => Some(t.to_rfc3339()),
            ScalarValue::Bytes(b) => std::str::from_utf8(b).ok().map(str::to_string),
            ScalarValue::Null => Some(String::new()),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Real(value)
    }
}

impl<T> From<Option<T>> for ScalarValue
where
    T: Into<ScalarValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ScalarValue::Null,
        }
    }
}

/// An opaque domain record ready for export
#[derive(Debug, Clone)]
pub struct Record {
    values: BTreeMap<String, ScalarValue>,
    geometry: Option<String>,
    srid: u32,
}

impl Record {
    /// Create an empty record with the given spatial reference identifier
    pub fn new(srid: u32) -> Self {
        Self {
            values: BTreeMap::new(),
            geometry: None,
            srid,
        }
    }

    /// Set a named field value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Read a field value by name
    pub fn field(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }

    /// Attach a WKT geometry
    pub fn set_geometry(&mut self, wkt: impl Into<String>) -> &mut Self {
        self.geometry = Some(wkt.into());
        self
    }

    /// The record's WKT geometry, if any
    pub fn geometry(&self) -> Option<&str> {
        self.geometry.as_deref()
    }

    /// The record's source spatial reference (EPSG code)
    pub fn srid(&self) -> u32 {
        self.srid
    }
}
