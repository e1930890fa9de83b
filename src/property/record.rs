use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leading float literal, matching what JavaScript's `parseFloat` accepts.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

/// A single portfolio record: an open attribute bag plus the two raw geometry encodings.
///
/// Records are immutable once fetched. Geometry stays in its loosely-typed form
/// here; `geometry::normalize_property` turns it into renderable shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Point location, either `[lon, lat]` or a string with embedded numbers.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub coord_point: Value,

    /// Polygon, multipolygon or flat ring coordinates (or a string of numbers).
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub geometry_coordinates: Value,

    /// Every other column of the row.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Property {
    pub fn new() -> Self { Self::default() }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, routing the two geometry keys to their dedicated fields.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match key {
            "coord_point" => self.coord_point = value,
            "geometry_coordinates" => self.geometry_coordinates = value,
            _ => { self.attributes.insert(key.to_string(), value); }
        }
    }

    /// Raw attribute value, if present.
    #[inline]
    pub fn attr(&self, key: &str) -> Option<&Value> {
        match key {
            "coord_point" => Some(&self.coord_point).filter(|v| !v.is_null()),
            "geometry_coordinates" => Some(&self.geometry_coordinates).filter(|v| !v.is_null()),
            _ => self.attributes.get(key),
        }
    }

    /// Attribute rendered as display text; `None` for missing or null values.
    #[inline]
    pub fn text(&self, key: &str) -> Option<String> { self.attr(key).and_then(value_text) }

    /// Attribute parsed as a number with `parseFloat` semantics.
    #[inline]
    pub fn number(&self, key: &str) -> Option<f64> { self.attr(key).and_then(value_number) }

    /// Trimmed, non-empty text attribute.
    pub fn trimmed(&self, key: &str) -> Option<String> {
        self.text(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[inline] pub fn owner(&self) -> Option<String> { self.trimmed("owner") }
    #[inline] pub fn category(&self) -> Option<String> { self.trimmed("category") }
    #[inline] pub fn subcategory(&self) -> Option<String> { self.trimmed("subcategory") }
    #[inline] pub fn property_type(&self) -> Option<String> { self.trimmed("property_type") }

    /// Display title: the first non-empty of `title`, `title_by_document`, `project`.
    pub fn title(&self) -> Option<String> {
        ["title", "title_by_document", "project"].iter()
            .find_map(|key| self.trimmed(key))
    }

    /// Integer special code (`641.0` -> `641`), used to label shapes.
    pub fn special_code(&self) -> Option<i64> {
        self.number("special_co")
            .filter(|v| v.is_finite())
            .map(|v| v.floor() as i64)
    }

    /// True when the column has no meaningful value (missing, null, "" or "null").
    pub fn is_blank(&self, key: &str) -> bool {
        match self.attr(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty() || s == "null",
            Some(_) => false,
        }
    }
}

/// Render a JSON scalar the way the table shows it.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Coerce a JSON value to a number; strings use their leading float literal.
pub(crate) fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    }
}

/// Parse the leading float literal of `s`, ignoring leading whitespace.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    FLOAT_PREFIX.find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
