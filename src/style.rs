use std::collections::HashMap;

use serde::Serialize;

use crate::{config::{ColorEntry, ColorScheme}, property::Property};
pub use crate::config::Color;

/// Fill and outline used to draw one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeStyle {
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f64,
}

impl ShapeStyle {
    fn from_entry(entry: &ColorEntry) -> Self {
        Self { fill: entry.color.clone(), outline: entry.outline.clone(), outline_width: 1.5 }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Color::Rgba([255.0, 165.0, 0.0, 0.6]),
            outline: Color::Css("black".into()),
            outline_width: 1.0,
        }
    }
}

/// Pick a record's style: subcategory colour, then the `"null"` subcategory
/// entry for blank subcategories, then the same two steps by property type,
/// else the default orange.
pub fn resolve_style(property: &Property, colors: &ColorScheme) -> ShapeStyle {
    lookup(property.subcategory(), &colors.subcategory)
        .or_else(|| lookup(property.property_type(), &colors.property_type))
        .map(ShapeStyle::from_entry)
        .unwrap_or_default()
}

fn lookup(value: Option<String>, table: &HashMap<String, ColorEntry>) -> Option<&ColorEntry> {
    match value {
        Some(v) => table.get(&v),
        None => table.get("null"),
    }
}
