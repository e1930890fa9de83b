use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{geometry::Shape, property::Property, style::ShapeStyle, viewport::FitTarget};

/// Popup attributes attached to every drawn shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapeAttributes {
    /// Index of the record in the loaded source.
    pub source_index: usize,
    pub special_code: Option<i64>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub property_type: Option<String>,
    pub address: Option<String>,
    pub total_area: Option<f64>,
    pub book_value: Option<f64>,
}

impl ShapeAttributes {
    pub fn from_property(source_index: usize, property: &Property) -> Self {
        Self {
            source_index,
            special_code: property.special_code(),
            name: property.title(),
            owner: property.owner(),
            category: property.category(),
            subcategory: property.subcategory(),
            property_type: property.property_type(),
            address: property.trimmed("address"),
            total_area: property.number("total_area"),
            book_value: property.number("book_value"),
        }
    }
}

/// The map surface.
pub trait MapRenderer {
    fn add_shape(&mut self, shape: &Shape, attributes: &ShapeAttributes, style: &ShapeStyle);
    fn remove_all_shapes(&mut self);
    /// Emphasize the shapes whose attributes satisfy `predicate`.
    fn highlight(&mut self, predicate: &dyn Fn(&ShapeAttributes) -> bool);
    fn go_to(&mut self, target: &FitTarget);
}

/// The attribute table.
pub trait TableRenderer {
    /// Redraw the whole table. `rows` is in table order and `selected` holds
    /// positions in `rows`.
    fn render(&mut self, rows: &[&Property], visible_columns: &[&'static str], selected: &BTreeSet<usize>);

    /// Refresh checkboxes and the "total / selected" counter only.
    fn update_selection(&mut self, selected: &BTreeSet<usize>, total: usize);

    /// Show rows `[start, start + len)`.
    fn set_window(&mut self, _start: usize, _len: usize) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing, non-fatal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Info, message: message.into() } }
    pub fn warning(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Warning, message: message.into() } }
    pub fn error(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Error, message: message.into() } }
}

/// Sink for notices.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Notifier that forwards notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "notice"),
            NoticeLevel::Error => error!(message = %notice.message, "notice"),
        }
    }
}
