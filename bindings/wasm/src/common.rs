use std::{collections::BTreeSet, fmt::Debug};

use js_sys::{Function, Reflect};
use parcelview_core::{
    FitTarget, MapRenderer, Notice, Notifier, Property, Shape, ShapeAttributes, ShapeStyle, TableRenderer,
};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Log a failed conversion or callback; `None` on failure.
pub(crate) fn checked<T, E: Debug>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(what, error = ?err, "JS interop failed");
            None
        }
    }
}

/// Serialize as plain JS objects (not `Map`), so flattened records read like JSON.
/// Values that cannot be serialized are logged and passed as `null`.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let result = value.serialize(&serde_wasm_bindgen::Serializer::json_compatible());
    checked("serialize", result).unwrap_or(JsValue::NULL)
}

/// Read a callback property off a JS object.
pub(crate) fn callback(obj: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(obj, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| js_err(format!("callback '{name}' must be a function")))
}

// ---------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------

/// Map surface backed by JS callbacks:
/// `{ addShape(shape, attributes, style), removeAllShapes(), highlight(indices), goTo(target) }`.
pub(crate) struct JsMap {
    add_shape: Function,
    remove_all_shapes: Function,
    highlight: Function,
    go_to: Function,
    drawn: Vec<ShapeAttributes>,
}

impl JsMap {
    pub(crate) fn new(callbacks: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            add_shape: callback(callbacks, "addShape")?,
            remove_all_shapes: callback(callbacks, "removeAllShapes")?,
            highlight: callback(callbacks, "highlight")?,
            go_to: callback(callbacks, "goTo")?,
            drawn: Vec::new(),
        })
    }
}

impl MapRenderer for JsMap {
    fn add_shape(&mut self, shape: &Shape, attributes: &ShapeAttributes, style: &ShapeStyle) {
        checked("addShape", self.add_shape.call3(&JsValue::NULL, &to_js(shape), &to_js(attributes), &to_js(style)));
        self.drawn.push(attributes.clone());
    }

    fn remove_all_shapes(&mut self) {
        checked("removeAllShapes", self.remove_all_shapes.call0(&JsValue::NULL));
        self.drawn.clear();
    }

    fn highlight(&mut self, predicate: &dyn Fn(&ShapeAttributes) -> bool) {
        let hits: BTreeSet<usize> = self.drawn.iter()
            .filter(|attrs| predicate(attrs))
            .map(|attrs| attrs.source_index)
            .collect();
        checked("highlight", self.highlight.call1(&JsValue::NULL, &to_js(&hits)));
    }

    fn go_to(&mut self, target: &FitTarget) {
        checked("goTo", self.go_to.call1(&JsValue::NULL, &to_js(target)));
    }
}

// ---------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------

/// Table backed by JS callbacks:
/// `{ render(rows, columns, selected), updateSelection(selected, total), setWindow?(start, len) }`.
pub(crate) struct JsTable {
    render: Function,
    update_selection: Function,
    set_window: Option<Function>,
}

impl JsTable {
    pub(crate) fn new(callbacks: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            render: callback(callbacks, "render")?,
            update_selection: callback(callbacks, "updateSelection")?,
            set_window: callback(callbacks, "setWindow").ok(),
        })
    }
}

impl TableRenderer for JsTable {
    fn render(&mut self, rows: &[&Property], visible_columns: &[&'static str], selected: &BTreeSet<usize>) {
        checked("render", self.render.call3(&JsValue::NULL, &to_js(rows), &to_js(visible_columns), &to_js(selected)));
    }

    fn update_selection(&mut self, selected: &BTreeSet<usize>, total: usize) {
        checked("updateSelection", self.update_selection.call2(&JsValue::NULL, &to_js(selected), &JsValue::from(total as u32)));
    }

    fn set_window(&mut self, start: usize, len: usize) {
        if let Some(f) = &self.set_window {
            checked("setWindow", f.call2(&JsValue::NULL, &JsValue::from(start as u32), &JsValue::from(len as u32)));
        }
    }
}

/// Notifier backed by a JS `notify({ level, message })` callback.
pub(crate) struct JsNotifier(pub(crate) Function);

impl Notifier for JsNotifier {
    fn notify(&mut self, notice: Notice) {
        checked("notify", self.0.call1(&JsValue::NULL, &to_js(&notice)));
    }
}
