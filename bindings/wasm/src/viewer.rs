use js_sys::Function;
use parcelview_core::{Property, RuleSet, SelectionNode, SyncController, ViewerConfig, suggestion_label};
use serde::Serialize;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

#[derive(Serialize)]
struct Suggestion {
    index: usize,
    label: String,
}

#[wasm_bindgen]
pub struct WasmViewer {
    inner: SyncController,
}

#[wasm_bindgen]
impl WasmViewer {
    /// Create a viewer from an optional settings object and an optional
    /// `notify({ level, message })` callback.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, notify: Option<Function>) -> Result<WasmViewer, JsValue> {
        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_err)?
        };

        let mut inner = SyncController::new(config);
        if let Some(notify) = notify {
            inner = inner.with_notifier(Box::new(JsNotifier(notify)));
        }
        Ok(WasmViewer { inner })
    }

    // ---------------------------------------------------------------------
    // Surfaces and session
    // ---------------------------------------------------------------------

    /// Attach the map: `{ addShape, removeAllShapes, highlight, goTo }`.
    pub fn attach_map(&mut self, callbacks: JsValue) -> Result<(), JsValue> {
        self.inner.attach_map(Box::new(JsMap::new(&callbacks)?));
        Ok(())
    }

    pub fn detach_map(&mut self) {
        self.inner.detach_map();
    }

    /// Attach the table: `{ render, updateSelection, setWindow? }`.
    pub fn attach_table(&mut self, callbacks: JsValue) -> Result<(), JsValue> {
        self.inner.attach_table(Box::new(JsTable::new(&callbacks)?));
        Ok(())
    }

    pub fn set_session_active(&mut self, active: bool) {
        self.inner.on_session_changed(active);
    }

    // ---------------------------------------------------------------------
    // Data and layers
    // ---------------------------------------------------------------------

    /// Replace the loaded records with an array of property objects.
    pub fn load(&mut self, records: JsValue) -> Result<(), JsValue> {
        let records: Vec<Property> = serde_wasm_bindgen::from_value(records).map_err(js_err)?;
        self.inner.load(records);
        Ok(())
    }

    /// Owner → category → subcategory grouping of the loaded records.
    pub fn groups(&self) -> JsValue {
        to_js(self.inner.tree().groups())
    }

    /// Every tree node with its checked/indeterminate state.
    pub fn tree_state(&self) -> JsValue {
        to_js(&self.inner.tree().nodes())
    }

    /// Check or uncheck a node such as `{ level: "category", owner, category }`.
    pub fn toggle_node(&mut self, node: JsValue, checked: bool) -> Result<(), JsValue> {
        let node: SelectionNode = serde_wasm_bindgen::from_value(node).map_err(js_err)?;
        self.inner.toggle_node(&node, checked);
        Ok(())
    }

    pub fn set_all_layers(&mut self, checked: bool) {
        self.inner.set_all_layers(checked);
    }

    /// Switch to the flat layer list with these layer ids checked.
    pub fn apply_static_layers(&mut self, ids: Vec<String>) {
        self.inner.apply_static_layers(&ids);
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.inner.set_show_all(show_all);
    }

    // ---------------------------------------------------------------------
    // Rules
    // ---------------------------------------------------------------------

    /// Replace the rules: `{ rules: [{ column, operator, value }], combine: "and" | "or" }`.
    pub fn set_rules(&mut self, rules: JsValue) -> Result<(), JsValue> {
        let rules: RuleSet = serde_wasm_bindgen::from_value(rules).map_err(js_err)?;
        self.inner.set_rules(rules);
        Ok(())
    }

    pub fn clear_rules(&mut self) {
        self.inner.clear_rules();
    }

    // ---------------------------------------------------------------------
    // Table and map interaction
    // ---------------------------------------------------------------------

    pub fn toggle_row(&mut self, pos: usize, checked: bool) {
        self.inner.on_row_toggled(pos, checked);
    }

    pub fn select_all(&mut self, checked: bool) {
        self.inner.on_select_all_toggled(checked);
    }

    pub fn click_row(&mut self, pos: usize) -> bool {
        self.inner.on_row_clicked(pos)
    }

    /// Returns the source index of the record hit, if any.
    pub fn click_map(&mut self, lon: f64, lat: f64) -> Option<usize> {
        self.inner.on_map_clicked(lon, lat)
    }

    pub fn zoom_to_selected(&mut self) -> bool {
        self.inner.on_zoom_to_selected()
    }

    pub fn sort_by(&mut self, key: &str) {
        self.inner.sort_by(key);
    }

    pub fn scroll_to(&mut self, start: usize) {
        self.inner.scroll_to(start);
    }

    pub fn set_column_visible(&mut self, key: &str, visible: bool) {
        self.inner.set_column_visible(key, visible);
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Suggestions as `[{ index, label }]`; debouncing is left to the page.
    pub fn search(&self, text: &str) -> JsValue {
        let source = self.inner.source();
        let out: Vec<Suggestion> = self.inner.suggestions(text).into_iter()
            .map(|index| Suggestion { index, label: suggestion_label(&source[index]) })
            .collect();
        to_js(&out)
    }

    pub fn choose_suggestion(&mut self, index: usize) -> bool {
        self.inner.on_suggestion_chosen(index)
    }
}
