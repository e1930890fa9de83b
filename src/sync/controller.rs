use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::ViewerConfig,
    filter::{CombineOp, FilterRule, RuleSet, WorkingSet, compute_working_set, search_suggestions},
    geometry::{Shape, ShapeIndex, normalize_property},
    property::{Property, column, visible_columns_for},
    provider::{DataProvider, PropertyQuery, ProviderError},
    selection::{GroupedLayers, Selection, SelectionNode, SelectionTree, StaticLayers},
    style::resolve_style,
    viewport::compute_target,
};
use super::{LogNotifier, MapRenderer, Notice, Notifier, ShapeAttributes, TableRenderer, TableViewState};

#[cfg(feature = "export")]
use crate::export::{ExportError, ExportScope, export_csv};

/// Which layer list drives the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LayerMode {
    Tree,
    Static(Vec<String>),
}

/// Keeps the layer selection, rule filters, map and table consistent.
///
/// Filter-affecting events recompute the working set once, clear the row
/// selection and redraw both views. Row-selection events redraw only the map,
/// showing exactly the checked rows. Clicks highlight and pan without touching
/// any filter state. While no map is attached or the session is inactive,
/// filter events are skipped; the next event after that recomputes.
pub struct SyncController {
    config: Arc<ViewerConfig>,
    source: Arc<[Property]>,
    shapes: Vec<Vec<Shape>>, // normalized once per source record
    tree: SelectionTree,
    static_layers: StaticLayers,
    mode: LayerMode,
    show_all: bool,
    rules: RuleSet,
    working: WorkingSet,
    table: TableViewState,
    column_overrides: Vec<(&'static str, bool)>, // user show/hide choices, oldest first
    index: ShapeIndex,
    map: Option<Box<dyn MapRenderer>>,
    table_renderer: Option<Box<dyn TableRenderer>>,
    notifier: Box<dyn Notifier>,
    session_active: bool,
}

impl SyncController {
    pub fn new(config: impl Into<Arc<ViewerConfig>>) -> Self {
        let config = config.into();
        let static_layers = StaticLayers::new(config.static_layers.clone(), config.show_all_layer.clone());
        Self {
            config,
            source: Arc::from(Vec::new()),
            shapes: Vec::new(),
            tree: SelectionTree::default(),
            static_layers,
            mode: LayerMode::Tree,
            show_all: false,
            rules: RuleSet::default(),
            working: WorkingSet::default(),
            table: TableViewState::default(),
            column_overrides: Vec::new(),
            index: ShapeIndex::default(),
            map: None,
            table_renderer: None,
            notifier: Box::new(LogNotifier),
            session_active: true,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[inline] pub fn config(&self) -> &ViewerConfig { &self.config }
    #[inline] pub fn source(&self) -> &[Property] { &self.source }
    #[inline] pub fn tree(&self) -> &SelectionTree { &self.tree }
    #[inline] pub fn rules(&self) -> &RuleSet { &self.rules }
    #[inline] pub fn working(&self) -> &WorkingSet { &self.working }
    #[inline] pub fn table(&self) -> &TableViewState { &self.table }
    #[inline] pub fn static_layers(&self) -> &StaticLayers { &self.static_layers }
    #[inline] pub fn show_all(&self) -> bool { self.show_all }
    #[inline] pub fn session_active(&self) -> bool { self.session_active }

    /// Normalized shapes of one source record.
    pub fn shapes_of(&self, source_index: usize) -> &[Shape] {
        self.shapes.get(source_index).map(Vec::as_slice).unwrap_or_default()
    }

    /// True when filter events are processed.
    #[inline] pub fn is_live(&self) -> bool { self.map.is_some() && self.session_active }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Attach the map surface and bring both views up to date.
    pub fn attach_map(&mut self, map: Box<dyn MapRenderer>) {
        self.map = Some(map);
        self.on_selection_changed();
    }

    pub fn detach_map(&mut self) -> Option<Box<dyn MapRenderer>> {
        self.index = ShapeIndex::default();
        self.map.take()
    }

    pub fn attach_table(&mut self, table: Box<dyn TableRenderer>) {
        self.table_renderer = Some(table);
        self.render_table();
    }

    /// Session gate: an inactive session clears both views and ignores
    /// filter events until it becomes active again.
    pub fn on_session_changed(&mut self, active: bool) {
        self.session_active = active;
        if active {
            self.on_selection_changed();
            return;
        }

        self.working = WorkingSet::default();
        self.table = TableViewState::default();
        self.index = ShapeIndex::default();
        if let Some(map) = self.map.as_mut() { map.remove_all_shapes() }
        self.render_table();
    }

    // ---------------------------------------------------------------------
    // Data
    // ---------------------------------------------------------------------

    /// Replace the source records and rebuild everything derived from them.
    pub fn load(&mut self, records: Vec<Property>) {
        self.shapes = records.iter().map(normalize_property).collect();
        self.source = records.into();
        self.tree = SelectionTree::from_groups(GroupedLayers::from_properties(self.source.iter()));
        if self.config.select_all_on_load {
            self.tree.set_all(true);
        }

        let mappable = self.shapes.iter().filter(|s| !s.is_empty()).count();
        info!(records = self.source.len(), mappable, "loaded properties");

        self.on_selection_changed();
    }

    /// Fetch records and load them. On failure an error notice is raised and
    /// the previous data stays in place; cancelled fetches are dropped quietly.
    pub async fn reload<P: DataProvider>(&mut self, provider: &P, query: &PropertyQuery) -> Result<(), ProviderError> {
        match provider.fetch(query).await {
            Ok(records) => {
                self.load(records);
                Ok(())
            }
            Err(ProviderError::Cancelled) => {
                debug!("fetch cancelled");
                Err(ProviderError::Cancelled)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch properties");
                self.notifier.notify(Notice::error(format!("Failed to load properties: {err}")));
                Err(err)
            }
        }
    }

    /// Search suggestions over the whole source, independent of the filters.
    pub fn suggestions(&self, text: &str) -> Vec<usize> {
        search_suggestions(&self.source, text, self.config.suggestion_limit)
    }

    // ---------------------------------------------------------------------
    // Filter events
    // ---------------------------------------------------------------------

    /// Check or uncheck a tree node, switching to the grouped layer list.
    pub fn toggle_node(&mut self, node: &SelectionNode, checked: bool) {
        self.mode = LayerMode::Tree;
        if self.tree.toggle(node, checked) {
            self.on_selection_changed();
        } else {
            debug!(?node, "ignored toggle of unknown node");
        }
    }

    /// Check or uncheck every node of the tree.
    pub fn set_all_layers(&mut self, checked: bool) {
        self.mode = LayerMode::Tree;
        self.tree.set_all(checked);
        self.on_selection_changed();
    }

    /// Switch to the flat layer list with these ids checked.
    pub fn apply_static_layers<S: AsRef<str>>(&mut self, checked_ids: &[S]) {
        self.mode = LayerMode::Static(checked_ids.iter().map(|id| id.as_ref().to_string()).collect());
        self.on_selection_changed();
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
        self.on_selection_changed();
    }

    /// The record filter implied by the current layer state.
    pub fn selection(&self) -> Selection {
        let mut selection = match &self.mode {
            LayerMode::Tree => self.tree.selection(),
            LayerMode::Static(ids) => self.static_layers.selection(ids.as_slice()),
        };
        selection.show_all |= self.show_all;
        selection
    }

    pub fn add_rule(&mut self, rule: FilterRule) {
        self.rules.push(rule);
        self.on_rule_changed();
    }

    pub fn remove_rule(&mut self, idx: usize) -> Option<FilterRule> {
        let removed = self.rules.remove(idx);
        if removed.is_some() { self.on_rule_changed() }
        removed
    }

    pub fn set_combine(&mut self, combine: CombineOp) {
        self.rules.combine = combine;
        self.on_rule_changed();
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
        self.on_rule_changed();
    }

    /// Drop every rule; the table goes back to the layer-selection result.
    pub fn clear_rules(&mut self) {
        self.rules.clear();
        self.on_rule_changed();
    }

    /// Layer selection changed: recompute from scratch and redraw both views.
    pub fn on_selection_changed(&mut self) {
        if !self.is_live() {
            debug!("selection change skipped: map not attached or session inactive");
            return;
        }
        self.working = compute_working_set(&self.source, &self.selection(), &self.rules);
        self.refresh_views();
    }

    /// Rule set changed: re-run only the rule pass over the retained base.
    pub fn on_rule_changed(&mut self) {
        if !self.is_live() {
            debug!("rule change skipped: map not attached or session inactive");
            return;
        }
        self.working.apply_rules(&self.source, &self.rules);
        self.refresh_views();
    }

    fn refresh_views(&mut self) {
        let rows = self.working.rows().to_vec();
        let visible = visible_columns_for(&rows.iter().map(|&i| &self.source[i]).collect::<Vec<_>>());
        self.table = TableViewState::new(rows, visible);
        for &(key, visible) in &self.column_overrides {
            self.table.set_column_visible(key, visible);
        }

        debug!(rows = self.table.len(), base = self.working.base().len(), "refreshing views");
        self.draw(&self.working.rows().to_vec());
        self.render_table();
    }

    // ---------------------------------------------------------------------
    // Row selection
    // ---------------------------------------------------------------------

    /// Check or uncheck one table row; the map then shows the checked rows only.
    pub fn on_row_toggled(&mut self, pos: usize, checked: bool) {
        if !self.table.set_selected(pos, checked) {
            debug!(pos, "ignored toggle of missing row");
            return;
        }
        self.after_row_selection();
    }

    pub fn on_select_all_toggled(&mut self, checked: bool) {
        self.table.select_all(checked);
        self.after_row_selection();
    }

    fn after_row_selection(&mut self) {
        if let Some(table) = self.table_renderer.as_mut() {
            table.update_selection(self.table.selected(), self.table.len());
        }
        if self.session_active {
            self.draw(&self.table.selected_sources());
        }
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Row click: highlight the record and pan to it.
    pub fn on_row_clicked(&mut self, pos: usize) -> bool {
        match self.table.rows().get(pos) {
            Some(&source_index) => self.focus(source_index),
            None => false,
        }
    }

    /// Map click: focus the topmost drawn record under the point.
    pub fn on_map_clicked(&mut self, lon: f64, lat: f64) -> Option<usize> {
        let hit = self.index.hit(lon, lat)?;
        self.focus(hit);
        Some(hit)
    }

    /// A search suggestion was picked.
    pub fn on_suggestion_chosen(&mut self, source_index: usize) -> bool {
        if source_index >= self.source.len() { return false }
        self.focus(source_index)
    }

    /// "Zoom to" button: focus the most recently checked row.
    pub fn on_zoom_to_selected(&mut self) -> bool {
        let Some(source_index) = self.table.last_selected() else {
            self.notifier.notify(Notice::warning("Select at least one property."));
            return false;
        };
        if self.map.is_none() {
            self.notifier.notify(Notice::error("The map view is not ready."));
            return false;
        }
        self.focus(source_index)
    }

    /// Highlight a record and move the camera to it.
    fn focus(&mut self, source_index: usize) -> bool {
        let Some(map) = self.map.as_mut() else {
            debug!(source_index, "focus skipped: map not attached");
            return false;
        };

        map.highlight(&|attributes: &ShapeAttributes| attributes.source_index == source_index);

        match compute_target(&self.source[source_index]) {
            Some(target) => {
                map.go_to(&target);
                true
            }
            None => {
                self.notifier.notify(Notice::warning("The selected property has no coordinates."));
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Table-only operations
    // ---------------------------------------------------------------------

    /// Sort the table by a column; the map is untouched.
    pub fn sort_by(&mut self, key: &str) {
        self.table.sort_by(&self.source, key);
        self.render_table();
    }

    pub fn scroll_to(&mut self, start: usize) {
        self.table.scroll_to(start);
        let (start, len) = (self.table.window_start(), self.config.table_window);
        if let Some(table) = self.table_renderer.as_mut() {
            table.set_window(start, len);
        }
    }

    /// Show or hide a column. The choice survives later recomputations.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) {
        let Some(def) = column(key) else {
            debug!(key, "ignored unknown column");
            return;
        };
        self.column_overrides.retain(|(k, _)| *k != def.key);
        self.column_overrides.push((def.key, visible));

        if self.table.set_column_visible(key, visible) {
            self.render_table();
        }
    }

    /// CSV of the checked rows or of the whole table, visible columns only.
    #[cfg(feature = "export")]
    pub fn export(&self, scope: ExportScope) -> Result<String, ExportError> {
        let sources = match scope {
            ExportScope::Selected => self.table.selected_sources(),
            ExportScope::All => self.table.rows().to_vec(),
        };
        let rows: Vec<&Property> = sources.iter().map(|&i| &self.source[i]).collect();
        export_csv(&rows, self.table.visible_columns())
    }

    // ---------------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------------

    /// Replace the map contents with the shapes of these records.
    fn draw(&mut self, sources: &[usize]) {
        let Some(map) = self.map.as_mut() else { return };
        map.remove_all_shapes();

        let mut drawn = Vec::new();
        for &i in sources {
            let property = &self.source[i];
            let attributes = ShapeAttributes::from_property(i, property);
            let style = resolve_style(property, &self.config.colors);
            for shape in &self.shapes[i] {
                map.add_shape(shape, &attributes, &style);
                drawn.push((i, shape.clone()));
            }
        }

        self.index = ShapeIndex::new(drawn, self.config.click_tolerance);
    }

    fn render_table(&mut self) {
        let Some(table) = self.table_renderer.as_mut() else { return };
        let rows: Vec<&Property> = self.table.rows().iter().map(|&i| &self.source[i]).collect();
        table.render(&rows, self.table.visible_columns(), self.table.selected());
        table.set_window(self.table.window_start(), self.config.table_window);
    }
}
