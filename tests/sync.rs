// Integration tests for SyncController:
//   filter events, row selection, focus/zoom, sorting, session gating,
//   fetch failures and export, driven through recording renderers.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use parcelview::{
    DataProvider, ExportScope, FilterRule, FitTarget, MapRenderer, MemProvider, Notice, NoticeLevel, Notifier,
    Operator, Property, PropertyQuery, ProviderError, SelectionNode, Shape, ShapeAttributes, ShapeStyle,
    SyncController, TableRenderer, ViewerConfig,
};
use serde_json::json;

#[derive(Default)]
struct MapLog {
    shapes: Vec<usize>, // source index per drawn shape
    clears: usize,
    highlighted: Vec<usize>,
    targets: Vec<FitTarget>,
}

struct RecordingMap(Rc<RefCell<MapLog>>);

impl MapRenderer for RecordingMap {
    fn add_shape(&mut self, _shape: &Shape, attributes: &ShapeAttributes, _style: &ShapeStyle) {
        self.0.borrow_mut().shapes.push(attributes.source_index);
    }

    fn remove_all_shapes(&mut self) {
        let mut log = self.0.borrow_mut();
        log.shapes.clear();
        log.clears += 1;
    }

    fn highlight(&mut self, predicate: &dyn Fn(&ShapeAttributes) -> bool) {
        let mut log = self.0.borrow_mut();
        let hits: Vec<usize> = log.shapes.iter().copied()
            .filter(|&i| predicate(&ShapeAttributes { source_index: i, ..Default::default() }))
            .collect();
        log.highlighted = hits;
    }

    fn go_to(&mut self, target: &FitTarget) {
        self.0.borrow_mut().targets.push(target.clone());
    }
}

#[derive(Default)]
struct TableLog {
    rows: Vec<Option<String>>, // owner per rendered row
    columns: Vec<&'static str>,
    selected: BTreeSet<usize>,
    renders: usize,
}

struct RecordingTable(Rc<RefCell<TableLog>>);

impl TableRenderer for RecordingTable {
    fn render(&mut self, rows: &[&Property], visible_columns: &[&'static str], selected: &BTreeSet<usize>) {
        let mut log = self.0.borrow_mut();
        log.rows = rows.iter().map(|p| p.text("title")).collect();
        log.columns = visible_columns.to_vec();
        log.selected = selected.clone();
        log.renders += 1;
    }

    fn update_selection(&mut self, selected: &BTreeSet<usize>, _total: usize) {
        self.0.borrow_mut().selected = selected.clone();
    }
}

struct RecordingNotifier(Rc<RefCell<Vec<Notice>>>);

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) { self.0.borrow_mut().push(notice) }
}

struct Harness {
    controller: SyncController,
    map: Rc<RefCell<MapLog>>,
    table: Rc<RefCell<TableLog>>,
    notices: Rc<RefCell<Vec<Notice>>>,
}

fn square(x: f64, y: f64, size: f64) -> serde_json::Value {
    json!([[[x, y], [x + size, y], [x + size, y + size], [x, y + size]]])
}

fn records() -> Vec<Property> {
    vec![
        Property::new().with("title", "p1").with("owner", "A").with("category", "Park")
            .with("subcategory", "Urban Park").with("total_area", 50)
            .with("geometry_coordinates", square(49.80, 40.30, 0.02)),
        Property::new().with("title", "p2").with("owner", "A").with("category", "Park")
            .with("subcategory", "Panoramic Park").with("total_area", 500)
            .with("coord_point", json!([49.90, 40.40])),
        Property::new().with("title", "p3").with("owner", "A").with("category", "Museum")
            .with("subcategory", "Art").with("total_area", 200)
            .with("geometry_coordinates", square(50.00, 40.50, 0.2)),
        Property::new().with("title", "p4").with("owner", "B").with("total_area", 10),
    ]
}

fn harness(config: ViewerConfig) -> Harness {
    let map = Rc::new(RefCell::new(MapLog::default()));
    let table = Rc::new(RefCell::new(TableLog::default()));
    let notices = Rc::new(RefCell::new(Vec::new()));

    let mut controller = SyncController::new(config)
        .with_notifier(Box::new(RecordingNotifier(notices.clone())));
    controller.attach_table(Box::new(RecordingTable(table.clone())));
    controller.attach_map(Box::new(RecordingMap(map.clone())));
    controller.load(records());

    Harness { controller, map, table, notices }
}

fn loaded() -> Harness { harness(ViewerConfig::default()) }

fn unchecked() -> Harness {
    harness(ViewerConfig { select_all_on_load: false, ..ViewerConfig::default() })
}

fn titles(h: &Harness) -> Vec<String> {
    h.table.borrow().rows.iter().map(|t| t.clone().unwrap_or_default()).collect()
}

#[test]
fn load_selects_everything_and_draws_mappable_records() {
    let h = loaded();
    assert_eq!(titles(&h), ["p1", "p2", "p3", "p4"]);
    // p4 has no geometry
    assert_eq!(h.map.borrow().shapes, [0, 1, 2]);
    assert!(h.table.borrow().columns.contains(&"owner"));
}

#[test]
fn empty_selection_empties_both_views() {
    let h = unchecked();
    assert!(titles(&h).is_empty());
    assert!(h.map.borrow().shapes.is_empty());
}

#[test]
fn single_subcategory_matches_exactly_its_records() {
    let mut h = unchecked();
    h.controller.toggle_node(&SelectionNode::subcategory("A", "Park", "Urban Park"), true);
    assert_eq!(titles(&h), ["p1"]);
    assert_eq!(h.map.borrow().shapes, [0]);
}

#[test]
fn category_or_subcategory_match() {
    let mut h = unchecked();
    h.controller.toggle_node(&SelectionNode::category("A", "Museum"), true);
    h.controller.toggle_node(&SelectionNode::subcategory("A", "Park", "Panoramic Park"), true);
    assert_eq!(titles(&h), ["p2", "p3"]);
}

#[test]
fn owner_without_categories_matches_by_owner() {
    let mut h = unchecked();
    h.controller.toggle_node(&SelectionNode::owner("B"), true);
    assert_eq!(titles(&h), ["p4"]);
}

#[test]
fn rules_narrow_and_clear_restores_selection_result() {
    let mut h = loaded();
    h.controller.toggle_node(&SelectionNode::owner("B"), false);
    h.controller.add_rule(FilterRule::new("total_area", Operator::Gt, "100"));
    assert_eq!(titles(&h), ["p2", "p3"]);

    h.controller.clear_rules();
    assert_eq!(titles(&h), ["p1", "p2", "p3"]);
}

#[test]
fn malformed_rule_is_ignored() {
    let mut h = loaded();
    h.controller.add_rule(FilterRule::new("total_area", Operator::Contains, "5"));
    assert_eq!(titles(&h).len(), 4);
}

#[test]
fn row_selection_redraws_only_checked_rows() {
    let mut h = loaded();
    h.controller.on_row_toggled(2, true);
    assert_eq!(h.map.borrow().shapes, [2]);
    assert_eq!(h.table.borrow().selected, BTreeSet::from([2]));

    h.controller.on_row_toggled(0, true);
    assert_eq!(h.map.borrow().shapes, [2, 0]);

    h.controller.on_select_all_toggled(false);
    assert!(h.map.borrow().shapes.is_empty());
}

#[test]
fn select_all_then_owner_uncheck_resets_selection() {
    let mut h = loaded();
    h.controller.on_select_all_toggled(true);
    assert_eq!(h.controller.table().selected().len(), 4);

    h.controller.toggle_node(&SelectionNode::owner("A"), false);
    h.controller.toggle_node(&SelectionNode::owner("B"), false);

    assert!(h.controller.table().selected().is_empty());
    assert!(titles(&h).is_empty());
    assert!(h.map.borrow().shapes.is_empty());
}

#[test]
fn filter_change_clears_row_selection() {
    let mut h = loaded();
    h.controller.on_row_toggled(1, true);
    h.controller.add_rule(FilterRule::new("total_area", Operator::Ge, "50"));
    assert!(h.controller.table().selected().is_empty());
    assert_eq!(h.map.borrow().shapes, [0, 1, 2]);
}

#[test]
fn row_click_highlights_and_pans_without_filtering() {
    let mut h = loaded();
    assert!(h.controller.on_row_clicked(0));

    let map = h.map.borrow();
    assert_eq!(map.highlighted, [0]);
    assert_eq!(map.targets.last().and_then(|t| t.zoom), Some(15));
    assert_eq!(map.shapes, [0, 1, 2]);
    drop(map);
    assert_eq!(titles(&h).len(), 4);
}

#[test]
fn large_extent_leaves_zoom_to_the_map() {
    let mut h = loaded();
    h.controller.on_row_clicked(2);
    assert_eq!(h.map.borrow().targets.last().map(|t| t.zoom), Some(None));
}

#[test]
fn map_click_focuses_hit_record() {
    let mut h = loaded();
    assert_eq!(h.controller.on_map_clicked(49.81, 40.31), Some(0));
    assert_eq!(h.controller.on_map_clicked(49.9001, 40.4001), Some(1));
    assert_eq!(h.controller.on_map_clicked(0.0, 0.0), None);
    assert_eq!(h.map.borrow().highlighted, [1]);
}

#[test]
fn map_click_prefers_the_parcel_drawn_on_top() {
    let mut h = loaded();
    h.controller.load(vec![
        Property::new().with("title", "estate").with("owner", "A").with("category", "Park")
            .with("geometry_coordinates", square(0.0, 0.0, 10.0)),
        Property::new().with("title", "plot").with("owner", "A").with("category", "Park")
            .with("geometry_coordinates", square(4.0, 4.0, 2.0)),
    ]);

    assert_eq!(h.controller.on_map_clicked(5.0, 5.0), Some(1));
    assert_eq!(h.controller.on_map_clicked(1.0, 1.0), Some(0));
}

#[test]
fn zoom_to_selected_warnings() {
    let mut h = loaded();
    assert!(!h.controller.on_zoom_to_selected());
    assert_eq!(h.notices.borrow().last().map(|n| n.level), Some(NoticeLevel::Warning));

    h.controller.on_row_toggled(3, true);
    assert!(!h.controller.on_zoom_to_selected());
    assert!(h.notices.borrow().last().unwrap().message.contains("no coordinates"));

    h.controller.on_row_toggled(1, true);
    assert!(h.controller.on_zoom_to_selected());
    assert_eq!(h.map.borrow().targets.last().and_then(|t| t.zoom), Some(18));
}

#[test]
fn suggestion_focuses_record() {
    let mut h = loaded();
    let hits = h.controller.suggestions("p3");
    assert_eq!(hits, [2]);
    assert!(h.controller.on_suggestion_chosen(hits[0]));
    assert!(!h.controller.on_suggestion_chosen(99));
}

#[test]
fn sort_keeps_selection_and_map() {
    let mut h = loaded();
    h.controller.on_row_toggled(0, true); // p1
    let shapes_before = h.map.borrow().shapes.clone();

    h.controller.sort_by("total_area");
    h.controller.sort_by("total_area");
    assert_eq!(titles(&h), ["p2", "p3", "p1", "p4"]);
    assert_eq!(h.table.borrow().selected, BTreeSet::from([2]));
    assert_eq!(h.map.borrow().shapes, shapes_before);
}

#[test]
fn hidden_column_survives_filter_changes() {
    let mut h = loaded();
    h.controller.set_column_visible("owner", false);
    assert!(!h.table.borrow().columns.contains(&"owner"));

    h.controller.add_rule(FilterRule::new("total_area", Operator::Gt, "100"));
    assert_eq!(titles(&h), ["p2", "p3"]);
    assert!(!h.table.borrow().columns.contains(&"owner"));

    h.controller.set_column_visible("owner", true);
    h.controller.clear_rules();
    assert!(h.table.borrow().columns.contains(&"owner"));
}

#[test]
fn events_are_skipped_without_a_map() {
    let mut controller = SyncController::new(ViewerConfig::default());
    controller.load(records());
    assert!(controller.working().is_empty());

    let map = Rc::new(RefCell::new(MapLog::default()));
    controller.attach_map(Box::new(RecordingMap(map.clone())));
    assert_eq!(controller.working().len(), 4);
    assert_eq!(map.borrow().shapes.len(), 3);
}

#[test]
fn inactive_session_clears_and_ignores_events() {
    let mut h = loaded();
    h.controller.on_session_changed(false);
    assert!(titles(&h).is_empty());
    assert!(h.map.borrow().shapes.is_empty());

    h.controller.toggle_node(&SelectionNode::owner("B"), false);
    assert!(h.map.borrow().shapes.is_empty());

    h.controller.on_session_changed(true);
    assert_eq!(titles(&h), ["p1", "p2", "p3"]);
}

#[test]
fn static_layers_and_show_all() {
    let mut h = unchecked();
    let config_layers = ["nonResidentialLayer"]; // category Park
    h.controller.apply_static_layers(&config_layers);
    assert_eq!(titles(&h), ["p1", "p2"]);

    h.controller.apply_static_layers(&["investmentProperty"]);
    assert_eq!(titles(&h).len(), 4);

    h.controller.apply_static_layers::<&str>(&[]);
    assert!(titles(&h).is_empty());
    h.controller.set_show_all(true);
    assert_eq!(titles(&h).len(), 4);
}

#[test]
fn export_selected_rows() {
    let mut h = loaded();
    assert!(h.controller.export(ExportScope::Selected).is_err());

    h.controller.on_row_toggled(1, true);
    let csv = h.controller.export(ExportScope::Selected).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Index,Name"));
    assert!(lines.next().unwrap().starts_with("1,p2"));
    assert_eq!(h.controller.export(ExportScope::All).unwrap().lines().count(), 5);
}

struct FailingProvider(fn() -> ProviderError);

impl DataProvider for FailingProvider {
    async fn fetch(&self, _query: &PropertyQuery) -> Result<Vec<Property>, ProviderError> {
        Err((self.0)())
    }
}

#[tokio::test]
async fn failed_reload_keeps_last_good_data() {
    let mut h = loaded();
    let failing = FailingProvider(|| ProviderError::Status { status: 500, body: "Server Error".into() });

    assert!(h.controller.reload(&failing, &PropertyQuery::All).await.is_err());
    assert_eq!(titles(&h).len(), 4);
    assert_eq!(h.notices.borrow().last().map(|n| n.level), Some(NoticeLevel::Error));
}

#[tokio::test]
async fn cancelled_reload_is_silent() {
    let mut h = loaded();
    let cancelled = FailingProvider(|| ProviderError::Cancelled);

    assert!(h.controller.reload(&cancelled, &PropertyQuery::All).await.is_err());
    assert!(h.notices.borrow().is_empty());
}

#[tokio::test]
async fn reload_replaces_source() {
    let mut h = loaded();
    let provider = MemProvider::new(records());
    let query = PropertyQuery::Hierarchy { owners: vec!["B".into()], categories: vec![], subcategories: vec![] };

    h.controller.reload(&provider, &query).await.unwrap();
    assert_eq!(titles(&h), ["p4"]);
    assert_eq!(h.controller.tree().groups().owners().len(), 1);
}
