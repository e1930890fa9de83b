use std::{cmp::Ordering, collections::BTreeSet};

use serde::Serialize;

use crate::property::{COLUMNS, ColumnKind, Property, column, value_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[inline] pub fn flip(self) -> Self { match self { Self::Asc => Self::Desc, Self::Desc => Self::Asc } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

/// What the attribute table shows.
///
/// `rows` holds source indices in table order. `selected` holds positions in
/// `rows`. A new state is built on every recomputation; sorting and scrolling
/// mutate it in place and keep the selection attached to the same records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableViewState {
    rows: Vec<usize>,
    selected: BTreeSet<usize>,
    picked: Vec<usize>, // selected positions in the order they were checked
    sort: Option<SortState>,
    visible_columns: Vec<&'static str>,
    window_start: usize,
}

impl TableViewState {
    pub fn new(rows: Vec<usize>, visible_columns: Vec<&'static str>) -> Self {
        Self { rows, visible_columns, ..Self::default() }
    }

    #[inline] pub fn rows(&self) -> &[usize] { &self.rows }
    #[inline] pub fn len(&self) -> usize { self.rows.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    #[inline] pub fn selected(&self) -> &BTreeSet<usize> { &self.selected }
    #[inline] pub fn sort(&self) -> Option<&SortState> { self.sort.as_ref() }
    #[inline] pub fn visible_columns(&self) -> &[&'static str] { &self.visible_columns }
    #[inline] pub fn window_start(&self) -> usize { self.window_start }

    /// True when every row is selected (and there is at least one).
    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.selected.len() == self.rows.len()
    }

    /// Source indices of the selected rows, in the order they were checked.
    pub fn selected_sources(&self) -> Vec<usize> {
        self.picked.iter().map(|&pos| self.rows[pos]).collect()
    }

    /// Source index of the most recently checked row.
    pub fn last_selected(&self) -> Option<usize> {
        self.picked.last().map(|&pos| self.rows[pos])
    }

    /// Check or uncheck one row. Out-of-range positions are ignored.
    pub fn set_selected(&mut self, pos: usize, checked: bool) -> bool {
        if pos >= self.rows.len() { return false }

        if checked {
            if self.selected.insert(pos) { self.picked.push(pos) }
        } else if self.selected.remove(&pos) {
            self.picked.retain(|&p| p != pos);
        }
        true
    }

    /// Check or uncheck every row.
    pub fn select_all(&mut self, checked: bool) {
        self.selected.clear();
        self.picked.clear();
        if checked {
            self.selected.extend(0..self.rows.len());
            self.picked.extend(0..self.rows.len());
        }
    }

    /// Stable sort by a column; sorting the same column again flips the order.
    /// Selected rows follow their records to their new positions.
    pub fn sort_by(&mut self, source: &[Property], key: &str) {
        let order = match &self.sort {
            Some(state) if state.column == key => state.order.flip(),
            _ => SortOrder::Asc,
        };
        let kind = column(key).map_or(ColumnKind::Text, |col| col.kind);

        let mut perm: Vec<usize> = (0..self.rows.len()).collect();
        perm.sort_by(|&a, &b| {
            let ord = compare(&source[self.rows[a]], &source[self.rows[b]], key, kind);
            match order { SortOrder::Asc => ord, SortOrder::Desc => ord.reverse() }
        });

        // perm[new] = old
        let mut moved = vec![0; perm.len()];
        for (new, &old) in perm.iter().enumerate() {
            moved[old] = new;
        }

        self.rows = perm.iter().map(|&old| self.rows[old]).collect();
        self.selected = self.selected.iter().map(|&old| moved[old]).collect();
        self.picked = self.picked.iter().map(|&old| moved[old]).collect();
        self.sort = Some(SortState { column: key.to_string(), order });
        self.window_start = 0;
    }

    /// Move the visible window; the start is clamped to the last row.
    pub fn scroll_to(&mut self, start: usize) {
        self.window_start = start.min(self.rows.len().saturating_sub(1));
    }

    /// The rows in `[window_start, window_start + size)`.
    pub fn window(&self, size: usize) -> &[usize] {
        let end = (self.window_start + size).min(self.rows.len());
        &self.rows[self.window_start.min(end)..end]
    }

    /// Show or hide a catalog column, keeping catalog order.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> bool {
        let Some(def) = column(key) else { return false };
        let shown = self.visible_columns.contains(&def.key);

        if visible && !shown {
            self.visible_columns.push(def.key);
            let rank = |k: &&str| COLUMNS.iter().position(|c| c.key == *k);
            self.visible_columns.sort_by_key(rank);
        } else if !visible && shown {
            self.visible_columns.retain(|k| *k != def.key);
        }
        true
    }
}

/// Numeric columns compare as `parseFloat || 0`; text compares lowercased.
fn compare(a: &Property, b: &Property, key: &str, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Numeric => {
            let num = |p: &Property| p.number(key).filter(|v| !v.is_nan()).unwrap_or(0.0);
            num(a).total_cmp(&num(b))
        }
        ColumnKind::Text => {
            let text = |p: &Property| p.attr(key).and_then(value_text).unwrap_or_default().to_lowercase();
            text(a).cmp(&text(b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Vec<Property> {
        vec![
            Property::new().with("city", "Baku").with("total_area", "300"),
            Property::new().with("city", "ganja").with("total_area", 100),
            Property::new().with("city", "Agdam"),
        ]
    }

    #[test]
    fn sort_flips_and_keeps_selection() {
        let src = source();
        let mut view = TableViewState::new(vec![0, 1, 2], vec!["city"]);
        view.set_selected(0, true); // Baku

        view.sort_by(&src, "total_area");
        assert_eq!(view.rows(), [2, 1, 0]);
        assert_eq!(view.selected_sources(), [0]);
        assert!(view.selected().contains(&2));

        view.sort_by(&src, "total_area");
        assert_eq!(view.sort().map(|s| s.order), Some(SortOrder::Desc));
        assert_eq!(view.rows(), [0, 1, 2]);
        assert_eq!(view.selected_sources(), [0]);

        view.sort_by(&src, "city");
        assert_eq!(view.rows(), [2, 0, 1]);
        assert_eq!(view.sort().map(|s| s.order), Some(SortOrder::Asc));
    }

    #[test]
    fn last_selected_follows_check_order() {
        let mut view = TableViewState::new(vec![5, 6, 7], vec![]);
        view.set_selected(2, true);
        view.set_selected(0, true);
        assert_eq!(view.last_selected(), Some(5));
        view.set_selected(0, false);
        assert_eq!(view.last_selected(), Some(7));
        assert!(!view.set_selected(9, true));
    }

    #[test]
    fn window_and_scroll() {
        let mut view = TableViewState::new((0..250).collect(), vec![]);
        view.set_selected(3, true);
        view.scroll_to(200);
        assert_eq!(view.window(100).len(), 50);
        assert_eq!(view.window(100)[0], 200);
        assert!(view.selected().contains(&3));

        view.scroll_to(999);
        assert_eq!(view.window_start(), 249);
        assert_eq!(TableViewState::default().window(10), &[] as &[usize]);
    }

    #[test]
    fn column_visibility_keeps_catalog_order() {
        let mut view = TableViewState::new(vec![], vec!["city"]);
        assert!(view.set_column_visible("title", true));
        assert!(view.set_column_visible("total_area", true));
        assert_eq!(view.visible_columns(), ["title", "city", "total_area"]);
        view.set_column_visible("city", false);
        assert_eq!(view.visible_columns(), ["title", "total_area"]);
        assert!(!view.set_column_visible("nope", true));
    }
}
