use crate::config::StaticLayer;
use super::Selection;

/// A flat, configured layer list: each id maps to a category and optional
/// subcategory. One extra id means "show everything".
#[derive(Debug, Clone, Default)]
pub struct StaticLayers {
    layers: Vec<StaticLayer>,
    show_all_layer: String,
}

impl StaticLayers {
    pub fn new(layers: Vec<StaticLayer>, show_all_layer: impl Into<String>) -> Self {
        Self { layers, show_all_layer: show_all_layer.into() }
    }

    #[inline] pub fn layers(&self) -> &[StaticLayer] { &self.layers }
    #[inline] pub fn show_all_layer(&self) -> &str { &self.show_all_layer }

    /// Turn checked layer ids into a selection.
    ///
    /// Layers with a subcategory constrain by subcategory, the rest by
    /// category. The show-everything id only applies when no regular layer
    /// is checked. Unknown ids are ignored.
    pub fn selection<S: AsRef<str>>(&self, checked_ids: &[S]) -> Selection {
        let mut selection = Selection::default();

        for layer in self.layers.iter().filter(|l| checked_ids.iter().any(|id| id.as_ref() == l.id)) {
            match &layer.subcategory {
                Some(sub) => { selection.subcategories.insert(sub.clone()); }
                None => { selection.categories.insert(layer.category.clone()); }
            }
        }

        if selection.is_empty() && checked_ids.iter().any(|id| id.as_ref() == self.show_all_layer) {
            selection.show_all = true;
        }

        selection
    }
}
