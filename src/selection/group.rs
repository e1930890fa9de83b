use serde::{Deserialize, Serialize};

use crate::property::Property;

/// Categories and their subcategories under one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerGroup {
    pub owner: String,
    #[serde(default)]
    pub categories: Vec<CategoryGroup>,
}

/// Subcategories under one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Owner → category → subcategory grouping metadata, in the backend's
/// `/grouped-layers` JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedLayers {
    owners: Vec<OwnerGroup>,
}

impl GroupedLayers {
    pub fn new(owners: Vec<OwnerGroup>) -> Self { Self { owners } }

    /// Derive the grouping from records.
    ///
    /// Owners are trimmed and must be non-empty. A category/subcategory pair is
    /// only recorded when both are non-empty, so an owner may end up with no
    /// categories. First-seen order is kept and duplicates collapse.
    pub fn from_properties<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Self {
        let mut owners: Vec<OwnerGroup> = Vec::new();

        for property in properties {
            let Some(owner) = property.owner() else { continue };

            let idx = match owners.iter().position(|g| g.owner == owner) {
                Some(idx) => idx,
                None => {
                    owners.push(OwnerGroup { owner, categories: Vec::new() });
                    owners.len() - 1
                }
            };

            let (Some(category), Some(subcategory)) = (property.category(), property.subcategory()) else { continue };

            let categories = &mut owners[idx].categories;
            let cat = match categories.iter().position(|c| c.category == category) {
                Some(cat) => cat,
                None => {
                    categories.push(CategoryGroup { category, subcategories: Vec::new() });
                    categories.len() - 1
                }
            };

            let subs = &mut categories[cat].subcategories;
            if !subs.contains(&subcategory) {
                subs.push(subcategory);
            }
        }

        Self { owners }
    }

    #[inline] pub fn owners(&self) -> &[OwnerGroup] { &self.owners }
    #[inline] pub fn is_empty(&self) -> bool { self.owners.is_empty() }

    /// Look up one owner's group.
    pub fn owner(&self, owner: &str) -> Option<&OwnerGroup> {
        self.owners.iter().find(|g| g.owner == owner)
    }
}

impl OwnerGroup {
    /// Look up one category of this owner.
    pub fn category(&self, category: &str) -> Option<&CategoryGroup> {
        self.categories.iter().find(|c| c.category == category)
    }
}
