use serde::{Deserialize, Serialize};

use crate::{property::Property, selection::Selection};

/// Columns the backend's free-text search looks at.
const SEARCH_COLUMNS: [&str; 8] = [
    "title_by_document", "street", "project", "city",
    "valuation_category", "property_type", "property_use_type", "special_co",
];

/// A request for records. Backends may return a superset; the filter engine
/// narrows the result on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyQuery {
    #[default]
    All,
    Hierarchy {
        #[serde(default)]
        owners: Vec<String>,
        #[serde(default)]
        categories: Vec<String>,
        #[serde(default)]
        subcategories: Vec<String>,
    },
    PropertyTypes { types: Vec<String> },
    Search { text: String },
}

impl PropertyQuery {
    /// The narrowest backend query that still returns every record `selection` can match.
    ///
    /// The backend ANDs its parameters, so only a single-kind selection can be
    /// pushed down; mixed selections fetch everything.
    pub fn from_selection(selection: &Selection) -> Self {
        let list = |set: &std::collections::BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>();
        let kinds = [&selection.owners, &selection.categories, &selection.subcategories]
            .iter()
            .filter(|set| !set.is_empty())
            .count();

        if selection.show_all || kinds != 1 {
            return Self::All;
        }

        Self::Hierarchy {
            owners: list(&selection.owners),
            categories: list(&selection.categories),
            subcategories: list(&selection.subcategories),
        }
    }

    /// Backend path, relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Search { .. } => "/properties/search",
            _ => "/properties",
        }
    }

    /// Query-string parameters, list values joined with commas.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::All => Vec::new(),
            Self::Hierarchy { owners, categories, subcategories } => [
                ("owner", owners),
                ("category", categories),
                ("subcategory", subcategories),
            ]
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(key, values)| (key, values.join(",")))
                .collect(),
            Self::PropertyTypes { types } => vec![("propertyTypes", types.join(","))],
            Self::Search { text } => vec![("query", text.clone())],
        }
    }

    /// Evaluate the query locally, the way the backend would.
    pub fn matches(&self, property: &Property) -> bool {
        let within = |values: &[String], actual: Option<String>| {
            values.is_empty() || actual.is_some_and(|a| values.iter().any(|v| v.trim() == a))
        };

        match self {
            Self::All => true,
            Self::Hierarchy { owners, categories, subcategories } => {
                within(owners, property.owner())
                    && within(categories, property.category())
                    && within(subcategories, property.subcategory())
            }
            Self::PropertyTypes { types } => {
                !types.is_empty() && within(types, property.property_type())
            }
            Self::Search { text } => {
                let needle = text.trim().to_lowercase();
                !needle.is_empty() && SEARCH_COLUMNS.iter()
                    .filter_map(|key| property.text(key))
                    .any(|value| value.to_lowercase().contains(&needle))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_join_lists() {
        let q = PropertyQuery::Hierarchy {
            owners: vec![],
            categories: vec!["Park".into(), "Museum".into()],
            subcategories: vec!["Art".into()],
        };
        assert_eq!(q.params(), vec![("category", "Park,Museum".to_string()), ("subcategory", "Art".to_string())]);
        assert_eq!(q.path(), "/properties");
        assert_eq!(PropertyQuery::Search { text: "x".into() }.path(), "/properties/search");
    }

    #[test]
    fn from_selection_pushes_down_single_kind() {
        let mut selection = Selection::default();
        selection.categories.insert("Park".into());
        assert!(matches!(PropertyQuery::from_selection(&selection), PropertyQuery::Hierarchy { .. }));

        selection.subcategories.insert("Art".into());
        assert_eq!(PropertyQuery::from_selection(&selection), PropertyQuery::All);
        assert_eq!(PropertyQuery::from_selection(&Selection::everything()), PropertyQuery::All);
    }

    #[test]
    fn local_matching() {
        let p = Property::new().with("owner", "A").with("category", "Park").with("city", "Baku").with("property_type", "Mənzil ");
        let hierarchy = PropertyQuery::Hierarchy { owners: vec!["A".into()], categories: vec!["Park".into()], subcategories: vec![] };
        assert!(hierarchy.matches(&p));
        assert!(PropertyQuery::PropertyTypes { types: vec!["Mənzil".into()] }.matches(&p));
        assert!(PropertyQuery::Search { text: "BAK".into() }.matches(&p));
        assert!(!PropertyQuery::Search { text: " ".into() }.matches(&p));
    }
}
