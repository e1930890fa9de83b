use std::{collections::HashMap, fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A fill or outline colour: `[r, g, b, a]` or any CSS colour string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Rgba([f64; 4]),
    Css(String),
}

/// Fill and outline colour for one subcategory or property type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub color: Color,
    pub outline: Color,
}

/// Colour lookup tables. The key `"null"` styles records with a blank value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorScheme {
    pub subcategory: HashMap<String, ColorEntry>,
    pub property_type: HashMap<String, ColorEntry>,
}

/// One entry of the flat layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLayer {
    pub id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

/// Viewer settings. Every field has a default, so a partial JSON file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the REST backend.
    pub api_base: String,
    /// Quiet period before a search keystroke is sent.
    pub search_debounce_ms: u64,
    /// Maximum number of search suggestions.
    pub suggestion_limit: usize,
    /// Rows per table window when scrolling.
    pub table_window: usize,
    /// Half-size (degrees) of the clickable square around point shapes.
    pub click_tolerance: f64,
    /// Check every layer once data is loaded.
    pub select_all_on_load: bool,
    pub colors: ColorScheme,
    pub static_layers: Vec<StaticLayer>,
    /// Layer id that shows every record when nothing else is checked.
    pub show_all_layer: String,
}

impl ViewerConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("[config] Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[config] Failed to parse {}", path.display()))
    }

    #[inline] pub fn search_debounce(&self) -> Duration { Duration::from_millis(self.search_debounce_ms) }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.example.com".into(),
            search_debounce_ms: 250,
            suggestion_limit: 20,
            table_window: 100,
            click_tolerance: 0.0005,
            select_all_on_load: true,
            colors: ColorScheme::default(),
            static_layers: default_static_layers(),
            show_all_layer: "investmentProperty".into(),
        }
    }
}

fn rgba(r: f64, g: f64, b: f64, a: f64, outline: &str) -> ColorEntry {
    ColorEntry { color: Color::Rgba([r, g, b, a]), outline: Color::Css(outline.into()) }
}

fn css(color: &str, outline: &str) -> ColorEntry {
    ColorEntry { color: Color::Css(color.into()), outline: Color::Css(outline.into()) }
}

impl Default for ColorScheme {
    fn default() -> Self {
        let subcategory = [
            ("Urban Park", rgba(34.0, 139.0, 34.0, 0.65, "#1f7a1f")),
            ("Panoramic Park", rgba(46.0, 139.0, 87.0, 0.65, "#2e8b57")),
            ("Medieval Architecture", rgba(139.0, 69.0, 19.0, 0.65, "#8b4513")),
            ("Religious Historical Site", rgba(75.0, 0.0, 130.0, 0.65, "#4b0082")),
            ("Heritage Urban Area", rgba(205.0, 92.0, 92.0, 0.65, "#cd5c5c")),
            ("Museum", rgba(70.0, 130.0, 180.0, 0.65, "#4682b4")),
            ("Performing Arts Venue", rgba(255.0, 140.0, 0.0, 0.65, "#ff8c00")),
            ("Cultural & Memorial Center", rgba(72.0, 61.0, 139.0, 0.65, "#483d8b")),
            ("Executive Authority", rgba(0.0, 100.0, 0.0, 0.65, "#006400")),
            ("Ministry", rgba(0.0, 128.0, 128.0, 0.65, "#008080")),
            ("Judicial Institution", rgba(128.0, 0.0, 0.0, 0.65, "#800000")),
        ];
        let property_type = [
            ("Əmlak kompleksi", css("#dc4b00cc", "#dc4b00ff")),
            ("Qeyri-yaşayış binası", css("#3c6ccc80", "#3c6cccff")),
            ("Çoxmərtəbəli yaşayış bina", css("#d9dc00cc", "#d9dc00ff")),
            ("Torpaq sahəsi", css("#8B4513cc", "#8B4513ff")),
            ("Fərdi yaşayış evi", css("#1a9641cc", "#1a9641ff")),
            ("Qeyri-yaşayış sahəsi", css("#d99f00cc", "#d99f00ff")),
            ("Mənzil", css("#4db478cc", "#4db478ff")),
            ("null", css("#80808080", "#808080ff")),
        ];

        Self {
            subcategory: subcategory.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            property_type: property_type.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

fn default_static_layers() -> Vec<StaticLayer> {
    let layer = |id: &str, category: &str, subcategory: Option<&str>| StaticLayer {
        id: id.into(),
        category: category.into(),
        subcategory: subcategory.map(Into::into),
    };

    vec![
        layer("nonResidentialLayer", "Park", None),
        layer("nonResidentialBuildings", "Park", Some("Urban Park")),
        layer("nonResidentialPremises", "Park", Some("Panoramic Park")),
        layer("residentialLayer", "Historical Place", None),
        layer("apartmentsLayer", "Historical Place", Some("Medieval Architecture")),
        layer("residentialGroup", "Historical Place", Some("Religious Historical Site")),
        layer("singleFamilyHouses", "Historical Place", Some("Heritage Urban Area")),
        layer("landsLayer", "Cultural Building", None),
        layer("landsSubLayer", "Cultural Building", Some("Museum")),
        layer("performingArtsVenues", "Cultural Building", Some("Performing Arts Venue")),
        layer("culturalMemorialCenters", "Cultural Building", Some("Cultural & Memorial Center")),
        layer("propertyCompoundsLayer", "Governmental Building", None),
        layer("propertyCompoundsSubLayer", "Governmental Building", Some("Executive Authority")),
        layer("ministries", "Governmental Building", Some("Ministry")),
        layer("judicialInstitutions", "Governmental Building", Some("Judicial Institution")),
    ]
}
