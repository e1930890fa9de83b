#![doc = "parcelview public API"]
mod config;
mod filter;
mod geometry;
mod property;
mod provider;
mod selection;
mod style;
mod sync;
mod viewport;

#[cfg(feature = "export")]
mod export;
#[cfg(feature = "runtime")]
mod search;

#[doc(inline)]
pub use config::{ColorEntry, ColorScheme, StaticLayer, ViewerConfig};

#[doc(inline)]
pub use property::{ColumnDef, ColumnKind, Property, COLUMNS, column, visible_columns_for};

#[doc(inline)]
pub use geometry::{
    PolygonSet, RawGeometry, Shape, ShapeIndex, classify, normalize_point, normalize_polygon, normalize_property,
};

#[doc(inline)]
pub use selection::{
    CategoryGroup, GroupedLayers, NodeState, OwnerGroup, Selection, SelectionNode, SelectionTree, StaticLayers,
};

#[doc(inline)]
pub use filter::{
    CombineOp, FilterRule, Operator, RuleParseError, RuleSet, WorkingSet, compute_working_set, search_suggestions,
    select_records, suggestion_label,
};

#[doc(inline)]
pub use viewport::{FitTarget, Target, compute_target};

#[doc(inline)]
pub use style::{Color, ShapeStyle, resolve_style};

#[doc(inline)]
pub use provider::{DataProvider, FileProvider, MemProvider, PropertyQuery, ProviderError};

#[cfg(feature = "http")]
#[doc(inline)]
pub use provider::HttpProvider;

#[doc(inline)]
pub use sync::{
    LogNotifier, MapRenderer, Notice, NoticeLevel, Notifier, ShapeAttributes, SortOrder, SortState, SyncController,
    TableRenderer, TableViewState,
};

#[cfg(feature = "export")]
#[doc(inline)]
pub use export::{ExportError, ExportScope, export_csv, write_csv_file};

#[cfg(feature = "runtime")]
#[doc(inline)]
pub use search::{SearchDebouncer, SearchOutcome};
