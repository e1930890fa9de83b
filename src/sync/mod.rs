mod controller;
mod render;
mod view;

pub use controller::SyncController;
pub use render::{LogNotifier, MapRenderer, Notice, NoticeLevel, Notifier, ShapeAttributes, TableRenderer};
pub use view::{SortOrder, SortState, TableViewState};
