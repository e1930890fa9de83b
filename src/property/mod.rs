mod columns;
mod record;

pub use columns::{COLUMNS, ColumnDef, ColumnKind, column, visible_columns_for};
pub use record::Property;

pub(crate) use record::{parse_float, value_number, value_text};
