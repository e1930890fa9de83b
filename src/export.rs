use std::{fs::File, path::Path};

use anyhow::Context;
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom, PolarsError}, series::Series};
use thiserror::Error;

use crate::property::{Property, column};

/// Which table rows to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportScope {
    /// Only the checked rows.
    #[default]
    Selected,
    /// Every row of the working set.
    All,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no rows to export")]
    NothingToExport,
    #[error("failed to build CSV: {0}")]
    Frame(#[from] PolarsError),
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Build the export table: a 1-based `Index` column, then one column per
/// visible key headed by its label. Missing values are empty cells.
fn export_frame(rows: &[&Property], columns: &[&str]) -> Result<DataFrame, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let index: Vec<u32> = (1..=rows.len() as u32).collect();
    let mut series: Vec<Column> = vec![Series::new("Index".into(), index).into()];

    for key in columns {
        let label = column(key).map_or(*key, |col| col.label);
        let values: Vec<Option<String>> = rows.iter()
            .map(|row| row.text(key))
            .collect();
        series.push(Series::new(label.into(), values).into());
    }

    Ok(DataFrame::new(series)?)
}

/// Render rows as CSV text.
pub fn export_csv(rows: &[&Property], columns: &[&str]) -> Result<String, ExportError> {
    let mut df = export_frame(rows, columns)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).finish(&mut df)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write rows as CSV to a file.
pub fn write_csv_file(rows: &[&Property], columns: &[&str], path: &Path) -> anyhow::Result<()> {
    let mut df = export_frame(rows, columns)?;
    let file = File::create(path)
        .with_context(|| format!("[export] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[export] Failed to write CSV to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_index_and_labels() {
        let a = Property::new().with("owner", "Acme").with("total_area", 120);
        let b = Property::new().with("owner", "Beta");
        let csv = export_csv(&[&a, &b], &["owner", "total_area"]).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Index,Owner,Total Area (m²)");
        assert_eq!(lines[1], "1,Acme,120");
        assert_eq!(lines[2], "2,Beta,");
    }

    #[test]
    fn empty_export_is_an_error() {
        assert!(matches!(export_csv(&[], &["owner"]), Err(ExportError::NothingToExport)));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let a = Property::new().with("city", "Baku");
        write_csv_file(&[&a], &["city"], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().next(), Some("Index,City"));
    }
}
