use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::dom::{Document, NodeId};

/// Serializes a table element into comma-separated text: one record per
/// `tr` row, one field per `th`/`td` cell, cell text trimmed.
pub struct TableExporter;

impl TableExporter {
    /// Timestamped download name, e.g. `appointments_20260830_141530.csv`.
    pub fn default_filename(stem: &str) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.csv", stem, timestamp)
    }

    /// Render the table's rows as CSV text. Missing table -> `None`.
    pub fn to_csv_string(doc: &Document, table_id: &str) -> Result<Option<String>> {
        let Some(table) = doc.get_element_by_id(table_id) else {
            return Ok(None);
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in Self::rows(doc, table) {
            let record: Vec<String> = Self::cells(doc, row)
                .into_iter()
                .map(|cell| doc.text(cell).trim().to_string())
                .collect();
            writer.write_record(&record)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(Some(String::from_utf8(bytes)?))
    }

    /// Write the table to a CSV file (the browser-download analog).
    /// Returns the written path and row count, or `None` when the table
    /// does not exist.
    pub fn export_to_file(
        doc: &Document,
        table_id: &str,
        path: &Path,
    ) -> Result<Option<(PathBuf, usize)>> {
        let Some(table) = doc.get_element_by_id(table_id) else {
            return Ok(None);
        };

        let rows = Self::rows(doc, table);
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for row in &rows {
            let record: Vec<String> = Self::cells(doc, *row)
                .into_iter()
                .map(|cell| doc.text(cell).trim().to_string())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(Some((path.to_path_buf(), rows.len())))
    }

    fn rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
        doc.descendants(table)
            .into_iter()
            .filter(|n| doc.get(*n).map(|el| el.tag == "tr").unwrap_or(false))
            .collect()
    }

    fn cells(doc: &Document, row: NodeId) -> Vec<NodeId> {
        doc.children(row)
            .into_iter()
            .filter(|n| {
                doc.get(*n)
                    .map(|el| el.tag == "td" || el.tag == "th")
                    .unwrap_or(false)
            })
            .collect()
    }
}
