//! Spreadsheet import and export.
//!
//! Import is a four step pipeline: read the first sheet into header-keyed
//! rows, assign headers to table columns, map and transform the cells, then
//! convert each row into an insert payload. Rows missing required values
//! are skipped and reported; the rest go to the backend in one bulk insert.

pub mod export;
pub mod importer;
pub mod mapping;
pub mod profiles;
pub mod reader;
pub mod template;

pub use export::{default_file_name, export_records, to_csv, to_xlsx, ExportData, ExportFormat};
pub use importer::{ImportPreview, ImportReport, SkippedRow, SpreadsheetImporter};
pub use mapping::{
    apply_mapping, auto_map, preview, validate_mapping, Assignments, ColumnMapping, MappedRow,
    Transform,
};
pub use profiles::{ImportEntity, ImportProfile, TemplateColumn};
pub use reader::{read_table, read_table_bytes, CellValue, SheetData, SheetRow};
pub use template::{template_file_name, write_template};

use crate::error::{ImportError, ImportResult};

/// Run file reads and writes on the blocking thread pool.
pub async fn run_blocking<T, F>(op: F) -> ImportResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ImportResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(op).await.map_err(|e| {
        ImportError::Io(std::io::Error::other(format!("Task join error: {}", e)))
    })?
}
