//! Reading CSV and Excel files into header-keyed rows.

use crate::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

/// A non-empty cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// ISO 8601 date-time as stored in the workbook
    DateTime(String),
}

impl CellValue {
    /// Cell rendered as text (`5000`, `1.5`, `true`, ...).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => Value::String(s.clone()),
            CellValue::Number(n) => Value::from(*n),
            CellValue::Bool(b) => Value::Bool(*b),
        }
    }
}

/// One data row. `row_number` is the 1-based row in the sheet (headers are row 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub row_number: usize,
    pub cells: BTreeMap<String, CellValue>,
}

impl SheetRow {
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }
}

/// First sheet of a workbook (or the whole CSV file).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Workbook,
}

fn detect_format(name: &str) -> ImportResult<Format> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(Format::Csv),
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(Format::Workbook),
        _ => Err(ImportError::UnsupportedFormat(name.to_string())),
    }
}

/// Read a spreadsheet from disk, choosing the parser by extension.
pub fn read_table(path: impl AsRef<Path>) -> ImportResult<SheetData> {
    let path = path.as_ref();
    let name = path.to_string_lossy().into_owned();
    // Reject unknown formats before touching the filesystem.
    detect_format(&name)?;
    let bytes = std::fs::read(path)?;
    read_table_bytes(&name, &bytes)
}

/// Read an in-memory spreadsheet; `name` only supplies the extension.
pub fn read_table_bytes(name: &str, bytes: &[u8]) -> ImportResult<SheetData> {
    let data = match detect_format(name)? {
        Format::Csv => read_csv(bytes)?,
        Format::Workbook => read_workbook(bytes)?,
    };
    if data.rows.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    tracing::debug!(
        "Read {} rows x {} columns from {}",
        data.rows.len(),
        data.headers.len(),
        name
    );
    Ok(data)
}

fn read_csv(bytes: &[u8]) -> ImportResult<SheetData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Read(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ImportError::Read(e.to_string()))?;
        let row_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);
        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, value)| !header.is_empty() && !value.is_empty())
            .map(|(header, value)| (header.clone(), CellValue::Text(value.to_string())))
            .collect();
        if !cells.is_empty() {
            rows.push(SheetRow { row_number, cells });
        }
    }

    Ok(SheetData { headers, rows })
}

/// Excel (1900 system) serial day number as `YYYY-MM-DDTHH:MM:SS`.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    let ts = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(ts.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| CellValue::Text(s.to_string()))
        }
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(match excel_serial_to_iso(dt.as_f64()) {
            Some(iso) => CellValue::DateTime(iso),
            None => CellValue::Number(dt.as_f64()),
        }),
        Data::DateTimeIso(s) => Some(CellValue::DateTime(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
    }
}

fn read_workbook(bytes: &[u8]) -> ImportResult<SheetData> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Read(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Read("Workbook has no sheets".to_string()))?
        .map_err(|e| ImportError::Read(e.to_string()))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Err(ImportError::EmptyFile),
    };

    let mut rows = Vec::new();
    for (index, row) in rows_iter.enumerate() {
        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .filter_map(|(header, cell)| cell_value(cell).map(|v| (header.clone(), v)))
            .collect();
        if !cells.is_empty() {
            rows.push(SheetRow {
                row_number: first_row + index + 2,
                cells,
            });
        }
    }

    Ok(SheetData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_rows_are_trimmed_and_sparse() {
        let csv = "Name, Phone ,Email\n Ana ,123,\n,,\nRui,456,rui@example.com\n";
        let data = read_table_bytes("contacts.csv", csv.as_bytes()).unwrap();

        assert_eq!(data.headers, vec!["Name", "Phone", "Email"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(
            data.rows[0].get("Name"),
            Some(&CellValue::Text("Ana".to_string()))
        );
        assert_eq!(data.rows[0].get("Email"), None);
        assert_eq!(data.rows[1].row_number, 4);
    }

    #[test]
    fn test_csv_flexible_record_length() {
        let csv = "Title,Value\nAudit\nRedesign,5000,extra\n";
        let data = read_table_bytes("deals.CSV", csv.as_bytes()).unwrap();
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = read_table_bytes("contacts.csv", b"Name,Phone\n").unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile));
    }

    #[test]
    fn test_unsupported_format() {
        let err = read_table_bytes("contacts.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
        assert!(err.to_string().starts_with("Please select an Excel or CSV file"));
    }

    #[test]
    fn test_cell_value_text() {
        assert_eq!(CellValue::Number(5000.0).as_text(), "5000");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
        assert_eq!(CellValue::Bool(true).to_json(), Value::Bool(true));
    }

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(excel_serial_to_iso(45366.0).as_deref(), Some("2024-03-15T00:00:00"));
        assert_eq!(excel_serial_to_iso(45366.5).as_deref(), Some("2024-03-15T12:00:00"));
        assert_eq!(excel_serial_to_iso(-1.0), None);
    }

    #[test]
    fn test_workbook_cells() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String("  ".into())), None);
        assert_eq!(cell_value(&Data::Int(7)), Some(CellValue::Number(7.0)));
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-03-15".into())),
            Some(CellValue::DateTime("2024-03-15".into()))
        );
    }
}
