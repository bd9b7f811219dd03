//! Column mapping: which spreadsheet header feeds which table column.

use super::reader::{CellValue, SheetRow};
use crate::domain::parse_number_strict;
use crate::error::{ImportError, ImportResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Table column → spreadsheet header.
pub type Assignments = BTreeMap<String, String>;

/// Conversion applied to a cell before it reaches the insert payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    None,
    /// Whole cell as a number, 0 when it is not one
    Number,
    /// Split on the separator, trimmed, blanks dropped
    TagList(char),
    Lowercase,
}

/// One importable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Header the template uses for this column
    pub excel_column: &'static str,
    /// Column (or pseudo-column) in the insert payload
    pub db_column: &'static str,
    /// Label shown to the user
    pub label: &'static str,
    pub required: bool,
    pub transform: Transform,
}

impl ColumnMapping {
    pub const fn new(excel_column: &'static str, db_column: &'static str, label: &'static str) -> Self {
        Self {
            excel_column,
            db_column,
            label,
            required: false,
            transform: Transform::None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// A data row after mapping: table column → JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedRow {
    pub row_number: usize,
    pub values: Map<String, Value>,
}

impl MappedRow {
    /// Trimmed text of a column, `None` when missing or blank.
    pub fn text(&self, column: &str) -> Option<String> {
        let text = match self.values.get(column)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Numeric column; text is parsed strictly, anything else is `None`.
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.values.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Some(parse_number_strict(s)),
            _ => None,
        }
    }

    pub fn tags(&self, column: &str) -> Vec<String> {
        match self.values.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Keyword fallback for headers that do not match a template name.
fn keyword_match(db_column: &str, header: &str) -> bool {
    let h = header.to_lowercase();
    let has = |needle: &str| h.contains(needle);
    match db_column {
        "name" => has("name") && !has("company"),
        "email" => has("email") || has("e-mail"),
        "phone" => has("phone") && !has("whatsapp"),
        "whatsapp" => has("whatsapp"),
        "company" => has("company"),
        "tags" => has("tag"),
        "notes" => has("note"),
        "title" => has("title") || has("subject"),
        "value" => has("value") || has("amount"),
        "amount" => has("amount") || has("subtotal"),
        "tax" => has("tax") || has("vat"),
        "status" => has("status"),
        "description" => has("description"),
        "expected_close_date" => has("close") || has("date"),
        "due_date" => has("due") || has("date"),
        "priority" => has("priority"),
        "invoice_number" => has("invoice") || has("number"),
        "contact" | "customer" => has("contact") || has("customer") || has("client"),
        _ => false,
    }
}

/// Pick a header for every column that has one.
///
/// A header equal (ignoring case) to the template name or label wins; then a
/// header containing the column name; then the keyword fallbacks, which never
/// reuse a header already taken.
pub fn auto_map(headers: &[String], mappings: &[ColumnMapping]) -> Assignments {
    let mut assigned = Assignments::new();

    for mapping in mappings {
        let exact = headers.iter().find(|h| {
            h.eq_ignore_ascii_case(mapping.excel_column) || h.eq_ignore_ascii_case(mapping.label)
        });
        let contains = || {
            let column = mapping.db_column.to_lowercase();
            headers.iter().find(|h| h.to_lowercase().contains(&column))
        };
        if let Some(header) = exact.or_else(contains) {
            assigned.insert(mapping.db_column.to_string(), header.clone());
        }
    }

    for mapping in mappings {
        if assigned.contains_key(mapping.db_column) {
            continue;
        }
        let header = headers.iter().find(|h| {
            !assigned.values().any(|taken| taken == *h) && keyword_match(mapping.db_column, h)
        });
        if let Some(header) = header.cloned() {
            assigned.insert(mapping.db_column.to_string(), header);
        }
    }

    assigned
}

/// Apply caller overrides (column → header; a blank header unmaps the column).
pub fn override_assignments(
    assigned: &mut Assignments,
    overrides: &BTreeMap<String, String>,
    headers: &[String],
) -> ImportResult<()> {
    for (column, header) in overrides {
        let header = header.trim();
        if header.is_empty() {
            assigned.remove(column);
            continue;
        }
        let found = headers
            .iter()
            .find(|h| h.as_str() == header)
            .or_else(|| headers.iter().find(|h| h.eq_ignore_ascii_case(header)))
            .ok_or_else(|| ImportError::UnknownColumn(header.to_string()))?;
        assigned.insert(column.clone(), found.clone());
    }
    Ok(())
}

/// Labels of required columns without a header.
pub fn missing_required(mappings: &[ColumnMapping], assigned: &Assignments) -> Vec<String> {
    mappings
        .iter()
        .filter(|m| m.required && !assigned.contains_key(m.db_column))
        .map(|m| m.label.to_string())
        .collect()
}

pub fn validate_mapping(mappings: &[ColumnMapping], assigned: &Assignments) -> ImportResult<()> {
    let missing = missing_required(mappings, assigned);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingRequiredColumns(missing))
    }
}

fn transform_cell(cell: &CellValue, transform: Transform) -> Value {
    match transform {
        Transform::None => cell.to_json(),
        Transform::Number => match cell {
            CellValue::Number(n) => Value::from(*n),
            CellValue::Bool(b) => Value::from(u8::from(*b)),
            CellValue::Text(s) => Value::from(parse_number_strict(s)),
            CellValue::DateTime(_) => Value::from(0),
        },
        Transform::TagList(separator) => Value::Array(
            cell.as_text()
                .split(separator)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Value::String(t.to_string()))
                .collect(),
        ),
        Transform::Lowercase => Value::String(cell.as_text().to_lowercase()),
    }
}

/// Map every row through the assignments; unassigned or empty cells are left out.
pub fn apply_mapping(
    rows: &[SheetRow],
    mappings: &[ColumnMapping],
    assigned: &Assignments,
) -> Vec<MappedRow> {
    rows.iter()
        .map(|row| {
            let values = mappings
                .iter()
                .filter_map(|mapping| {
                    let header = assigned.get(mapping.db_column)?;
                    let cell = row.get(header)?;
                    Some((
                        mapping.db_column.to_string(),
                        transform_cell(cell, mapping.transform),
                    ))
                })
                .collect();
            MappedRow {
                row_number: row.row_number,
                values,
            }
        })
        .collect()
}

/// First `n` mapped rows.
pub fn preview(rows: &[MappedRow], n: usize) -> Vec<MappedRow> {
    rows.iter().take(n).cloned().collect()
}
