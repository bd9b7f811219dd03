//! CSV and Excel exports of the user's records.

use super::profiles::ImportEntity;
use crate::domain::format_date;
use crate::error::{ImportError, ImportResult};
use crate::models::{Contact, Deal, Invoice, Reminder};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `<entity>.csv` or `<entity>.xlsx`.
pub fn default_file_name(entity: ImportEntity, format: ExportFormat) -> String {
    format!("{}.{}", entity, format.extension())
}

/// Records to export, already fetched for the user.
#[derive(Debug, Clone)]
pub enum ExportData {
    Contacts(Vec<Contact>),
    Deals(Vec<Deal>),
    Invoices(Vec<Invoice>),
    Reminders(Vec<Reminder>),
}

impl ExportData {
    pub fn entity(&self) -> ImportEntity {
        match self {
            ExportData::Contacts(_) => ImportEntity::Contacts,
            ExportData::Deals(_) => ImportEntity::Deals,
            ExportData::Invoices(_) => ImportEntity::Invoices,
            ExportData::Reminders(_) => ImportEntity::Reminders,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExportData::Contacts(rows) => rows.len(),
            ExportData::Deals(rows) => rows.len(),
            ExportData::Invoices(rows) => rows.len(),
            ExportData::Reminders(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn opt(value: &Option<String>) -> Self {
        Cell::Text(value.clone().unwrap_or_default())
    }

    fn date(value: &str) -> Self {
        Cell::Text(format_date(value))
    }

    fn opt_date(value: &Option<String>) -> Self {
        Cell::Text(value.as_deref().map(format_date).unwrap_or_default())
    }

    fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

struct Table {
    headers: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

fn csv_table(data: &ExportData) -> Table {
    match data {
        ExportData::Contacts(contacts) => Table {
            headers: &[
                "Name", "Email", "Phone", "WhatsApp", "Company", "Tags", "Notes", "Created At",
            ],
            rows: contacts
                .iter()
                .map(|c| {
                    vec![
                        text(&c.name),
                        Cell::opt(&c.email),
                        text(&c.phone),
                        Cell::opt(&c.whatsapp),
                        Cell::opt(&c.company),
                        Cell::Text(c.tags.join("; ")),
                        Cell::opt(&c.notes),
                        Cell::date(&c.created_at),
                    ]
                })
                .collect(),
        },
        ExportData::Deals(deals) => Table {
            headers: &[
                "Title",
                "Contact",
                "Value",
                "Status",
                "Description",
                "Expected Close Date",
                "Created At",
            ],
            rows: deals
                .iter()
                .map(|d| {
                    vec![
                        text(&d.title),
                        text(d.contact_name().unwrap_or_default()),
                        Cell::Number(d.value),
                        text(d.status.as_str()),
                        Cell::opt(&d.description),
                        Cell::opt_date(&d.expected_close_date),
                        Cell::date(&d.created_at),
                    ]
                })
                .collect(),
        },
        ExportData::Invoices(invoices) => Table {
            headers: &[
                "Invoice Number",
                "Customer",
                "Amount",
                "Tax",
                "Total",
                "Status",
                "Due Date",
                "Paid Date",
                "Created At",
            ],
            rows: invoices
                .iter()
                .map(|i| {
                    vec![
                        text(&i.invoice_number),
                        text(i.customer_name().unwrap_or_default()),
                        Cell::Number(i.amount),
                        Cell::Number(i.tax),
                        Cell::Number(i.total),
                        text(i.status.as_str()),
                        Cell::date(&i.due_date),
                        Cell::opt_date(&i.paid_date),
                        Cell::date(&i.created_at),
                    ]
                })
                .collect(),
        },
        ExportData::Reminders(_) => xlsx_table(data),
    }
}

fn xlsx_table(data: &ExportData) -> Table {
    match data {
        ExportData::Contacts(contacts) => Table {
            headers: &["Name", "Phone", "Email", "WhatsApp", "Company", "Notes"],
            rows: contacts
                .iter()
                .map(|c| {
                    vec![
                        text(&c.name),
                        text(&c.phone),
                        Cell::opt(&c.email),
                        Cell::opt(&c.whatsapp),
                        Cell::opt(&c.company),
                        Cell::opt(&c.notes),
                    ]
                })
                .collect(),
        },
        ExportData::Deals(deals) => Table {
            headers: &["Title", "Value", "Status", "Contact", "Close Date", "Description"],
            rows: deals
                .iter()
                .map(|d| {
                    vec![
                        text(&d.title),
                        Cell::Number(d.value),
                        text(d.status.as_str()),
                        text(d.contact_name().unwrap_or_default()),
                        Cell::opt_date(&d.expected_close_date),
                        Cell::opt(&d.description),
                    ]
                })
                .collect(),
        },
        ExportData::Invoices(invoices) => Table {
            headers: &[
                "Invoice #", "Customer", "Amount", "Tax", "Total", "Status", "Due Date",
            ],
            rows: invoices
                .iter()
                .map(|i| {
                    vec![
                        text(&i.invoice_number),
                        text(i.customer_name().unwrap_or_default()),
                        Cell::Number(i.amount),
                        Cell::Number(i.tax),
                        Cell::Number(i.total),
                        text(i.status.as_str()),
                        Cell::date(&i.due_date),
                    ]
                })
                .collect(),
        },
        ExportData::Reminders(reminders) => Table {
            headers: &["Title", "Description", "Due Date", "Priority", "Completed", "Contact"],
            rows: reminders
                .iter()
                .map(|r| {
                    vec![
                        text(&r.title),
                        Cell::opt(&r.description),
                        Cell::date(&r.due_date),
                        text(r.priority.as_str()),
                        Cell::Bool(r.is_completed),
                        text(r.contact_name().unwrap_or_default()),
                    ]
                })
                .collect(),
        },
    }
}

/// CSV text: every cell quoted, embedded quotes doubled, `\n` between rows.
pub fn to_csv(data: &ExportData) -> ImportResult<String> {
    let table = csv_table(data);
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let write_err = |e: csv::Error| ImportError::Write(e.to_string());
    writer.write_record(table.headers).map_err(write_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Cell::render))
            .map_err(write_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Write(e.to_string()))
}

/// Single-sheet workbook named `Data` with a bold header row.
pub fn to_xlsx(data: &ExportData) -> ImportResult<Workbook> {
    let table = xlsx_table(data);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let write_err = |e: rust_xlsxwriter::XlsxError| ImportError::Write(e.to_string());
    sheet.set_name("Data").map_err(write_err)?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(write_err)?;
    }
    for (index, row) in table.rows.iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            let written = match cell {
                Cell::Text(s) => sheet.write_string(row_num, col, s),
                Cell::Number(n) => sheet.write_number(row_num, col, *n),
                Cell::Bool(b) => sheet.write_boolean(row_num, col, *b),
            };
            written.map_err(write_err)?;
        }
    }
    Ok(workbook)
}

/// Write `data` to `path`, or to `<entity>.<ext>` inside `path` when it is a directory.
pub fn export_records(
    data: &ExportData,
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> ImportResult<PathBuf> {
    let path = path.as_ref();
    let target = if path.is_dir() {
        path.join(default_file_name(data.entity(), format))
    } else {
        path.to_path_buf()
    };

    match format {
        ExportFormat::Csv => std::fs::write(&target, to_csv(data)?)?,
        ExportFormat::Xlsx => to_xlsx(data)?
            .save(&target)
            .map_err(|e| ImportError::Write(e.to_string()))?,
    }
    tracing::info!(
        "Exported {} {} to {}",
        data.len(),
        data.entity(),
        target.display()
    );
    Ok(target)
}
