//! Bulk import of spreadsheet rows through the repositories.

use super::mapping::{
    apply_mapping, auto_map, missing_required, override_assignments, preview, validate_mapping,
    Assignments, MappedRow,
};
use super::profiles::{
    contact_from_row, deal_from_row, invoice_from_row, reminder_from_row, ContactResolver,
    ImportEntity,
};
use super::reader::{read_table, SheetData};
use super::run_blocking;
use crate::error::ImportResult;
use crate::models::Contact;
use crate::repositories::{
    ContactRepository, DealRepository, InvoiceRepository, ReminderRepository,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// A row left out of an import and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub entity: ImportEntity,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

/// What an import would do, before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPreview {
    pub entity: ImportEntity,
    pub headers: Vec<String>,
    /// Table column → spreadsheet header
    pub mapping: Assignments,
    /// Labels of required columns that no header feeds
    pub missing_required: Vec<String>,
    pub total_rows: usize,
    pub rows: Vec<MappedRow>,
}

/// Turns spreadsheets into bulk inserts for the signed-in user.
pub struct SpreadsheetImporter {
    contacts: Arc<dyn ContactRepository>,
    deals: Arc<dyn DealRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    reminders: Arc<dyn ReminderRepository>,
    match_threshold: u8,
    preview_rows: usize,
}

/// Read a spreadsheet off the async runtime.
async fn load(path: impl AsRef<Path>) -> ImportResult<SheetData> {
    let path = path.as_ref().to_path_buf();
    run_blocking(move || read_table(path)).await
}

/// Convert rows, collecting the ones that fail into `skipped`.
fn convert<T>(
    rows: &[MappedRow],
    skipped: &mut Vec<SkippedRow>,
    mut convert_row: impl FnMut(&MappedRow) -> Result<T, String>,
) -> Vec<T> {
    let mut valid = Vec::with_capacity(rows.len());
    for row in rows {
        match convert_row(row) {
            Ok(record) => valid.push(record),
            Err(reason) => {
                tracing::warn!("Skipping row {}: {}", row.row_number, reason);
                skipped.push(SkippedRow {
                    row_number: row.row_number,
                    reason,
                });
            }
        }
    }
    valid
}

impl SpreadsheetImporter {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        deals: Arc<dyn DealRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        reminders: Arc<dyn ReminderRepository>,
        match_threshold: u8,
        preview_rows: usize,
    ) -> Self {
        Self {
            contacts,
            deals,
            invoices,
            reminders,
            match_threshold,
            preview_rows,
        }
    }

    /// Automatic header assignment with the caller's overrides on top.
    pub fn plan(
        &self,
        entity: ImportEntity,
        data: &SheetData,
        overrides: &BTreeMap<String, String>,
    ) -> ImportResult<Assignments> {
        let mut assigned = auto_map(&data.headers, entity.profile().columns);
        override_assignments(&mut assigned, overrides, &data.headers)?;
        Ok(assigned)
    }

    pub fn preview(
        &self,
        entity: ImportEntity,
        data: &SheetData,
        overrides: &BTreeMap<String, String>,
    ) -> ImportResult<ImportPreview> {
        let columns = entity.profile().columns;
        let mapping = self.plan(entity, data, overrides)?;
        let rows = apply_mapping(&data.rows, columns, &mapping);
        Ok(ImportPreview {
            entity,
            headers: data.headers.clone(),
            missing_required: missing_required(columns, &mapping),
            mapping,
            total_rows: rows.len(),
            rows: preview(&rows, self.preview_rows),
        })
    }

    pub async fn preview_file(
        &self,
        entity: ImportEntity,
        path: impl AsRef<Path>,
        overrides: &BTreeMap<String, String>,
    ) -> ImportResult<ImportPreview> {
        let data = load(path).await?;
        self.preview(entity, &data, overrides)
    }

    pub async fn import_file(
        &self,
        entity: ImportEntity,
        path: impl AsRef<Path>,
        overrides: &BTreeMap<String, String>,
    ) -> ImportResult<ImportReport> {
        let data = load(path).await?;
        self.import(entity, &data, overrides).await
    }

    /// Validate the mapping, skip rows missing required values and insert
    /// the rest in one request.
    pub async fn import(
        &self,
        entity: ImportEntity,
        data: &SheetData,
        overrides: &BTreeMap<String, String>,
    ) -> ImportResult<ImportReport> {
        let columns = entity.profile().columns;
        let mapping = self.plan(entity, data, overrides)?;
        validate_mapping(columns, &mapping)?;
        let rows = apply_mapping(&data.rows, columns, &mapping);

        let linked_contacts = self.linked_contacts(entity, &mapping).await?;
        let mut skipped = Vec::new();

        // The resolver is scoped to the conversion so it is gone before the insert awaits.
        let imported = match entity {
            ImportEntity::Contacts => {
                let valid = convert(&rows, &mut skipped, contact_from_row);
                if valid.is_empty() {
                    0
                } else {
                    self.contacts.create_many(&valid).await?.len()
                }
            }
            ImportEntity::Deals => {
                let valid = {
                    let mut resolver =
                        ContactResolver::new(&linked_contacts, self.match_threshold);
                    convert(&rows, &mut skipped, |row| deal_from_row(row, &mut resolver))
                };
                if valid.is_empty() {
                    0
                } else {
                    self.deals.create_many(&valid).await?.len()
                }
            }
            ImportEntity::Invoices => {
                let valid = {
                    let mut resolver =
                        ContactResolver::new(&linked_contacts, self.match_threshold);
                    convert(&rows, &mut skipped, |row| invoice_from_row(row, &mut resolver))
                };
                if valid.is_empty() {
                    0
                } else {
                    self.invoices.create_many(&valid).await?.len()
                }
            }
            ImportEntity::Reminders => {
                let valid = convert(&rows, &mut skipped, reminder_from_row);
                if valid.is_empty() {
                    0
                } else {
                    self.reminders.create_many(&valid).await?.len()
                }
            }
        };

        tracing::info!(
            "Imported {} {} ({} rows, {} skipped)",
            imported,
            entity,
            rows.len(),
            skipped.len()
        );
        Ok(ImportReport {
            entity,
            total_rows: rows.len(),
            imported,
            skipped,
        })
    }

    /// Contacts to match names against; only fetched when a contact column is mapped.
    async fn linked_contacts(
        &self,
        entity: ImportEntity,
        mapping: &Assignments,
    ) -> ImportResult<Vec<Contact>> {
        match entity.contact_column() {
            Some(column) if mapping.contains_key(column) => Ok(self.contacts.list_by_name().await?),
            _ => Ok(Vec::new()),
        }
    }
}
