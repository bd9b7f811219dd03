//! Spreadsheet import, export and template tests over in-memory repositories.

mod mocks;

use crm_mcp_server::models::{DealStatus, NewContact, ReminderPriority};
use crm_mcp_server::spreadsheet::*;
use crm_mcp_server::ImportError;
use mocks::MockRepositories;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn importer(mocks: &MockRepositories) -> SpreadsheetImporter {
    SpreadsheetImporter::new(
        Arc::new(mocks.contacts.clone()),
        Arc::new(mocks.deals.clone()),
        Arc::new(mocks.invoices.clone()),
        Arc::new(mocks.reminders.clone()),
        60,
        5,
    )
}

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn no_overrides() -> BTreeMap<String, String> {
    BTreeMap::new()
}

#[tokio::test]
async fn test_import_contacts_skips_incomplete_rows() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "contacts.csv",
        "Name,Phone,Email,Tags\n\
         Ana Silva,+5511999990000,ana@example.com,\"client, vip\"\n\
         Bruno,,bruno@example.com,\n\
         Carla Souza,+5511888880000,,\n",
    );

    let report = importer(&mocks)
        .import_file(ImportEntity::Contacts, &path, &no_overrides())
        .await
        .unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.imported, 2);
    assert_eq!(
        report.skipped,
        vec![SkippedRow {
            row_number: 3,
            reason: "Name and phone are required".to_string(),
        }]
    );
    assert_eq!(mocks.contacts.get_call_count("create_many"), 1);
    assert_eq!(mocks.contacts.len(), 2);
}

#[tokio::test]
async fn test_import_fails_when_required_column_unmapped() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "contacts.csv", "Full Name,Email\nAna,ana@example.com\n");

    let err = importer(&mocks)
        .import_file(ImportEntity::Contacts, &path, &no_overrides())
        .await
        .unwrap_err();

    match err {
        ImportError::MissingRequiredColumns(missing) => assert_eq!(missing, vec!["Phone"]),
        other => panic!("Expected MissingRequiredColumns, got {:?}", other),
    }
    assert_eq!(mocks.contacts.get_call_count("create_many"), 0);
}

#[tokio::test]
async fn test_import_with_column_override() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "contacts.csv", "Full Name,Mobile\nAna,123\n");

    let mut overrides = BTreeMap::new();
    overrides.insert("phone".to_string(), "mobile".to_string());

    let report = importer(&mocks)
        .import_file(ImportEntity::Contacts, &path, &overrides)
        .await
        .unwrap();
    assert_eq!(report.imported, 1);

    overrides.insert("phone".to_string(), "Fax".to_string());
    let err = importer(&mocks)
        .import_file(ImportEntity::Contacts, &path, &overrides)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::UnknownColumn(ref h) if h == "Fax"));
}

#[tokio::test]
async fn test_import_deals_resolves_contact_names() {
    let mocks = MockRepositories::new();
    mocks.contacts.add_contacts(&[NewContact {
        name: "Ana Silva".to_string(),
        email: None,
        phone: "1".to_string(),
        whatsapp: None,
        company: None,
        notes: None,
        tags: Vec::new(),
    }]);
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "deals.csv",
        "Title,Value,Status,Contact\n\
         Website,1500,WON,ana silva\n\
         Logo,300,someday,Nobody Known\n",
    );

    let report = importer(&mocks)
        .import_file(ImportEntity::Deals, &path, &no_overrides())
        .await
        .unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(mocks.contacts.get_call_count("list_by_name"), 1);

    let deals = mocks.deals.all();
    let website = deals.iter().find(|d| d.title == "Website").unwrap();
    assert_eq!(website.value, 1500.0);
    assert_eq!(website.status, DealStatus::Won);
    assert_eq!(website.contact_id.as_deref(), Some("contact-1"));

    let logo = deals.iter().find(|d| d.title == "Logo").unwrap();
    assert_eq!(logo.status, DealStatus::New);
    assert_eq!(logo.contact_id, None);
}

#[tokio::test]
async fn test_import_reminders_without_contacts_lookup() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "reminders.csv",
        "Title,Due Date,Priority\nCall Ana,2024-03-15,HIGH\nNo date,,low\n",
    );

    let report = importer(&mocks)
        .import_file(ImportEntity::Reminders, &path, &no_overrides())
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped[0].reason, "Title and due date are required");
    assert_eq!(mocks.contacts.get_call_count("list_by_name"), 0);
    let reminders = mocks.reminders.all();
    assert_eq!(reminders[0].priority, ReminderPriority::High);
    assert!(!reminders[0].is_completed);
}

#[tokio::test]
async fn test_import_surfaces_backend_error() {
    let mocks = MockRepositories::new();
    mocks
        .invoices
        .fail_writes(409, "duplicate key value violates unique constraint");
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "invoices.csv",
        "Invoice Number,Amount,Tax,Due Date\nINV-001,1000,100,2024-04-01\n",
    );

    let err = importer(&mocks)
        .import_file(ImportEntity::Invoices, &path, &no_overrides())
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "duplicate key value violates unique constraint"
    );
}

#[tokio::test]
async fn test_import_all_rows_skipped_writes_nothing() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "deals.csv", "Title,Value\n,100\n,200\n");

    let report = importer(&mocks)
        .import_file(ImportEntity::Deals, &path, &no_overrides())
        .await
        .unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(mocks.deals.get_call_count("create_many"), 0);
}

#[tokio::test]
async fn test_preview_reports_missing_columns() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();
    let rows: String = (1..=8).map(|i| format!("Deal {},{}\n", i, i * 100)).collect();
    let path = write_csv(&dir, "deals.csv", &format!("Deal Title,Amount\n{}", rows));

    let preview = importer(&mocks)
        .preview_file(ImportEntity::Deals, &path, &no_overrides())
        .await
        .unwrap();

    assert_eq!(preview.total_rows, 8);
    assert_eq!(preview.rows.len(), 5);
    assert_eq!(preview.mapping.get("title").map(String::as_str), Some("Deal Title"));
    assert_eq!(preview.mapping.get("value").map(String::as_str), Some("Amount"));
    assert!(preview.missing_required.is_empty());

    let path = write_csv(&dir, "invoices.csv", "Number,Notes\nINV-1,x\n");
    let preview = importer(&mocks)
        .preview_file(ImportEntity::Invoices, &path, &no_overrides())
        .await
        .unwrap();
    assert_eq!(preview.missing_required, vec!["Due Date"]);
}

#[tokio::test]
async fn test_unsupported_and_empty_files() {
    let mocks = MockRepositories::new();
    let dir = TempDir::new().unwrap();

    let path = write_csv(&dir, "contacts.txt", "Name,Phone\nAna,1\n");
    let err = importer(&mocks)
        .preview_file(ImportEntity::Contacts, &path, &no_overrides())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));

    let path = write_csv(&dir, "empty.csv", "Name,Phone\n");
    let err = importer(&mocks)
        .preview_file(ImportEntity::Contacts, &path, &no_overrides())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::EmptyFile));
}

#[tokio::test]
async fn test_export_then_reimport_contacts() {
    let mocks = MockRepositories::new();
    let contacts = mocks.contacts.add_contacts(&[NewContact {
        name: "Ana Silva".to_string(),
        email: Some("ana@example.com".to_string()),
        phone: "+5511999990000".to_string(),
        whatsapp: None,
        company: Some("Acme".to_string()),
        notes: None,
        tags: vec!["client".to_string(), "vip".to_string()],
    }]);
    let dir = TempDir::new().unwrap();

    let path = export_records(
        &ExportData::Contacts(contacts),
        ExportFormat::Xlsx,
        dir.path(),
    )
    .unwrap();
    assert_eq!(path.file_name().unwrap(), "contacts.xlsx");

    let target = MockRepositories::new();
    let report = importer(&target)
        .import_file(ImportEntity::Contacts, &path, &no_overrides())
        .await
        .unwrap();
    assert_eq!(report.imported, 1);

    let imported = target.contacts.all();
    assert_eq!(imported[0].name, "Ana Silva");
    assert_eq!(imported[0].company.as_deref(), Some("Acme"));
    assert_eq!(imported[0].email.as_deref(), Some("ana@example.com"));
}

#[test]
fn test_template_headers_map_to_every_column() {
    let dir = TempDir::new().unwrap();
    for entity in [
        ImportEntity::Contacts,
        ImportEntity::Deals,
        ImportEntity::Invoices,
        ImportEntity::Reminders,
    ] {
        let path = write_template(entity, dir.path()).unwrap();
        let data = read_table(&path).unwrap();
        let mapping = auto_map(&data.headers, entity.profile().columns);
        assert!(
            validate_mapping(entity.profile().columns, &mapping).is_ok(),
            "{} template misses a required column",
            entity
        );
    }
}
