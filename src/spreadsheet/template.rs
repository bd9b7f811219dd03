//! Import templates: a header row of labels and one example row.

use super::profiles::ImportEntity;
use crate::error::{ImportError, ImportResult};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// `<entity>_template.xlsx`
pub fn template_file_name(entity: ImportEntity) -> String {
    format!("{}_template.xlsx", entity)
}

/// Write the import template for `entity` into `dir`.
pub fn write_template(entity: ImportEntity, dir: impl AsRef<Path>) -> ImportResult<PathBuf> {
    let path = dir.as_ref().join(template_file_name(entity));
    let write_err = |e: rust_xlsxwriter::XlsxError| ImportError::Write(e.to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Template").map_err(write_err)?;

    let bold = Format::new().set_bold();
    for (col, column) in entity.profile().template.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, column.label, &bold)
            .map_err(write_err)?;
        sheet.write_string(1, col, column.example).map_err(write_err)?;
    }
    workbook.save(&path).map_err(write_err)?;

    tracing::info!("Wrote {} template to {}", entity, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::reader::{read_table, CellValue};

    #[test]
    fn test_template_round_trips_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template(ImportEntity::Contacts, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "contacts_template.xlsx");

        let data = read_table(&path).unwrap();
        assert_eq!(data.headers[0], "Name");
        assert_eq!(data.headers.len(), 7);
        assert_eq!(data.rows.len(), 1);
        assert_eq!(
            data.rows[0].get("Tags"),
            Some(&CellValue::Text("client,vip".to_string()))
        );
    }
}
