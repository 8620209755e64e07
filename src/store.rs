use crate::errors::ApiError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{SecondsFormat, Utc};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Fixed column order for the contacts sheet. Legacy files with a different
/// column set are rewritten into this schema on the next append; unknown
/// columns are dropped, missing fields become empty strings.
const COLUMNS: [&str; 4] = ["name", "email", "mobile", "date"];

const SHEET_NAME: &str = "Contacts";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub date: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read contacts workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("failed to write contacts workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("contacts workbook has no sheets")]
    NoSheet,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        log::error!("error saving contact to workbook: {e}");
        ApiError::Internal("Failed to save contact.".into())
    }
}

/// Sole owner of the contacts spreadsheet. Every operation is a full
/// read-modify-write of the backing file, serialized behind an internal
/// mutex so overlapping submissions cannot drop each other's rows.
pub struct ContactStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Appends one record with a server-assigned UTC timestamp and rewrites
    /// the whole file. A missing backing file is the first-submission case
    /// and starts from an empty record set.
    pub fn append_contact(&self, name: &str, email: &str, mobile: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.read_records()?;
        records.push(ContactRecord {
            name: name.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.write_records(&records)
    }

    pub fn load_contacts(&self) -> Result<Vec<ContactRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_records()
    }

    fn read_records(&self) -> Result<Vec<ContactRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let range = workbook.worksheet_range_at(0).ok_or(StoreError::NoSheet)??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(cell_to_string).collect(),
            None => return Ok(Vec::new()),
        };
        let col_of =
            |field: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(field));
        let cols: Vec<Option<usize>> = COLUMNS.iter().map(|f| col_of(f)).collect();

        let mut records = Vec::new();
        for row in rows {
            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(cell_to_string)
                    .unwrap_or_default()
            };
            records.push(ContactRecord {
                name: field(cols[0]),
                email: field(cols[1]),
                mobile: field(cols[2]),
                date: field(cols[3]),
            });
        }
        Ok(records)
    }

    fn write_records(&self, records: &[ContactRecord]) -> Result<(), StoreError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (col, header) in COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header)?;
        }
        for (i, rec) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, rec.name.as_str())?;
            sheet.write_string(row, 1, rec.email.as_str())?;
            sheet.write_string(row, 2, rec.mobile.as_str())?;
            sheet.write_string(row, 3, rec.date.as_str())?;
        }
        let buf = workbook.save_to_buffer()?;

        // Replace the file in one rename so a reader never sees a half
        // written workbook.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&buf)?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        // Other tools store digit-only values as numbers; mobile numbers
        // must come back as their integer string form.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_at(tmp: &TempDir) -> ContactStore {
        ContactStore::new(tmp.path().join("contacts.xlsx"))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_at(&tmp);
        assert!(store.load_contacts().unwrap().is_empty());
    }

    #[test]
    fn sequential_appends_accumulate_complete_records() {
        let tmp = TempDir::new().unwrap();
        let store = store_at(&tmp);
        for i in 0..3 {
            store
                .append_contact(
                    &format!("User {i}"),
                    &format!("user{i}@example.org"),
                    "5550100",
                )
                .unwrap();
        }
        let records = store.load_contacts().unwrap();
        assert_eq!(records.len(), 3);
        for rec in &records {
            assert!(!rec.name.is_empty());
            assert!(!rec.email.is_empty());
            assert!(!rec.mobile.is_empty());
            assert!(!rec.date.is_empty());
        }
        // ISO-8601 timestamps compare correctly as strings.
        assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn round_trip_preserves_field_values() {
        let tmp = TempDir::new().unwrap();
        let store = store_at(&tmp);
        store
            .append_contact("Ada Lovelace", "ada@example.org", "+44 20 7946 0001")
            .unwrap();
        let records = store.load_contacts().unwrap();
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].email, "ada@example.org");
        assert_eq!(records[0].mobile, "+44 20 7946 0001");
    }

    #[test]
    fn numeric_mobile_cells_coerce_to_digit_strings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contacts.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "email").unwrap();
        sheet.write_string(0, 2, "mobile").unwrap();
        sheet.write_string(0, 3, "date").unwrap();
        sheet.write_string(1, 0, "Grace").unwrap();
        sheet.write_string(1, 1, "grace@example.org").unwrap();
        sheet.write_number(1, 2, 9876543210.0).unwrap();
        sheet.write_string(1, 3, "2026-01-01T00:00:00.000Z").unwrap();
        workbook.save(&path).unwrap();

        let store = ContactStore::new(path);
        let records = store.load_contacts().unwrap();
        assert_eq!(records[0].mobile, "9876543210");
    }

    #[test]
    fn legacy_columns_migrate_into_fixed_schema() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contacts.xlsx");
        // Older file: different column order, no mobile/date, plus a column
        // the schema does not know.
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "email").unwrap();
        sheet.write_string(0, 1, "name").unwrap();
        sheet.write_string(0, 2, "company").unwrap();
        sheet.write_string(1, 0, "old@example.org").unwrap();
        sheet.write_string(1, 1, "Old Contact").unwrap();
        sheet.write_string(1, 2, "Acme").unwrap();
        workbook.save(&path).unwrap();

        let store = ContactStore::new(path);
        store
            .append_contact("New Contact", "new@example.org", "5550100")
            .unwrap();

        let records = store.load_contacts().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Old Contact");
        assert_eq!(records[0].email, "old@example.org");
        assert_eq!(records[0].mobile, "");
        assert_eq!(records[0].date, "");
        assert_eq!(records[1].name, "New Contact");
        assert!(!records[1].date.is_empty());
    }
}
