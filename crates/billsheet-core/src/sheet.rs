//! Sheet type - a named header + rows grid ready for encoding

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::{MAX_COLS, MAX_SHEET_NAME_LEN};

/// A single worksheet: one header row followed by data rows
///
/// Every data row has exactly as many cells as the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet with the given name and header
    pub fn new<S: Into<String>>(name: S, header: Vec<String>) -> Result<Self> {
        let name = name.into();
        validate_sheet_name(&name)?;
        if header.len() > MAX_COLS as usize {
            return Err(Error::ColumnOutOfBounds(header.len(), MAX_COLS));
        }
        Ok(Self {
            name,
            header,
            rows: Vec::new(),
        })
    }

    /// Build a sheet from records.
    ///
    /// The header lists every column in the order it is first seen across
    /// the records; a record without a column leaves that cell empty.
    pub fn from_records<S: Into<String>>(name: S, records: &[Record]) -> Result<Self> {
        let mut header: Vec<String> = Vec::new();
        for record in records {
            for column in record.columns() {
                if !header.iter().any(|h| h == column) {
                    header.push(column.to_string());
                }
            }
        }

        let mut sheet = Self::new(name, header)?;
        for record in records {
            let row = sheet
                .header
                .iter()
                .map(|column| record.get(column).cloned().unwrap_or_default())
                .collect();
            sheet.rows.push(row);
        }
        Ok(sheet)
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column titles
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows (header excluded)
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.header.len() {
            return Err(Error::RowWidthMismatch {
                row: self.rows.len(),
                expected: self.header.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Get a data cell by 0-based row and column
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a data cell by row and column title
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.header.iter().position(|h| h == column)?;
        self.cell(row, col)
    }
}

/// Check a sheet name against Excel's rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("name cannot be empty".into()));
    }

    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "name exceeds {} characters",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
    if name.chars().any(|c| INVALID_CHARS.contains(&c)) {
        return Err(Error::InvalidSheetName(format!(
            "name contains invalid characters: {}",
            name
        )));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(
            "name cannot start or end with apostrophe".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_follows_first_appearance() {
        let mut first = Record::new();
        first.insert("Product Name", "Pen");
        first.insert("Quantity", 2_i64);
        let mut second = Record::new();
        second.insert("Product Name", "Ink");
        second.insert("Note", "refill");

        let sheet = Sheet::from_records("Billing", &[first, second]).unwrap();
        assert_eq!(sheet.header(), &["Product Name", "Quantity", "Note"]);
        assert_eq!(
            sheet.rows()[1],
            vec![
                CellValue::string("Ink"),
                CellValue::Empty,
                CellValue::string("refill")
            ]
        );
        assert_eq!(sheet.value(0, "Quantity"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_no_records_gives_empty_sheet() {
        let sheet = Sheet::from_records("Billing", &[]).unwrap();
        assert_eq!(sheet.column_count(), 0);
        assert_eq!(sheet.row_count(), 0);
    }

    #[test]
    fn test_sheet_name_rules() {
        assert!(Sheet::new("Billing", vec![]).is_ok());
        assert!(Sheet::new("", vec![]).is_err());
        assert!(Sheet::new("a/b", vec![]).is_err());
        assert!(Sheet::new("'quoted", vec![]).is_err());
        assert!(Sheet::new("x".repeat(32), vec![]).is_err());
        assert!(Sheet::new("x".repeat(31), vec![]).is_ok());
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut sheet = Sheet::new("Billing", vec!["A".into(), "B".into()]).unwrap();
        assert!(sheet.push_row(vec![1.0.into(), "x".into()]).is_ok());
        assert_eq!(
            sheet.push_row(vec![1.0.into()]),
            Err(Error::RowWidthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }
}
