//! # billsheet
//!
//! A billing line-item ledger with spreadsheet export.
//!
//! Enter line items (product name, price, quantity), read back per-line and
//! grand totals, check that the bill is complete, and export it as a
//! single-sheet `billing.xlsx` workbook.
//!
//! ## Example
//!
//! ```rust
//! use billsheet::prelude::*;
//!
//! let mut session = BillingSession::new();
//! session.update_field(0, Field::Name, "Book").unwrap();
//! session.update_field(0, Field::UnitPrice, "20").unwrap();
//!
//! let mut download = MemoryDownload::new();
//! let receipt = session.checkout(&mut download).unwrap();
//!
//! assert_eq!(receipt.file_name, "billing.xlsx");
//! assert_eq!(receipt.grand_total, 20.0);
//! assert!(download.file("billing.xlsx").is_some());
//! ```

pub mod checkout;
pub mod download;
pub mod error;
pub mod prelude;
pub mod session;

pub use checkout::{checkout, CheckoutReceipt};
pub use download::{DirectoryDownload, Download, MemoryDownload, FILE_NAME};
pub use error::{BillingError, BillingResult};
pub use session::BillingSession;

// Re-export core types
pub use billsheet_core::{
    column_letters, format_amount, format_rupees, parse_price, parse_quantity, CellValue,
    Error, ExportRecord, Field, FieldUpdate, ItemIssue, Ledger, LineItem, Record, Result, Sheet,
    COLUMN_PRICE, COLUMN_PRODUCT_NAME, COLUMN_QUANTITY, COLUMN_TOTAL, EXPORT_COLUMNS,
    SHEET_NAME, VALIDATION_MESSAGE,
};

// Re-export I/O types
pub use billsheet_xlsx::{XlsxError, XlsxReader, XlsxWriter};
