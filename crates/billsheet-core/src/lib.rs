//! # billsheet-core
//!
//! Core data structures for the billsheet billing ledger.
//!
//! This crate provides the fundamental types used throughout billsheet:
//! - [`LineItem`] - One row of the bill (product, price, quantity, derived total)
//! - [`Ledger`] - The ordered list of line items and its grand total
//! - [`ExportRecord`] and [`Sheet`] - The flat records and grid handed to the encoder
//! - [`CellValue`] - Values stored in sheet cells
//!
//! Nothing here performs I/O; encoding and delivery live in `billsheet-xlsx`
//! and `billsheet`.
//!
//! ## Example
//!
//! ```rust
//! use billsheet_core::{Field, Ledger};
//!
//! let mut ledger = Ledger::new();
//! ledger.update_field(0, Field::Name, "Pen").unwrap();
//! ledger.update_field(0, Field::UnitPrice, "10").unwrap();
//! ledger.update_field(0, Field::Quantity, "3").unwrap();
//!
//! assert_eq!(ledger.item(0).unwrap().total(), 30.0);
//! assert_eq!(ledger.grand_total(), 30.0);
//! assert!(ledger.is_valid());
//! ```

pub mod cell;
pub mod error;
pub mod format;
pub mod item;
pub mod ledger;
pub mod record;
pub mod sheet;

// Re-exports for convenience
pub use cell::{column_letters, CellValue};
pub use error::{Error, Result};
pub use format::{format_amount, format_rupees};
pub use item::{parse_price, parse_quantity, Field, FieldUpdate, ItemIssue, LineItem};
pub use ledger::Ledger;
pub use record::{
    ExportRecord, Record, COLUMN_PRICE, COLUMN_PRODUCT_NAME, COLUMN_QUANTITY, COLUMN_TOTAL,
    EXPORT_COLUMNS,
};
pub use sheet::{validate_sheet_name, Sheet};

/// Name of the single worksheet in an exported bill
pub const SHEET_NAME: &str = "Billing";

/// Message shown when checkout is attempted on an incomplete ledger
pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields.";

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;
