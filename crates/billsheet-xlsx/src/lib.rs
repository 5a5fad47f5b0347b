//! # billsheet-xlsx
//!
//! XLSX (Office Open XML) writer and reader for billsheet.
//!
//! The writer encodes one [`billsheet_core::Sheet`] as a single-sheet
//! workbook; the reader loads the first sheet of a workbook back into a
//! [`billsheet_core::Sheet`].

pub mod error;
pub mod reader;
pub mod writer;

mod escape;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
