//! Prelude module - common imports for billsheet users
//!
//! ```rust
//! use billsheet::prelude::*;
//! ```

pub use crate::{
    // Checkout
    checkout,
    BillingError,
    BillingSession,
    CheckoutReceipt,

    // Delivery
    DirectoryDownload,
    Download,
    MemoryDownload,

    // Ledger types
    ExportRecord,
    Field,
    FieldUpdate,
    Ledger,
    LineItem,
    Sheet,

    // I/O types
    XlsxReader,
    XlsxWriter,
};
