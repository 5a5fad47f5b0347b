//! Checkout error types

use thiserror::Error;

/// Result type for checkout operations
pub type BillingResult<T> = std::result::Result<T, BillingError>;

/// Errors surfaced by checkout and the billing session
#[derive(Debug, Error)]
pub enum BillingError {
    /// At least one line item is incomplete; nothing was exported
    #[error("{}", billsheet_core::VALIDATION_MESSAGE)]
    Validation {
        /// Positions of the incomplete items
        invalid: Vec<usize>,
    },

    /// The session has no line items to export
    #[error("There are no products to check out.")]
    EmptyLedger,

    /// Ledger operation failed (e.g. position out of range)
    #[error(transparent)]
    Ledger(#[from] billsheet_core::Error),

    /// The spreadsheet could not be encoded
    #[error("Export failed: {0}")]
    Export(#[from] billsheet_xlsx::XlsxError),

    /// The encoded file could not be delivered
    #[error("Download of '{file_name}' failed: {source}")]
    Download {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl BillingError {
    /// Whether the user can fix this by editing the bill
    pub fn is_validation(&self) -> bool {
        matches!(self, BillingError::Validation { .. } | BillingError::EmptyLedger)
    }
}
