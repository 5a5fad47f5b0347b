//! Checkout - validate the ledger, encode it, hand it to a [`Download`]

use billsheet_core::Ledger;
use billsheet_xlsx::XlsxWriter;

use crate::download::{Download, FILE_NAME};
use crate::error::{BillingError, BillingResult};

/// What a successful checkout produced
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Name the workbook was delivered under
    pub file_name: String,
    /// Number of exported line items
    pub rows: usize,
    /// Grand total at the time of export
    pub grand_total: f64,
    /// Size of the encoded workbook
    pub bytes: usize,
}

/// Export the ledger as `billing.xlsx`.
///
/// An incomplete ledger is rejected with [`BillingError::Validation`] before
/// anything is encoded or delivered. The ledger itself is never modified.
pub fn checkout<D: Download + ?Sized>(
    ledger: &Ledger,
    download: &mut D,
) -> BillingResult<CheckoutReceipt> {
    if !ledger.is_valid() {
        let invalid = ledger.invalid_positions();
        log::warn!("checkout rejected, incomplete items at {:?}", invalid);
        return Err(BillingError::Validation { invalid });
    }

    let sheet = ledger.to_sheet()?;
    let bytes = XlsxWriter::to_bytes(&sheet)?;

    download
        .deliver(FILE_NAME, &bytes)
        .map_err(|source| BillingError::Download {
            file_name: FILE_NAME.to_string(),
            source,
        })?;

    log::info!(
        "checked out {} items, grand total {}",
        ledger.len(),
        billsheet_core::format_amount(ledger.grand_total())
    );

    Ok(CheckoutReceipt {
        file_name: FILE_NAME.to_string(),
        rows: sheet.row_count(),
        grand_total: ledger.grand_total(),
        bytes: bytes.len(),
    })
}
