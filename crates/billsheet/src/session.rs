//! Billing session - the state behind one billing form
//!
//! Owns the ledger and the inline error message. Edits go straight to the
//! ledger; a failed checkout leaves the ledger untouched and sets the message.

use billsheet_core::{Field, FieldUpdate, Ledger, LineItem};

use crate::checkout::{checkout, CheckoutReceipt};
use crate::download::Download;
use crate::error::{BillingError, BillingResult};

/// State of one billing form
#[derive(Debug, Clone, Default)]
pub struct BillingSession {
    ledger: Ledger,
    error_message: Option<String>,
}

impl BillingSession {
    /// Start a session with one blank line item
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from an existing ledger
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            error_message: None,
        }
    }

    /// The ledger being edited
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Message for the inline error region, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Replace one field of the item at `index`
    pub fn update_field(&mut self, index: usize, field: Field, value: &str) -> BillingResult<()> {
        self.ledger.update_field(index, field, value)?;
        Ok(())
    }

    /// Apply a typed field update
    pub fn set(&mut self, index: usize, update: FieldUpdate) -> BillingResult<()> {
        self.ledger.set(index, update)?;
        Ok(())
    }

    /// Append a blank item and return its position
    pub fn add_item(&mut self) -> usize {
        self.ledger.add_item()
    }

    /// Remove the item at `index`
    pub fn remove_item(&mut self, index: usize) -> BillingResult<LineItem> {
        Ok(self.ledger.remove_item(index)?)
    }

    /// Whether the checkout action is available: at least one item, all complete
    pub fn can_checkout(&self) -> bool {
        !self.ledger.is_empty() && self.ledger.is_valid()
    }

    /// Export the bill.
    ///
    /// On a validation failure the error message is set and returned; after
    /// a successful export the message is cleared.
    pub fn checkout<D: Download + ?Sized>(
        &mut self,
        download: &mut D,
    ) -> BillingResult<CheckoutReceipt> {
        if self.ledger.is_empty() {
            let err = BillingError::EmptyLedger;
            self.error_message = Some(err.to_string());
            return Err(err);
        }

        match checkout(&self.ledger, download) {
            Ok(receipt) => {
                self.error_message = None;
                Ok(receipt)
            }
            Err(err) => {
                if err.is_validation() {
                    self.error_message = Some(err.to_string());
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MemoryDownload;
    use billsheet_core::VALIDATION_MESSAGE;

    #[test]
    fn test_new_session() {
        let session = BillingSession::new();
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.error_message(), None);
        assert!(!session.can_checkout());
    }

    #[test]
    fn test_failed_checkout_sets_message_and_keeps_ledger() {
        let mut session = BillingSession::new();
        session.update_field(0, Field::Name, "A").unwrap();
        session.update_field(0, Field::UnitPrice, "5").unwrap();
        session.update_field(0, Field::Quantity, "2").unwrap();
        session.add_item();
        let before = session.ledger().clone();

        let mut download = MemoryDownload::new();
        let err = session.checkout(&mut download).unwrap_err();

        assert!(matches!(err, BillingError::Validation { ref invalid } if invalid == &[1]));
        assert_eq!(session.error_message(), Some(VALIDATION_MESSAGE));
        assert_eq!(session.ledger(), &before);
        assert_eq!(download.deliveries(), 0);
    }

    #[test]
    fn test_successful_checkout_clears_message() {
        let mut session = BillingSession::new();
        let mut download = MemoryDownload::new();
        assert!(session.checkout(&mut download).is_err());
        assert!(session.error_message().is_some());

        session.update_field(0, Field::Name, "Book").unwrap();
        session.update_field(0, Field::UnitPrice, "20").unwrap();
        assert!(session.can_checkout());

        let receipt = session.checkout(&mut download).unwrap();
        assert_eq!(receipt.rows, 1);
        assert_eq!(session.error_message(), None);
        assert_eq!(download.deliveries(), 1);
    }

    #[test]
    fn test_empty_session_cannot_check_out() {
        let mut session = BillingSession::new();
        session.remove_item(0).unwrap();
        assert!(!session.can_checkout());

        let mut download = MemoryDownload::new();
        let err = session.checkout(&mut download).unwrap_err();
        assert!(matches!(err, BillingError::EmptyLedger));
        assert_eq!(
            session.error_message(),
            Some("There are no products to check out.")
        );
        assert_eq!(download.deliveries(), 0);
    }

    #[test]
    fn test_out_of_range_edit() {
        let mut session = BillingSession::new();
        let err = session.remove_item(4).unwrap_err();
        assert!(matches!(
            err,
            BillingError::Ledger(billsheet_core::Error::ItemOutOfBounds(4, 1))
        ));
    }
}
