//! Ledger type - the ordered list of line items on a bill

use crate::error::{Error, Result};
use crate::item::{Field, FieldUpdate, LineItem};
use crate::record::{ExportRecord, EXPORT_COLUMNS};
use crate::sheet::Sheet;
use crate::SHEET_NAME;

/// The bill being edited
///
/// Items keep entry order. Every mutation recomputes the affected item total
/// and the grand total before returning, so neither is ever stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    items: Vec<LineItem>,
    grand_total: f64,
}

impl Ledger {
    /// Create a ledger holding exactly one blank item
    pub fn new() -> Self {
        Self {
            items: vec![LineItem::blank()],
            grand_total: 0.0,
        }
    }

    /// Create a ledger with no items
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            grand_total: 0.0,
        }
    }

    /// Number of line items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the ledger has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in entry order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get an item by position
    pub fn item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Sum of all item totals
    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Replace one field of the item at `index` with raw user text.
    ///
    /// Unparseable numbers are not an error; see [`crate::parse_price`] and
    /// [`crate::parse_quantity`].
    pub fn update_field(&mut self, index: usize, field: Field, value: &str) -> Result<()> {
        self.set(index, FieldUpdate::new(field, value))
    }

    /// Apply a typed field update to the item at `index`
    pub fn set(&mut self, index: usize, update: FieldUpdate) -> Result<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(Error::ItemOutOfBounds(index, len))?;

        let field = update.field();
        item.apply(update);
        log::debug!(
            "item {} {} updated, total now {}",
            index,
            field,
            item.total()
        );

        self.recompute_grand_total();
        Ok(())
    }

    /// Append a blank item and return its position
    pub fn add_item(&mut self) -> usize {
        self.items.push(LineItem::blank());
        let index = self.items.len() - 1;
        log::debug!("added blank item at {}", index);
        index
    }

    /// Remove the item at `index`. Removing the last item leaves an empty ledger.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.items.len() {
            return Err(Error::ItemOutOfBounds(index, self.items.len()));
        }

        let removed = self.items.remove(index);
        self.recompute_grand_total();
        log::debug!(
            "removed item {} ({} left, grand total {})",
            index,
            self.items.len(),
            self.grand_total
        );
        Ok(removed)
    }

    /// True when every item has a name, a positive price, a positive quantity
    /// and a finite total
    pub fn is_valid(&self) -> bool {
        self.items.iter().all(LineItem::is_complete)
    }

    /// Positions of the items that would block checkout
    pub fn invalid_positions(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_complete())
            .map(|(i, _)| i)
            .collect()
    }

    /// Flatten the items into export records, in entry order
    pub fn to_records(&self) -> Vec<ExportRecord> {
        self.items.iter().map(ExportRecord::from).collect()
    }

    /// Build the "Billing" sheet handed to the spreadsheet encoder.
    ///
    /// An empty ledger gives a sheet holding only the export header.
    pub fn to_sheet(&self) -> Result<Sheet> {
        if self.items.is_empty() {
            let header = EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
            return Sheet::new(SHEET_NAME, header);
        }
        let records: Vec<_> = self.to_records().iter().map(ExportRecord::to_record).collect();
        Sheet::from_records(SHEET_NAME, &records)
    }

    fn recompute_grand_total(&mut self) {
        self.grand_total = self.items.iter().map(LineItem::total).sum();
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn filled(name: &str, price: &str, qty: &str) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.update_field(0, Field::Name, name).unwrap();
        ledger.update_field(0, Field::UnitPrice, price).unwrap();
        ledger.update_field(0, Field::Quantity, qty).unwrap();
        ledger
    }

    #[test]
    fn test_new_ledger_has_one_blank_item() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.item(0), Some(&LineItem::blank()));
        assert_eq!(ledger.grand_total(), 0.0);
        assert!(!ledger.is_valid());
    }

    #[test]
    fn test_pen_scenario() {
        let ledger = filled("Pen", "10", "3");
        assert_eq!(ledger.item(0).unwrap().total(), 30.0);
        assert_eq!(ledger.grand_total(), 30.0);
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_add_item_appends_blank() {
        let mut ledger = filled("Pen", "10", "3");
        let before = ledger.item(0).cloned();

        let idx = ledger.add_item();
        assert_eq!(idx, 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.item(0).cloned(), before);
        assert_eq!(ledger.item(1), Some(&LineItem::blank()));
        assert_eq!(ledger.grand_total(), 30.0);
        assert_eq!(ledger.invalid_positions(), vec![1]);
    }

    #[test]
    fn test_remove_item_updates_grand_total() {
        let mut ledger = filled("A", "5", "2");
        ledger.add_item();
        ledger.update_field(1, Field::Name, "B").unwrap();
        ledger.update_field(1, Field::UnitPrice, "7").unwrap();
        ledger.add_item();
        ledger.update_field(2, Field::Name, "C").unwrap();
        ledger.update_field(2, Field::UnitPrice, "1").unwrap();
        assert_eq!(ledger.grand_total(), 18.0);

        let removed = ledger.remove_item(1).unwrap();
        assert_eq!(removed.name(), "B");
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.item(0).unwrap().name(), "A");
        assert_eq!(ledger.item(1).unwrap().name(), "C");
        assert_eq!(ledger.grand_total(), 11.0);
    }

    #[test]
    fn test_remove_last_item_leaves_empty_ledger() {
        let mut ledger = Ledger::new();
        ledger.remove_item(0).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.grand_total(), 0.0);
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.update_field(3, Field::Name, "x"),
            Err(Error::ItemOutOfBounds(3, 1))
        );
        assert_eq!(ledger.remove_item(1), Err(Error::ItemOutOfBounds(1, 1)));
        assert_eq!(ledger, Ledger::new());
    }

    #[test]
    fn test_invalid_second_item() {
        let mut ledger = filled("A", "5", "2");
        ledger.add_item();
        assert_eq!(ledger.item(0).unwrap().total(), 10.0);
        assert!(!ledger.is_valid());
        assert_eq!(ledger.invalid_positions(), vec![1]);
    }

    #[test]
    fn test_to_records_and_sheet() {
        let ledger = filled("Book", "20", "1");
        let records = ledger.to_records();
        assert_eq!(
            records,
            vec![ExportRecord {
                product_name: "Book".into(),
                price: 20.0,
                quantity: 1,
                total: 20.0,
            }]
        );

        let sheet = ledger.to_sheet().unwrap();
        assert_eq!(sheet.name(), "Billing");
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(
            sheet.rows()[0],
            vec![
                CellValue::string("Book"),
                CellValue::Number(20.0),
                CellValue::Number(1.0),
                CellValue::Number(20.0),
            ]
        );
    }

    #[test]
    fn test_empty_ledger_sheet_keeps_header() {
        let sheet = Ledger::empty().to_sheet().unwrap();
        assert_eq!(sheet.header(), &EXPORT_COLUMNS);
        assert_eq!(sheet.row_count(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Edit(usize, Field, String),
        Add,
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let field = prop_oneof![
            Just(Field::Name),
            Just(Field::UnitPrice),
            Just(Field::Quantity)
        ];
        let value = prop_oneof![
            "[0-9]{1,4}",
            "[0-9]{1,3}\\.[0-9]{1,2}",
            "-?[0-9]{1,2}",
            "[a-z ]{0,6}",
        ];
        prop_oneof![
            4 => (0usize..6, field, value).prop_map(|(i, f, v)| Op::Edit(i, f, v)),
            1 => Just(Op::Add),
            1 => (0usize..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn derived_totals_never_go_stale(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let blank = LineItem::blank();
            let mut ledger = Ledger::new();
            for op in ops {
                let before = ledger.clone();
                match op {
                    Op::Edit(i, field, value) => {
                        let result = ledger.update_field(i, field, &value);
                        prop_assert_eq!(result.is_ok(), i < before.len());
                        prop_assert_eq!(ledger.len(), before.len());
                    }
                    Op::Add => {
                        ledger.add_item();
                        prop_assert_eq!(ledger.len(), before.len() + 1);
                        prop_assert_eq!(&ledger.items()[..before.len()], before.items());
                        prop_assert_eq!(ledger.items().last(), Some(&blank));
                    }
                    Op::Remove(i) => {
                        match ledger.remove_item(i) {
                            Ok(_) => {
                                let mut expected = before.items().to_vec();
                                expected.remove(i);
                                prop_assert_eq!(ledger.items(), &expected[..]);
                            }
                            Err(_) => {
                                prop_assert_eq!(&ledger, &before);
                            }
                        }
                    }
                }

                for item in ledger.items() {
                    prop_assert_eq!(item.total(), item.unit_price() * item.quantity() as f64);
                }
                let sum: f64 = ledger.items().iter().map(LineItem::total).sum();
                prop_assert_eq!(ledger.grand_total(), sum);

                let expected_valid = ledger.items().iter().all(|item| {
                    !item.name().is_empty() && item.unit_price() > 0.0 && item.quantity() > 0
                });
                prop_assert_eq!(ledger.is_valid(), expected_valid);
            }
        }
    }
}
