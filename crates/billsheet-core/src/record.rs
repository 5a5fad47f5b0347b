//! Export records - the flat rows handed to the spreadsheet encoder

use crate::cell::CellValue;
use crate::item::LineItem;

/// Column title for the product name
pub const COLUMN_PRODUCT_NAME: &str = "Product Name";
/// Column title for the unit price
pub const COLUMN_PRICE: &str = "Price (₹)";
/// Column title for the quantity
pub const COLUMN_QUANTITY: &str = "Quantity";
/// Column title for the line total
pub const COLUMN_TOTAL: &str = "Total (₹)";

/// Export columns, in sheet order
pub const EXPORT_COLUMNS: [&str; 4] = [
    COLUMN_PRODUCT_NAME,
    COLUMN_PRICE,
    COLUMN_QUANTITY,
    COLUMN_TOTAL,
];

/// One exported line item
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportRecord {
    #[cfg_attr(feature = "serde", serde(rename = "Product Name"))]
    pub product_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "Price (₹)"))]
    pub price: f64,
    #[cfg_attr(feature = "serde", serde(rename = "Quantity"))]
    pub quantity: i64,
    #[cfg_attr(feature = "serde", serde(rename = "Total (₹)"))]
    pub total: f64,
}

impl ExportRecord {
    /// Convert to a generic column-name -> value record
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(COLUMN_PRODUCT_NAME, self.product_name.as_str());
        record.insert(COLUMN_PRICE, self.price);
        record.insert(COLUMN_QUANTITY, self.quantity);
        record.insert(COLUMN_TOTAL, self.total);
        record
    }
}

impl From<&LineItem> for ExportRecord {
    fn from(item: &LineItem) -> Self {
        Self {
            product_name: item.name().to_string(),
            price: item.unit_price(),
            quantity: item.quantity(),
            total: item.total(),
        }
    }
}

/// A flat mapping of column name to value that keeps insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any previous value for that column
    pub fn insert<K: Into<String>, V: Into<CellValue>>(&mut self, column: K, value: V) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Get the value for a column
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns set
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no column is set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_column_order() {
        let record = ExportRecord {
            product_name: "Book".into(),
            price: 20.0,
            quantity: 1,
            total: 20.0,
        }
        .to_record();

        assert_eq!(record.columns().collect::<Vec<_>>(), EXPORT_COLUMNS.to_vec());
        assert_eq!(record.get(COLUMN_PRODUCT_NAME), Some(&CellValue::string("Book")));
        assert_eq!(record.get(COLUMN_QUANTITY), Some(&CellValue::Number(1.0)));
        assert_eq!(record.get("Discount"), None);
    }

    #[test]
    fn test_insert_replaces_existing_column() {
        let mut record = Record::new();
        record.insert("A", 1.0);
        record.insert("B", "x");
        record.insert("A", 2.0);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("A"), Some(&CellValue::Number(2.0)));
    }
}
