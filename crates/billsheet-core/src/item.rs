//! Line items and the lenient parsing of user-entered numbers

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An editable field of a [`LineItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Product name (free text)
    Name,
    /// Unit price (parsed as a decimal number)
    UnitPrice,
    /// Quantity (parsed as an integer)
    Quantity,
}

impl Field {
    /// All editable fields, in display order
    pub const ALL: [Field; 3] = [Field::Name, Field::UnitPrice, Field::Quantity];

    /// Canonical lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::UnitPrice => "price",
            Field::Quantity => "quantity",
        }
    }

    /// Whether editing this field changes the item total
    pub fn affects_total(&self) -> bool {
        matches!(self, Field::UnitPrice | Field::Quantity)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "product" => Ok(Field::Name),
            "price" | "unit_price" | "unitprice" => Ok(Field::UnitPrice),
            "quantity" | "qty" => Ok(Field::Quantity),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

/// A typed single-field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    UnitPrice(String),
    Quantity(String),
}

impl FieldUpdate {
    /// Build an update from a field and its raw text
    pub fn new<S: Into<String>>(field: Field, value: S) -> Self {
        match field {
            Field::Name => FieldUpdate::Name(value.into()),
            Field::UnitPrice => FieldUpdate::UnitPrice(value.into()),
            Field::Quantity => FieldUpdate::Quantity(value.into()),
        }
    }

    /// The field this update targets
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Name(_) => Field::Name,
            FieldUpdate::UnitPrice(_) => Field::UnitPrice,
            FieldUpdate::Quantity(_) => Field::Quantity,
        }
    }
}

/// A requirement a line item fails before checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemIssue {
    MissingName,
    NonPositivePrice,
    NonPositiveQuantity,
    /// `unit_price * quantity` does not fit in an `f64`
    TotalOverflow,
}

impl fmt::Display for ItemIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ItemIssue::MissingName => "product name is required",
            ItemIssue::NonPositivePrice => "price must be greater than 0",
            ItemIssue::NonPositiveQuantity => "quantity must be at least 1",
            ItemIssue::TotalOverflow => "total is too large",
        };
        f.write_str(msg)
    }
}

/// One row of the bill
///
/// The raw text the user typed for price and quantity is kept next to the
/// effective numbers, so the display can echo the input while `total` is
/// always `unit_price * quantity`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineItem {
    name: String,
    price_input: String,
    quantity_input: String,
    unit_price: f64,
    quantity: i64,
    total: f64,
}

impl LineItem {
    /// A blank item: no name, price 0, quantity 1, total 0
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            price_input: "0".to_string(),
            quantity_input: "1".to_string(),
            unit_price: 0.0,
            quantity: 1,
            total: 0.0,
        }
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price text as last entered
    pub fn price_input(&self) -> &str {
        &self.price_input
    }

    /// Quantity text as last entered
    pub fn quantity_input(&self) -> &str {
        &self.quantity_input
    }

    /// Effective unit price
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Effective quantity
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Derived line total (`unit_price * quantity`)
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Replace one field. Price and quantity edits reparse both numeric
    /// inputs and recompute the total.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => {
                self.name = name;
                return;
            }
            FieldUpdate::UnitPrice(text) => self.price_input = text,
            FieldUpdate::Quantity(text) => self.quantity_input = text,
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.unit_price = parse_price(&self.price_input);
        self.quantity = parse_quantity(&self.quantity_input);
        self.total = self.unit_price * self.quantity as f64;
    }

    /// Whether the item has a name, a positive price, a positive quantity and
    /// a finite total
    pub fn is_complete(&self) -> bool {
        self.issues().is_empty()
    }

    /// Requirements this item currently fails
    pub fn issues(&self) -> Vec<ItemIssue> {
        let mut issues = Vec::new();
        if self.name.is_empty() {
            issues.push(ItemIssue::MissingName);
        }
        if self.unit_price <= 0.0 {
            issues.push(ItemIssue::NonPositivePrice);
        }
        if self.quantity <= 0 {
            issues.push(ItemIssue::NonPositiveQuantity);
        }
        if !self.total.is_finite() {
            issues.push(ItemIssue::TotalOverflow);
        }
        issues
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank()
    }
}

/// Parse a user-entered price.
///
/// Uses the longest leading decimal number (`"12.5kg"` is 12.5). Text with no
/// numeric prefix, or one that overflows to infinity, yields 0.
pub fn parse_price(text: &str) -> f64 {
    let s = text.trim();
    let bytes = s.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;

    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            pos = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when followed by at least one digit
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_end = pos + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            pos = exp_end;
        }
    }

    match s[..pos].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a user-entered quantity.
///
/// Uses the longest leading integer (`"3.7"` is 3). Text with no integer
/// prefix, or one that does not fit, yields 1.
pub fn parse_quantity(text: &str) -> i64 {
    let s = text.trim();
    let bytes = s.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }

    if pos == digits_start {
        return 1;
    }

    s[..pos].parse::<i64>().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_item() {
        let item = LineItem::blank();
        assert_eq!(item.name(), "");
        assert_eq!(item.unit_price(), 0.0);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.total(), 0.0);
        assert_eq!(
            item.issues(),
            vec![ItemIssue::MissingName, ItemIssue::NonPositivePrice]
        );
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("10"), 10.0);
        assert_eq!(parse_price(" 2.50 "), 2.5);
        assert_eq!(parse_price(".5"), 0.5);
        assert_eq!(parse_price("5."), 5.0);
        assert_eq!(parse_price("12.5kg"), 12.5);
        assert_eq!(parse_price("1e3"), 1000.0);
        assert_eq!(parse_price("2e"), 2.0);
        assert_eq!(parse_price("-4"), -4.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("abc"), 0.0);
        assert_eq!(parse_price("."), 0.0);
        assert_eq!(parse_price("-"), 0.0);
        assert_eq!(parse_price("1e999"), 0.0);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 7 "), 7);
        assert_eq!(parse_quantity("3.7"), 3);
        assert_eq!(parse_quantity("4 boxes"), 4);
        assert_eq!(parse_quantity("0"), 0);
        assert_eq!(parse_quantity("-2"), -2);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("many"), 1);
        assert_eq!(parse_quantity("+"), 1);
        assert_eq!(parse_quantity("99999999999999999999"), 1);
    }

    #[test]
    fn test_price_edit_reparses_both_inputs() {
        let mut item = LineItem::blank();
        item.apply(FieldUpdate::Quantity("3".into()));
        assert_eq!(item.total(), 0.0);

        item.apply(FieldUpdate::UnitPrice("10".into()));
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.total(), 30.0);
        assert_eq!(item.price_input(), "10");
    }

    #[test]
    fn test_unparseable_input_falls_back() {
        let mut item = LineItem::blank();
        item.apply(FieldUpdate::UnitPrice("8".into()));
        item.apply(FieldUpdate::Quantity("lots".into()));
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.total(), 8.0);
        assert_eq!(item.quantity_input(), "lots");

        item.apply(FieldUpdate::UnitPrice("free".into()));
        assert_eq!(item.unit_price(), 0.0);
        assert_eq!(item.total(), 0.0);
    }

    #[test]
    fn test_name_edit_keeps_total() {
        let mut item = LineItem::blank();
        item.apply(FieldUpdate::UnitPrice("5".into()));
        item.apply(FieldUpdate::Name("Pen".into()));
        assert_eq!(item.name(), "Pen");
        assert_eq!(item.total(), 5.0);
        assert!(item.is_complete());
    }

    #[test]
    fn test_zero_quantity_is_incomplete() {
        let mut item = LineItem::blank();
        item.apply(FieldUpdate::Name("Pen".into()));
        item.apply(FieldUpdate::UnitPrice("5".into()));
        item.apply(FieldUpdate::Quantity("0".into()));
        assert_eq!(item.total(), 0.0);
        assert_eq!(item.issues(), vec![ItemIssue::NonPositiveQuantity]);
    }

    #[test]
    fn test_overflowing_total_is_incomplete() {
        let mut item = LineItem::blank();
        item.apply(FieldUpdate::Name("Gold".into()));
        item.apply(FieldUpdate::UnitPrice("1e308".into()));
        assert!(item.is_complete());

        item.apply(FieldUpdate::Quantity("10".into()));
        assert!(item.total().is_infinite());
        assert_eq!(item.issues(), vec![ItemIssue::TotalOverflow]);
        assert!(!item.is_complete());
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("name".parse::<Field>().unwrap(), Field::Name);
        assert_eq!("Price".parse::<Field>().unwrap(), Field::UnitPrice);
        assert_eq!("unitPrice".parse::<Field>().unwrap(), Field::UnitPrice);
        assert_eq!("QTY".parse::<Field>().unwrap(), Field::Quantity);
        assert_eq!(
            "colour".parse::<Field>(),
            Err(Error::UnknownField("colour".into()))
        );
    }

    #[test]
    fn test_field_update_roundtrips_field() {
        for field in Field::ALL {
            assert_eq!(FieldUpdate::new(field, "x").field(), field);
        }
        assert!(!Field::Name.affects_total());
        assert!(Field::Quantity.affects_total());
    }
}
