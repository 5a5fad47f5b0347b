//! Terminal rendering of the bill

use billsheet::{
    format_amount, format_rupees, BillingSession, Sheet, COLUMN_PRICE, COLUMN_PRODUCT_NAME,
    COLUMN_QUANTITY, COLUMN_TOTAL,
};

/// Render the bill table, grand total, error region and checkout state
pub fn render_session(session: &BillingSession) -> String {
    let ledger = session.ledger();
    let name_width = ledger
        .items()
        .iter()
        .map(|item| item.name().chars().count())
        .chain(std::iter::once(COLUMN_PRODUCT_NAME.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "  #  {:<name_width$}  {:>12}  {:>10}  {:>12}\n",
        COLUMN_PRODUCT_NAME,
        COLUMN_PRICE,
        COLUMN_QUANTITY,
        COLUMN_TOTAL,
    ));

    for (i, item) in ledger.items().iter().enumerate() {
        let marker = if item.is_complete() { ' ' } else { '*' };
        out.push_str(&format!(
            "{}{:>2}  {:<name_width$}  {:>12}  {:>10}  {:>12}\n",
            marker,
            i + 1,
            item.name(),
            item.price_input(),
            item.quantity_input(),
            format_amount(item.total()),
        ));
    }

    out.push_str(&format!(
        "\nGrand Total: {}\n",
        format_rupees(ledger.grand_total())
    ));

    for i in ledger.invalid_positions() {
        if let Some(item) = ledger.item(i) {
            let issues: Vec<String> = item.issues().iter().map(ToString::to_string).collect();
            out.push_str(&format!("  row {}: {}\n", i + 1, issues.join(", ")));
        }
    }

    if let Some(message) = session.error_message() {
        out.push_str(&format!("! {}\n", message));
    }

    if !ledger.is_empty() {
        let state = if session.can_checkout() {
            "ready"
        } else {
            "disabled"
        };
        out.push_str(&format!("Checkout: {}\n", state));
    }

    out
}

/// Render a sheet read back from a workbook as tab-separated text
pub fn render_sheet(sheet: &Sheet) -> String {
    let mut out = String::new();
    out.push_str(&sheet.header().join("\t"));
    out.push('\n');
    for row in sheet.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

/// Rows of a sheet as JSON objects keyed by column title
pub fn sheet_to_json(sheet: &Sheet) -> serde_json::Value {
    let rows = sheet
        .rows()
        .iter()
        .map(|row| {
            let object = sheet
                .header()
                .iter()
                .zip(row)
                .map(|(column, value)| {
                    let json = match value {
                        billsheet::CellValue::Empty => serde_json::Value::Null,
                        billsheet::CellValue::Number(n) => serde_json::json!(n),
                        billsheet::CellValue::String(s) => serde_json::json!(s),
                    };
                    (column.clone(), json)
                })
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}
