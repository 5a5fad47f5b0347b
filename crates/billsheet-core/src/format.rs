//! Amount rendering for the display surface

/// Render an amount with exactly two decimals (`30` -> `"30.00"`).
///
/// A total that overflowed (infinite or NaN) renders as `"overflow"`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "overflow".to_string();
    }
    // Avoid printing "-0.00" for values that round to zero
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", value)
}

/// Render an amount the way the bill shows it, with the rupee sign
pub fn format_rupees(value: f64) -> String {
    format!("₹ {}", format_amount(value))
}
