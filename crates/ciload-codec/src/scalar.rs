//! Scalar wire-form rendering.
//!
//! Every semantic value type has exactly one wire rendering: dates are fixed
//! 8-digit strings, monetary amounts are implied-2-decimal scaled integers,
//! commercial quantities are scaled by a fixed multiplier, and free decimals
//! round to 5 places. All amounts must be non-negative once scaled.

use chrono::NaiveDate;
use ciload_model::{CiLoadError, Result};

/// Multiplier for implied-2-decimal monetary amounts.
const MONEY_SCALE: f64 = 100.0;

/// Multiplier for commercial quantity fields.
const QUANTITY_SCALE: f64 = 1000.0;

/// Decimal fields round to this many places after unit scaling.
const DECIMAL_PLACES: u32 = 5;

/// Render a date in the fixed 8-digit `YYYYMMDD` wire form.
pub fn wire_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Render a monetary amount as an implied-2-decimal scaled integer string.
///
/// `123.45` renders as `"12345"`. Fractions beyond two decimals round half
/// away from zero before scaling.
pub fn wire_money(field: &'static str, amount: f64) -> Result<String> {
    scaled_integer(field, amount, MONEY_SCALE)
}

/// Render a commercial quantity as a fixed-multiplier scaled integer string.
///
/// Quantity fields carry three implied decimals: `1.5` renders as `"1500"`.
pub fn wire_quantity(field: &'static str, quantity: f64) -> Result<String> {
    scaled_integer(field, quantity, QUANTITY_SCALE)
}

/// Render a decimal rounded to 5 places, with trailing zeros trimmed.
pub fn wire_decimal(field: &'static str, value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(CiLoadError::invalid_value(field, "not a finite number"));
    }
    let factor = 10f64.powi(DECIMAL_PLACES as i32);
    let rounded = (value * factor).round() / factor;
    if rounded < 0.0 {
        return Err(CiLoadError::invalid_value(
            field,
            format!("negative amount {value}"),
        ));
    }
    let text = format!("{:.1$}", rounded, DECIMAL_PLACES as usize);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    Ok(trimmed.to_string())
}

fn scaled_integer(field: &'static str, value: f64, scale: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(CiLoadError::invalid_value(field, "not a finite number"));
    }
    let scaled = (value * scale).round();
    if scaled < 0.0 {
        return Err(CiLoadError::invalid_value(
            field,
            format!("negative amount {value}"),
        ));
    }
    Ok(format!("{}", scaled as i64))
}

/// Replace every non-ASCII code point with `?`.
///
/// The downstream filing engine accepts ASCII only; sanitization is the sole
/// localization the compiler performs.
pub fn sanitize_ascii(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_renders_eight_digits() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(wire_date(date), "20240305");
    }

    #[test]
    fn money_uses_implied_two_decimals() {
        assert_eq!(wire_money("value", 123.45).unwrap(), "12345");
        assert_eq!(wire_money("value", 0.0).unwrap(), "0");
        assert_eq!(wire_money("value", 10.0).unwrap(), "1000");
        // Sub-cent fractions round before scaling
        assert_eq!(wire_money("value", 1.006).unwrap(), "101");
    }

    #[test]
    fn money_rejects_negative() {
        let err = wire_money("freightAmt", -1.0).unwrap_err();
        assert!(format!("{err}").contains("freightAmt"));
    }

    #[test]
    fn quantity_scales_by_thousand() {
        assert_eq!(wire_quantity("qty1", 1.5).unwrap(), "1500");
        assert_eq!(wire_quantity("qty1", 12.0).unwrap(), "12000");
    }

    #[test]
    fn decimal_rounds_to_five_places() {
        assert_eq!(wire_decimal("weightGross", 1.2345678).unwrap(), "1.23457");
        assert_eq!(wire_decimal("weightGross", 2.0).unwrap(), "2");
        assert_eq!(wire_decimal("weightGross", 0.1).unwrap(), "0.1");
    }

    #[test]
    fn sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_ascii("Göteborg"), "G?teborg");
        assert_eq!(sanitize_ascii("plain"), "plain");
        assert_eq!(sanitize_ascii("日本"), "??");
    }
}
