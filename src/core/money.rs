//! Currency arithmetic.
//!
//! All amounts are [`Decimal`] euros rounded to cents with
//! [`Decimal::round_dp`] (round half to even).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::VatRate;

const HUNDRED: Decimal = dec!(100);

/// Largest amount accepted from outside input (one trillion euros). Keeps
/// every sum and product over a ledger well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Round to 2 decimal places.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// `round(base × rate / 100, 2)`.
pub fn vat_amount(base: Decimal, rate: VatRate) -> Decimal {
    round_cents(base * rate.as_decimal() / HUNDRED)
}

/// `round(base + vat, 2)`.
pub fn gross_total(base: Decimal, vat: Decimal) -> Decimal {
    round_cents(base + vat)
}

/// `round(vat × pct / 100, 2)`.
pub fn deductible_vat(vat: Decimal, deduction_pct: u8) -> Decimal {
    round_cents(vat * Decimal::from(deduction_pct) / HUNDRED)
}

/// Parse a loosely formatted amount such as `"1.234,56 €"`, `"89.99"`, or `"-12"`.
///
/// When both `.` and `,` appear, the later one is the decimal separator.
/// Amounts beyond [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    normalized
        .parse::<Decimal>()
        .ok()
        .filter(|amount| amount.abs() <= MAX_AMOUNT)
}
