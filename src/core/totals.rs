//! Pure totals calculation.
//!
//! Side-effect-free by design: the same functions serve creation, explicit
//! recomputation after line-item edits, and the rendering collaborator's
//! tax-breakdown line, and they can be property-tested without storage.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{InvoiceTotals, LineItemInput};

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Line total: quantity × unit price, rounded half-up to 2 places.
///
/// Used identically at creation and on every later per-item edit so the
/// two paths can never disagree.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_half_up(quantity * unit_price, 2)
}

/// Invoice totals over the submitted items.
///
/// `amount` is the sum of the already-rounded line totals; `total` applies
/// the invoice-level tax percentage and absolute discount. The total is
/// not clamped: a discount exceeding amount plus tax yields a negative
/// total, which callers may choose to reject.
pub fn invoice_totals(
    items: &[LineItemInput],
    tax_percent: Decimal,
    discount: Decimal,
) -> InvoiceTotals {
    let amount: Decimal = items
        .iter()
        .map(|item| line_total(item.quantity, item.unit_price))
        .sum();
    let amount = round_half_up(amount, 2);
    let tax_amount = round_half_up(amount * tax_percent / dec!(100), 2);
    let total = round_half_up(amount + amount * tax_percent / dec!(100) - discount, 2);
    InvoiceTotals {
        amount,
        tax_amount,
        total,
    }
}

/// Format a monetary value for display: 2 decimal places with the currency
/// code suffixed, e.g. `"290.00 EUR"`.
pub fn format_money(value: Decimal, currency: &str) -> String {
    format!("{:.2} {}", value, currency)
}
