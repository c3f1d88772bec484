//! Cart lines and the derived order draft.
//!
//! An [`OrderDraft`] is never stored. It is recomputed from the cart every time
//! the checkout summary is shown, and only its total leaves the site (as the
//! `amount` of the create-order call).

use std::num::NonZeroU32;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::money::Rupees;

/// GST applied to every order, in percent.
pub const GST_RATE_PERCENT: u32 = 18;

/// One line of a visitor's cart.
///
/// A snapshot of a catalog offering at the time it was added; later catalog
/// edits do not change lines already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog slug of the offering.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Rupees,
    /// Number of units, always at least one.
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Price of the whole line (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Rupees {
        self.unit_price * self.quantity.get()
    }
}

/// Subtotal, GST and total for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDraft {
    pub subtotal: Rupees,
    pub tax: Rupees,
    pub total: Rupees,
}

impl OrderDraft {
    /// Compute the draft for the given lines.
    ///
    /// `tax = round(subtotal × 18%)`, rounding halves away from zero, and
    /// `total = subtotal + tax`.
    ///
    /// ```
    /// use std::num::NonZeroU32;
    /// use prana_core::{CartLine, OrderDraft, Rupees};
    ///
    /// let lines = [CartLine {
    ///     id: "yoga-class".into(),
    ///     name: "Yoga Class".into(),
    ///     unit_price: Rupees::new(1000),
    ///     quantity: NonZeroU32::new(2).unwrap(),
    /// }];
    /// let draft = OrderDraft::from_lines(&lines);
    /// assert_eq!(draft.subtotal, Rupees::new(2000));
    /// assert_eq!(draft.tax, Rupees::new(360));
    /// assert_eq!(draft.total, Rupees::new(2360));
    /// ```
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal: Rupees = lines.iter().map(CartLine::line_total).sum();
        let tax = gst_on(subtotal);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Whether a caller-supplied total differs from this draft's total.
    ///
    /// A mismatch is only ever shown as an advisory note; it never blocks
    /// checkout.
    #[must_use]
    pub fn needs_rounding_note(&self, displayed_total: Rupees) -> bool {
        displayed_total != self.total
    }
}

/// GST on an amount, rounded to whole rupees (halves away from zero).
fn gst_on(amount: Rupees) -> Rupees {
    let rate = Decimal::new(i64::from(GST_RATE_PERCENT), 2);
    let tax = (Decimal::from(amount.get()) * rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // Non-negative and integral after rounding, so the conversion cannot fail
    // for any amount that fits in u64.
    Rupees::new(u64::try_from(tax).unwrap_or(u64::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: u64, quantity: u32) -> CartLine {
        CartLine {
            id: id.to_string(),
            name: id.to_string(),
            unit_price: Rupees::new(price),
            quantity: NonZeroU32::new(quantity).unwrap(),
        }
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let lines = [line("a", 499, 3), line("b", 1500, 1), line("c", 1, 7)];
        let draft = OrderDraft::from_lines(&lines);
        assert_eq!(draft.subtotal, Rupees::new(499 * 3 + 1500 + 7));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 25 × 0.18 = 4.5 → 5
        let draft = OrderDraft::from_lines(&[line("a", 25, 1)]);
        assert_eq!(draft.tax, Rupees::new(5));
        assert_eq!(draft.total, Rupees::new(30));
    }

    #[test]
    fn test_tax_rounds_down_below_half() {
        // 11 × 0.18 = 1.98 → 2, 2 × 0.18 = 0.36 → 0
        assert_eq!(OrderDraft::from_lines(&[line("a", 11, 1)]).tax, Rupees::new(2));
        assert_eq!(OrderDraft::from_lines(&[line("a", 2, 1)]).tax, Rupees::new(0));
    }

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        for price in [1_u64, 7, 99, 1234, 99_999] {
            for quantity in 1..4 {
                let draft = OrderDraft::from_lines(&[line("a", price, quantity)]);
                assert_eq!(draft.total, draft.subtotal + draft.tax);
            }
        }
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let draft = OrderDraft::from_lines(&[]);
        assert_eq!(draft.subtotal, Rupees::ZERO);
        assert_eq!(draft.tax, Rupees::ZERO);
        assert_eq!(draft.total, Rupees::ZERO);
    }

    #[test]
    fn test_rounding_note_only_on_mismatch() {
        let draft = OrderDraft::from_lines(&[line("a", 1000, 1)]);
        assert!(!draft.needs_rounding_note(Rupees::new(1180)));
        assert!(draft.needs_rounding_note(Rupees::new(1181)));
    }
}
