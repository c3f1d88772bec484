//! The visitor's cart.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use prana_core::{CartLine, OrderDraft};

/// Most units of one offering a cart line may hold.
pub const MAX_QUANTITY: u32 = 20;

/// Cart lines in the order they were first added. One line per offering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartLine>);

impl Cart {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0.iter().map(|line| line.quantity.get()).sum()
    }

    /// Subtotal, GST and total of the current lines.
    #[must_use]
    pub fn draft(&self) -> OrderDraft {
        OrderDraft::from_lines(&self.0)
    }

    /// Add a line, merging with an existing line for the same offering.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self.0.iter_mut().find(|l| l.id == line.id) {
            let merged = existing
                .quantity
                .get()
                .saturating_add(line.quantity.get())
                .min(MAX_QUANTITY);
            existing.quantity = NonZeroU32::new(merged).unwrap_or(existing.quantity);
        } else {
            let mut line = line;
            line.quantity = clamp_quantity(line.quantity);
            self.0.push(line);
        }
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns `false` when no line has that id.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> bool {
        match NonZeroU32::new(quantity) {
            None => self.remove(id),
            Some(quantity) => {
                let Some(line) = self.0.iter_mut().find(|l| l.id == id) else {
                    return false;
                };
                line.quantity = clamp_quantity(quantity);
                true
            }
        }
    }

    /// Remove a line. Returns `false` when no line has that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|l| l.id != id);
        self.0.len() != before
    }
}

fn clamp_quantity(quantity: NonZeroU32) -> NonZeroU32 {
    NonZeroU32::new(quantity.get().min(MAX_QUANTITY)).unwrap_or(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prana_core::Rupees;

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
    fn test_add_merges_same_offering() {
        let mut cart = Cart::default();
        cart.add(line("yoga-class", 800, 1));
        cart.add(line("yoga-class", 800, 2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_caps_quantity() {
        let mut cart = Cart::default();
        cart.add(line("yoga-class", 800, 15));
        cart.add(line("yoga-class", 800, 15));
        assert_eq!(cart.item_count(), MAX_QUANTITY);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(line("yoga-class", 800, 2));
        assert!(cart.set_quantity("yoga-class", 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity("yoga-class", 1));
    }

    #[test]
    fn test_draft_matches_core_arithmetic() {
        let mut cart = Cart::default();
        cart.add(line("consultation", 1500, 1));
        cart.add(line("yoga-class", 800, 2));
        let draft = cart.draft();
        assert_eq!(draft.subtotal, Rupees::new(3100));
        assert_eq!(draft.tax, Rupees::new(558));
        assert_eq!(draft.total, Rupees::new(3658));
    }
}
