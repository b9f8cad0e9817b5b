// 🛒 Session Cart - in-memory ordered list of entered prices
// Lives for one interactive session; persisted only by committing to the ledger.

use chrono::Local;
use thiserror::Error;

use crate::ledger::HistoryRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Undo on an empty cart - surfaced to the user as a notice, never a crash
    #[error("cart is empty, nothing to undo")]
    Empty,
}

/// Ordered prices for the current session. Undo pops the most recent entry.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    prices: Vec<f64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a price (already validated by the parser).
    pub fn add(&mut self, value: f64) {
        self.prices.push(value);
    }

    /// Remove and return the last entered price.
    pub fn undo(&mut self) -> Result<f64, CartError> {
        self.prices.pop().ok_or(CartError::Empty)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.prices.clear();
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Sum of all entries.
    pub fn subtotal(&self) -> f64 {
        self.prices.iter().sum()
    }

    /// Tax-inclusive total for a fractional rate (0.10 = 10%).
    pub fn total(&self, tax_rate: f64) -> f64 {
        self.subtotal() * (1.0 + tax_rate)
    }

    /// Snapshot the cart as a history record, stamped with local time.
    /// Monetary fields are rounded to 2 decimals for the CSV.
    pub fn to_record(&self, tax_rate: f64, memo: &str) -> HistoryRecord {
        HistoryRecord {
            datetime: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            count: self.len(),
            subtotal: round2(self.subtotal()),
            tax_rate,
            total: round2(self.total(tax_rate)),
            memo: memo.to_string(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_subtotal() {
        let mut cart = Cart::new();
        cart.add(120.0);
        cart.add(980.5);
        cart.add(1200.0);

        assert_eq!(cart.len(), 3);
        assert!((cart.subtotal() - 2300.5).abs() < 1e-9);
    }

    #[test]
    fn test_total_applies_tax_rate() {
        let mut cart = Cart::new();
        cart.add(100.0);
        cart.add(200.0);

        assert!((cart.total(0.10) - 330.0).abs() < 1e-9);
        assert!((cart.total(0.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_undo_returns_last() {
        let mut cart = Cart::new();
        cart.add(10.0);
        cart.add(20.0);

        assert_eq!(cart.undo(), Ok(20.0));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.undo(), Ok(10.0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_undo_empty_cart() {
        let mut cart = Cart::new();
        assert_eq!(cart.undo(), Err(CartError::Empty));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(1.0);
        cart.add(2.0);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0.0);
    }

    #[test]
    fn test_to_record_fields() {
        let mut cart = Cart::new();
        cart.add(100.004);
        cart.add(50.0);

        let record = cart.to_record(0.10, "groceries");

        assert_eq!(record.count, 2);
        assert!((record.subtotal - 150.0).abs() < 1e-9);
        assert_eq!(record.tax_rate, 0.10);
        assert!((record.total - 165.0).abs() < 1e-9);
        assert_eq!(record.memo, "groceries");

        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(record.datetime.len(), 19);
        assert_eq!(&record.datetime[4..5], "-");
        assert_eq!(&record.datetime[10..11], " ");
    }

    #[test]
    fn test_to_record_rounds_to_two_decimals() {
        let mut cart = Cart::new();
        cart.add(0.1);
        cart.add(0.2);

        let record = cart.to_record(0.0, "");
        assert_eq!(record.subtotal, 0.3);
        assert_eq!(record.total, 0.3);
    }
}
