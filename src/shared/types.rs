//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Observed price span for one product in one polling cycle.
///
/// Listings that show a single price carry it as both `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A listing that exposes only one price.
    pub fn single(price: f64) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_price_range() {
        let range = PriceRange::single(199.95);
        assert_eq!(range.min, 199.95);
        assert_eq!(range.max, 199.95);
        assert!(range.is_single());
    }

    #[test]
    fn test_spread_price_range() {
        let range = PriceRange::new(199.95, 299.95);
        assert!(!range.is_single());
        assert!(range.max >= range.min);
    }
}
