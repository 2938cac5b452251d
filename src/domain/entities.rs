//! Domain entities: the priceable capability and its leaf

use std::fmt;

use tracing::trace;

/// Anything that can report a price.
///
/// Callers treat items and groups uniformly through this trait.
pub trait Priceable {
    fn price(&self) -> f64;
}

/// Leaf node with a directly known price.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    /// Price of one unit
    pub unit_price: f64,
    /// Number of units charged, e.g. years of warranty coverage
    pub multiplier: Option<u32>,
}

impl Item {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            multiplier: None,
        }
    }

    /// Item charged `multiplier` times its unit price.
    pub fn with_multiplier(name: impl Into<String>, unit_price: f64, multiplier: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            multiplier: Some(multiplier),
        }
    }
}

impl Priceable for Item {
    fn price(&self) -> f64 {
        let price = match self.multiplier {
            Some(multiplier) => self.unit_price * f64::from(multiplier),
            None => self.unit_price,
        };
        trace!(
            item = %self.name,
            unit_price = self.unit_price,
            multiplier = ?self.multiplier,
            price,
            "priced item"
        );
        price
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.multiplier {
            Some(multiplier) => write!(f, "{} ({} x {})", self.name, self.unit_price, multiplier),
            None => write!(f, "{} ({})", self.name, self.unit_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_item_without_multiplier_when_pricing_then_returns_unit_price() {
        assert_eq!(Item::new("Mouse", 150.0).price(), 150.0);
    }

    #[test]
    fn given_item_with_multiplier_when_pricing_then_scales_unit_price() {
        let warranty = Item::with_multiplier("Monitor Warranty", 180.0, 2);
        assert_eq!(warranty.price(), 360.0);
    }

    #[test]
    fn given_zero_multiplier_when_pricing_then_returns_zero() {
        assert_eq!(Item::with_multiplier("Unused Warranty", 99.0, 0).price(), 0.0);
    }

    #[test]
    fn given_item_when_displaying_then_shows_name_and_price() {
        assert_eq!(Item::new("Mouse", 150.5).to_string(), "Mouse (150.5)");
        assert_eq!(
            Item::with_multiplier("Warranty", 15.0, 2).to_string(),
            "Warranty (15 x 2)"
        );
    }
}
