//! Shopping cart: a flat list of top-level entries priced in order

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, PriceTree};
use crate::domain::error::{DomainError, DomainResult};

/// Ordered list of handles into a [`PriceTree`]. Duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<NodeId>,
}

/// One priced cart entry with the running total up to and including it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub price: f64,
    pub subtotal: f64,
}

/// Result of checking out a cart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Receipt {
    pub lines: Vec<ReceiptLine>,
    pub total: f64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: NodeId) {
        self.entries.push(id);
    }

    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prices every entry once, in order, keeping a running subtotal.
    ///
    /// Fails with [`DomainError::UnknownNode`] if an entry was issued by
    /// another tree.
    #[instrument(level = "debug", skip_all)]
    pub fn checkout(&self, tree: &PriceTree) -> DomainResult<Receipt> {
        let mut receipt = Receipt::default();

        for &id in &self.entries {
            let node = tree.get(id).ok_or(DomainError::UnknownNode)?;
            let price = tree.price(id)?;
            receipt.total += price;
            debug!("'{}' costs {}, subtotal {}", node.name(), price, receipt.total);
            receipt.lines.push(ReceiptLine {
                name: node.name().to_string(),
                price,
                subtotal: receipt.total,
            });
        }

        Ok(receipt)
    }
}
