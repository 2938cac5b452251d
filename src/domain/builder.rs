//! Catalog builder: turns a [`CatalogSpec`] into a linked price tree.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, PriceTree};
use crate::domain::cart::Cart;
use crate::domain::catalog::{CatalogSpec, ItemSpec};
use crate::domain::entities::Item;
use crate::domain::error::{DomainError, DomainResult};

/// Validation rules applied while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildPolicy {
    /// Reject items whose unit price is below zero
    pub reject_negative_prices: bool,
}

/// A built catalog: the tree, a name lookup and the cart it declares.
#[derive(Debug)]
pub struct Catalog {
    pub tree: PriceTree,
    pub cart: Cart,
    names: HashMap<String, NodeId>,
}

impl Catalog {
    /// Handle of the node called `name`.
    pub fn id(&self, name: &str) -> DomainResult<NodeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownName(name.to_string()))
    }

    pub fn price_of(&self, name: &str) -> DomainResult<f64> {
        self.tree.price(self.id(name)?)
    }
}

/// Constructs a [`Catalog`] from its declarative description.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    policy: BuildPolicy,
}

impl CatalogBuilder {
    pub fn new(policy: BuildPolicy) -> Self {
        Self { policy }
    }

    /// Build the catalog.
    ///
    /// All nodes are inserted first, then group children and cart entries are
    /// resolved by name, so a group may refer to groups declared after it.
    #[instrument(level = "debug", skip_all)]
    pub fn build(&self, spec: &CatalogSpec) -> DomainResult<Catalog> {
        let mut tree = PriceTree::new();
        let mut names: HashMap<String, NodeId> = HashMap::new();

        for item in &spec.items {
            self.validate(item)?;
            let id = tree.insert_item(Item {
                name: item.name.clone(),
                unit_price: item.price,
                multiplier: item.multiplier,
            });
            register(&mut names, &item.name, id)?;
        }

        let mut groups = Vec::with_capacity(spec.groups.len());
        for group in &spec.groups {
            let id = tree.insert_group(group.name.clone());
            register(&mut names, &group.name, id)?;
            groups.push((id, group));
        }

        for (parent, group) in groups {
            for child_name in &group.children {
                let child = resolve(&names, child_name)?;
                tree.add_child(parent, child)?;
            }
        }

        let mut cart = Cart::new();
        for entry in &spec.cart.entries {
            cart.add(resolve(&names, entry)?);
        }

        debug!(
            "built catalog: {} nodes, {} cart entries",
            tree.len(),
            cart.entries().len()
        );
        Ok(Catalog { tree, cart, names })
    }

    fn validate(&self, item: &ItemSpec) -> DomainResult<()> {
        if !item.price.is_finite() {
            return Err(DomainError::InvalidPrice {
                name: item.name.clone(),
                price: item.price,
            });
        }
        if self.policy.reject_negative_prices && item.price < 0.0 {
            return Err(DomainError::NegativePrice {
                name: item.name.clone(),
                price: item.price,
            });
        }
        Ok(())
    }
}

fn register(names: &mut HashMap<String, NodeId>, name: &str, id: NodeId) -> DomainResult<()> {
    if names.insert(name.to_string(), id).is_some() {
        return Err(DomainError::DuplicateName(name.to_string()));
    }
    Ok(())
}

fn resolve(names: &HashMap<String, NodeId>, name: &str) -> DomainResult<NodeId> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| DomainError::UnknownName(name.to_string()))
}
