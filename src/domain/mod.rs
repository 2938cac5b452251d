//! Domain layer: price hierarchy entities and rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod cart;
pub mod catalog;
pub mod entities;
pub mod error;

pub use arena::{Group, Node, NodeId, NodeRef, PriceTree};
pub use builder::{BuildPolicy, Catalog, CatalogBuilder};
pub use cart::{Cart, Receipt, ReceiptLine};
pub use catalog::{CartSpec, CatalogSpec, GroupSpec, ItemSpec};
pub use entities::{Item, Priceable};
pub use error::{DomainError, DomainResult};
