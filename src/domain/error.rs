//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the price hierarchy rules.
/// These are independent of file formats and I/O.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("cycle detected: adding '{child}' to '{parent}' would make it contain itself")]
    CycleDetected { parent: String, child: String },

    #[error("node handle does not belong to this tree")]
    UnknownNode,

    #[error("unknown node name: {0}")]
    UnknownName(String),

    #[error("duplicate node name: {0}")]
    DuplicateName(String),

    #[error("'{0}' is an item and cannot hold children")]
    NotAGroup(String),

    #[error("invalid price for '{name}': {price}")]
    InvalidPrice { name: String, price: f64 },

    #[error("negative price for '{name}': {price}")]
    NegativePrice { name: String, price: f64 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
