//! Composite price hierarchies.
//!
//! Items carry a price, groups sum the prices of their children, and a cart
//! reports a running subtotal over its top-level entries. Nodes live in a
//! generational arena so one item can be shared by several groups.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
