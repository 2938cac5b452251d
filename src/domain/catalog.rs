//! Declarative catalog description, as read from a TOML file
//!
//! ```toml
//! [[item]]
//! name = "Monitor Warranty"
//! price = 180.0
//! multiplier = 2
//!
//! [[group]]
//! name = "Gamer Kit"
//! children = ["Keyboard", "Mouse", "Headset"]
//!
//! [cart]
//! entries = ["Monitor", "Gamer Kit", "Monitor Warranty"]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSpec {
    #[serde(rename = "item")]
    pub items: Vec<ItemSpec>,
    #[serde(rename = "group")]
    pub groups: Vec<GroupSpec>,
    pub cart: CartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub name: String,
    /// Unit price
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub name: String,
    /// Names of items or groups, in order; repeats are kept
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CartSpec {
    pub entries: Vec<String>,
}
