//! Built-in sample: a gaming setup shopping cart.
//!
//! Three peripherals and a warranty bundle form the "Gamer Kit"; the cart
//! holds a monitor, the kit and the monitor's warranty.

use tracing::instrument;

use crate::domain::{Cart, DomainResult, Item, PriceTree};

/// Sample tree plus the cart to check out.
pub struct Demo {
    pub tree: PriceTree,
    pub cart: Cart,
}

#[instrument(level = "debug")]
pub fn gamer_setup() -> DomainResult<Demo> {
    let mut tree = PriceTree::new();

    let keyboard = tree.insert_item(Item::new("Keyboard", 350.00));
    let mouse = tree.insert_item(Item::new("Mouse", 150.00));
    let headset = tree.insert_item(Item::new("Headset", 400.00));
    let monitor = tree.insert_item(Item::new("Monitor", 1800.00));

    let keyboard_warranty = tree.insert_item(Item::with_multiplier("Keyboard Warranty", 35.0, 2));
    let mouse_warranty = tree.insert_item(Item::with_multiplier("Mouse Warranty", 15.0, 2));
    let headset_warranty = tree.insert_item(Item::with_multiplier("Headset Warranty", 40.0, 2));
    let monitor_warranty = tree.insert_item(Item::with_multiplier("Monitor Warranty", 180.0, 2));

    let gamer_warranty = tree.insert_group("Gamer Warranty");
    for warranty in [keyboard_warranty, mouse_warranty, headset_warranty] {
        tree.add_child(gamer_warranty, warranty)?;
    }

    let gamer_kit = tree.insert_group("Gamer Kit");
    for child in [keyboard, mouse, headset, gamer_warranty] {
        tree.add_child(gamer_kit, child)?;
    }

    let mut cart = Cart::new();
    cart.add(monitor);
    cart.add(gamer_kit);
    cart.add(monitor_warranty);

    Ok(Demo { tree, cart })
}
