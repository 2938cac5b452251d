//! Tests for the built-in demo scenario and its tree rendering

use pricetree::application::demo::gamer_setup;
use pricetree::config::Settings;
use pricetree::domain::Priceable;
use pricetree::tree_traits::TreeNodeConvert;

#[test]
fn given_demo_when_checking_out_then_original_subtotals() {
    let demo = gamer_setup().unwrap();

    let receipt = demo.cart.checkout(&demo.tree).unwrap();

    let lines: Vec<(&str, f64, f64)> = receipt
        .lines
        .iter()
        .map(|l| (l.name.as_str(), l.price, l.subtotal))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("Monitor", 1800.0, 1800.0),
            ("Gamer Kit", 1080.0, 2880.0),
            ("Monitor Warranty", 360.0, 3240.0),
        ]
    );
    assert_eq!(receipt.total, 3240.0);
}

#[test]
fn given_demo_when_pricing_warranty_bundle_then_180() {
    let demo = gamer_setup().unwrap();
    let bundle = demo.tree.find("Gamer Warranty").unwrap();

    assert_eq!(demo.tree.node_ref(bundle).unwrap().price(), 180.0);
}

#[test]
fn given_demo_kit_when_rendering_tree_then_labels_carry_prices() {
    let demo = gamer_setup().unwrap();
    let settings = Settings::default();
    let kit = demo.tree.find("Gamer Kit").unwrap();
    let format_amount = |amount: f64| settings.format_amount(amount);

    let rendered = demo
        .tree
        .to_tree_string(kit, &format_amount)
        .expect("kit belongs to tree");

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "Gamer Kit [$ 1080.00]");
    assert!(rendered.contains("Keyboard [$ 350.00]"));
    assert!(rendered.contains("Gamer Warranty [$ 180.00]"));
    assert!(rendered.contains("Mouse Warranty [$ 15.00 x 2 = $ 30.00]"));
    assert_eq!(lines.len(), 8);
}
