//! Tests for PricingService catalog loading

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pricetree::application::services::PricingService;
use pricetree::application::ApplicationError;
use pricetree::domain::{BuildPolicy, DomainError};
use pricetree::infrastructure::traits::{FileSystem, RealFileSystem};
use pricetree::util::testing;

const CATALOGS: &str = "tests/resources/catalogs";

fn real_service(policy: BuildPolicy) -> PricingService {
    testing::init_test_setup();
    PricingService::new(Arc::new(RealFileSystem), policy)
}

fn fixture(name: &str) -> PathBuf {
    Path::new(CATALOGS).join(name)
}

/// In-memory filesystem holding a fixed set of files.
struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

// ============================================================
// Fixture catalogs
// ============================================================

#[test]
fn given_gamer_kit_catalog_when_loading_then_cart_totals_3060() {
    let service = real_service(BuildPolicy::default());

    let catalog = service.load_catalog(&fixture("gamer_kit.toml")).unwrap();
    let receipt = catalog.cart.checkout(&catalog.tree).unwrap();

    assert_eq!(catalog.price_of("Gamer Kit").unwrap(), 900.0);
    let subtotals: Vec<f64> = receipt.lines.iter().map(|l| l.subtotal).collect();
    assert_eq!(subtotals, vec![1800.0, 2700.0, 3060.0]);
    assert_eq!(receipt.total, 3060.0);
}

#[test]
fn given_nested_catalog_when_loading_then_shared_and_forward_references_resolve() {
    let service = real_service(BuildPolicy::default());

    let catalog = service.load_catalog(&fixture("nested.toml")).unwrap();

    assert_eq!(catalog.price_of("Starter Kit").unwrap(), 175.5);
    assert_eq!(catalog.price_of("Pro Kit").unwrap(), 300.0);
    assert_eq!(catalog.price_of("Empty Box").unwrap(), 0.0);
    assert_eq!(catalog.price_of("Bundle").unwrap(), 475.5);

    let bundle = catalog.id("Bundle").unwrap();
    assert_eq!(catalog.tree.roots(), vec![bundle]);
    assert_eq!(catalog.tree.depth(bundle), 3);
    let leaves: Vec<&str> = catalog
        .tree
        .leaf_items(bundle)
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(leaves, vec!["Mouse", "Pad", "Mouse", "Mouse"]);
}

#[test]
fn given_cycle_catalog_when_loading_then_domain_cycle_error() {
    let service = real_service(BuildPolicy::default());

    let result = service.load_catalog(&fixture("cycle.toml"));

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::CycleDetected { .. }))
    ));
}

#[test]
fn given_unknown_child_catalog_when_loading_then_unknown_name() {
    let service = real_service(BuildPolicy::default());

    let result = service.load_catalog(&fixture("unknown_child.toml"));

    match result {
        Err(ApplicationError::Domain(DomainError::UnknownName(name))) => {
            assert_eq!(name, "Trackball")
        }
        other => panic!("expected unknown name, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn given_negative_catalog_when_policy_allows_then_coupon_reduces_total() {
    let service = real_service(BuildPolicy::default());

    let catalog = service.load_catalog(&fixture("negative.toml")).unwrap();
    let receipt = catalog.cart.checkout(&catalog.tree).unwrap();

    assert_eq!(receipt.total, 300.0);
}

#[test]
fn given_negative_catalog_when_policy_rejects_then_errors() {
    let service = real_service(BuildPolicy {
        reject_negative_prices: true,
    });

    let result = service.load_catalog(&fixture("negative.toml"));

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NegativePrice { .. }))
    ));
}

#[test]
fn given_malformed_catalog_when_loading_then_parse_error() {
    let service = real_service(BuildPolicy::default());

    let result = service.load_catalog(&fixture("malformed.toml"));

    match result {
        Err(ApplicationError::Parse { path, .. }) => assert!(path.ends_with("malformed.toml")),
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn given_missing_catalog_when_loading_then_not_found() {
    let service = real_service(BuildPolicy::default());

    let result = service.load_catalog(&fixture("does_not_exist.toml"));

    assert!(matches!(result, Err(ApplicationError::CatalogNotFound(_))));
}

#[test]
fn given_directory_when_loading_then_parse_error() {
    let service = real_service(BuildPolicy::default());

    let result = service.load_catalog(Path::new(CATALOGS));

    assert!(matches!(result, Err(ApplicationError::Parse { .. })));
}

#[test]
fn given_demo_catalog_when_loading_then_matches_built_in_demo() {
    let service = real_service(BuildPolicy::default());

    let catalog = service.load_catalog(Path::new("demos/gamer_setup.toml")).unwrap();
    let receipt = catalog.cart.checkout(&catalog.tree).unwrap();

    assert_eq!(catalog.price_of("Gamer Warranty").unwrap(), 180.0);
    assert_eq!(catalog.price_of("Gamer Kit").unwrap(), 1080.0);
    assert_eq!(receipt.total, 3240.0);
}

// ============================================================
// Injected filesystem
// ============================================================

#[test]
fn given_in_memory_catalog_when_loading_then_builds_without_disk() {
    let path = PathBuf::from("/virtual/shop.toml");
    let content = r#"
[[item]]
name = "Pen"
price = 2.5
multiplier = 4

[[group]]
name = "Desk Set"
children = ["Pen", "Pen"]

[cart]
entries = ["Desk Set"]
"#;
    let fs = MemoryFileSystem {
        files: HashMap::from([(path.clone(), content.to_string())]),
    };
    let service = PricingService::new(Arc::new(fs), BuildPolicy::default());

    let catalog = service.load_catalog(&path).unwrap();

    assert_eq!(catalog.price_of("Desk Set").unwrap(), 20.0);
}

#[test]
fn given_empty_toml_when_parsing_then_empty_spec() {
    let service = real_service(BuildPolicy::default());

    let spec = service.parse("", Path::new("empty.toml")).unwrap();

    assert!(spec.items.is_empty());
    assert!(spec.groups.is_empty());
    assert!(spec.cart.entries.is_empty());
}
