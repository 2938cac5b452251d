//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::PricingService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub pricing: PricingService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// `fs` is handed to the services that read catalogs.
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let pricing = PricingService::new(fs, settings.build_policy());

        Self { settings, pricing }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;

    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::DomainError;

    /// Filesystem serving one catalog with a negative price at every path.
    struct CouponFileSystem;

    impl FileSystem for CouponFileSystem {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            Ok("[[item]]\nname = \"Coupon\"\nprice = -5.0\n".to_string())
        }

        fn exists(&self, _path: &Path) -> bool {
            true
        }

        fn is_file(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn given_injected_fs_and_strict_settings_when_loading_then_both_reach_pricing() {
        let settings = Settings {
            reject_negative_prices: true,
            ..Settings::default()
        };
        let container = ServiceContainer::with_deps(settings, Arc::new(CouponFileSystem));

        let result = container.pricing.load_catalog(Path::new("/nowhere/shop.toml"));

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::NegativePrice { .. }))
        ));
        assert!(container.settings.reject_negative_prices);
    }
}
