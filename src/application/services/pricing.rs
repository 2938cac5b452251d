//! Catalog pricing service
//!
//! Loads catalog files and builds them into price trees.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BuildPolicy, Catalog, CatalogBuilder, CatalogSpec};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and pricing catalogs.
pub struct PricingService {
    fs: Arc<dyn FileSystem>,
    policy: BuildPolicy,
}

impl PricingService {
    pub fn new(fs: Arc<dyn FileSystem>, policy: BuildPolicy) -> Self {
        Self { fs, policy }
    }

    /// Parse catalog TOML. `origin` is only used in error messages.
    pub fn parse(&self, content: &str, origin: &Path) -> ApplicationResult<CatalogSpec> {
        toml::from_str(content).map_err(|e| ApplicationError::Parse {
            path: origin.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Read, parse and build the catalog at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load_catalog(&self, path: &Path) -> ApplicationResult<Catalog> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::CatalogNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Parse {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read catalog", path)?;
        let spec = self.parse(&content, path)?;
        debug!(
            "load_catalog: {} items, {} groups",
            spec.items.len(),
            spec.groups.len()
        );

        Ok(CatalogBuilder::new(self.policy).build(&spec)?)
    }
}
