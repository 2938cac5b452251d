//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pricetree/pricetree.toml`
//! 3. Local config: `<dir>/.pricetree.toml`
//! 4. Environment variables: `PRICETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::BuildPolicy;

/// Unified configuration for pricetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Currency symbol printed before amounts (default: "$")
    pub currency: String,
    /// Decimal places printed for amounts (default: 2)
    pub precision: usize,
    /// Refuse catalogs containing items with a negative unit price
    pub reject_negative_prices: bool,
    /// Catalog used when a command is given no file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "$".into(),
            precision: 2,
            reject_negative_prices: false,
            catalog: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub currency: Option<String>,
    pub precision: Option<usize>,
    pub reject_negative_prices: Option<bool>,
    pub catalog: Option<PathBuf>,
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Unresolvable variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Get the XDG config directory for pricetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pricetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pricetree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".pricetree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Builder policy derived from these settings.
    pub fn build_policy(&self) -> BuildPolicy {
        BuildPolicy {
            reject_negative_prices: self.reject_negative_prices,
        }
    }

    /// Format an amount with the configured currency and precision.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{} {:.*}", self.currency, self.precision, amount)
    }

    fn expand_paths(&mut self) {
        if let Some(catalog) = &self.catalog {
            let expanded = expand_env_vars(catalog.to_string_lossy().as_ref());
            self.catalog = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            currency: overlay
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            precision: overlay.precision.unwrap_or(self.precision),
            reject_negative_prices: overlay
                .reject_negative_prices
                .unwrap_or(self.reject_negative_prices),
            catalog: overlay.catalog.clone().or_else(|| self.catalog.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.pricetree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply PRICETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("PRICETREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("currency") {
            settings.currency = val;
        }
        if let Ok(val) = config.get_int("precision") {
            settings.precision = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("PRICETREE_PRECISION must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("reject_negative_prices") {
            settings.reject_negative_prices = val;
        }
        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# pricetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/pricetree/pricetree.toml
#   Local:  ./.pricetree.toml
#   Env:    PRICETREE_* environment variables

# Currency symbol printed before amounts
# currency = "$"

# Decimal places printed for amounts
# precision = 2

# Refuse catalogs with negative unit prices
# reject_negative_prices = false

# Catalog used when no file is given on the command line
# catalog = "~/catalogs/shop.toml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
