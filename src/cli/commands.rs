//! Command dispatch and handlers

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::demo;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Catalog, NodeId, PriceTree, Priceable, Receipt};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(&config_dir))?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Total { file }) => cmd_total(&container, file.as_deref()),
        Some(Commands::Price { name, file }) => cmd_price(&container, name, file.as_deref()),
        Some(Commands::Tree { name, file }) => {
            cmd_tree(&container, name.as_deref(), file.as_deref())
        }
        Some(Commands::Leaves { name, file }) => cmd_leaves(&container, name, file.as_deref()),
        Some(Commands::Demo) => cmd_demo(&container),
        Some(Commands::Config { command }) => cmd_config(&container, &config_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "pricetree", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Explicit file wins over the configured default catalog.
fn catalog_path(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.catalog.clone())
        .ok_or_else(|| {
            CliError::Usage("no catalog given and no default catalog configured".to_string())
        })
}

fn load(container: &ServiceContainer, file: Option<&Path>) -> CliResult<Catalog> {
    let path = catalog_path(container, file)?;
    debug!("catalog: {}", path.display());
    Ok(container.pricing.load_catalog(&path)?)
}

#[instrument(level = "debug", skip(container))]
fn cmd_total(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let catalog = load(container, file)?;
    let receipt = catalog.cart.checkout(&catalog.tree)?;
    print_receipt(&container.settings, &receipt);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_price(container: &ServiceContainer, name: &str, file: Option<&Path>) -> CliResult<()> {
    let catalog = load(container, file)?;
    let price = catalog.price_of(name)?;
    output::info(&format!("{}: {}", name, container.settings.format_amount(price)));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    name: Option<&str>,
    file: Option<&Path>,
) -> CliResult<()> {
    let catalog = load(container, file)?;
    let roots = match name {
        Some(name) => vec![catalog.id(name)?],
        None => catalog.tree.roots(),
    };
    for root in roots {
        print_tree(&container.settings, &catalog.tree, root)?;
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_leaves(container: &ServiceContainer, name: &str, file: Option<&Path>) -> CliResult<()> {
    let catalog = load(container, file)?;
    let id = catalog.id(name)?;
    for item in catalog.tree.leaf_items(id) {
        output::priced(&item.name, &container.settings.format_amount(item.price()));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_demo(container: &ServiceContainer) -> CliResult<()> {
    let demo = demo::gamer_setup()?;
    for &entry in demo.cart.entries() {
        print_tree(&container.settings, &demo.tree, entry)?;
    }
    let receipt = demo.cart.checkout(&demo.tree)?;
    print_receipt(&container.settings, &receipt);
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    config_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            output::detail(&format!("global: {}", global));
            output::detail(&format!("local:  {}", local_config_path(config_dir).display()));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

/// One printed line of a receipt, amounts already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReceiptRow {
    Header(String),
    Priced { name: String, amount: String },
    Subtotal(String),
    Total(String),
}

/// An empty receipt still has its header and a zero total.
fn receipt_rows(settings: &Settings, receipt: &Receipt) -> Vec<ReceiptRow> {
    let names = if receipt.lines.is_empty() {
        "empty".to_string()
    } else {
        receipt.lines.iter().map(|line| line.name.as_str()).join(", ")
    };
    let mut rows = vec![ReceiptRow::Header(format!("--- Cart: {} ---", names))];
    for line in &receipt.lines {
        rows.push(ReceiptRow::Priced {
            name: line.name.clone(),
            amount: settings.format_amount(line.price),
        });
        rows.push(ReceiptRow::Subtotal(settings.format_amount(line.subtotal)));
    }
    rows.push(ReceiptRow::Total(settings.format_amount(receipt.total)));
    rows
}

fn print_receipt(settings: &Settings, receipt: &Receipt) {
    for row in receipt_rows(settings, receipt) {
        match row {
            ReceiptRow::Header(title) => output::header(&title),
            ReceiptRow::Priced { name, amount } => output::priced(&name, &amount),
            ReceiptRow::Subtotal(amount) => output::subtotal(&amount),
            ReceiptRow::Total(amount) => output::total(&amount),
        }
    }
}

fn print_tree(settings: &Settings, tree: &PriceTree, root: NodeId) -> CliResult<()> {
    let format_amount = |amount: f64| settings.format_amount(amount);
    if let Some(rendered) = tree.to_tree_string(root, &format_amount) {
        write!(io::stdout().lock(), "{}", rendered)
            .map_err(|e| InfraError::io("write tree", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildPolicy, CatalogBuilder, CatalogSpec, ReceiptLine};

    #[test]
    fn given_catalog_without_cart_when_totalling_then_receipt_shows_zero_total() {
        let settings = Settings::default();
        let catalog = CatalogBuilder::new(BuildPolicy::default())
            .build(&CatalogSpec::default())
            .unwrap();

        let receipt = catalog.cart.checkout(&catalog.tree).unwrap();
        let rows = receipt_rows(&settings, &receipt);

        assert_eq!(
            rows,
            vec![
                ReceiptRow::Header("--- Cart: empty ---".to_string()),
                ReceiptRow::Total("$ 0.00".to_string()),
            ]
        );
    }

    #[test]
    fn given_receipt_when_rendering_rows_then_each_line_has_subtotal() {
        let settings = Settings::default();
        let receipt = Receipt {
            lines: vec![
                ReceiptLine {
                    name: "Monitor".to_string(),
                    price: 1800.0,
                    subtotal: 1800.0,
                },
                ReceiptLine {
                    name: "Mouse".to_string(),
                    price: 150.0,
                    subtotal: 1950.0,
                },
            ],
            total: 1950.0,
        };

        let rows = receipt_rows(&settings, &receipt);

        assert_eq!(rows[0], ReceiptRow::Header("--- Cart: Monitor, Mouse ---".to_string()));
        assert_eq!(
            rows[3],
            ReceiptRow::Priced {
                name: "Mouse".to_string(),
                amount: "$ 150.00".to_string(),
            }
        );
        assert_eq!(rows[4], ReceiptRow::Subtotal("$ 1950.00".to_string()));
        assert_eq!(rows.last(), Some(&ReceiptRow::Total("$ 1950.00".to_string())));
    }
}
