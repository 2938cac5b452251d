//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a priced line: label left, amount right-aligned in green
pub fn priced(label: &str, amount: &str) {
    println!("  {:<32} {}", label, format!("{:>14}", amount).green());
}

/// Print a running subtotal (dimmed, indented)
pub fn subtotal(amount: &str) {
    println!("  {}", format!("{:<32} {:>14}", "subtotal", amount).dimmed());
}

/// Print the final total (bold)
pub fn total(amount: &str) {
    println!("{}", format!("{:<34} {:>14}", "TOTAL", amount).bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
