//! `dyff`: a semantic diff for YAML, JSON, and TOML documents. The core
//! (`Node`, `Path`, the diff engine, filters, classification, patching,
//! and rendering) never touches a filesystem or a socket; the CLI-facing
//! modules (`parse`, `loader`, `cli`, `cli_error`) own everything that
//! does (§1).

pub mod classify;
pub mod cli;
pub mod cli_error;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod identity;
pub mod input;
pub mod loader;
pub mod node;
pub mod parse;
pub mod patch;
pub mod path;
pub mod render;

/// Lazily detected terminal width (§5), cached for the process. Overridden
/// by `RenderOptions::terminal_width` when the caller sets one explicitly.
pub fn terminal_width() -> u16 {
    static WIDTH: std::sync::OnceLock<u16> = std::sync::OnceLock::new();
    *WIDTH.get_or_init(|| termsize::get().map(|size| size.cols).unwrap_or(80))
}
