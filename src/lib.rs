//! # Drupal Printer
//!
//! Renders PHP syntax trees back to source in the Drupal coding style,
//! optionally with HTML highlighting markup for web display.

pub mod error;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use error::{RenderError, Result};
pub use parser::{LoadedTree, TreeLoader};
pub use renderer::{NodeRenderer, Printer, StyleConfig};
