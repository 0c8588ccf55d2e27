//! pixspike CLI crate
//!
//! Wraps `pixspike-core` with the file handling around it:
//! - loader: decode images to grayscale and apply the receptive-field blur
//! - output: spike array files (JSON or bincode) and output naming
//! - raster: SVG raster plots (`visualization` feature)
//! - config: layered TOML configuration
//!
//! The binary (src/main.rs) wires up logging and argument parsing, then calls
//! [`commands::PixspikeCli::execute`]. The modules are exposed as a library so
//! tests can drive them without spawning a process.

pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod raster;

pub use commands::PixspikeCli;
pub use error::{CliError, CliResult};
