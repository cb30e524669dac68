//! Command-line interface for reviewlens.

mod commands;
pub mod icons;
pub mod progress;
pub mod render;

pub use commands::{is_verbose, run};
