//! Driver for the `kfir` binary: argument parsing, `kfir.json` loading,
//! parallel per-file checking and diagnostic rendering.

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
