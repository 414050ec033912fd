//! Configuration for gridmux.
//!
//! Compile-time constants live in [`constants`]; the user-facing TOML file
//! is handled by [`file`]; application directories by [`paths`].

pub mod constants;
mod file;
mod paths;

pub use file::{config_path, load_config, load_config_from, save_config, save_config_to, Config};
pub use paths::{config_dir, data_dir, logs_dir};
