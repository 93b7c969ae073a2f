//! Configuration for terrain generation runs.
//!
//! Settings persist to disk as RON files and load with forward/backward compatible
//! defaults. CLI overrides are applied via clap, and reloads report whether anything
//! changed.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, NoiseArg};
pub use config::{Config, DebugConfig, GenerationConfig, default_config_dir};
pub use error::ConfigError;
