//! Configuration
//!
//! Layered configuration (defaults, TOML file, environment) for host
//! programs and the command-line tool.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    DiConfig, LoaderConfig, LoggingConfig, MissingBranchMode, ProvidersConfig, ResolutionConfig,
};
