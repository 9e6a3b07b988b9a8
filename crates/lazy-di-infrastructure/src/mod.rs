//! # Infrastructure Layer
//!
//! Ambient services and collaborators around the `lazy_di_core` registry.
//!
//! ## Module Categories
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-layered TOML/env configuration |
//! | [`logging`] | Structured logging with tracing |
//! | [`constants`] | Centralized configuration constants |
//! | [`error_ext`] | Error context extensions |
//!
//! ### Registry Collaborators
//! | Module | Description |
//! |--------|-------------|
//! | [`providers`] | Environment variable templates |
//! | [`loader`] | Bulk registration from lists and TOML manifests |
//! | [`docs`] | Markdown documentation rendering |
//! | [`bootstrap`] | Registry setup from configuration |
//! | [`render`] | Text rendering of resolved instances |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod docs;
pub mod error_ext;
pub mod loader;
pub mod logging;
pub mod providers;
pub mod render;

pub use bootstrap::bootstrap;
pub use config::{ConfigLoader, DiConfig};
pub use docs::{render_docs, trim_docs};
pub use error_ext::ErrorContext;
pub use loader::{FactoryCatalog, LoadOptions, load_dir, load_file, load_items};
pub use logging::init_logging;
pub use providers::register_env_providers;
pub use render::render_instance;
