//! # lazy-di
//!
//! A lazy, hierarchical dependency injection container.
//!
//! Providers are registered under `::`-separated paths and constructed on
//! first request, exactly once, with their own dependencies resolved
//! concurrently beforehand. A `*` in the final segment registers a template
//! that serves every name in its namespace, and resolving `ns::*` yields all
//! providers of a namespace as a group.
//!
//! ## Example
//!
//! ```
//! use lazy_di::{Item, Registry, Require};
//!
//! # block_on(async {
//! let registry = Registry::new();
//! registry
//!     .register(Item::new("config::port").value(8080_u16))?
//!     .register(
//!         Item::new("server::*")
//!             .require("config::port")
//!             .require(Require::template("config::{name}_host"))
//!             .factory_fn(|deps, name| {
//!                 let port = deps[0].downcast_ref::<u16>().copied().unwrap_or_default();
//!                 let host = deps[1].downcast_ref::<String>().cloned().unwrap_or_default();
//!                 Ok(format!("{name}: {host}:{port}"))
//!             }),
//!     )?
//!     .register(Item::new("config::api_host").value("0.0.0.0".to_string()))?;
//!
//! let api = registry.resolve_as::<String>("server::api").await?;
//! assert_eq!(api.as_str(), "api: 0.0.0.0:8080");
//! # Ok::<(), lazy_di::Error>(())
//! # }).unwrap();
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `core` - registry, items, paths and the error taxonomy
//! - `infrastructure` - configuration, logging, loaders, providers, docs
//! - `cli` - the `lazy-di` inspection tool

/// Core engine
///
/// Re-exports from the core crate for convenience
pub mod core {
    pub use lazy_di_core::*;
}

/// Infrastructure layer - config, logging, loaders and providers
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use lazy_di_infrastructure::*;
}

pub mod cli;

pub use lazy_di_core::{
    Entry, EntryState, Error, Instance, Item, MissingBranchPolicy, ProviderGroup, ProviderPath,
    RegisterOptions, Registry, RegistryOptions, Require, Result, downcast,
};
pub use lazy_di_infrastructure::{
    DiConfig, FactoryCatalog, LoadOptions, bootstrap, register_env_providers, render_docs,
};
