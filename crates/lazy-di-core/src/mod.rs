//! # lazy-di core
//!
//! A lazy, hierarchical dependency-injection registry. Providers are
//! registered under `::`-separated paths, depend on each other by path and
//! are constructed on first request, exactly once.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`path`] | Path parsing and wildcard matching |
//! | [`entry`] | Registration items, entries and their memoized state |
//! | [`node`] | Namespace tree nodes |
//! | [`registry`] | Registration, resolution and listing |
//! | [`error`] | Error taxonomy |
//! | [`constants`] | Delimiter and wildcard tokens |
//!
//! ## Example
//!
//! ```
//! use lazy_di_core::{Item, Registry, Require};
//!
//! # futures::executor::block_on(async {
//! let registry = Registry::new();
//! registry
//!     .register(Item::new("names::*").factory_fn(|_, name| Ok(name.to_uppercase())))?
//!     .register(
//!         Item::new("greeting::*")
//!             .require(Require::template("names::{name}"))
//!             .factory_fn(|deps, _| {
//!                 let name = deps[0].downcast_ref::<String>().cloned().unwrap_or_default();
//!                 Ok(format!("hello {name}"))
//!             }),
//!     )?;
//!
//! let greeting = registry.resolve_as::<String>("greeting::bob").await?;
//! assert_eq!(greeting.as_str(), "hello BOB");
//! # Ok::<(), lazy_di_core::Error>(())
//! # }).unwrap();
//! ```

pub mod constants;
pub mod entry;
pub mod error;
pub mod node;
pub mod path;
pub mod registry;

pub use entry::{
    ConstructResult, DeriveFn, Entry, EntryState, Factory, Instance, Item, ProviderGroup, Require,
    downcast,
};
pub use error::{BoxError, Error, Result};
pub use path::ProviderPath;
pub use registry::{
    MissingBranchPolicy, RegisterOptions, Registry, RegistryOptions, Spawner,
};
