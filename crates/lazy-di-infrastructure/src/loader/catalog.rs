//! Named factories for manifest-declared items
//!
//! A manifest cannot carry code, so it names a factory the host program
//! registered here beforehand.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use lazy_di_core::{BoxError, ConstructResult, Factory, Instance};

/// Name to factory map consulted by the manifest loader
#[derive(Clone, Default)]
pub struct FactoryCatalog {
    factories: HashMap<String, Factory>,
}

impl FactoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asynchronous factory
    pub fn add<F, Fut>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Vec<Instance>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ConstructResult> + Send + 'static,
    {
        self.insert(name, Arc::new(move |deps, name| factory(deps, name).boxed()))
    }

    /// Add a synchronous factory producing a typed value
    pub fn add_fn<F, T>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Vec<Instance>, String) -> Result<T, BoxError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.insert(
            name,
            Arc::new(move |deps, name| {
                let outcome = factory(deps, name).map(|value| Arc::new(value) as Instance);
                futures::future::ready(outcome).boxed()
            }),
        )
    }

    /// Add a pre-built factory, replacing any previous one with that name
    pub fn insert(&mut self, name: impl Into<String>, factory: Factory) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<Factory> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered factory names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FactoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryCatalog")
            .field("factories", &self.names())
            .finish()
    }
}
