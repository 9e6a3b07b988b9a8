//! Provider registry
//!
//! The [`Registry`] owns the namespace tree and is the only public entry
//! point to it: registration builds the tree, resolution walks it and
//! constructs entries on demand, listing enumerates it.
//!
//! ## Resolution
//!
//! ```text
//! resolve("ns::name") ──► lookup ──► entry / wildcard template (materialized once)
//!                                        │
//!                                        ▼
//!                        Entry::instance (write-once Shared future)
//!                                        │  first access only
//!                                        ▼
//!                 resolve(requires...) concurrently ──► factory(deps, name)
//!
//! resolve("ns::*") ──► every concrete entry of `ns`, by name, concurrently
//! ```
//!
//! Construction runs at most once per entry. The pending future is stored
//! before anything is polled, so every concurrent resolver awaits the same
//! attempt, and a failure is kept just like a success.
//!
//! Without a [`Spawner`] the stored future only advances while some
//! resolver polls it: if every resolver is dropped mid-construction the
//! entry stays pending and the next resolver resumes that same attempt.
//! [`Registry::with_spawner`] hands each attempt to an executor as it
//! starts, so it runs to completion regardless of its requesters.
//!
//! Missing namespaces are created on the fly by both registration and
//! resolution (see [`MissingBranchPolicy`]), so resolving a group in a
//! namespace nobody populated yields an empty group.
//!
//! Circular `requires` graphs are not detected; resolving one never
//! completes. Registering into a namespace while the same path is being
//! resolved is not synchronised beyond the tree lock.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use futures::future::{BoxFuture, FutureExt, try_join_all};
use tracing::{debug, trace, warn};

use crate::entry::{Entry, Instance, Item, ProviderGroup, SharedInstance, downcast};
use crate::error::{Error, Result};
use crate::node::{Child, Node};
use crate::path::ProviderPath;

/// How resolution treats a namespace that does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingBranchPolicy {
    /// Create the namespace; groups resolve empty, names are not found
    #[default]
    AutoCreate,
    /// Fail with `BranchNotFound`
    Fail,
}

/// Registry-wide options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    pub missing_branch: MissingBranchPolicy,
}

/// Per-registration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Replace an entry already registered under the same path
    pub override_existing: bool,
}

impl RegisterOptions {
    /// Options allowing an existing entry to be replaced
    pub fn overriding() -> Self {
        Self {
            override_existing: true,
        }
    }
}

/// Runs a construction attempt to completion on some executor
pub type Spawner = Arc<dyn Fn(BoxFuture<'static, ()>) + Send + Sync>;

struct RegistryInner {
    root: RwLock<Node>,
    options: RegistryOptions,
    spawner: Option<Spawner>,
}

/// Lazy, hierarchical provider registry
///
/// Cloning is cheap and every clone shares the same tree.
///
/// # Example
///
/// ```
/// use lazy_di_core::{Item, Registry};
///
/// # futures::executor::block_on(async {
/// let registry = Registry::new();
/// registry
///     .register(Item::new("config::port").value(8080_u16))?
///     .register(
///         Item::new("server::address")
///             .require("config::port")
///             .factory_fn(|deps, _| {
///                 let port = deps[0].downcast_ref::<u16>().copied().unwrap_or_default();
///                 Ok(format!("127.0.0.1:{port}"))
///             }),
///     )?;
///
/// let address = registry.resolve_as::<String>("server::address").await?;
/// assert_eq!(address.as_str(), "127.0.0.1:8080");
/// # Ok::<(), lazy_di_core::Error>(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self::build(options, None)
    }

    /// Registry whose constructions are driven by `spawn` once started
    ///
    /// ```ignore
    /// let registry = Registry::with_spawner(RegistryOptions::default(), |attempt| {
    ///     tokio::spawn(attempt);
    /// });
    /// ```
    pub fn with_spawner<S>(options: RegistryOptions, spawn: S) -> Self
    where
        S: Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
    {
        Self::build(options, Some(Arc::new(spawn)))
    }

    fn build(options: RegistryOptions, spawner: Option<Spawner>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                root: RwLock::new(Node::new()),
                options,
                spawner,
            }),
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.inner.options
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register an item, failing if its path is already provided
    pub fn register(&self, item: Item) -> Result<&Self> {
        self.register_with(item, RegisterOptions::default())
    }

    /// Register an item with explicit options
    ///
    /// Validation happens before the tree is touched, so a failed call
    /// leaves the registry unchanged. Ignored items are skipped silently.
    pub fn register_with(&self, item: Item, options: RegisterOptions) -> Result<&Self> {
        if item.is_ignored() {
            trace!(path = item.provides(), "Skipping ignored provider");
            return Ok(self);
        }

        let (path, entry) = Entry::from_item(item)?;
        let provides = path.to_string();

        let mut root = self.write()?;
        let node = root.branch_mut(path.branch())?;
        let replaced = node.insert_entry(
            path.name(),
            Arc::new(entry),
            options.override_existing,
            &provides,
        )?;

        if replaced.is_some() {
            warn!(path = %provides, "Overriding registered provider");
        } else {
            debug!(path = %provides, "Registered provider");
        }
        Ok(self)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a path to its (memoized) instance
    ///
    /// A wildcard path resolves to a [`ProviderGroup`] wrapped in the
    /// returned instance.
    pub fn resolve(&self, path: &str) -> BoxFuture<'static, Result<Instance>> {
        let registry = self.clone();
        let path = path.to_owned();
        async move { registry.resolve_path(&path).await }.boxed()
    }

    /// Resolve a concrete path and downcast the instance
    pub async fn resolve_as<T: Any + Send + Sync>(&self, path: &str) -> Result<Arc<T>> {
        let instance = self.resolve(path).await?;
        downcast::<T>(&instance)
            .ok_or_else(|| Error::type_mismatch(path, std::any::type_name::<T>()))
    }

    /// Resolve every concrete entry of a namespace (`ns::*`), ordered by name
    pub async fn resolve_group(&self, path: &str) -> Result<ProviderGroup> {
        let parsed = ProviderPath::parse(path)?;
        if !parsed.is_wildcard() {
            return Err(Error::invalid_path(
                path,
                "group resolution requires a wildcard path",
            ));
        }
        self.collect_group(&parsed).await
    }

    async fn resolve_path(&self, raw: &str) -> Result<Instance> {
        let path = ProviderPath::parse(raw)?;
        if path.is_wildcard() {
            let group = self.collect_group(&path).await?;
            return Ok(Arc::new(group));
        }

        let entry = self.lookup(&path)?;
        self.instantiate(entry, path.name().to_owned()).await
    }

    async fn collect_group(&self, path: &ProviderPath) -> Result<ProviderGroup> {
        let members = self.group_members(path)?;
        let instances = try_join_all(
            members
                .iter()
                .map(|(name, entry)| self.instantiate(Arc::clone(entry), name.clone())),
        )
        .await?;

        let names = members.into_iter().map(|(name, _)| name);
        Ok(ProviderGroup::new(names.zip(instances).collect()))
    }

    fn group_members(&self, path: &ProviderPath) -> Result<Vec<(String, Arc<Entry>)>> {
        {
            let root = self.read()?;
            match root.branch(path.branch()) {
                Ok(node) => return Ok(node.entries()),
                Err(Error::BranchNotFound { .. })
                    if self.inner.options.missing_branch == MissingBranchPolicy::AutoCreate => {}
                Err(err) => return Err(err),
            }
        }

        let mut root = self.write()?;
        Ok(root.branch_mut(path.branch())?.entries())
    }

    /// Find the entry for a concrete path, materializing it from the
    /// namespace's wildcard template when needed
    fn lookup(&self, path: &ProviderPath) -> Result<Arc<Entry>> {
        {
            let root = self.read()?;
            if let Ok(node) = root.branch(path.branch()) {
                if let Some(entry) = node.entry(path.name()) {
                    return Ok(Arc::clone(entry));
                }
            }
        }

        let mut root = self.write()?;
        if self.inner.options.missing_branch == MissingBranchPolicy::Fail {
            root.branch(path.branch())?;
        }
        let node = root.branch_mut(path.branch())?;

        match node.child(path.name()) {
            Some(Child::Entry(entry)) => return Ok(Arc::clone(entry)),
            Some(Child::Branch(_)) => return Err(Error::not_found(path.to_string())),
            None => {}
        }

        let entry = match node.template() {
            Some(template) => template.materialize(path.to_string()),
            None => return Err(Error::not_found(path.to_string())),
        };
        debug!(path = %path, "Materialized provider from wildcard template");
        Ok(node.materialize(path.name(), entry))
    }

    /// Memoized instance of `entry` resolved under the invocation `name`
    fn instantiate(&self, entry: Arc<Entry>, name: String) -> SharedInstance {
        let registry = Arc::downgrade(&self.inner);
        let target = Arc::clone(&entry);
        let (shared, started) = entry.instance(move || construct(registry, target, name));
        if started && let Some(spawn) = &self.inner.spawner {
            trace!(path = entry.provides(), "Handing construction to spawner");
            spawn(shared.clone().map(|_| ()).boxed());
        }
        shared
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Every entry with its full path, depth-first in name order
    ///
    /// Templates and materialized entries are included; nothing is
    /// constructed.
    pub fn list(&self) -> Result<Vec<(String, Arc<Entry>)>> {
        let root = self.read()?;
        let mut entries = Vec::new();
        root.walk(&mut Vec::new(), &mut entries);
        Ok(entries)
    }

    /// Entry registered (or already materialized) under exactly `path`
    pub fn entry(&self, path: &str) -> Result<Option<Arc<Entry>>> {
        let path = ProviderPath::parse(path)?;
        let root = self.read()?;
        Ok(root
            .branch(path.branch())
            .ok()
            .and_then(|node| node.entry(path.name()))
            .map(Arc::clone))
    }

    /// Whether resolving `path` would find an entry, without materializing
    pub fn contains(&self, path: &str) -> Result<bool> {
        let path = ProviderPath::parse(path)?;
        let root = self.read()?;
        let Ok(node) = root.branch(path.branch()) else {
            return Ok(false);
        };
        if path.is_wildcard() {
            return Ok(true);
        }
        Ok(match node.child(path.name()) {
            Some(Child::Entry(_)) => true,
            Some(Child::Branch(_)) => false,
            None => node.template().is_some(),
        })
    }

    /// Number of registered entries, templates and materialized ones included
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Node>> {
        self.inner
            .root
            .read()
            .map_err(|_| Error::internal("namespace tree lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Node>> {
        self.inner
            .root
            .write()
            .map_err(|_| Error::internal("namespace tree lock poisoned"))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.inner.options)
            .field("entries", &self.len().ok())
            .field("spawner", &self.inner.spawner.is_some())
            .finish()
    }
}

/// Gather dependencies, then run the factory
///
/// Holds the registry weakly: the future is stored inside an entry the
/// registry owns.
fn construct(
    registry: Weak<RegistryInner>,
    entry: Arc<Entry>,
    name: String,
) -> BoxFuture<'static, Result<Instance>> {
    async move {
        let Some(inner) = registry.upgrade() else {
            return Err(Error::internal(format!(
                "registry dropped before {} was constructed",
                entry.provides()
            )));
        };
        let registry = Registry { inner };

        let dependencies: Vec<String> = entry
            .requires()
            .iter()
            .map(|require| require.evaluate(&name))
            .collect();
        trace!(path = entry.provides(), name = %name, ?dependencies, "Resolving dependencies");

        let resolved =
            try_join_all(dependencies.iter().map(|dependency| registry.resolve(dependency)))
                .await?;
        drop(registry);

        debug!(path = entry.provides(), name = %name, "Constructing provider");
        let factory = Arc::clone(entry.factory());
        factory(resolved, name).await.map_err(|source| {
            warn!(path = entry.provides(), error = %source, "Provider construction failed");
            Error::construction(entry.provides(), source)
        })
    }
    .boxed()
}
