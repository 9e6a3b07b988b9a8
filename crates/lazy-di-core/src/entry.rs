//! Entries (leaves of the namespace tree)
//!
//! An [`Entry`] pairs an immutable construction recipe with a write-once
//! memoization cell. [`Item`] is the builder callers hand to
//! [`Registry::register`](crate::Registry::register).

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::constants::{DERIVED_LABEL, NAME_PLACEHOLDER};
use crate::error::{BoxError, Error, Result};
use crate::path::ProviderPath;

/// Opaque constructed value shared by every resolver of an entry
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Outcome of a factory call
pub type ConstructResult = std::result::Result<Instance, BoxError>;

/// Type-erased provider factory
///
/// Receives the resolved dependencies (in `requires` order) and the
/// invocation name.
pub type Factory = Arc<dyn Fn(Vec<Instance>, String) -> BoxFuture<'static, ConstructResult> + Send + Sync>;

/// Function deriving a dependency path from the invocation name
pub type DeriveFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub(crate) type SharedInstance = Shared<BoxFuture<'static, Result<Instance>>>;

/// Downcast an instance to a concrete type
pub fn downcast<T: Any + Send + Sync>(instance: &Instance) -> Option<Arc<T>> {
    Arc::clone(instance).downcast::<T>().ok()
}

/// Members of a namespace resolved through a wildcard path, ordered by name
#[derive(Clone, Default)]
pub struct ProviderGroup {
    members: Vec<(String, Instance)>,
}

impl ProviderGroup {
    pub(crate) fn new(members: Vec<(String, Instance)>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member names in order
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Instance registered under `name`
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, instance)| instance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.members
            .iter()
            .map(|(name, instance)| (name.as_str(), instance))
    }

    /// Downcast every member, failing on the first one of another type
    pub fn downcast_all<T: Any + Send + Sync>(&self) -> Option<Vec<(String, Arc<T>)>> {
        self.members
            .iter()
            .map(|(name, instance)| downcast::<T>(instance).map(|value| (name.clone(), value)))
            .collect()
    }

    pub fn into_inner(self) -> Vec<(String, Instance)> {
        self.members
    }
}

impl fmt::Debug for ProviderGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderGroup")
            .field("members", &self.names())
            .finish()
    }
}

/// Dependency specifier
#[derive(Clone)]
pub enum Require {
    /// A fixed path
    Literal(String),
    /// A path computed from the invocation name
    Derived {
        /// Textual rendering of the derivation, used by documentation
        label: String,
        /// The derivation itself
        derive: DeriveFn,
    },
}

impl Require {
    pub fn literal<S: Into<String>>(path: S) -> Self {
        Self::Literal(path.into())
    }

    /// Derive the dependency path from the invocation name
    pub fn derived<F>(derive: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::derived_labeled(DERIVED_LABEL, derive)
    }

    /// Like [`Require::derived`] with an explicit documentation label
    pub fn derived_labeled<L, F>(label: L, derive: F) -> Self
    where
        L: Into<String>,
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Derived {
            label: label.into(),
            derive: Arc::new(derive),
        }
    }

    /// Substitute `{name}` in `template` with the invocation name
    ///
    /// `Require::template("foo::{name}")` resolved as `bar::a` depends on
    /// `foo::a`.
    pub fn template<S: Into<String>>(template: S) -> Self {
        let template = template.into();
        let pattern = template.clone();
        Self::derived_labeled(template, move |name| pattern.replace(NAME_PLACEHOLDER, name))
    }

    /// Path this specifier designates for the given invocation name
    pub fn evaluate(&self, name: &str) -> String {
        match self {
            Self::Literal(path) => path.clone(),
            Self::Derived { derive, .. } => derive(name),
        }
    }

    /// Literal path or derivation label
    pub fn label(&self) -> &str {
        match self {
            Self::Literal(path) => path,
            Self::Derived { label, .. } => label,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Debug for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            Self::Derived { label, .. } => f.debug_struct("Derived").field("label", label).finish(),
        }
    }
}

impl From<&str> for Require {
    fn from(path: &str) -> Self {
        Self::Literal(path.to_owned())
    }
}

impl From<String> for Require {
    fn from(path: String) -> Self {
        Self::Literal(path)
    }
}

/// Registration input
///
/// # Example
///
/// ```
/// use lazy_di_core::{Item, Require};
///
/// let item = Item::new("greeting::*")
///     .require(Require::template("names::{name}"))
///     .docs("Greets whoever `names::<name>` resolves to")
///     .factory_fn(|_deps, name| Ok(format!("hello {name}")));
/// assert_eq!(item.provides(), "greeting::*");
/// ```
#[derive(Clone)]
pub struct Item {
    provides: String,
    requires: Vec<Require>,
    factory: Option<Factory>,
    docs: Option<String>,
    ignore: bool,
}

impl Item {
    pub fn new<S: Into<String>>(provides: S) -> Self {
        Self {
            provides: provides.into(),
            requires: Vec::new(),
            factory: None,
            docs: None,
            ignore: false,
        }
    }

    /// Append one dependency
    #[must_use]
    pub fn require<R: Into<Require>>(mut self, require: R) -> Self {
        self.requires.push(require.into());
        self
    }

    /// Append several dependencies
    #[must_use]
    pub fn requires<I, R>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Require>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn docs<S: Into<String>>(mut self, docs: S) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Skip this item entirely when registered
    #[must_use]
    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Asynchronous factory
    #[must_use]
    pub fn factory<F, Fut>(mut self, factory: F) -> Self
    where
        F: Fn(Vec<Instance>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ConstructResult> + Send + 'static,
    {
        self.factory = Some(Arc::new(move |deps, name| factory(deps, name).boxed()));
        self
    }

    /// Synchronous factory producing a typed value
    #[must_use]
    pub fn factory_fn<F, T>(mut self, factory: F) -> Self
    where
        F: Fn(Vec<Instance>, String) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.factory = Some(Arc::new(move |deps, name| {
            let outcome = factory(deps, name).map(|value| Arc::new(value) as Instance);
            futures::future::ready(outcome).boxed()
        }));
        self
    }

    /// Pre-built type-erased factory
    #[must_use]
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Factory returning a clone of a fixed value
    #[must_use]
    pub fn value<T: Any + Send + Sync + Clone>(self, value: T) -> Self {
        self.factory_fn(move |_, _| Ok(value.clone()))
    }

    /// Rewrite `provides`, used by bulk loaders for placeholder substitution
    #[must_use]
    pub fn with_provides<S: Into<String>>(mut self, provides: S) -> Self {
        self.provides = provides.into();
        self
    }

    pub fn provides(&self) -> &str {
        &self.provides
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("provides", &self.provides)
            .field("requires", &self.requires)
            .field("has_factory", &self.factory.is_some())
            .field("docs", &self.docs)
            .field("ignore", &self.ignore)
            .finish()
    }
}

/// Observable state of an entry's memoization cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Never requested
    Unresolved,
    /// Construction started but has not completed
    Pending,
    /// Construction succeeded
    Resolved,
    /// Construction failed; the failure is permanent
    Failed,
}

/// Registered construction recipe plus its memoized result
pub struct Entry {
    provides: String,
    requires: Vec<Require>,
    factory: Factory,
    docs: Option<String>,
    instance: OnceLock<SharedInstance>,
}

impl Entry {
    /// Validate an item and turn it into an entry
    pub(crate) fn from_item(item: Item) -> Result<(ProviderPath, Self)> {
        let path = ProviderPath::parse(&item.provides)?;

        let Some(factory) = item.factory else {
            return Err(Error::invalid_item(format!(
                "item {} has no factory",
                item.provides
            )));
        };

        for require in &item.requires {
            if let Require::Literal(dependency) = require {
                ProviderPath::parse(dependency).map_err(|err| {
                    Error::invalid_item(format!(
                        "item {} requires a malformed path: {err}",
                        item.provides
                    ))
                })?;
            }
        }

        let entry = Self {
            provides: item.provides,
            requires: item.requires,
            factory,
            docs: item.docs,
            instance: OnceLock::new(),
        };
        Ok((path, entry))
    }

    /// Fresh entry sharing this template's recipe, registered under `provides`
    pub(crate) fn materialize(&self, provides: String) -> Self {
        Self {
            provides,
            requires: self.requires.clone(),
            factory: Arc::clone(&self.factory),
            docs: self.docs.clone(),
            instance: OnceLock::new(),
        }
    }

    /// Path this entry was registered (or materialized) under
    pub fn provides(&self) -> &str {
        &self.provides
    }

    pub fn requires(&self) -> &[Require] {
        &self.requires
    }

    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    /// Inspect the memoization cell without triggering construction
    pub fn state(&self) -> EntryState {
        match self.instance.get() {
            None => EntryState::Unresolved,
            Some(shared) => match shared.peek() {
                None => EntryState::Pending,
                Some(Ok(_)) => EntryState::Resolved,
                Some(Err(_)) => EntryState::Failed,
            },
        }
    }

    pub(crate) fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Memoized construction, started by `start` on first access only
    ///
    /// `start` must not poll anything: it only builds the future. The flag
    /// is true for the single call that stored it.
    pub(crate) fn instance<F>(&self, start: F) -> (SharedInstance, bool)
    where
        F: FnOnce() -> BoxFuture<'static, Result<Instance>>,
    {
        let mut started = false;
        let shared = self
            .instance
            .get_or_init(|| {
                started = true;
                start().shared()
            })
            .clone();
        (shared, started)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("provides", &self.provides)
            .field("requires", &self.requires)
            .field("docs", &self.docs)
            .field("state", &self.state())
            .finish()
    }
}
