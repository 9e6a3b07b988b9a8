//! TOML item manifests
//!
//! ```toml
//! provides = "greeter::?"
//! requires = ["config::language", "names::{name}"]
//! docs = "Greets the named person"
//! factory = "greeter"
//! ```
//!
//! A manifest names either a `factory` from the [`FactoryCatalog`] or a
//! static `value`, never both.

use lazy_di_core::constants::NAME_PLACEHOLDER;
use lazy_di_core::{Item, Require};
use serde::Deserialize;

use super::FactoryCatalog;

/// Parsed manifest file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Path the item is registered under; may contain the loader placeholder
    pub provides: String,

    /// Literal paths, or templates containing `{name}`
    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default)]
    pub docs: Option<String>,

    /// Skip the item when loading
    #[serde(default)]
    pub ignore: bool,

    /// Static value, constructed as a `toml::Value`
    #[serde(default)]
    pub value: Option<toml::Value>,

    /// Name of a catalog factory
    #[serde(default)]
    pub factory: Option<String>,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Build the registrable item
    ///
    /// Errors are plain messages; the loader attaches the file name.
    pub fn into_item(self, catalog: &FactoryCatalog) -> Result<Item, String> {
        let item = Item::new(self.provides)
            .requires(self.requires.into_iter().map(require))
            .ignore(self.ignore);
        let item = match self.docs {
            Some(docs) => item.docs(docs),
            None => item,
        };

        match (self.value, self.factory) {
            (Some(value), None) => Ok(item.value(value)),
            (None, Some(name)) => catalog
                .get(&name)
                .map(|factory| item.with_factory(factory))
                .ok_or_else(|| format!("unknown factory '{name}'")),
            (Some(_), Some(_)) => Err("manifest declares both value and factory".to_string()),
            (None, None) => Err("manifest declares neither value nor factory".to_string()),
        }
    }
}

fn require(raw: String) -> Require {
    if raw.contains(NAME_PLACEHOLDER) {
        Require::template(raw)
    } else {
        Require::literal(raw)
    }
}
