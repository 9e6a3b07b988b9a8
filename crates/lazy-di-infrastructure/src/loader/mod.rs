//! Bulk registration
//!
//! Registers items in bulk, either from an in-memory list or from TOML
//! manifests on disk. Every occurrence of the placeholder (`?` by default)
//! in an item's `provides` is replaced with its derived name, so a manifest
//! `handlers/users.toml` declaring `provides = "handler::?"` registers
//! `handler::users`.
//!
//! Any failure is reported as [`Error::Load`] naming the offending source.

pub mod catalog;
pub mod manifest;

pub use catalog::FactoryCatalog;
pub use manifest::Manifest;

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use lazy_di_core::{Error, Item, RegisterOptions, Registry, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::constants::{DEFAULT_PLACEHOLDER, MANIFEST_EXTENSION};
use crate::error_ext::ErrorContext;

/// Bulk loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Token replaced by the derived name
    pub placeholder: String,

    /// File names picked up by [`load_dir`]; `None` accepts `*.toml`
    pub file_pattern: Option<Regex>,

    /// Options passed to every registration
    pub register: RegisterOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            file_pattern: None,
            register: RegisterOptions::default(),
        }
    }
}

impl LoadOptions {
    /// Build options from the loader configuration section
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        if config.placeholder.is_empty() {
            return Err(Error::config("Loader placeholder cannot be empty"));
        }
        let file_pattern = Regex::new(&config.file_pattern).config_context(format!(
            "Invalid loader file pattern '{}'",
            config.file_pattern
        ))?;
        Ok(Self {
            placeholder: config.placeholder.clone(),
            file_pattern: Some(file_pattern),
            register: config.register_options(),
        })
    }

    /// Same options with override enabled or disabled
    #[must_use]
    pub fn overriding(mut self, override_existing: bool) -> Self {
        self.register.override_existing = override_existing;
        self
    }

    /// Whether `load_dir` picks up a file with this name
    pub fn accepts(&self, file_name: &str) -> bool {
        match &self.file_pattern {
            Some(pattern) => pattern.is_match(file_name),
            None => file_name.ends_with(MANIFEST_EXTENSION),
        }
    }
}

/// Register `(derived_name, item)` pairs in order
///
/// The derived name doubles as the source reported in errors. Stops at the
/// first failure; items before it stay registered.
pub fn load_items<I>(registry: &Registry, items: I, options: &LoadOptions) -> Result<()>
where
    I: IntoIterator<Item = (String, Item)>,
{
    for (name, item) in items {
        append_item(registry, &name, &name, item, options)?;
    }
    Ok(())
}

/// Load a single manifest
///
/// The derived name is the file stem.
pub async fn load_file(
    registry: &Registry,
    file: &Path,
    catalog: &FactoryCatalog,
    options: &LoadOptions,
) -> Result<()> {
    if !file.is_absolute() {
        return Err(Error::load(
            file.display().to_string(),
            "file path must be absolute",
        ));
    }
    let content = read_manifest(file.to_path_buf()).await?;
    register_manifest(registry, file, &content, catalog, options)
}

/// Load every matching manifest in a directory
///
/// Non-recursive. File names are filtered by `options.file_pattern` and
/// processed in sorted order. All manifests are read before the first one
/// is registered.
pub async fn load_dir(
    registry: &Registry,
    dir: &Path,
    catalog: &FactoryCatalog,
    options: &LoadOptions,
) -> Result<usize> {
    if !dir.is_absolute() {
        return Err(Error::load(
            dir.display().to_string(),
            "paths must be absolute",
        ));
    }

    let files = list_manifests(dir, options).await?;
    debug!(dir = %dir.display(), count = files.len(), "Reading manifests");

    let contents = try_join_all(files.iter().cloned().map(read_manifest)).await?;
    for (file, content) in files.iter().zip(&contents) {
        register_manifest(registry, file, content, catalog, options)?;
    }

    info!(dir = %dir.display(), count = files.len(), "Manifests loaded");
    Ok(files.len())
}

async fn list_manifests(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .io_context(format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .io_context(format!("Failed to read directory {}", dir.display()))?
    {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !options.accepts(file_name) {
            continue;
        }
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

async fn read_manifest(file: PathBuf) -> Result<String> {
    tokio::fs::read_to_string(&file)
        .await
        .io_context(format!("Failed to read manifest {}", file.display()))
}

fn register_manifest(
    registry: &Registry,
    file: &Path,
    content: &str,
    catalog: &FactoryCatalog,
    options: &LoadOptions,
) -> Result<()> {
    let source = file.display().to_string();
    let name = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::load(&source, "file name is not valid UTF-8"))?;

    let item = Manifest::parse(content)
        .and_then(|manifest| manifest.into_item(catalog))
        .map_err(|message| Error::load(&source, message))?;

    append_item(registry, &source, name, item, options)
}

fn append_item(
    registry: &Registry,
    source: &str,
    name: &str,
    item: Item,
    options: &LoadOptions,
) -> Result<()> {
    let provides = if options.placeholder.is_empty() {
        item.provides().to_string()
    } else {
        item.provides().replace(&options.placeholder, name)
    };
    registry
        .register_with(item.with_provides(provides), options.register)
        .map_err(|err| Error::load(source, err.to_string()))?;
    Ok(())
}
