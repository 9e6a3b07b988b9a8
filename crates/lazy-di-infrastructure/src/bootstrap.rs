//! One-call registry setup from configuration

use std::path::{Path, PathBuf};

use lazy_di_core::{Registry, RegistryOptions, Result};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::config::DiConfig;
use crate::loader::{FactoryCatalog, LoadOptions, load_dir, load_file};
use crate::providers::register_env_providers;

/// Build a registry as described by `config`
///
/// Steps, in order:
/// 1. create the registry with the configured missing-branch policy
/// 2. register the environment providers when `providers.env` is set
/// 3. load every `loader.dirs` entry, then every `loader.files` entry
///
/// Relative manifest locations are joined onto `base_dir`. Inside a tokio
/// runtime each construction is spawned onto it, so an attempt runs to
/// completion even when every resolver gives up early.
pub async fn bootstrap(
    config: &DiConfig,
    catalog: &FactoryCatalog,
    base_dir: &Path,
) -> Result<Registry> {
    let registry = runtime_registry(config.resolution.registry_options());

    if config.providers.env {
        register_env_providers(&registry)?;
    }

    let options = LoadOptions::from_config(&config.loader)?;
    for dir in &config.loader.dirs {
        load_dir(&registry, &absolute(base_dir, dir), catalog, &options).await?;
    }
    for file in &config.loader.files {
        load_file(&registry, &absolute(base_dir, file), catalog, &options).await?;
    }

    info!(entries = registry.len()?, "Registry bootstrapped");
    Ok(registry)
}

/// Registry driving constructions on the current tokio runtime, if any
fn runtime_registry(options: RegistryOptions) -> Registry {
    match Handle::try_current() {
        Ok(handle) => Registry::with_spawner(options, move |attempt| {
            handle.spawn(attempt);
        }),
        Err(_) => {
            debug!("No tokio runtime; constructions advance only while awaited");
            Registry::with_options(options)
        }
    }
}

fn absolute(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
