//! Environment variable providers
//!
//! | Path | Instance type | Unset variable |
//! |------|---------------|----------------|
//! | `env::NAME` | `String` | error |
//! | `env-optional::NAME` | `Option<String>` | `None` |
//! | `envint::NAME` | `i64` | error |
//! | `envint-optional::NAME` | `Option<i64>` | `None` |
//!
//! Integer variants fail when the variable is set but does not parse.

use std::env::{self, VarError};

use lazy_di_core::constants::{DELIMITER, WILDCARD};
use lazy_di_core::{BoxError, Item, Registry, Result};
use tracing::debug;

use crate::constants::{
    ENV_INT_NAMESPACE, ENV_INT_OPTIONAL_NAMESPACE, ENV_NAMESPACE, ENV_OPTIONAL_NAMESPACE,
};

/// Register the four environment templates
pub fn register_env_providers(registry: &Registry) -> Result<()> {
    registry
        .register(
            Item::new(template(ENV_NAMESPACE))
                .docs(
                    "Exposes the requested environment variable.\n\
                     Fails if the variable hasn't been defined.",
                )
                .factory_fn(|_, name| required(&name)),
        )?
        .register(
            Item::new(template(ENV_OPTIONAL_NAMESPACE))
                .docs(
                    "Exposes the requested environment variable.\n\
                     Resolves to `None` if the variable hasn't been defined.",
                )
                .factory_fn(|_, name| optional(&name)),
        )?
        .register(
            Item::new(template(ENV_INT_NAMESPACE))
                .docs(
                    "Exposes the requested environment variable parsed as integer.\n\
                     Fails if the variable hasn't been defined or is not an integer.",
                )
                .factory_fn(|_, name| parse_int(&name, &required(&name)?)),
        )?
        .register(
            Item::new(template(ENV_INT_OPTIONAL_NAMESPACE))
                .docs(
                    "Exposes the requested environment variable parsed as integer.\n\
                     Resolves to `None` if the variable hasn't been defined.\n\
                     Fails if it is defined but not an integer.",
                )
                .factory_fn(|_, name| {
                    optional(&name)?
                        .map(|raw| parse_int(&name, &raw))
                        .transpose()
                }),
        )?;
    debug!("Environment providers registered");
    Ok(())
}

fn template(namespace: &str) -> String {
    format!("{namespace}{DELIMITER}{WILDCARD}")
}

fn optional(name: &str) -> std::result::Result<Option<String>, BoxError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err @ VarError::NotUnicode(_)) => Err(format!("Environment {name}: {err}").into()),
    }
}

fn required(name: &str) -> std::result::Result<String, BoxError> {
    optional(name)?.ok_or_else(|| format!("Environment {name} not set").into())
}

fn parse_int(name: &str, raw: &str) -> std::result::Result<i64, BoxError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|err| format!("Environment {name} is not an integer: {err}").into())
}
