//! Built-in named-value providers
//!
//! Wildcard templates whose invocation name selects the value, so a
//! dependency such as `env::DATABASE_URL` resolves without any item
//! being registered for that exact path.

pub mod env;

pub use env::register_env_providers;
