//! Core constants
//!
//! Tokens shared by path parsing, registration and resolution.

/// Separator between path segments (`foo::bar::baz`)
pub const DELIMITER: &str = "::";

/// Reserved final segment addressing a wildcard template or a whole group
pub const WILDCARD: &str = "*";

/// Placeholder substituted by [`crate::Require::template`]
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Label used for derived dependencies built from a bare closure
pub const DERIVED_LABEL: &str = "<derived>";
