//! Infrastructure layer constants
//!
//! Core tokens (delimiter, wildcard) live in `lazy_di_core::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "lazy-di.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "lazy-di";

/// Environment variable prefix for configuration (`LAZY_DI__LOGGING__LEVEL`)
pub const CONFIG_ENV_PREFIX: &str = "LAZY_DI__";

/// Separator for nested configuration keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "LAZY_DI_LOG";

/// File stem used when a log file path has none
pub const LOG_FILE_STEM: &str = "lazy-di";

// ============================================================================
// LOADER CONSTANTS
// ============================================================================

/// Token in `provides` replaced by the derived item name (the file stem)
pub const DEFAULT_PLACEHOLDER: &str = "?";

/// File names picked up by directory loading
pub const DEFAULT_FILE_PATTERN: &str = r"\.toml$";

/// Suffix accepted when no file pattern is configured
pub const MANIFEST_EXTENSION: &str = ".toml";

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Namespace exposing environment variables as strings
pub const ENV_NAMESPACE: &str = "env";

/// Namespace exposing optional environment variables
pub const ENV_OPTIONAL_NAMESPACE: &str = "env-optional";

/// Namespace exposing environment variables parsed as integers
pub const ENV_INT_NAMESPACE: &str = "envint";

/// Namespace exposing optional integer environment variables
pub const ENV_INT_OPTIONAL_NAMESPACE: &str = "envint-optional";

// ============================================================================
// DOCUMENTATION CONSTANTS
// ============================================================================

/// Preamble used when none is given
pub const DEFAULT_DOCS_PREAMBLE: &str = "# Documentation";

/// Text rendered for entries without docs
pub const UNDOCUMENTED: &str = "*Undocumented*";
