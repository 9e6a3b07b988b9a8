//! Error handling types

use std::sync::Arc;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by provider factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared error source
///
/// Failures are memoized together with the entry that produced them and
/// handed to every resolver, so sources are reference counted.
pub type SharedSource = Arc<dyn std::error::Error + Send + Sync>;

/// Main error type for lazy-di
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A path string could not be parsed
    #[error("Invalid path '{path}': {message}")]
    InvalidPath {
        /// The offending path string
        path: String,
        /// Why the path was rejected
        message: String,
    },

    /// An item handed to `register` is malformed
    #[error("Invalid item: {message}")]
    InvalidItem {
        /// Description of the problem
        message: String,
    },

    /// A name is already taken and override was not requested
    #[error("Dependency {path} already provided")]
    AlreadyProvided {
        /// The conflicting path
        path: String,
    },

    /// A path segment that must be a namespace is occupied by an entry
    #[error("{path} is an entry, not a namespace")]
    NotANamespace {
        /// Path of the entry blocking the namespace
        path: String,
    },

    /// Neither a concrete entry nor a wildcard template exists
    #[error("Item {path} not found")]
    NotFound {
        /// The missing path
        path: String,
    },

    /// A namespace along the path does not exist
    #[error("Branch {path} not found")]
    BranchNotFound {
        /// The missing namespace
        path: String,
    },

    /// A factory failed while constructing an entry
    #[error("Construction of {path} failed: {source}")]
    Construction {
        /// Path of the entry whose factory failed
        path: String,
        /// The factory error
        #[source]
        source: SharedSource,
    },

    /// A resolved instance is not of the requested type
    #[error("Type mismatch for {path}: expected {expected}")]
    TypeMismatch {
        /// The resolved path
        path: String,
        /// Name of the requested type
        expected: &'static str,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<SharedSource>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<SharedSource>,
    },

    /// A bulk-loaded item could not be registered
    #[error("Cannot load {file}: {message}")]
    Load {
        /// The item source (usually a file)
        file: String,
        /// Description of the failure
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<SharedSource>,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Registration error creation methods
impl Error {
    /// Create an invalid path error
    pub fn invalid_path<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid item error
    pub fn invalid_item<S: Into<String>>(message: S) -> Self {
        Self::InvalidItem {
            message: message.into(),
        }
    }

    /// Create a duplicate registration error
    pub fn already_provided<S: Into<String>>(path: S) -> Self {
        Self::AlreadyProvided { path: path.into() }
    }

    /// Create a not-a-namespace error
    pub fn not_a_namespace<S: Into<String>>(path: S) -> Self {
        Self::NotANamespace { path: path.into() }
    }
}

// Resolution error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a branch not found error
    pub fn branch_not_found<S: Into<String>>(path: S) -> Self {
        Self::BranchNotFound { path: path.into() }
    }

    /// Wrap a factory error
    pub fn construction<S: Into<String>>(path: S, source: BoxError) -> Self {
        Self::Construction {
            path: path.into(),
            source: Arc::from(source),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(path: S, expected: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Create a load error
    pub fn load<F: Into<String>, S: Into<String>>(file: F, message: S) -> Self {
        Self::Load {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification
impl Error {
    /// True for failures raised synchronously by `register`
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::InvalidItem { .. }
                | Self::AlreadyProvided { .. }
                | Self::NotANamespace { .. }
        )
    }

    /// True when the requested path does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::BranchNotFound { .. })
    }

    /// True when a factory (or one of its transitive dependencies) failed
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }
}
