//! Provider paths
//!
//! A path is an ordered, non-empty list of segment names written as a single
//! string joined by [`DELIMITER`]. Only the final segment may be the
//! [`WILDCARD`] token.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DELIMITER, WILDCARD};
use crate::error::{Error, Result};

/// Parsed provider path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderPath {
    segments: Vec<String>,
}

impl ProviderPath {
    /// Parse and validate a path string
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_path(raw, "path must not be empty"));
        }

        let segments: Vec<String> = raw.split(DELIMITER).map(str::to_owned).collect();
        let last = segments.len() - 1;

        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(Error::invalid_path(raw, "path segments must not be empty"));
            }
            if segment == WILDCARD && idx != last {
                return Err(Error::invalid_path(
                    raw,
                    format!("{WILDCARD} must not be used for branch names"),
                ));
            }
        }

        Ok(Self { segments })
    }

    /// All segments, including the final name
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments addressing the namespace that holds the final name
    pub fn branch(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Final segment
    pub fn name(&self) -> &str {
        // parse() guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// True when the final segment is the wildcard token
    pub fn is_wildcard(&self) -> bool {
        self.name() == WILDCARD
    }

    /// Namespace portion rendered back into a string (empty for the root)
    pub fn branch_string(&self) -> String {
        self.branch().join(DELIMITER)
    }

    /// Same namespace, different final segment
    pub fn with_name(&self, name: &str) -> Self {
        let mut segments = self.branch().to_vec();
        segments.push(name.to_owned());
        Self { segments }
    }

    /// Whether `self`, read as a pattern, covers `other`
    ///
    /// Equal paths match; a wildcard pattern matches every concrete name in
    /// the same namespace.
    pub fn matches(&self, other: &ProviderPath) -> bool {
        if self == other {
            return true;
        }
        self.is_wildcard() && !other.is_wildcard() && self.branch() == other.branch()
    }
}

impl fmt::Display for ProviderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(DELIMITER))
    }
}

impl FromStr for ProviderPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
