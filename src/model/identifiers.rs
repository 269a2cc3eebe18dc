//! Component identifiers used as cache and lookup keys.
//!
//! An [`Identifier`] is the canonical string form of a component's
//! coordinates (normally a package-url). Equality and hashing are defined
//! by that string alone; the client never looks inside it.

use crate::error::{OssIndexError, Result};
use packageurl::PackageUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for one component version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an already canonical identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a package-url and canonicalise it.
    ///
    /// Qualifiers are sorted and components percent-encoded the way the
    /// package-url specification requires, so equivalent inputs produce
    /// equal identifiers.
    pub fn parse_purl(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(OssIndexError::validation("Empty package-url"));
        }
        let purl = PackageUrl::from_str(trimmed).map_err(|e| {
            OssIndexError::validation(format!("Malformed package-url '{trimmed}': {e}"))
        })?;
        Ok(Self(purl.to_string()))
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}
