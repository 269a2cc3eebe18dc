//! `User-Agent` header construction.
//!
//! A user agent is one or more products, each rendered as
//! `name[/version][ (comment; comment)]` and separated by spaces.
//! The value is built once at startup and handed to the transport.

use crate::error::{OssIndexError, Result};
use std::fmt;

/// Product name used for this client's default user agent.
pub const CLIENT_PRODUCT: &str = "ossindex-client";

/// One product token of a user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: String,
    version: Option<String>,
    separator: String,
    comments: Vec<String>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            separator: "; ".to_string(),
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Separator placed between comments, `"; "` by default.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ref version) = self.version {
            write!(f, "/{version}")?;
        }
        if !self.comments.is_empty() {
            write!(f, " ({})", self.comments.join(&self.separator))?;
        }
        Ok(())
    }
}

/// Builder for a [`UserAgent`].
#[derive(Debug, Clone, Default)]
pub struct UserAgentBuilder {
    products: Vec<Product>,
}

impl UserAgentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Render the user agent. At least one product is required.
    pub fn build(self) -> Result<UserAgent> {
        if self.products.is_empty() {
            return Err(OssIndexError::validation(
                "At least one product must be specified",
            ));
        }
        let value = self
            .products
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(UserAgent(value))
    }
}

/// A rendered `User-Agent` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(String);

impl UserAgent {
    #[must_use]
    pub fn builder() -> UserAgentBuilder {
        UserAgentBuilder::new()
    }

    /// `ossindex-client/<version> (<os>; <arch>; <family>)`.
    #[must_use]
    pub fn client_default() -> Self {
        let product = Product::new(CLIENT_PRODUCT)
            .version(env!("CARGO_PKG_VERSION"))
            .comment(std::env::consts::OS)
            .comment(std::env::consts::ARCH)
            .comment(std::env::consts::FAMILY);
        let value = product.to_string();
        tracing::debug!("User-agent: {}", value);
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::client_default()
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
