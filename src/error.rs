//! Unified error types for ossindex-client.
//!
//! This module provides the error hierarchy for the library. Configuration,
//! validation, transport and consistency failures propagate to callers;
//! cache failures are recovered by the client and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ossindex-client operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OssIndexError {
    /// Invalid construction parameters
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid call arguments
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network or protocol failures
    #[error("Transport failed: {context}")]
    Transport {
        context: String,
        #[source]
        source: TransportErrorKind,
    },

    /// Batch responses that do not line up with the submitted identifiers
    #[error("Inconsistent response: {context}")]
    Consistency {
        context: String,
        #[source]
        source: ConsistencyErrorKind,
    },

    /// Internal invariant violations
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Report cache failures
    #[error("Cache operation failed: {context}")]
    Cache {
        context: String,
        #[source]
        source: CacheErrorKind,
    },

    /// Payload (de)serialization failures
    #[error("Marshalling failed: {0}")]
    Marshal(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific transport error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response; status: {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Specific consistency error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConsistencyErrorKind {
    #[error("Result size mismatch; expected: {expected}, have: {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Report for unrequested coordinates: {0}")]
    UnexpectedCoordinates(String),

    #[error("Report without coordinates at position {0}")]
    MissingCoordinates(usize),

    #[error("Duplicate report for coordinates: {0}")]
    DuplicateCoordinates(String),
}

/// Specific cache error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CacheErrorKind {
    #[error("Cache is closed")]
    Closed,

    #[error("Cache IO error: {0}")]
    Io(String),

    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for ossindex-client operations
pub type Result<T> = std::result::Result<T, OssIndexError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl OssIndexError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an illegal-state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Create a transport error
    pub fn transport(context: impl Into<String>, source: TransportErrorKind) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Create a consistency error
    pub fn consistency(context: impl Into<String>, source: ConsistencyErrorKind) -> Self {
        Self::Consistency {
            context: context.into(),
            source,
        }
    }

    /// Create a cache error
    pub fn cache(context: impl Into<String>, source: CacheErrorKind) -> Self {
        Self::Cache {
            context: context.into(),
            source,
        }
    }

    /// Create a cache error for operations on a closed cache
    pub fn cache_closed(context: impl Into<String>) -> Self {
        Self::cache(context, CacheErrorKind::Closed)
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Whether this error originated in the report cache.
    #[must_use]
    pub const fn is_cache_error(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for OssIndexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for OssIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Marshal(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained so the final message shows the path
/// through the code, e.g. `"creating report cache: IO error ..."`.
///
/// ```ignore
/// use ossindex_client::error::ErrorContext;
///
/// let cache = DirectoryCache::new(&config, marshaller)
///     .context("creating report cache")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<OssIndexError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: OssIndexError, new_ctx: &str) -> OssIndexError {
    match err {
        OssIndexError::Transport {
            context: existing,
            source,
        } => OssIndexError::Transport {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OssIndexError::Consistency {
            context: existing,
            source,
        } => OssIndexError::Consistency {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OssIndexError::Cache {
            context: existing,
            source,
        } => OssIndexError::Cache {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OssIndexError::Io {
            path,
            message,
            source,
        } => OssIndexError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        OssIndexError::Config(msg) => OssIndexError::Config(chain_context(new_ctx, &msg)),
        OssIndexError::Validation(msg) => OssIndexError::Validation(chain_context(new_ctx, &msg)),
        OssIndexError::IllegalState(msg) => {
            OssIndexError::IllegalState(chain_context(new_ctx, &msg))
        }
        OssIndexError::Marshal(msg) => OssIndexError::Marshal(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OssIndexError::consistency(
            "batch 1",
            ConsistencyErrorKind::CountMismatch {
                expected: 2,
                actual: 1,
            },
        );
        assert_eq!(err.to_string(), "Inconsistent response: batch 1");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("Result size mismatch; expected: 2, have: 1")
        );
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = OssIndexError::io("/var/cache/ossindex", io_err);
        assert!(err.to_string().contains("/var/cache/ossindex"));
    }

    #[test]
    fn test_context_chaining() {
        let initial: Result<()> = Err(OssIndexError::transport(
            "POST failed",
            TransportErrorKind::Status {
                status: 429,
                body: String::new(),
            },
        ));

        match initial.context("batch 3 of 4") {
            Err(OssIndexError::Transport { context, source }) => {
                assert_eq!(context, "batch 3 of 4: POST failed");
                assert!(matches!(source, TransportErrorKind::Status { status: 429, .. }));
            }
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(OssIndexError::validation("empty"));
        let chained = err_result.with_context(|| {
            called = true;
            "requesting reports"
        });
        assert!(called);
        assert!(matches!(chained, Err(OssIndexError::Validation(msg)) if msg == "requesting reports: empty"));
    }

    #[test]
    fn test_cache_error_classification() {
        assert!(OssIndexError::cache_closed("get").is_cache_error());
        assert!(!OssIndexError::config("bad").is_cache_error());
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("outer", "middle: inner"), "outer: middle: inner");
    }
}
