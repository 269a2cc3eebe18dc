//! Network transport for batch report requests.
//!
//! The client talks to the report service through the [`Transport`]
//! trait: one blocking POST per batch, no retries. [`HttpTransport`]
//! is the reqwest-backed implementation (requires the `http` feature).

#[cfg(feature = "http")]
mod auth;
#[cfg(feature = "http")]
mod http;
mod user_agent;

#[cfg(feature = "http")]
pub use auth::authorization_header;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use user_agent::{Product, UserAgent, UserAgentBuilder};

use crate::error::Result;

/// Media type of a batch report request body.
pub const REQUEST_V1_JSON: &str = "application/vnd.ossindex.component-report-request.v1+json";

/// Media type of a batch report response body.
pub const REPORT_V1_JSON: &str = "application/vnd.ossindex.component-report.v1+json";

/// Path of the batch endpoint, relative to the base URL.
pub const COMPONENT_REPORT_PATH: &str = "api/v3/component-report";

/// Performs request/response round trips against the report service.
///
/// Implementations receive their configuration when constructed and must
/// be usable from multiple threads. Timeouts are the implementation's
/// concern; callers block until `post` returns.
pub trait Transport: Send + Sync {
    /// POST `body` to `url` and return the response body.
    ///
    /// Fails with a transport error on I/O failure or any non-success status.
    fn post(&self, url: &str, content_type: &str, body: &str, accept: &str) -> Result<String>;

    /// Release any held resources.
    fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Name for log output.
    fn name(&self) -> &'static str;
}
