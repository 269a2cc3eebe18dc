//! **A caching, batching client for component vulnerability reports.**
//!
//! `ossindex-client` resolves vulnerability reports for package-url
//! identifiers against a remote component-report service while keeping
//! network round trips to a minimum.
//!
//! ## Key Features
//!
//! - **Cache-first lookup**: every distinct identifier is probed against a
//!   [`ReportCache`] before anything goes over the wire.
//! - **Batching**: cache misses are grouped into bounded batches, posted one
//!   at a time, and count-checked on the way back.
//! - **Ordered results**: the returned [`ReportSet`] has one entry per input
//!   element, in input order, duplicates included.
//! - **Two cache backends**: a bounded in-memory cache and a persistent,
//!   file-locked directory cache that several processes can share.
//!
//! ## Core Concepts & Modules
//!
//! - **[`client`]**: the [`ReportClient`] orchestrator.
//! - **[`cache`]**: the [`ReportCache`] contract, [`MemoryCache`], [`DirectoryCache`].
//! - **[`transport`]**: the [`Transport`] seam and the reqwest-backed `HttpTransport`.
//! - **[`marshal`]**: the [`Marshaller`] seam and [`JsonMarshaller`].
//! - **[`config`]**: [`ClientConfig`], validation and YAML file discovery.
//! - **[`model`]**: [`Identifier`], [`ComponentReport`] and friends.
//!
//! ## Getting Started
//!
//! ```no_run
//! use ossindex_client::{ClientConfig, Identifier, ReportClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportClient::from_config(&ClientConfig::default())?;
//!
//!     let ids = [
//!         Identifier::parse_purl("pkg:npm/lodash@4.17.4")?,
//!         Identifier::parse_purl("pkg:maven/commons-fileupload/commons-fileupload@1.3")?,
//!     ];
//!     let reports = client.request_reports(&ids)?;
//!
//!     for (id, report) in reports.vulnerable() {
//!         println!("{id}: {} vulnerabilities", report.vulnerabilities.len());
//!     }
//!
//!     client.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default): enables `HttpTransport` and the `ossindex` binary.
//!   This adds network dependencies like `reqwest`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // self is kept for API consistency across trait-like impls
    clippy::unused_self
)]

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod marshal;
pub mod model;
pub mod transport;

// Re-export main types for convenience
pub use cache::{CacheStats, DirectoryCache, MemoryCache, ReportCache, build_cache};
pub use client::ReportClient;
pub use config::{
    CacheConfig, ClientConfig, ConfigError, CorrelationStrategy, DirectoryCacheConfig,
    MemoryCacheConfig, Validatable,
};
pub use error::{ErrorContext, OssIndexError, Result};
pub use marshal::{JsonMarshaller, Marshaller};
pub use model::{
    ComponentReport, ComponentReportRequest, ComponentReportVulnerability, Identifier, ReportSet,
    RequestStats,
};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{Transport, UserAgent};
