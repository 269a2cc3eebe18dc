//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod cache;
mod config;
mod output;
#[cfg(feature = "http")]
mod report;

pub use cache::{CacheAction, resolve_directory_config, run_cache};
pub use config::{ConfigAction, run_config};
pub use output::{OutputFormat, OutputTarget, write_output};
#[cfg(feature = "http")]
pub use report::{CacheKind, ClientOverrides, ReportConfig, collect_identifiers, run_report};

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Vulnerable components found (with `--fail-on-vuln`)
    pub const VULNERABLE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
