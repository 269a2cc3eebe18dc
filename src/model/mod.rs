//! Data model for component report lookups.
//!
//! [`Identifier`] is the opaque lookup key, [`ComponentReport`] the
//! immutable per-component result and [`ReportSet`] the ordered answer
//! to one `request_reports` call.

mod identifiers;
mod report;
mod report_set;

pub use identifiers::*;
pub use report::*;
pub use report_set::*;
