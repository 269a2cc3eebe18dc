//! Payload marshalling.
//!
//! The [`Marshaller`] trait converts request and report types to and from
//! their wire form. [`JsonMarshaller`] is the serde_json implementation
//! used for both network payloads and persisted cache entries.

use crate::error::{OssIndexError, Result};
use crate::model::{ComponentReport, ComponentReportRequest};
use std::io::{Read, Write};

/// Converts payloads to and from their wire representation.
pub trait Marshaller: Send + Sync {
    /// Serialize a batch request body.
    fn marshal_request(&self, request: &ComponentReportRequest) -> Result<String>;

    /// Deserialize a batch response body into a list of reports.
    fn unmarshal_reports(&self, body: &str) -> Result<Vec<ComponentReport>>;

    /// Serialize a single report into `writer`.
    fn marshal_report(&self, report: &ComponentReport, writer: &mut dyn Write) -> Result<()>;

    /// Deserialize a single report from `reader`.
    fn unmarshal_report(&self, reader: &mut dyn Read) -> Result<ComponentReport>;

    /// Name for log output.
    fn name(&self) -> &'static str;
}

/// JSON marshaller backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller;

impl JsonMarshaller {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Marshaller for JsonMarshaller {
    fn marshal_request(&self, request: &ComponentReportRequest) -> Result<String> {
        Ok(serde_json::to_string(request)?)
    }

    fn unmarshal_reports(&self, body: &str) -> Result<Vec<ComponentReport>> {
        serde_json::from_str(body)
            .map_err(|e| OssIndexError::Marshal(format!("parsing report list: {e}")))
    }

    fn marshal_report(&self, report: &ComponentReport, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(writer, report)?;
        Ok(())
    }

    fn unmarshal_report(&self, reader: &mut dyn Read) -> Result<ComponentReport> {
        serde_json::from_reader(reader)
            .map_err(|e| OssIndexError::Marshal(format!("parsing report: {e}")))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
