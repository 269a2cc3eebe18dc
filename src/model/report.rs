//! Component report wire types.
//!
//! These mirror the JSON documents exchanged with the component-report
//! endpoint. The client treats report content as opaque apart from the
//! `coordinates` field, which ties a report back to its [`Identifier`].

use super::Identifier;
use serde::{Deserialize, Serialize};

/// Request body for a batch of component reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReportRequest {
    /// One or more component coordinates as package-urls
    pub coordinates: Vec<Identifier>,
}

impl ComponentReportRequest {
    /// Build a request for the given identifiers.
    pub fn new(coordinates: impl IntoIterator<Item = Identifier>) -> Self {
        Self {
            coordinates: coordinates.into_iter().collect(),
        }
    }
}

/// Vulnerability findings for a single component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    /// Component coordinates as package-url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Identifier>,

    /// Component description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Component details reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Vulnerabilities recorded for the component
    #[serde(default)]
    pub vulnerabilities: Vec<ComponentReportVulnerability>,
}

impl ComponentReport {
    /// Create an empty report for the given coordinates.
    pub fn new(coordinates: Identifier) -> Self {
        Self {
            coordinates: Some(coordinates),
            description: None,
            reference: None,
            vulnerabilities: Vec::new(),
        }
    }

    /// Whether any vulnerabilities are recorded.
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

/// A single vulnerability entry within a [`ComponentReport`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReportVulnerability {
    /// Vulnerability identifier
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// CVSS score (0.0 - 10.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_vector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coordinates": "pkg:maven/commons-fileupload/commons-fileupload@1.3",
        "description": "The Apache Commons FileUpload library",
        "reference": "https://ossindex.sonatype.org/component/pkg:maven/commons-fileupload/commons-fileupload@1.3",
        "vulnerabilities": [{
            "id": "6b7ea57b-79f8-4357-a73f-3e7a4b1d2f43",
            "displayName": "CVE-2014-0050",
            "title": "[CVE-2014-0050] Improper Input Validation",
            "cvssScore": 7.5,
            "cvssVector": "AV:N/AC:L/Au:N/C:P/I:P/A:P",
            "cve": "CVE-2014-0050",
            "externalReferences": ["http://www.openwall.com/lists/oss-security/2014/02/06/2"]
        }]
    }"#;

    #[test]
    fn test_deserialize_server_report() {
        let report: ComponentReport = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            report.coordinates.as_ref().map(Identifier::as_str),
            Some("pkg:maven/commons-fileupload/commons-fileupload@1.3")
        );
        assert!(report.is_vulnerable());
        let vuln = &report.vulnerabilities[0];
        assert_eq!(vuln.cve.as_deref(), Some("CVE-2014-0050"));
        assert_eq!(vuln.cvss_score, Some(7.5));
        assert_eq!(vuln.external_references.len(), 1);
    }

    #[test]
    fn test_missing_vulnerabilities_defaults_to_empty() {
        let report: ComponentReport =
            serde_json::from_str(r#"{"coordinates":"pkg:npm/left-pad@1.3.0"}"#).unwrap();
        assert!(!report.is_vulnerable());
        assert!(report.description.is_none());
    }

    #[test]
    fn test_request_shape() {
        let request = ComponentReportRequest::new([
            Identifier::new("pkg:npm/a@1"),
            Identifier::new("pkg:npm/b@2"),
        ]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"coordinates": ["pkg:npm/a@1", "pkg:npm/b@2"]})
        );
    }
}
