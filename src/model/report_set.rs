//! Ordered results of a report lookup.

use super::{ComponentReport, Identifier};
use indexmap::IndexMap;
use std::time::Duration;

/// Reports in the order they were requested.
///
/// Holds exactly one entry per requested identifier occurrence, so
/// repeated identifiers in the input appear repeatedly here.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    entries: Vec<(Identifier, ComponentReport)>,
    stats: RequestStats,
}

impl ReportSet {
    pub(crate) fn new(entries: Vec<(Identifier, ComponentReport)>, stats: RequestStats) -> Self {
        Self { entries, stats }
    }

    /// Number of entries, counting repeated identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First report recorded for `id`.
    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<&ComponentReport> {
        self.entries
            .iter()
            .find_map(|(key, report)| (key == id).then_some(report))
    }

    /// Entry at a given input position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&Identifier, &ComponentReport)> {
        self.entries.get(index).map(|(id, report)| (id, report))
    }

    /// Iterate entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &ComponentReport)> {
        self.entries.iter().map(|(id, report)| (id, report))
    }

    /// Identifiers whose reports list at least one vulnerability.
    pub fn vulnerable(&self) -> impl Iterator<Item = (&Identifier, &ComponentReport)> {
        self.iter().filter(|(_, report)| report.is_vulnerable())
    }

    /// Statistics for the call that produced this set.
    #[must_use]
    pub const fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// Collapse repeated identifiers, keeping first-seen order.
    #[must_use]
    pub fn into_index_map(self) -> IndexMap<Identifier, ComponentReport> {
        let mut map = IndexMap::with_capacity(self.entries.len());
        for (id, report) in self.entries {
            map.entry(id).or_insert(report);
        }
        map
    }
}

impl IntoIterator for ReportSet {
    type Item = (Identifier, ComponentReport);
    type IntoIter = std::vec::IntoIter<(Identifier, ComponentReport)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Statistics from one `request_reports` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestStats {
    /// Identifiers passed in, counting duplicates
    pub requested: usize,
    /// Distinct identifiers
    pub distinct: usize,
    /// Distinct identifiers served from the cache
    pub cache_hits: usize,
    /// Round trips made to the remote service
    pub batches: usize,
    /// Reports resolved over the network
    pub resolved: usize,
    /// Cache operations that failed and were degraded
    pub cache_errors: usize,
    /// Wall-clock time of the call
    pub elapsed: Duration,
}

impl RequestStats {
    /// Log a summary of the call
    pub fn log_summary(&self) {
        tracing::debug!(
            "{} component-reports ({} distinct): {} cache hits, {} resolved in {} batches, \
             {} cache errors; {:?}",
            self.requested,
            self.distinct,
            self.cache_hits,
            self.resolved,
            self.batches,
            self.cache_errors,
            self.elapsed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, description: &str) -> ComponentReport {
        let mut report = ComponentReport::new(Identifier::new(id));
        report.description = Some(description.to_string());
        report
    }

    #[test]
    fn test_preserves_duplicates_and_order() {
        let a = Identifier::new("pkg:npm/a@1");
        let b = Identifier::new("pkg:npm/b@1");
        let set = ReportSet::new(
            vec![
                (a.clone(), report("pkg:npm/a@1", "a")),
                (b.clone(), report("pkg:npm/b@1", "b")),
                (a.clone(), report("pkg:npm/a@1", "a")),
            ],
            RequestStats::default(),
        );

        assert_eq!(set.len(), 3);
        let order: Vec<_> = set.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, ["pkg:npm/a@1", "pkg:npm/b@1", "pkg:npm/a@1"]);
        assert_eq!(set.get(&b).and_then(|r| r.description.as_deref()), Some("b"));

        let map = set.into_index_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index(0).map(|(id, _)| id), Some(&a));
    }

    #[test]
    fn test_vulnerable_filter() {
        let mut vulnerable = report("pkg:npm/x@1", "x");
        vulnerable.vulnerabilities.push(crate::model::ComponentReportVulnerability {
            id: "1".to_string(),
            display_name: None,
            title: None,
            description: None,
            cvss_score: Some(9.8),
            cvss_vector: None,
            cve: Some("CVE-2021-44228".to_string()),
            cwe: None,
            reference: None,
            external_references: Vec::new(),
        });
        let set = ReportSet::new(
            vec![
                (Identifier::new("pkg:npm/x@1"), vulnerable),
                (Identifier::new("pkg:npm/y@1"), report("pkg:npm/y@1", "y")),
            ],
            RequestStats::default(),
        );
        assert_eq!(set.vulnerable().count(), 1);
    }
}
