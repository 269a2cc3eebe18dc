//! Report resolution client.
//!
//! [`ReportClient`] answers "what is known about these components?" with as
//! few round trips as possible:
//!
//! 1. distinct identifiers are probed against the [`ReportCache`]
//! 2. misses are posted to the service in bounded batches, one at a time
//! 3. every response is count-checked and correlated to its identifiers
//! 4. all new reports are committed to the cache in one `put_all`
//! 5. the result is assembled over the original input, duplicates included
//!
//! Transport and consistency failures abort the whole call and leave the
//! cache untouched. Cache failures only cost round trips.

use crate::cache::{ReportCache, build_cache};
use crate::config::{ClientConfig, CorrelationStrategy};
use crate::error::{ConsistencyErrorKind, OssIndexError, Result};
use crate::marshal::Marshaller;
use crate::model::{ComponentReport, ComponentReportRequest, Identifier, ReportSet, RequestStats};
use crate::transport::{COMPONENT_REPORT_PATH, REPORT_V1_JSON, REQUEST_V1_JSON, Transport};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Client for the component-report service.
pub struct ReportClient {
    transport: Box<dyn Transport>,
    marshaller: Arc<dyn Marshaller>,
    cache: Box<dyn ReportCache>,
    endpoint: String,
    batch_size: usize,
    correlation: CorrelationStrategy,
}

impl ReportClient {
    /// Create a client, building the cache backend from `config`.
    ///
    /// `transport` must already be configured; it is used as given.
    pub fn new(
        config: &ClientConfig,
        transport: Box<dyn Transport>,
        marshaller: Arc<dyn Marshaller>,
    ) -> Result<Self> {
        config.validated()?;
        let cache = build_cache(&config.cache, Arc::clone(&marshaller))
            .map_err(|e| OssIndexError::config(format!("Invalid cache configuration: {e}")))?;
        Self::with_cache(config, transport, marshaller, cache)
    }

    /// Create a client around an existing cache.
    pub fn with_cache(
        config: &ClientConfig,
        transport: Box<dyn Transport>,
        marshaller: Arc<dyn Marshaller>,
        cache: Box<dyn ReportCache>,
    ) -> Result<Self> {
        config.validated()?;
        let endpoint = format!("{}{}", config.normalized_base_url(), COMPONENT_REPORT_PATH);

        tracing::debug!(
            "Report client: endpoint={}, batch_size={}, cache={}, transport={}, marshaller={}",
            endpoint,
            config.batch_size,
            cache.name(),
            transport.name(),
            marshaller.name()
        );

        Ok(Self {
            transport,
            marshaller,
            cache,
            endpoint,
            batch_size: config.batch_size,
            correlation: config.correlation,
        })
    }

    /// Create a client that talks HTTP with the default user agent.
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        use crate::marshal::JsonMarshaller;
        use crate::transport::{HttpTransport, UserAgent};

        config.validated()?;
        let transport = HttpTransport::new(config, &UserAgent::client_default())?;
        Self::new(config, Box::new(transport), Arc::new(JsonMarshaller))
    }

    /// URL batches are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The cache this client resolves against.
    #[must_use]
    pub fn cache(&self) -> &dyn ReportCache {
        self.cache.as_ref()
    }

    /// Resolve a report for every identifier in `ids`.
    ///
    /// The result has one entry per input element, in input order, with
    /// duplicates kept. Each distinct identifier is looked up at most once.
    pub fn request_reports(&self, ids: &[Identifier]) -> Result<ReportSet> {
        if ids.is_empty() {
            return Err(OssIndexError::validation("One or more coordinates required"));
        }

        let start = Instant::now();
        let mut stats = RequestStats {
            requested: ids.len(),
            ..RequestStats::default()
        };
        tracing::debug!("Requesting {} component-reports", ids.len());

        let mut seen = HashSet::with_capacity(ids.len());
        let distinct: Vec<&Identifier> = ids.iter().filter(|id| seen.insert(*id)).collect();
        stats.distinct = distinct.len();

        // Split into cached and uncached
        let mut resolved: HashMap<&Identifier, ComponentReport> = HashMap::with_capacity(distinct.len());
        let mut uncached: Vec<&Identifier> = Vec::new();
        for id in distinct {
            match self.cache.get_if_present(id) {
                Ok(Some(report)) => {
                    tracing::trace!("Found cached report for: {}", id);
                    stats.cache_hits += 1;
                    resolved.insert(id, report);
                }
                Ok(None) => uncached.push(id),
                Err(e) => {
                    tracing::warn!("Cache lookup failed for {}: {}", id, e);
                    stats.cache_errors += 1;
                    uncached.push(id);
                }
            }
        }

        // Resolve every batch before touching the cache
        let mut fetched: Vec<(Identifier, ComponentReport)> = Vec::with_capacity(uncached.len());
        for batch in uncached.chunks(self.batch_size) {
            stats.batches += 1;
            fetched.extend(self.request_batch(batch)?);
        }
        stats.resolved = fetched.len();

        if !fetched.is_empty()
            && let Err(e) = self.cache.put_all(&fetched)
        {
            tracing::warn!("Failed to cache {} reports: {}", fetched.len(), e);
            stats.cache_errors += 1;
        }

        let fetched: HashMap<&Identifier, &ComponentReport> =
            fetched.iter().map(|(id, report)| (id, report)).collect();

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let report = resolved
                .get(id)
                .or_else(|| fetched.get(id).copied())
                .ok_or_else(|| OssIndexError::illegal_state(format!("Unresolved coordinates: {id}")))?;
            entries.push((id.clone(), report.clone()));
        }

        stats.elapsed = start.elapsed();
        stats.log_summary();
        Ok(ReportSet::new(entries, stats))
    }

    /// Resolve the report for a single identifier.
    pub fn request_report(&self, id: &Identifier) -> Result<ComponentReport> {
        let reports = self.request_reports(std::slice::from_ref(id))?;
        reports
            .into_iter()
            .next()
            .map(|(_, report)| report)
            .ok_or_else(|| OssIndexError::illegal_state(format!("No report resolved for: {id}")))
    }

    /// Close the cache and then the transport.
    pub fn close(&self) -> Result<()> {
        let cache_result = self.cache.close();
        let transport_result = self.transport.close();
        cache_result.and(transport_result)
    }

    /// Post one batch and pair each returned report with its identifier.
    fn request_batch(&self, batch: &[&Identifier]) -> Result<Vec<(Identifier, ComponentReport)>> {
        tracing::debug!("Requesting {} un-cached component-reports", batch.len());

        let request = ComponentReportRequest::new(batch.iter().map(|id| (*id).clone()));
        let body = self.marshaller.marshal_request(&request)?;
        let response = self
            .transport
            .post(&self.endpoint, REQUEST_V1_JSON, &body, REPORT_V1_JSON)?;
        let reports = self.marshaller.unmarshal_reports(&response)?;

        if reports.len() != batch.len() {
            return Err(OssIndexError::consistency(
                format!("POST {}", self.endpoint),
                ConsistencyErrorKind::CountMismatch {
                    expected: batch.len(),
                    actual: reports.len(),
                },
            ));
        }

        match self.correlation {
            CorrelationStrategy::Positional => Ok(batch
                .iter()
                .map(|id| (*id).clone())
                .zip(reports)
                .collect()),
            CorrelationStrategy::SelfDescribing => correlate_by_coordinates(batch, reports),
        }
    }
}

/// Match reports to the batch by the coordinates each report declares.
///
/// Returned pairs follow the batch order regardless of response order.
fn correlate_by_coordinates(
    batch: &[&Identifier],
    reports: Vec<ComponentReport>,
) -> Result<Vec<(Identifier, ComponentReport)>> {
    let mut by_coordinates: HashMap<Identifier, ComponentReport> = HashMap::with_capacity(reports.len());
    for (index, report) in reports.into_iter().enumerate() {
        let Some(coordinates) = report.coordinates.clone() else {
            return Err(OssIndexError::consistency(
                "correlating reports",
                ConsistencyErrorKind::MissingCoordinates(index),
            ));
        };
        if !batch.contains(&&coordinates) {
            return Err(OssIndexError::consistency(
                "correlating reports",
                ConsistencyErrorKind::UnexpectedCoordinates(coordinates.to_string()),
            ));
        }
        if by_coordinates.contains_key(&coordinates) {
            return Err(OssIndexError::consistency(
                "correlating reports",
                ConsistencyErrorKind::DuplicateCoordinates(coordinates.to_string()),
            ));
        }
        by_coordinates.insert(coordinates, report);
    }

    // counts match and every key is a distinct batch member, so each id is present
    batch
        .iter()
        .map(|id| {
            by_coordinates
                .remove(*id)
                .map(|report| ((*id).clone(), report))
                .ok_or_else(|| OssIndexError::illegal_state(format!("Unresolved coordinates: {id}")))
        })
        .collect()
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("endpoint", &self.endpoint)
            .field("batch_size", &self.batch_size)
            .field("correlation", &self.correlation)
            .field("cache", &self.cache.name())
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}
