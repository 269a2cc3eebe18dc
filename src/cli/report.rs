//! Report command handler.
//!
//! Implements the `report` subcommand: resolve reports for a list of
//! package-urls and print them in input order.

use super::exit_codes;
use super::output::{OutputFormat, OutputTarget, write_output};
use crate::client::ReportClient;
use crate::config::{CacheConfig, ClientConfig, DirectoryCacheConfig, MemoryCacheConfig};
use crate::model::{ComponentReport, Identifier, ReportSet};
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde_json::json;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cache backend selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheKind {
    Memory,
    Directory,
}

/// Command-line settings layered over the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    pub base_url: Option<String>,
    pub batch_size: Option<usize>,
    pub cache: Option<CacheKind>,
    pub cache_dir: Option<PathBuf>,
    pub expire_after: Option<Duration>,
}

impl ClientOverrides {
    /// Apply the overrides to `config`.
    ///
    /// `--cache-dir` implies the directory backend. `--expire-after` sets the
    /// expiry of whichever backend ends up selected.
    #[must_use]
    pub fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        let kind = self.cache.or_else(|| self.cache_dir.as_ref().map(|_| CacheKind::Directory));
        match (kind, &config.cache) {
            (Some(CacheKind::Memory), CacheConfig::Directory(_)) => {
                config.cache = CacheConfig::Memory(MemoryCacheConfig::default());
            }
            (Some(CacheKind::Directory), CacheConfig::Memory(_)) => {
                config.cache = CacheConfig::Directory(DirectoryCacheConfig::default());
            }
            _ => {}
        }

        match &mut config.cache {
            CacheConfig::Memory(memory) => {
                if let Some(expire_after) = self.expire_after {
                    memory.expire_after_access = expire_after;
                }
            }
            CacheConfig::Directory(directory) => {
                if let Some(base_dir) = self.cache_dir {
                    directory.base_dir = base_dir;
                }
                if let Some(expire_after) = self.expire_after {
                    directory.expire_after = expire_after;
                }
            }
        }
        config
    }
}

/// Report command configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub coordinates: Vec<String>,
    pub file: Option<PathBuf>,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub fail_on_vuln: bool,
}

/// Run the report command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_report(client_config: &ClientConfig, config: ReportConfig) -> Result<i32> {
    let ids = collect_identifiers(&config.coordinates, config.file.as_deref())?;
    if ids.is_empty() {
        bail!("No package-urls given; pass them as arguments or with --file");
    }

    let client = ReportClient::from_config(client_config).context("creating report client")?;
    let reports = client
        .request_reports(&ids)
        .context("requesting component reports")?;
    if let Err(e) = client.close() {
        tracing::warn!("Failed to close report client: {}", e);
    }

    let output = match config.format {
        OutputFormat::Json => format_reports_json(&reports)?,
        OutputFormat::Summary => format_reports_summary(&reports),
    };
    write_output(&output, &OutputTarget::from_option(config.output_file))?;

    let vulnerable = reports.vulnerable().count();
    tracing::info!("{} of {} components have known vulnerabilities", vulnerable, reports.len());

    if config.fail_on_vuln && vulnerable > 0 {
        return Ok(exit_codes::VULNERABLE);
    }
    Ok(exit_codes::SUCCESS)
}

/// Gather identifiers from arguments, then from `file`.
///
/// The file holds one package-url per line; blank lines and `#` comments
/// are skipped.
pub fn collect_identifiers(args: &[String], file: Option<&Path>) -> Result<Vec<Identifier>> {
    let mut ids = Vec::with_capacity(args.len());
    for arg in args {
        ids.push(Identifier::parse_purl(arg).with_context(|| format!("invalid package-url '{arg}'"))?);
    }

    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            ids.push(Identifier::parse_purl(line).with_context(|| {
                format!("{}:{}: invalid package-url '{line}'", path.display(), line_no + 1)
            })?);
        }
    }
    Ok(ids)
}

fn format_reports_json(reports: &ReportSet) -> Result<String> {
    let entries: Vec<_> = reports
        .iter()
        .map(|(id, report)| json!({ "coordinates": id, "report": report }))
        .collect();
    let stats = reports.stats();
    let output = json!({
        "reports": entries,
        "summary": {
            "requested": stats.requested,
            "distinct": stats.distinct,
            "cache_hits": stats.cache_hits,
            "batches": stats.batches,
            "vulnerable": reports.vulnerable().count(),
        }
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn format_reports_summary(reports: &ReportSet) -> String {
    let mut out = String::new();
    for (id, report) in reports.iter() {
        format_report_summary(&mut out, id, report);
    }
    let stats = reports.stats();
    let _ = write!(
        out,
        "\n{} components, {} vulnerable ({} cached, {} batches)",
        stats.requested,
        reports.vulnerable().count(),
        stats.cache_hits,
        stats.batches
    );
    out
}

fn format_report_summary(out: &mut String, id: &Identifier, report: &ComponentReport) {
    match report.vulnerabilities.len() {
        0 => {
            let _ = writeln!(out, "{id}  no known vulnerabilities");
        }
        1 => {
            let _ = writeln!(out, "{id}  1 vulnerability");
        }
        n => {
            let _ = writeln!(out, "{id}  {n} vulnerabilities");
        }
    }
    for vuln in &report.vulnerabilities {
        let score = vuln
            .cvss_score
            .map_or_else(|| "   -".to_string(), |s| format!("{s:>4.1}"));
        let name = vuln
            .cve
            .as_deref()
            .or(vuln.display_name.as_deref())
            .unwrap_or(&vuln.id);
        let title = vuln.title.as_deref().unwrap_or("");
        let _ = writeln!(out, "  [{score}] {name} {title}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentReportVulnerability;

    #[test]
    fn test_overrides_switch_to_directory() {
        let overrides = ClientOverrides {
            cache_dir: Some(PathBuf::from("/tmp/ossindex")),
            expire_after: Some(Duration::from_secs(60)),
            ..ClientOverrides::default()
        };
        let config = overrides.apply(ClientConfig::default());
        match config.cache {
            CacheConfig::Directory(directory) => {
                assert_eq!(directory.base_dir, PathBuf::from("/tmp/ossindex"));
                assert_eq!(directory.expire_after, Duration::from_secs(60));
            }
            CacheConfig::Memory(_) => panic!("expected directory cache"),
        }
    }

    #[test]
    fn test_overrides_keep_unset_fields() {
        let config = ClientOverrides {
            batch_size: Some(8),
            ..ClientOverrides::default()
        }
        .apply(ClientConfig::default());
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.base_url, crate::config::DEFAULT_BASE_URL);
        assert!(matches!(config.cache, CacheConfig::Memory(_)));
    }

    #[test]
    fn test_collect_identifiers_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("purls.txt");
        std::fs::write(&path, "# deps\npkg:npm/a@1\n\n  pkg:npm/b@2  \n").unwrap();

        let ids = collect_identifiers(&["pkg:npm/c@3".to_string()], Some(&path)).unwrap();
        let ids: Vec<_> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(ids, ["pkg:npm/c@3", "pkg:npm/a@1", "pkg:npm/b@2"]);
    }

    #[test]
    fn test_collect_identifiers_rejects_garbage() {
        assert!(collect_identifiers(&["not a purl".to_string()], None).is_err());
    }

    #[test]
    fn test_summary_lists_vulnerabilities() {
        let id = Identifier::new("pkg:npm/a@1");
        let mut report = ComponentReport::new(id.clone());
        report.vulnerabilities.push(ComponentReportVulnerability {
            cve: Some("CVE-2020-0001".to_string()),
            title: Some("Prototype pollution".to_string()),
            cvss_score: Some(9.8),
            ..ComponentReportVulnerability::default()
        });

        let mut out = String::new();
        format_report_summary(&mut out, &id, &report);
        assert!(out.starts_with("pkg:npm/a@1  1 vulnerability\n"));
        assert!(out.contains("[ 9.8] CVE-2020-0001 Prototype pollution"));
    }
}
