//! Performance benchmarks for the report caches and client resolution.
//!
//! Run with: cargo bench --bench cache_benchmark

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ossindex_client::cache::{DirectoryCache, MemoryCache, ReportCache};
use ossindex_client::config::{CacheConfig, ClientConfig, DirectoryCacheConfig, MemoryCacheConfig};
use ossindex_client::{
    ComponentReport, ComponentReportRequest, ComponentReportVulnerability, Identifier,
    JsonMarshaller, ReportClient, Result, Transport,
};
use std::hint::black_box;
use std::sync::Arc;

/// Generate `count` identifiers with reports carrying a few vulnerabilities.
fn generate_entries(count: usize) -> Vec<(Identifier, ComponentReport)> {
    (0..count)
        .map(|i| {
            let id = Identifier::new(format!("pkg:npm/component-{i}@1.{}.{}", i % 10, i % 100));
            let mut report = ComponentReport::new(id.clone());
            report.description = Some(format!("Component number {i}"));
            for v in 0..(i % 4) {
                report.vulnerabilities.push(ComponentReportVulnerability {
                    id: format!("vuln-{i}-{v}"),
                    title: Some("Example finding".to_string()),
                    cvss_score: Some(5.0),
                    ..ComponentReportVulnerability::default()
                });
            }
            (id, report)
        })
        .collect()
}

/// Answers every batch locally so only client and cache work is measured.
struct EchoTransport;

impl Transport for EchoTransport {
    fn post(&self, _: &str, _: &str, body: &str, _: &str) -> Result<String> {
        let request: ComponentReportRequest = serde_json::from_str(body)?;
        let reports: Vec<_> = request
            .coordinates
            .into_iter()
            .map(ComponentReport::new)
            .collect();
        Ok(serde_json::to_string(&reports)?)
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

fn bench_memory_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_cache");
    for size in [100, 1_000] {
        let entries = generate_entries(size);
        let config = MemoryCacheConfig {
            maximum_size: size as u64,
            ..MemoryCacheConfig::default()
        };

        group.bench_with_input(BenchmarkId::new("put_all", size), &entries, |b, entries| {
            b.iter(|| {
                let cache = MemoryCache::new(&config);
                cache.put_all(black_box(entries)).unwrap();
            });
        });

        let cache = MemoryCache::new(&config);
        cache.put_all(&entries).unwrap();
        group.bench_with_input(BenchmarkId::new("get_hit", size), &entries, |b, entries| {
            b.iter(|| {
                for (id, _) in entries {
                    black_box(cache.get_if_present(id).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_directory_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory_cache");
    group.sample_size(20);
    let dir = tempfile::tempdir().unwrap();
    let cache = DirectoryCache::new(
        &DirectoryCacheConfig::new(dir.path()),
        Arc::new(JsonMarshaller),
    )
    .unwrap();

    for size in [10, 100] {
        let entries = generate_entries(size);

        group.bench_with_input(BenchmarkId::new("put_all", size), &entries, |b, entries| {
            b.iter(|| cache.put_all(black_box(entries)).unwrap());
        });

        cache.put_all(&entries).unwrap();
        group.bench_with_input(BenchmarkId::new("get_hit", size), &entries, |b, entries| {
            b.iter(|| {
                for (id, _) in entries {
                    black_box(cache.get_if_present(id).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_request_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_reports");
    let config = ClientConfig::default().with_cache(CacheConfig::Memory(MemoryCacheConfig {
        maximum_size: 4096,
        ..MemoryCacheConfig::default()
    }));
    for size in [64, 512] {
        let ids: Vec<Identifier> = generate_entries(size).into_iter().map(|(id, _)| id).collect();

        group.bench_with_input(BenchmarkId::new("cold", size), &ids, |b, ids| {
            b.iter(|| {
                let client = ReportClient::new(
                    &config,
                    Box::new(EchoTransport),
                    Arc::new(JsonMarshaller),
                )
                .unwrap();
                black_box(client.request_reports(ids).unwrap());
            });
        });

        let client = ReportClient::new(
            &config,
            Box::new(EchoTransport),
            Arc::new(JsonMarshaller),
        )
        .unwrap();
        client.request_reports(&ids).unwrap();
        group.bench_with_input(BenchmarkId::new("warm", size), &ids, |b, ids| {
            b.iter(|| black_box(client.request_reports(ids).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_memory_cache,
    bench_directory_cache,
    bench_request_reports
);
criterion_main!(benches);
