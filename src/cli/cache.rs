//! Cache command handler.
//!
//! Implements the `cache` subcommand for inspecting and pruning the
//! persistent report cache.

use super::output::OutputFormat;
use crate::cache::{DirectoryCache, ReportCache};
use crate::config::{CacheConfig, ClientConfig, DirectoryCacheConfig};
use crate::marshal::JsonMarshaller;
use crate::model::Identifier;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Operation to run against the directory cache.
#[derive(Debug, Clone)]
pub enum CacheAction {
    Stats { format: OutputFormat },
    Clear,
    Purge { coordinates: Vec<String> },
}

/// Directory cache settings for the command.
///
/// A configured directory cache is used as-is; otherwise the default
/// location applies. `cache_dir` overrides either.
#[must_use]
pub fn resolve_directory_config(
    client_config: &ClientConfig,
    cache_dir: Option<PathBuf>,
) -> DirectoryCacheConfig {
    let mut config = match &client_config.cache {
        CacheConfig::Directory(directory) => directory.clone(),
        CacheConfig::Memory(_) => DirectoryCacheConfig::default(),
    };
    if let Some(base_dir) = cache_dir {
        config.base_dir = base_dir;
    }
    config
}

/// Run the cache command.
pub fn run_cache(
    client_config: &ClientConfig,
    cache_dir: Option<PathBuf>,
    action: CacheAction,
) -> Result<()> {
    let config = resolve_directory_config(client_config, cache_dir);
    let cache = DirectoryCache::new(&config, Arc::new(JsonMarshaller))
        .with_context(|| format!("opening cache at {}", config.base_dir.display()))?;

    match action {
        CacheAction::Stats { format } => {
            let stats = cache.stats()?;
            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "base_dir": cache.base_dir(),
                        "expire_after": crate::config::duration::format_duration(cache.expire_after()),
                        "stats": stats,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Summary => {
                    println!("Cache directory: {}", cache.base_dir().display());
                    println!("{stats}");
                }
            }
        }
        CacheAction::Clear => {
            let removed = cache.clear()?;
            eprintln!("Removed {removed} entries from {}", cache.base_dir().display());
        }
        CacheAction::Purge { coordinates } => {
            for coordinate in &coordinates {
                let id = Identifier::parse_purl(coordinate)
                    .with_context(|| format!("invalid package-url '{coordinate}'"))?;
                if cache.purge_entry(&id)? {
                    eprintln!("Purged {id}");
                } else {
                    eprintln!("Not cached: {id}");
                }
            }
        }
    }

    cache.close()?;
    Ok(())
}
