// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store-wide commands: compaction candidates, purge, garbage collection

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use rl_adapters::{HttpCatalogAdapter, TracedCatalogAdapter};
use rl_core::{Clock, CompactionCandidate, GcConfig};
use rl_engine::{GarbageCollector, GcReport, LogService, PurgeReport};
use rl_storage::{LocalStore, LogStore};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Args)]
pub struct CandidatesArgs {
    /// Minimum number of uncompacted records
    #[arg(long, default_value_t = 1)]
    pub min_size: u64,
}

#[derive(Args)]
pub struct GcArgs {
    /// Catalog existence-check endpoint
    #[arg(long)]
    pub catalog_url: String,
    /// Catalog request timeout (e.g. "10s")
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub catalog_timeout: Duration,
    /// Ids per catalog request
    #[arg(long, default_value_t = GcConfig::default().catalog_batch_size)]
    pub catalog_batch_size: usize,
    /// Offsets deleted per statement
    #[arg(long, default_value_t = GcConfig::default().delete_batch_size)]
    pub delete_batch_size: u64,
}

#[derive(Serialize)]
struct CandidateInfo {
    collection_id: String,
    next_offset: u64,
    oldest_timestamp_nanos: i64,
}

impl From<CompactionCandidate> for CandidateInfo {
    fn from(candidate: CompactionCandidate) -> Self {
        Self {
            collection_id: candidate.collection_id.to_string(),
            next_offset: candidate.next_offset,
            oldest_timestamp_nanos: candidate.oldest_timestamp_nanos,
        }
    }
}

impl fmt::Display for CandidateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} next={:<8} oldest={}",
            self.collection_id, self.next_offset, self.oldest_timestamp_nanos
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct PurgeInfo(PurgeReport);

impl fmt::Display for PurgeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "purged {} records from {} collections ({} failed)",
            self.0.purged, self.0.scanned, self.0.failed
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct GcInfo(GcReport);

impl fmt::Display for GcInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checked {} collections, deleted {} ({} failed)",
            self.0.scanned, self.0.deleted, self.0.failed
        )
    }
}

pub async fn candidates<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: CandidatesArgs,
    format: OutputFormat,
) -> Result<()> {
    let candidates: Vec<CandidateInfo> = service
        .collections_to_compact(args.min_size)
        .await?
        .into_iter()
        .map(CandidateInfo::from)
        .collect();

    output::print_list(&candidates, format);
    Ok(())
}

pub async fn purge<C: Clock>(
    service: &LogService<LocalStore, C>,
    format: OutputFormat,
) -> Result<()> {
    let report = service.purge().await?;
    service.store().checkpoint()?;
    output::print(&PurgeInfo(report), format);
    Ok(())
}

pub async fn gc(store: &LocalStore, args: GcArgs, format: OutputFormat) -> Result<()> {
    let catalog = TracedCatalogAdapter::new(HttpCatalogAdapter::new(
        args.catalog_url,
        args.catalog_timeout,
    ));
    let config = GcConfig {
        catalog_batch_size: args.catalog_batch_size,
        delete_batch_size: args.delete_batch_size,
        ..GcConfig::default()
    };
    let report = GarbageCollector::new(store.clone(), catalog, &config)
        .collect()
        .await?;

    output::print(&GcInfo(report), format);
    Ok(())
}
