// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-collection log commands

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use rl_core::{Bounds, Clock, CollectionId, LogRecord};
use rl_engine::{LogService, PushResult};
use rl_storage::LogStore;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct CollectionArgs {
    /// Collection id
    pub collection: String,
}

#[derive(Args)]
pub struct PushArgs {
    /// Collection id
    pub collection: String,
    /// Record payloads, one record each
    pub payloads: Vec<String>,
}

#[derive(Args)]
pub struct PullArgs {
    /// Collection id
    pub collection: String,
    /// First offset to read (offsets start at 1)
    #[arg(long, default_value_t = 1)]
    pub from: u64,
    /// Maximum number of records
    #[arg(long, default_value_t = 100)]
    pub batch: usize,
    /// Only records stamped at or before this time (nanoseconds since epoch)
    #[arg(long)]
    pub end_timestamp: Option<i64>,
}

#[derive(Args)]
pub struct ForkArgs {
    /// Collection to copy from
    pub source: String,
    /// New collection id
    pub target: String,
}

#[derive(Args)]
pub struct AdvanceArgs {
    /// Collection id
    pub collection: String,
    /// New compaction offset
    pub offset: u64,
}

#[derive(Serialize)]
struct PushInfo {
    collection_id: String,
    inserted: u64,
    is_sealed: bool,
}

impl fmt::Display for PushInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sealed {
            write!(f, "{}: sealed, nothing appended", self.collection_id)
        } else {
            write!(f, "{}: appended {}", self.collection_id, self.inserted)
        }
    }
}

#[derive(Serialize)]
struct SealInfo {
    collection_id: String,
    is_sealed: bool,
}

impl fmt::Display for SealInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: sealed", self.collection_id)
    }
}

#[derive(Serialize)]
struct RecordInfo {
    offset: u64,
    timestamp_nanos: i64,
    payload: String,
}

impl From<LogRecord> for RecordInfo {
    fn from(record: LogRecord) -> Self {
        Self {
            offset: record.offset,
            timestamp_nanos: record.timestamp_nanos,
            payload: String::from_utf8_lossy(&record.payload).into_owned(),
        }
    }
}

impl fmt::Display for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8} {:<20} {}", self.offset, self.timestamp_nanos, self.payload)
    }
}

#[derive(Serialize)]
struct BoundsInfo {
    collection_id: String,
    compaction_offset: u64,
    enumeration_offset: u64,
}

impl BoundsInfo {
    fn new(id: &CollectionId, bounds: Bounds) -> Self {
        Self {
            collection_id: id.to_string(),
            compaction_offset: bounds.compaction_offset,
            enumeration_offset: bounds.enumeration_offset,
        }
    }
}

impl fmt::Display for BoundsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: compaction={} enumeration={}",
            self.collection_id, self.compaction_offset, self.enumeration_offset
        )
    }
}

pub async fn push<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: PushArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = CollectionId::new(args.collection);
    let payloads = args.payloads.into_iter().map(String::into_bytes).collect();
    let PushResult {
        inserted,
        is_sealed,
    } = service.push(&id, payloads).await?;

    output::print(
        &PushInfo {
            collection_id: id.to_string(),
            inserted,
            is_sealed,
        },
        format,
    );
    Ok(())
}

pub async fn pull<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: PullArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = CollectionId::new(args.collection);
    let records = service.pull(&id, args.from, args.batch, args.end_timestamp).await?;

    let records: Vec<RecordInfo> = records.into_iter().map(RecordInfo::from).collect();
    output::print_list(&records, format);
    Ok(())
}

pub async fn fork<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: ForkArgs,
    format: OutputFormat,
) -> Result<()> {
    let source = CollectionId::new(args.source);
    let target = CollectionId::new(args.target);
    let bounds = service.fork(&source, &target).await?;

    output::print(&BoundsInfo::new(&target, bounds), format);
    Ok(())
}

pub async fn seal<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: CollectionArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = CollectionId::new(args.collection);
    service.seal(&id).await?;

    output::print(
        &SealInfo {
            collection_id: id.to_string(),
            is_sealed: true,
        },
        format,
    );
    Ok(())
}

pub async fn bounds<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: CollectionArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = CollectionId::new(args.collection);
    let bounds = service.get_bounds(&id).await?;

    output::print(&BoundsInfo::new(&id, bounds), format);
    Ok(())
}

pub async fn advance<S: LogStore, C: Clock>(
    service: &LogService<S, C>,
    args: AdvanceArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = CollectionId::new(args.collection);
    service.advance_compaction_offset(&id, args.offset).await?;
    let bounds = service.get_bounds(&id).await?;

    output::print(&BoundsInfo::new(&id, bounds), format);
    Ok(())
}
