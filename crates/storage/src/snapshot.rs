// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time copies of the tables
//!
//! A snapshot covers every journal entry up to its sequence, which lets the
//! journal be emptied after a checkpoint.

use crate::error::StoreError;
use crate::state::MaterializedTables;
use chrono::{DateTime, Utc};
use rl_core::{Ledger, LogRecord};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Serializable copy of the committed tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Last journal sequence reflected in this snapshot
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub ledgers: Vec<Ledger>,
    pub records: Vec<LogRecord>,
}

impl Snapshot {
    /// Current version of the snapshot format
    pub const CURRENT_VERSION: u32 = 1;

    pub fn capture(tables: &MaterializedTables, sequence: u64) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            sequence,
            created_at: Utc::now(),
            ledgers: tables.ledgers().cloned().collect(),
            records: tables.all_records().cloned().collect(),
        }
    }

    pub fn into_tables(self) -> MaterializedTables {
        MaterializedTables::from_parts(self.ledgers, self.records)
    }

    /// Load a snapshot; a missing file means none was taken yet
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        if snapshot.version != Self::CURRENT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }
        for ledger in &snapshot.ledgers {
            ledger.check().map_err(|e| {
                StoreError::Corrupt(format!("snapshot ledger {}: {}", ledger.collection_id, e))
            })?;
        }
        Ok(Some(snapshot))
    }

    /// Atomically replace the snapshot at `path`
    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, path)?;
        if let Some(parent) = path.parent() {
            // Persist the rename itself
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }
}
