// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead journal of committed transactions
//!
//! One JSON line per committed transaction, carrying a CRC32 of its
//! mutations. Replay stops at the first line that is truncated, unparsable
//! or fails its checksum; everything after that point is discarded.

use crate::error::StoreError;
use crate::mutation::Mutation;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single committed transaction in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing, starting at 1
    pub sequence: u64,
    /// Microseconds since Unix epoch
    pub timestamp_micros: u64,
    /// Identifies the process that wrote the entry
    pub writer_id: String,
    pub mutations: Vec<Mutation>,
    /// CRC32 of the serialized mutations
    pub checksum: u32,
}

impl WalEntry {
    pub fn new(sequence: u64, writer_id: &str, mutations: Vec<Mutation>) -> Self {
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        let checksum = Self::calculate_checksum(&mutations);
        Self {
            sequence,
            timestamp_micros,
            writer_id: writer_id.to_string(),
            mutations,
            checksum,
        }
    }

    fn calculate_checksum(mutations: &[Mutation]) -> u32 {
        // Mutations hold only strings, integers, booleans and byte vectors,
        // so serialization cannot fail
        let json = serde_json::to_string(mutations).unwrap_or_default();
        crc32fast::hash(json.as_bytes())
    }

    pub fn verify(&self) -> bool {
        self.checksum == Self::calculate_checksum(&self.mutations)
    }

    pub fn to_line(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::from)
    }

    pub fn from_line(line: &str) -> Result<Self, StoreError> {
        serde_json::from_str(line).map_err(StoreError::from)
    }
}

/// Result of reading a journal file
#[derive(Debug, Default)]
pub struct Replay {
    /// Valid entries in file order
    pub entries: Vec<WalEntry>,
    /// Byte length of the valid prefix
    pub valid_len: u64,
    /// Whether invalid bytes follow the valid prefix
    pub corrupt: bool,
}

/// Append-only journal writer
pub struct Wal {
    path: PathBuf,
    file: File,
    /// Byte length of the journal as of the last successful append
    len: u64,
    next_sequence: u64,
    writer_id: String,
}

impl Wal {
    /// Read every valid entry of a journal; a missing file is an empty journal
    pub fn replay(path: &Path) -> Result<Replay, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Replay::default()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut replay = Replay::default();
        let mut line = String::new();

        loop {
            line.clear();
            let read = match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(n) => n as u64,
                Err(e) => {
                    tracing::warn!(error = %e, "stopping journal replay at unreadable bytes");
                    replay.corrupt = true;
                    break;
                }
            };

            // A line without its newline is a write torn by a crash
            let Some(content) = line.strip_suffix('\n') else {
                replay.corrupt = true;
                break;
            };
            if content.is_empty() {
                replay.valid_len += read;
                continue;
            }

            match WalEntry::from_line(content) {
                Ok(entry) if entry.verify() => {
                    replay.entries.push(entry);
                    replay.valid_len += read;
                }
                Ok(entry) => {
                    tracing::warn!(sequence = entry.sequence, "journal checksum mismatch");
                    replay.corrupt = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "unparsable journal entry");
                    replay.corrupt = true;
                    break;
                }
            }
        }

        Ok(replay)
    }

    /// Open a journal for appending, discarding any invalid tail.
    ///
    /// Sequences continue after both the last valid entry and `floor`
    /// (the sequence covered by the latest snapshot).
    pub fn open(path: &Path, writer_id: &str, floor: u64) -> Result<(Self, Replay), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let replay = Self::replay(path)?;
        if replay.corrupt {
            tracing::warn!(
                valid_len = replay.valid_len,
                path = %path.display(),
                "truncating journal after last valid entry"
            );
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(replay.valid_len)?;
            file.sync_all()?;
        }

        let last = replay.entries.last().map(|e| e.sequence).unwrap_or(0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok((
            Self {
                path: path.to_path_buf(),
                file,
                len: replay.valid_len,
                next_sequence: last.max(floor) + 1,
                writer_id: writer_id.to_string(),
            },
            replay,
        ))
    }

    /// Durably append one committed transaction, returning its sequence
    pub fn append(&mut self, mutations: &[Mutation]) -> Result<u64, StoreError> {
        let sequence = self.next_sequence;
        let entry = WalEntry::new(sequence, &self.writer_id, mutations.to_vec());
        let line = entry.to_line()?;

        if let Err(e) = self.write_line(&line) {
            // Roll back a partial line so it never precedes later entries
            if let Err(truncate) = self.file.set_len(self.len) {
                tracing::error!(error = %truncate, "failed to roll back partial journal write");
            }
            return Err(e.into());
        }

        self.len += line.len() as u64 + 1;
        self.next_sequence += 1;
        Ok(sequence)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        // The commit is only acknowledged once the entry is on disk
        self.file.sync_all()
    }

    /// Drop all entries; used once a snapshot covers them
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        self.len = 0;
        Ok(())
    }

    /// Last assigned sequence, 0 when nothing was ever written
    pub fn last_sequence(&self) -> u64 {
        self.next_sequence - 1
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
