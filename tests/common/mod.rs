// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use sampletrace::core::{SampleRecord, DEVICE_ID_SIZE};
use sampletrace::io::TraceWriter;

// ============================================================================
// Temp Directories
// ============================================================================

fn temp_dir(tag: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!("sampletrace_{}_{}_{}", tag, std::process::id(), random))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(tag: &str, name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(tag);
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Create a temporary directory with cleanup guard
pub fn temp_dir_guarded(tag: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(tag);
    fs::create_dir_all(&dir).ok();
    let guard = CleanupGuard(dir.clone());
    (dir, guard)
}

/// Cleanup guard for test temporary files
pub struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Record Builders
// ============================================================================

/// A distinguishable sample record with the given offset.
pub fn sample(offset_ms: i64) -> SampleRecord {
    let mut device_id = [0u8; DEVICE_ID_SIZE];
    device_id[15] = (offset_ms & 0xFF) as u8;
    SampleRecord {
        offset_ms,
        physical_layer: 1,
        device_id,
        receiver_id: [0x22; DEVICE_ID_SIZE],
        receiver_timestamp: 1_600_000_000_000 + offset_ms,
        rssi: -55.5,
        sensed_data: Some(vec![0x04, (offset_ms & 0xFF) as u8]),
    }
}

/// Write `offsets.len()` records to a fresh trace file at `path`.
pub fn write_trace(path: &PathBuf, offsets: &[i64]) {
    let mut writer = TraceWriter::create(path, false).unwrap();
    for &offset in offsets {
        writer.write_record(&sample(offset)).unwrap();
    }
    writer.finish().unwrap();
}

/// Write records with explicit receiver timestamps (offset mirrors them).
pub fn write_trace_with_timestamps(path: &PathBuf, timestamps: &[i64]) {
    let mut writer = TraceWriter::create(path, false).unwrap();
    for &ts in timestamps {
        let mut record = sample(0);
        record.offset_ms = ts;
        record.receiver_timestamp = ts;
        writer.write_record(&record).unwrap();
    }
    writer.finish().unwrap();
}
