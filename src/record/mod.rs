// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Live trace recording.
//!
//! Pulls records from a [`SampleSource`] and appends them to a
//! timestamped trace file, stamping each record's offset relative to
//! the start of the current file. With a rotation interval set, the
//! recording moves to a fresh file every interval and offsets restart
//! from zero for the new file.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::unix_millis;
use crate::io::RotatingWriter;
use crate::net::SampleSource;
use crate::Result;

/// Tuning knobs for a recording run.
#[derive(Debug, Clone, Default)]
pub struct RecordingOptions {
    /// Prefix for generated trace file names.
    pub base_name: Option<String>,
    /// If set, only records with this physical layer are kept.
    pub physical_layer: Option<u8>,
    /// If set, rotate to a new file every interval.
    pub rotation_interval: Option<Duration>,
}

/// Counters reported after a recording run.
#[derive(Debug, Clone, Default)]
pub struct RecordingStats {
    /// Records written across all files.
    pub records_written: u64,
    /// Records dropped by the physical-layer filter.
    pub records_filtered: u64,
    /// Trace files created.
    pub files_created: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Record everything `source` delivers into trace files under `dir`.
///
/// Runs until the source reports end of stream or fails. A write or
/// rotation failure is fatal; the recording cannot silently drop
/// records.
pub fn record_from<S: SampleSource>(
    source: &mut S,
    dir: &Path,
    options: &RecordingOptions,
) -> Result<RecordingStats> {
    let writer = RotatingWriter::create(options.base_name.as_deref(), dir)?;
    info!(file = writer.current_path()?, "recording started");

    let started = Instant::now();
    let mut recording_start = unix_millis();
    let mut last_rotation = Instant::now();
    let mut stats = RecordingStats::default();
    let mut writer = writer;

    let result = loop {
        let mut record = match source.recv() {
            Ok(Some(record)) => record,
            Ok(None) => break Ok(()),
            Err(e) => {
                warn!(error = %e, "sample source failed");
                break Err(e);
            }
        };
        if let Some(layer) = options.physical_layer {
            if record.physical_layer != layer {
                stats.records_filtered += 1;
                continue;
            }
        }
        if let Some(interval) = options.rotation_interval {
            if last_rotation.elapsed() >= interval {
                let filled = writer.current_records()?;
                writer.rotate()?;
                recording_start = unix_millis();
                last_rotation = Instant::now();
                debug!(previous_records = filled, "rotation interval reached, offsets restarted");
            }
        }
        record.offset_ms = unix_millis() - recording_start;
        writer.write_record(&record)?;
        stats.records_written += 1;
    };
    source.close();
    let flushed = writer.finish();

    result.and(flushed.map(|_| ()))?;
    stats.files_created = writer.files_created();
    stats.elapsed = started.elapsed();
    info!(
        records = stats.records_written,
        files = stats.files_created,
        "recording complete"
    );
    Ok(stats)
}
