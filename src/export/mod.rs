// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace-to-CSV export.
//!
//! Streams a trace file through the bounded pipeline into a CSV file,
//! one row per record. The row shape is selected up front by
//! [`ExportMode`] and applies to the whole file.

pub mod csv;

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::codec::decode_payload;
use crate::core::TraceError;
use crate::io::TraceReader;
use crate::pipeline::{self, PipelineStats};
use crate::Result;

pub use csv::{render_generic_row, render_packed_row, GENERIC_HEADER, PACKED_HEADER};

/// Which row shape the export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Full hex ids, raw payload hex dump.
    Generic,
    /// Short ids with the payload broken into typed columns.
    Packed,
}

/// Tuning knobs for an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub mode: ExportMode,
    /// Bounded channel capacity between reader and renderer.
    pub capacity: usize,
    /// Replace the output file if it already exists.
    pub overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mode: ExportMode::Generic,
            capacity: pipeline::DEFAULT_CAPACITY,
            overwrite: false,
        }
    }
}

/// Counters reported after an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Records read from the trace.
    pub records_read: u64,
    /// CSV data rows written.
    pub rows_written: u64,
    /// Per-role pipeline counters for the run.
    pub pipeline: PipelineStats,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Export the trace at `input` to a CSV file at `output`.
///
/// A truncated trailing record ends the export cleanly with the rows
/// produced so far; any other decode or I/O failure is fatal.
pub fn export_csv(input: &Path, output: &Path, options: &ExportOptions) -> Result<ExportStats> {
    let reader = TraceReader::open(input)?;
    let out = open_output(output, options.overwrite)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        mode = ?options.mode,
        "exporting trace to CSV"
    );

    let started = Instant::now();
    let (producer, consumer) = pipeline::bounded(options.capacity);
    let mode = options.mode;

    let reader_handle = thread::spawn(move || read_trace(reader, producer));
    let writer_handle = thread::spawn(move || write_rows(consumer, out, mode));

    let (records_read, produced) = reader_handle
        .join()
        .map_err(|_| TraceError::Other("export reader thread panicked".to_string()))??;
    let (rows_written, consumed) = writer_handle
        .join()
        .map_err(|_| TraceError::Other("export writer thread panicked".to_string()))??;

    let stats = ExportStats {
        records_read,
        rows_written,
        pipeline: PipelineStats { produced, consumed },
        elapsed: started.elapsed(),
    };
    info!(
        rows = stats.rows_written,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "export complete"
    );
    Ok(stats)
}

fn open_output(path: &Path, overwrite: bool) -> Result<BufWriter<std::fs::File>> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if overwrite {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }
    let file = opts
        .open(path)
        .map_err(|e| TraceError::io(format!("create {}", path.display()), e))?;
    Ok(BufWriter::with_capacity(1 << 20, file))
}

/// Returns the records read and records accepted by the pipeline.
fn read_trace(
    mut reader: TraceReader,
    mut producer: pipeline::Producer,
) -> Result<(u64, u64)> {
    let mut records_read = 0u64;
    loop {
        match reader.next_record() {
            Ok(Some(record)) => {
                if !producer.send(record) {
                    warn!("export output side went away, stopping");
                    break;
                }
                records_read += 1;
            }
            Ok(None) => break,
            Err(e) if e.is_end_of_stream() => {
                warn!(error = %e, "trace ends in a truncated record");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((records_read, producer.records_sent()))
}

/// Returns the rows written and records delivered by the pipeline.
fn write_rows(
    mut consumer: pipeline::Consumer,
    mut out: BufWriter<std::fs::File>,
    mode: ExportMode,
) -> Result<(u64, u64)> {
    let header = match mode {
        ExportMode::Generic => GENERIC_HEADER,
        ExportMode::Packed => PACKED_HEADER,
    };
    writeln!(out, "{header}").map_err(|e| TraceError::io("write CSV header", e))?;

    let mut rows_written = 0u64;
    let mut last_report = Instant::now();
    let mut last_rows = 0u64;
    while let Some(record) = consumer.recv() {
        let row = match mode {
            ExportMode::Generic => render_generic_row(&record),
            ExportMode::Packed => {
                let payload = decode_payload(record.physical_layer, record.sensed_data.as_deref());
                render_packed_row(&record, &payload)
            }
        };
        writeln!(out, "{row}").map_err(|e| TraceError::io("write CSV row", e))?;
        rows_written += 1;

        if rows_written & 0xFFFFF == 0 {
            let elapsed = last_report.elapsed().as_secs_f64();
            let rate = (rows_written - last_rows) as f64 / elapsed.max(1e-6);
            debug!(rows_written, rate = format!("{rate:.1}"), "export progress");
            last_report = Instant::now();
            last_rows = rows_written;
        }
    }
    out.flush().map_err(|e| TraceError::io("flush CSV output", e))?;
    Ok((rows_written, consumer.records_received()))
}
