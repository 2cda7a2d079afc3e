// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace file merger.
//!
//! Concatenates several trace files into one continuous timeline. The
//! first record of the output lands at zero; each subsequent file is
//! rebased so that its first record lands exactly where the previous
//! file ended, erasing the recording gaps between sessions.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::{SampleRecord, TraceError};
use crate::io::{TraceReader, TraceWriter};
use crate::pipeline::{self, PipelineStats};
use crate::Result;

/// Tuning knobs for a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Bounded channel capacity between reader and writer.
    pub capacity: usize,
    /// Replace the output file if it already exists.
    pub overwrite: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            capacity: pipeline::DEFAULT_CAPACITY,
            overwrite: false,
        }
    }
}

/// Counters reported after a merge run.
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Input files fully or partially consumed.
    pub files_merged: usize,
    /// Records read across all inputs.
    pub records_read: u64,
    /// Records written to the merged output.
    pub records_written: u64,
    /// Per-role pipeline counters for the run.
    pub pipeline: PipelineStats,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Rebases timestamps from one input file onto the merged timeline.
///
/// `rewritten = original - file_first + base_offset`, where
/// `base_offset` is the last rewritten timestamp of the previous file.
struct Rebaser {
    base_offset: i64,
    file_first: Option<i64>,
    last_rewritten: i64,
}

impl Rebaser {
    fn new() -> Self {
        Self {
            base_offset: 0,
            file_first: None,
            last_rewritten: 0,
        }
    }

    /// Start rebasing the next input file.
    fn next_file(&mut self) {
        self.base_offset = self.last_rewritten;
        self.file_first = None;
    }

    /// Rewrite one record's timestamp onto the merged timeline.
    fn rebase(&mut self, record: &mut SampleRecord) {
        let first = *self.file_first.get_or_insert(record.receiver_timestamp);
        let rewritten = record.receiver_timestamp - first + self.base_offset;
        record.receiver_timestamp = rewritten;
        record.offset_ms = rewritten;
        self.last_rewritten = rewritten;
    }
}

/// Merge `inputs` in the given order into a single trace at `output`.
///
/// An input that cannot be opened, or whose very first record cannot
/// be decoded, aborts the merge. A file that ends in a truncated
/// record mid-stream is kept up to the damage and the merge continues
/// with the next input.
pub fn merge_traces(
    inputs: &[PathBuf],
    output: &Path,
    options: &MergeOptions,
) -> Result<MergeStats> {
    if inputs.is_empty() {
        return Err(TraceError::Other("no input files to merge".to_string()));
    }
    let started = Instant::now();
    info!(inputs = inputs.len(), output = %output.display(), "merging traces");

    let (producer, consumer) = pipeline::bounded(options.capacity);
    let writer = TraceWriter::create(output, options.overwrite)?;

    let inputs = inputs.to_vec();
    let reader_handle = thread::spawn(move || read_inputs(&inputs, producer));
    let writer_handle = thread::spawn(move || drain_to_writer(consumer, writer));

    let read_result = reader_handle
        .join()
        .map_err(|_| TraceError::Other("merge reader thread panicked".to_string()))?;
    let write_result = writer_handle
        .join()
        .map_err(|_| TraceError::Other("merge writer thread panicked".to_string()))?;

    let (files_merged, records_read, produced) = read_result?;
    let (records_written, consumed) = write_result?;

    let stats = MergeStats {
        files_merged,
        records_read,
        records_written,
        pipeline: PipelineStats { produced, consumed },
        elapsed: started.elapsed(),
    };
    info!(
        files = stats.files_merged,
        records = stats.records_written,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "merge complete"
    );
    Ok(stats)
}

/// Producer side: read every input in order, rebasing as we go.
///
/// Returns the files consumed, records read and records accepted by
/// the pipeline.
fn read_inputs(
    inputs: &[PathBuf],
    mut producer: pipeline::Producer,
) -> Result<(usize, u64, u64)> {
    let mut rebaser = Rebaser::new();
    let mut files_merged = 0usize;
    let mut records_read = 0u64;

    for path in inputs {
        let mut reader = TraceReader::open(path)?;
        rebaser.next_file();
        let mut file_records = 0u64;

        loop {
            match reader.next_record() {
                Ok(Some(mut record)) => {
                    rebaser.rebase(&mut record);
                    if !producer.send(record) {
                        warn!("merge output side went away, stopping");
                        return Ok((files_merged, records_read, producer.records_sent()));
                    }
                    file_records += 1;
                    records_read += 1;
                }
                Ok(None) => break,
                Err(e) if e.is_end_of_stream() => {
                    // Damaged tail. Keep what we have and move on.
                    if file_records == 0 {
                        return Err(e);
                    }
                    warn!(
                        file = %path.display(),
                        records = file_records,
                        "truncated record mid-file, keeping records up to the damage"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        files_merged += 1;
        debug!(file = %path.display(), records = file_records, "input consumed");
    }
    Ok((files_merged, records_read, producer.records_sent()))
}

/// Consumer side: write every record that arrives until the stream ends.
///
/// Returns the records written and records delivered by the pipeline.
fn drain_to_writer(
    mut consumer: pipeline::Consumer,
    mut writer: TraceWriter,
) -> Result<(u64, u64)> {
    while let Some(record) = consumer.recv() {
        writer.write_record(&record)?;
    }
    let written = writer.finish()?;
    Ok((written, consumer.records_received()))
}
