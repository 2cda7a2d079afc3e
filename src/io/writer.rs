// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace file writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::record::write_file_record;
use crate::core::{SampleRecord, TraceError};
use crate::Result;

/// Write buffer size for trace files.
const WRITE_BUFFER: usize = 1 << 20;

/// Writer for one trace file.
///
/// Refuses to clobber an existing file unless overwrite is requested.
/// Call [`finish`](TraceWriter::finish) to flush buffered records;
/// every fatal path in the tools flushes successfully written records
/// before exiting.
#[derive(Debug)]
pub struct TraceWriter {
    path: String,
    out: BufWriter<File>,
    records_written: u64,
}

impl TraceWriter {
    /// Create a new trace file.
    ///
    /// Fails if the file already exists, unless `overwrite` is set.
    pub fn create<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let file = options
            .open(path.as_ref())
            .map_err(|e| TraceError::io(format!("TraceWriter::create {path_str}"), e))?;

        Ok(Self {
            path: path_str,
            out: BufWriter::with_capacity(WRITE_BUFFER, file),
            records_written: 0,
        })
    }

    /// Append one record in file framing.
    pub fn write_record(&mut self, record: &SampleRecord) -> Result<()> {
        write_file_record(&mut self.out, record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered records to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.out
            .flush()
            .map_err(|e| TraceError::io(format!("flush {}", self.path), e))
    }

    /// Flush and report the number of records written.
    pub fn finish(&mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.records_written)
    }

    /// Path of the output file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
