// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequential trace file reader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::codec::record::{body_len, read_file_record, FILE_PREFIX_LEN};
use crate::core::{SampleRecord, TraceError};
use crate::Result;

/// Read buffer size for trace files.
const READ_BUFFER: usize = 1 << 20;

/// Sequential reader over the records of one trace file.
///
/// Yields records in file order. A clean end of file ends iteration;
/// a stream ending mid-record surfaces as a [`TraceError::TruncatedRecord`],
/// which callers treat as the end of that file's contribution.
#[derive(Debug)]
pub struct TraceReader {
    path: String,
    reader: BufReader<File>,
    file_size: u64,
    records_read: u64,
    bytes_read: u64,
    done: bool,
}

impl TraceReader {
    /// Open a trace file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let file = File::open(path.as_ref())
            .map_err(|e| TraceError::io(format!("TraceReader::open {path_str}"), e))?;
        let file_size = file
            .metadata()
            .map_err(|e| TraceError::io(format!("TraceReader::open {path_str}"), e))?
            .len();

        Ok(Self {
            path: path_str,
            reader: BufReader::with_capacity(READ_BUFFER, file),
            file_size,
            records_read: 0,
            bytes_read: 0,
            done: false,
        })
    }

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` at a clean end of file. Any error ends the
    /// stream; subsequent calls return `Ok(None)`.
    pub fn next_record(&mut self) -> Result<Option<SampleRecord>> {
        if self.done {
            return Ok(None);
        }
        match read_file_record(&mut self.reader) {
            Ok(Some(record)) => {
                self.records_read += 1;
                self.bytes_read += FILE_PREFIX_LEN as u64 + body_len(&record) as u64;
                Ok(Some(record))
            }
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    /// Path of the trace file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Total size of the trace file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Records decoded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Bytes consumed by decoded records so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl Iterator for TraceReader {
    type Item = Result<SampleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::record::encode_file_record;
    use crate::core::DEVICE_ID_SIZE;
    use std::io::Write;

    fn record(n: i64) -> SampleRecord {
        SampleRecord {
            offset_ms: n,
            physical_layer: 1,
            device_id: [1; DEVICE_ID_SIZE],
            receiver_id: [2; DEVICE_ID_SIZE],
            receiver_timestamp: 1000 + n,
            rssi: -70.0,
            sensed_data: Some(vec![0x04, 0x7F]),
        }
    }

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sampletrace_reader_{}_{}",
            std::process::id(),
            name
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_open_missing_file() {
        let err = TraceReader::open("/nonexistent/trace.sst").unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }

    #[test]
    fn test_reads_all_records() {
        let mut bytes = Vec::new();
        for n in 0..5 {
            bytes.extend(encode_file_record(&record(n)));
        }
        let path = temp_file("all", &bytes);

        let mut reader = TraceReader::open(&path).unwrap();
        assert_eq!(reader.file_size(), bytes.len() as u64);
        for n in 0..5 {
            assert_eq!(reader.next_record().unwrap().unwrap(), record(n));
        }
        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 5);
        assert_eq!(reader.bytes_read(), bytes.len() as u64);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_truncated_tail_ends_stream() {
        let mut bytes = encode_file_record(&record(0));
        let full = encode_file_record(&record(1));
        bytes.extend(&full[..full.len() - 3]);
        let path = temp_file("cut", &bytes);

        let mut reader = TraceReader::open(&path).unwrap();
        assert!(reader.next_record().unwrap().is_some());
        let err = reader.next_record().unwrap_err();
        assert!(err.is_end_of_stream());
        // stream stays ended
        assert!(reader.next_record().unwrap().is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_iterator() {
        let mut bytes = Vec::new();
        for n in 0..3 {
            bytes.extend(encode_file_record(&record(n)));
        }
        let path = temp_file("iter", &bytes);

        let reader = TraceReader::open(&path).unwrap();
        let offsets: Vec<i64> = reader.map(|r| r.unwrap().offset_ms).collect();
        assert_eq!(offsets, vec![0, 1, 2]);

        std::fs::remove_file(path).ok();
    }
}
