// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Rotating trace writer for long-running recordings.
//!
//! Rotation never edits a file in place: a new timestamped file is
//! created first, the handles are swapped, and only then is the old
//! handle flushed and closed. The shared handle is guarded by a mutex
//! so rotation is mutually exclusive with any in-flight write.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::info;

use crate::core::{SampleRecord, TraceError};
use crate::io::writer::TraceWriter;
use crate::Result;

/// File extension for sensor sample traces.
pub const TRACE_EXTENSION: &str = "sst";

/// Timestamp format embedded in rotated file names,
/// e.g. `2026.08.30-14:55:43.242`.
const FILE_TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H:%M:%S%.3f";

/// Build a timestamped trace file name.
///
/// The base name, when given, is prepended to the timestamp.
pub fn timestamped_file_name(base_name: Option<&str>, dir: &Path) -> PathBuf {
    let stamp = Local::now().format(FILE_TIMESTAMP_FORMAT);
    let name = match base_name {
        Some(base) => format!("{base}_{stamp}.{TRACE_EXTENSION}"),
        None => format!("{stamp}.{TRACE_EXTENSION}"),
    };
    dir.join(name)
}

/// Trace writer whose output file can be rotated while records are
/// being written.
pub struct RotatingWriter {
    base_name: Option<String>,
    dir: PathBuf,
    inner: Mutex<TraceWriter>,
    files_created: u64,
}

impl RotatingWriter {
    /// Create the first output file.
    ///
    /// Fails if the file already exists; recordings never overwrite.
    pub fn create(base_name: Option<&str>, dir: &Path) -> Result<Self> {
        let path = timestamped_file_name(base_name, dir);
        let writer = TraceWriter::create(&path, false)?;
        info!(path = %path.display(), "recording to new trace file");
        Ok(Self {
            base_name: base_name.map(str::to_string),
            dir: dir.to_path_buf(),
            inner: Mutex::new(writer),
            files_created: 1,
        })
    }

    /// Rotate to a fresh timestamped file.
    ///
    /// The new file is created before the old handle is flushed and
    /// closed; a failure to create it leaves the current file active
    /// and is fatal for the caller.
    pub fn rotate(&mut self) -> Result<String> {
        let path = timestamped_file_name(self.base_name.as_deref(), &self.dir);
        let new_writer = TraceWriter::create(&path, false)?;

        let mut guard = self.inner.lock().map_err(poisoned)?;
        let mut old = std::mem::replace(&mut *guard, new_writer);
        drop(guard);

        let written = old.finish()?;
        info!(
            path = %path.display(),
            previous_records = written,
            "rotated trace file"
        );
        self.files_created += 1;
        Ok(path.to_string_lossy().to_string())
    }

    /// Append one record to the current file.
    pub fn write_record(&self, record: &SampleRecord) -> Result<()> {
        let mut guard = self.inner.lock().map_err(poisoned)?;
        guard.write_record(record)?;
        guard.flush()
    }

    /// Path of the current output file.
    pub fn current_path(&self) -> Result<String> {
        let guard = self.inner.lock().map_err(poisoned)?;
        Ok(guard.path().to_string())
    }

    /// Records written to the current file.
    pub fn current_records(&self) -> Result<u64> {
        let guard = self.inner.lock().map_err(poisoned)?;
        Ok(guard.records_written())
    }

    /// Files created so far, including the initial one.
    pub fn files_created(&self) -> u64 {
        self.files_created
    }

    /// Flush and close the current file.
    pub fn finish(&self) -> Result<u64> {
        let mut guard = self.inner.lock().map_err(poisoned)?;
        guard.finish()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> TraceError {
    TraceError::Other("rotating writer lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEVICE_ID_SIZE;
    use crate::io::reader::TraceReader;

    fn record(n: i64) -> SampleRecord {
        SampleRecord {
            offset_ms: n,
            physical_layer: 1,
            device_id: [0; DEVICE_ID_SIZE],
            receiver_id: [0; DEVICE_ID_SIZE],
            receiver_timestamp: n,
            rssi: 0.0,
            sensed_data: None,
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sampletrace_rotate_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_timestamped_file_name() {
        let dir = PathBuf::from("/tmp");
        let named = timestamped_file_name(Some("bench"), &dir);
        let name = named.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("bench_"));
        assert!(name.ends_with(".sst"));

        let bare = timestamped_file_name(None, &dir);
        let name = bare.file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.starts_with('_'));
        assert!(name.ends_with(".sst"));
    }

    #[test]
    fn test_rotation_switches_files() {
        let dir = temp_dir("switch");

        let mut writer = RotatingWriter::create(Some("t"), &dir).unwrap();
        let first = writer.current_path().unwrap();
        writer.write_record(&record(1)).unwrap();

        // Rotated file names carry millisecond timestamps; spacing the
        // calls keeps the names distinct.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = writer.rotate().unwrap();
        assert_ne!(first, second);
        writer.write_record(&record(2)).unwrap();
        writer.write_record(&record(3)).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.files_created(), 2);

        let first_records: Vec<_> = TraceReader::open(&first)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(first_records.len(), 1);
        let second_records: Vec<_> = TraceReader::open(&second)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(second_records.len(), 2);

        std::fs::remove_dir_all(dir).ok();
    }
}
