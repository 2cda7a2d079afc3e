// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - summarize a trace file's contents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::common::{format_duration, format_timestamp, ProgressBar, Result};
use sampletrace::core::short_id_hex;
use sampletrace::io::TraceReader;

/// Summarize a trace file: record count, time span, devices seen.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Trace file to inspect
    #[arg(value_name = "TRACE")]
    input: PathBuf,

    /// List per-device record counts
    #[arg(short, long)]
    devices: bool,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let mut reader = TraceReader::open(&self.input)?;
        let pb = ProgressBar::new(reader.file_size(), "inspect");

        let mut records = 0u64;
        let mut first_offset: Option<i64> = None;
        let mut last_offset = 0i64;
        let mut first_timestamp: Option<i64> = None;
        let mut last_timestamp = 0i64;
        let mut layers: BTreeMap<u8, u64> = BTreeMap::new();
        let mut devices: BTreeMap<String, u64> = BTreeMap::new();

        loop {
            let record = match reader.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) if e.is_end_of_stream() => {
                    eprintln!("Warning: trace ends in a truncated record ({e}).");
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            records += 1;
            first_offset.get_or_insert(record.offset_ms);
            last_offset = record.offset_ms;
            first_timestamp.get_or_insert(record.receiver_timestamp);
            last_timestamp = record.receiver_timestamp;
            *layers.entry(record.physical_layer).or_default() += 1;
            *devices.entry(short_id_hex(&record.device_id)).or_default() += 1;
            pb.set_position(reader.bytes_read());
        }
        pb.finish_with_message(format!("{records} records"));

        println!("File:     {}", self.input.display());
        println!("Size:     {} bytes", reader.file_size());
        println!("Records:  {records}");
        if let (Some(first), true) = (first_offset, records > 0) {
            let span = (last_offset - first).max(0) as u64;
            println!("Span:     {} (offsets {first}..{last_offset})", format_duration(span));
        }
        if let Some(first) = first_timestamp {
            println!("First at: {}", format_timestamp(first));
            println!("Last at:  {}", format_timestamp(last_timestamp));
        }
        for (layer, count) in &layers {
            println!("Layer {layer}:  {count} records");
        }
        println!("Devices:  {}", devices.len());
        if self.devices {
            for (id, count) in &devices {
                println!("  {id}  {count}");
            }
        }
        Ok(())
    }
}
