// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record command - capture a live sample feed into trace files.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::common::{format_duration, Result};
use sampletrace::net::TcpSampleSource;
use sampletrace::record::{record_from, RecordingOptions};

/// Record a live sample feed into timestamped trace files.
#[derive(Args, Clone, Debug)]
pub struct RecordCmd {
    /// Aggregator host to connect to
    #[arg(value_name = "HOST")]
    host: String,

    /// Aggregator port
    #[arg(value_name = "PORT")]
    port: u16,

    /// Directory for generated trace files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Base name prepended to generated file names
    #[arg(short = 'o', long)]
    base_name: Option<String>,

    /// Only record samples with this physical layer
    #[arg(short = 'p', long)]
    physical_layer: Option<u8>,

    /// Rotate to a new trace file every N seconds
    #[arg(short = 'R', long, value_name = "SECONDS")]
    rotate: Option<u64>,
}

impl RecordCmd {
    pub fn run(self) -> Result<()> {
        let mut source = TcpSampleSource::connect(&self.host, self.port)?;

        let options = RecordingOptions {
            base_name: self.base_name,
            physical_layer: self.physical_layer,
            rotation_interval: self.rotate.map(Duration::from_secs),
        };
        let stats = record_from(&mut source, &self.dir, &options)?;

        println!(
            "Recorded {} records into {} file(s) in {}.",
            stats.records_written,
            stats.files_created,
            format_duration(stats.elapsed.as_millis() as u64)
        );
        if stats.records_filtered > 0 {
            println!(
                "Skipped {} records outside physical layer {}.",
                stats.records_filtered,
                self.physical_layer.unwrap_or_default()
            );
        }
        Ok(())
    }
}
