// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Export command - render a trace file as CSV.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_duration, Result};
use sampletrace::export::{export_csv, ExportMode, ExportOptions};

/// Render a trace file as CSV, one row per record.
#[derive(Args, Clone, Debug)]
pub struct ExportCmd {
    /// Input trace file
    #[arg(value_name = "TRACE")]
    input: PathBuf,

    /// Output CSV file
    #[arg(value_name = "CSV")]
    output: PathBuf,

    /// Break bit-packed payloads into typed columns with short ids
    #[arg(long)]
    packed: bool,

    /// Overwrite the output file if it exists
    #[arg(short = 'f', long)]
    force: bool,
}

impl ExportCmd {
    pub fn run(self) -> Result<()> {
        let options = ExportOptions {
            mode: if self.packed {
                ExportMode::Packed
            } else {
                ExportMode::Generic
            },
            overwrite: self.force,
            ..Default::default()
        };
        let stats = export_csv(&self.input, &self.output, &options)?;

        println!(
            "Wrote {} rows in {}.",
            stats.rows_written,
            format_duration(stats.elapsed.as_millis() as u64)
        );
        Ok(())
    }
}
