// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Merge command - combine trace files into one timeline.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_duration, Result};
use sampletrace::merge::{merge_traces, MergeOptions};

/// Merge trace files, in the order given, into one continuous timeline.
#[derive(Args, Clone, Debug)]
pub struct MergeCmd {
    /// Combined output trace file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Input trace files, merged in the order given
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short = 'f', long)]
    force: bool,
}

impl MergeCmd {
    pub fn run(self) -> Result<()> {
        let options = MergeOptions {
            overwrite: self.force,
            ..Default::default()
        };
        let stats = merge_traces(&self.inputs, &self.output, &options)?;

        println!(
            "Merged {} file(s), {} records, in {}.",
            stats.files_merged,
            stats.records_written,
            format_duration(stats.elapsed.as_millis() as u64)
        );
        Ok(())
    }
}
