// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Replay command - feed a recorded trace into an aggregator.

use std::path::PathBuf;

use clap::Args;

use crate::common::{format_duration, Result};
use sampletrace::io::TraceReader;
use sampletrace::net::TcpSampleSink;
use sampletrace::replay::{replay_trace, ReplayOptions};

/// Replay a trace file into an aggregator at its recorded pace.
#[derive(Args, Clone, Debug)]
pub struct ReplayCmd {
    /// Trace file to replay
    #[arg(value_name = "TRACE")]
    input: PathBuf,

    /// Aggregator host to connect to
    #[arg(value_name = "HOST")]
    host: String,

    /// Aggregator port
    #[arg(value_name = "PORT")]
    port: u16,

    /// Timeline speed multiplier (2.0 replays twice as fast)
    #[arg(short = 'x', long, default_value_t = 1.0)]
    speed: f32,

    /// Stamp records with the wall clock at send time instead of the
    /// recorded receiver timestamp
    #[arg(short = 't', long)]
    live_timestamps: bool,
}

impl ReplayCmd {
    pub fn run(self) -> Result<()> {
        let reader = TraceReader::open(&self.input)?;
        let mut sink = TcpSampleSink::connect(&self.host, self.port)?;

        let options = ReplayOptions {
            speed: self.speed,
            update_timestamps: self.live_timestamps,
        };
        let stats = replay_trace(reader, &mut sink, &options)?;

        println!(
            "Replayed {} records in {}.",
            stats.records_sent,
            format_duration(stats.elapsed.as_millis() as u64)
        );
        Ok(())
    }
}
