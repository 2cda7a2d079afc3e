// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Paced trace replay.
//!
//! Replays a recorded trace into a [`SampleSink`] at the original
//! inter-record timing, optionally scaled by a speed factor. Pacing is
//! best-effort: a record is never sent more than the drift tolerance
//! early, but a late record goes out immediately rather than being
//! dropped.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::{unix_millis, TraceError};
use crate::io::TraceReader;
use crate::net::SampleSink;
use crate::Result;

/// How far ahead of the recorded timeline a record may be sent.
pub const DRIFT_TOLERANCE_MS: i64 = 10;

/// How long to wait between sink readiness checks.
const READY_POLL: Duration = Duration::from_millis(100);

/// Tuning knobs for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Timeline speed multiplier. `2.0` replays twice as fast.
    pub speed: f32,
    /// Rewrite each record's receiver timestamp to the wall clock at
    /// the moment it is sent.
    pub update_timestamps: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            update_timestamps: false,
        }
    }
}

/// Counters reported after a replay run.
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    /// Records delivered to the sink.
    pub records_sent: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Maps recorded offsets onto the wall clock.
///
/// Simulated time advances at `speed` times the wall clock. A record
/// whose offset is more than [`DRIFT_TOLERANCE_MS`] ahead of simulated
/// time is held back for `(offset - simulated) / speed` milliseconds;
/// anything else goes out immediately.
#[derive(Debug)]
pub struct Pacer {
    speed: f32,
    started: Instant,
}

impl Pacer {
    pub fn new(speed: f32) -> Result<Self> {
        if !(speed > 0.0) {
            return Err(TraceError::invalid_speed(speed));
        }
        Ok(Self {
            speed,
            started: Instant::now(),
        })
    }

    /// Restart the timeline clock from now.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// How long to sleep before sending the record at `offset_ms`.
    pub fn delay_before(&self, offset_ms: i64) -> Duration {
        self.delay_at(Instant::now(), offset_ms)
    }

    fn delay_at(&self, now: Instant, offset_ms: i64) -> Duration {
        let elapsed_ms = now.duration_since(self.started).as_millis() as i64;
        let simulated = (elapsed_ms as f64 * self.speed as f64) as i64;
        if simulated + DRIFT_TOLERANCE_MS < offset_ms {
            let wait_ms = ((offset_ms - simulated) as f64 / self.speed as f64) as u64;
            Duration::from_millis(wait_ms)
        } else {
            Duration::ZERO
        }
    }
}

/// Replay every record from `reader` into `sink` at the recorded pace.
///
/// Stops at end of file, at a truncated trailing record (logged, not
/// fatal), or on the first sink delivery failure. The sink is closed
/// before returning in every case.
pub fn replay_trace<S: SampleSink>(
    mut reader: TraceReader,
    sink: &mut S,
    options: &ReplayOptions,
) -> Result<ReplayStats> {
    let mut pacer = Pacer::new(options.speed)?;
    info!(
        file = reader.path(),
        speed = options.speed,
        "replaying trace"
    );

    let started = Instant::now();
    // The timeline clock restarts at the first send opportunity, so
    // time spent waiting for the sink does not count against the
    // recorded offsets.
    let mut clock_started = false;
    let mut records_sent = 0u64;
    let result = loop {
        let mut record = match reader.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => break Ok(()),
            Err(e) if e.is_end_of_stream() => {
                warn!(error = %e, "trace ends in a truncated record");
                break Ok(());
            }
            Err(e) => break Err(e),
        };

        while !sink.is_ready() {
            thread::sleep(READY_POLL);
        }
        if !clock_started {
            pacer.restart();
            clock_started = true;
        }
        let delay = pacer.delay_before(record.offset_ms);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if options.update_timestamps {
            record.receiver_timestamp = unix_millis();
        }
        if let Err(e) = sink.send(&record) {
            break Err(e);
        }
        records_sent += 1;
        if records_sent & 0xFFF == 0 {
            debug!(records_sent, "replay progress");
        }
    };
    sink.close();
    drop(reader);

    result.map(|()| {
        let stats = ReplayStats {
            records_sent,
            elapsed: started.elapsed(),
        };
        info!(
            records = stats.records_sent,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "replay complete"
        );
        stats
    })
}
