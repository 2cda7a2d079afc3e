// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Replay integration tests.
//!
//! Tests cover:
//! - Paced delivery completing near the recorded span over speed
//! - Records never sent more than the drift tolerance early
//! - Live timestamp rewriting
//! - Sink failure aborting the replay
//!
//! Wall-clock assertions use generous upper bounds so they hold on
//! loaded CI machines; the early-delivery bound is the tight one.

mod common;

use std::cell::Cell;
use std::time::Instant;

use common::{temp_path, write_trace};
use sampletrace::core::{unix_millis, SampleRecord};
use sampletrace::io::TraceReader;
use sampletrace::net::SampleSink;
use sampletrace::replay::{replay_trace, ReplayOptions, DRIFT_TOLERANCE_MS};
use sampletrace::{Result, TraceError};

// ============================================================================
// Test Sinks
// ============================================================================

/// Sink that records each delivery and its wall-clock arrival time.
struct MemorySink {
    started: Instant,
    arrivals: Vec<(SampleRecord, u64)>,
    closed: bool,
    fail_after: Option<usize>,
    not_ready_checks: Cell<u32>,
}

impl MemorySink {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            arrivals: Vec::new(),
            closed: false,
            fail_after: None,
            not_ready_checks: Cell::new(0),
        }
    }
}

impl SampleSink for MemorySink {
    fn is_ready(&self) -> bool {
        let remaining = self.not_ready_checks.get();
        if remaining > 0 {
            self.not_ready_checks.set(remaining - 1);
            return false;
        }
        true
    }

    fn send(&mut self, record: &SampleRecord) -> Result<()> {
        if self.fail_after == Some(self.arrivals.len()) {
            return Err(TraceError::io("test sink", "forced failure"));
        }
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.arrivals.push((record.clone(), elapsed_ms));
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

// ============================================================================
// Pacing
// ============================================================================

#[test]
fn test_replay_paces_and_never_sends_early() {
    let (path, _guard) = temp_path("replay", "paced.sst");
    write_trace(&path, &[0, 100, 200, 300, 400]);

    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    let stats = replay_trace(reader, &mut sink, &ReplayOptions::default());
    let stats = stats.unwrap();

    assert_eq!(stats.records_sent, 5);
    assert!(sink.closed);
    for (record, arrived_ms) in &sink.arrivals {
        // Never more than the drift tolerance ahead of the timeline.
        assert!(
            *arrived_ms as i64 >= record.offset_ms - DRIFT_TOLERANCE_MS,
            "record at offset {} arrived at {}ms",
            record.offset_ms,
            arrived_ms
        );
    }
    // 400ms of recorded span; allow plenty of scheduling slack above.
    let total = stats.elapsed.as_millis() as i64;
    assert!(total >= 400 - DRIFT_TOLERANCE_MS);
    assert!(total < 2_000, "replay took {total}ms");
}

#[test]
fn test_replay_speed_compresses_wall_time() {
    let (path, _guard) = temp_path("replay", "fast.sst");
    write_trace(&path, &[0, 200, 400, 600, 800]);

    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    let options = ReplayOptions {
        speed: 4.0,
        ..Default::default()
    };
    let stats = replay_trace(reader, &mut sink, &options).unwrap();

    // 800ms of recorded span at 4x is ~200ms of wall time.
    let total = stats.elapsed.as_millis() as i64;
    assert!(total >= 200 - DRIFT_TOLERANCE_MS);
    assert!(total < 1_500, "replay took {total}ms");
}

#[test]
fn test_timeline_clock_excludes_sink_wait() {
    let (path, _guard) = temp_path("replay", "wait.sst");
    write_trace(&path, &[0, 100]);

    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    // Two failed readiness checks stall replay ~200ms before anything
    // is sent; the recorded 100ms gap must still be honored after.
    sink.not_ready_checks = Cell::new(2);
    replay_trace(reader, &mut sink, &ReplayOptions::default()).unwrap();

    assert_eq!(sink.arrivals.len(), 2);
    let gap = sink.arrivals[1].1 as i64 - sink.arrivals[0].1 as i64;
    assert!(gap >= 100 - DRIFT_TOLERANCE_MS, "gap was {gap}ms");
}

// ============================================================================
// Timestamps and Failures
// ============================================================================

#[test]
fn test_live_timestamps_rewrite_receiver_time() {
    let (path, _guard) = temp_path("replay", "live.sst");
    write_trace(&path, &[0, 20]);

    let before = unix_millis();
    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    let options = ReplayOptions {
        speed: 1.0,
        update_timestamps: true,
    };
    replay_trace(reader, &mut sink, &options).unwrap();
    let after = unix_millis();

    for (record, _) in &sink.arrivals {
        assert!(record.receiver_timestamp >= before);
        assert!(record.receiver_timestamp <= after);
    }
}

#[test]
fn test_sink_failure_aborts_and_closes() {
    let (path, _guard) = temp_path("replay", "failing.sst");
    write_trace(&path, &[0, 1, 2, 3]);

    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    sink.fail_after = Some(2);
    let err = replay_trace(reader, &mut sink, &ReplayOptions::default());

    assert!(err.is_err());
    assert_eq!(sink.arrivals.len(), 2);
    assert!(sink.closed);
}

#[test]
fn test_invalid_speed_rejected() {
    let (path, _guard) = temp_path("replay", "speed.sst");
    write_trace(&path, &[0]);

    let reader = TraceReader::open(&path).unwrap();
    let mut sink = MemorySink::new();
    let options = ReplayOptions {
        speed: 0.0,
        ..Default::default()
    };
    let err = replay_trace(reader, &mut sink, &options).unwrap_err();
    assert!(matches!(err, TraceError::InvalidSpeed { .. }));
    assert!(sink.arrivals.is_empty());
}
