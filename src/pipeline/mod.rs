// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounded producer/consumer pipeline for sample records.
//!
//! Every tool that moves records from one place to another (file to
//! file, file to network, network to file) runs one producer role and
//! one consumer role joined by a fixed-capacity channel. A full queue
//! blocks the producer, so a slow consumer throttles a fast producer
//! and no record is ever dropped or reordered.
//!
//! End-of-stream is signaled by dropping the producer: the consumer
//! observes the channel disconnect and terminates. A receive timeout
//! (default [`DEFAULT_RECV_TIMEOUT`]) additionally guards against a
//! stalled producer; it shapes shutdown latency only and is not
//! correctness-critical. Both roles observe a cooperative stop flag at
//! their blocking boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded as channel_bounded, Receiver, RecvTimeoutError, Sender};
use tracing::debug;

use crate::core::SampleRecord;

/// Default queue capacity between the two roles.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default consumer receive timeout.
///
/// Long enough to tolerate normal producer latency (file I/O, network
/// stalls), short enough that a genuinely stalled stream is detected
/// promptly.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(10);

/// Granularity at which blocked roles re-check the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Counters for records moved through a pipeline.
///
/// Explicit per-role counters, returned from the roles rather than
/// kept in process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Records accepted by the producer endpoint
    pub produced: u64,
    /// Records delivered to the consumer endpoint
    pub consumed: u64,
}

/// Handle for asking both roles to stop cooperatively.
///
/// A stopped role exits at its next blocking-call boundary without
/// processing further records.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request a cooperative stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Create a bounded pipeline with the given queue capacity.
pub fn bounded(capacity: usize) -> (Producer, Consumer) {
    let (tx, rx) = channel_bounded(capacity);
    let stop = Arc::new(AtomicBool::new(false));
    (
        Producer {
            tx,
            stop: stop.clone(),
            sent: 0,
        },
        Consumer {
            rx,
            stop,
            timeout: DEFAULT_RECV_TIMEOUT,
            received: 0,
        },
    )
}

/// Producer endpoint of a bounded pipeline.
pub struct Producer {
    tx: Sender<SampleRecord>,
    stop: Arc<AtomicBool>,
    sent: u64,
}

impl Producer {
    /// Enqueue one record, blocking while the queue is full.
    ///
    /// Returns `false` when the record was not accepted: a stop was
    /// requested or the consumer endpoint is gone.
    pub fn send(&mut self, record: SampleRecord) -> bool {
        let mut record = record;
        loop {
            if self.stop.load(Ordering::Acquire) {
                return false;
            }
            match self.tx.send_timeout(record, POLL_INTERVAL) {
                Ok(()) => {
                    self.sent += 1;
                    if self.sent & 0xFFFFF == 0 {
                        debug!(produced = self.sent, "pipeline producer progress");
                    }
                    return true;
                }
                Err(crossbeam_channel::SendTimeoutError::Timeout(r)) => record = r,
                Err(crossbeam_channel::SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }

    /// Records accepted by this endpoint so far.
    pub fn records_sent(&self) -> u64 {
        self.sent
    }

    /// Handle for requesting a cooperative stop of both roles.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }
}

/// Consumer endpoint of a bounded pipeline.
pub struct Consumer {
    rx: Receiver<SampleRecord>,
    stop: Arc<AtomicBool>,
    timeout: Duration,
    received: u64,
}

impl Consumer {
    /// Replace the end-of-stream detection timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dequeue the next record.
    ///
    /// Returns `None` at end of stream: the producer endpoint was
    /// dropped and the queue drained, a stop was requested, or nothing
    /// arrived within the timeout.
    pub fn recv(&mut self) -> Option<SampleRecord> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if self.stop.load(Ordering::Acquire) {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(timeout_ms = self.timeout.as_millis() as u64, "pipeline receive timed out");
                return None;
            }
            let wait = POLL_INTERVAL.min(deadline - now);
            match self.rx.recv_timeout(wait) {
                Ok(record) => {
                    self.received += 1;
                    return Some(record);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Records delivered to this endpoint so far.
    pub fn records_received(&self) -> u64 {
        self.received
    }

    /// Handle for requesting a cooperative stop of both roles.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }
}
