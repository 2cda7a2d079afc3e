// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Narrow interface to the aggregation service.
//!
//! The protocol client proper (connection lifecycle, subscription
//! negotiation, reconnection) lives outside this crate. The core only
//! needs an established link that can emit or accept sample records
//! and report whether it is still usable, so that replay and recording
//! are testable without a live network peer.

pub mod tcp;

use crate::core::SampleRecord;
use crate::Result;

/// Downstream endpoint that accepts sample records.
pub trait SampleSink: Send {
    /// Whether the link is currently able to accept records.
    ///
    /// A link that stops being ready mid-stream signals that replay
    /// should terminate.
    fn is_ready(&self) -> bool;

    /// Deliver one record. An error means the connection is lost.
    fn send(&mut self, record: &SampleRecord) -> Result<()>;

    /// Release the connection.
    fn close(&mut self);
}

/// Upstream endpoint that emits sample records.
pub trait SampleSource: Send {
    /// Receive the next record.
    ///
    /// `Ok(None)` means the feed has ended cleanly; an error means the
    /// connection is lost.
    fn recv(&mut self) -> Result<Option<SampleRecord>>;

    /// Release the connection.
    fn close(&mut self);
}

pub use tcp::{TcpSampleSink, TcpSampleSource};
