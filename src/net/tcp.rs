// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Thin TCP adapters for wire-framed sample records.
//!
//! These adapters move records over an already-negotiated stream.
//! Handshakes, subscription rules, and reconnection belong to the
//! external protocol client, not here.

use std::io::{BufReader, BufWriter, Write};
use std::net::TcpStream;

use tracing::{debug, info, warn};

use crate::codec::record::{encode_wire_record, read_wire_record};
use crate::core::{SampleRecord, TraceError};
use crate::net::{SampleSink, SampleSource};
use crate::Result;

/// Sink that writes wire-framed records to a TCP peer.
#[derive(Debug)]
pub struct TcpSampleSink {
    peer: String,
    stream: Option<BufWriter<TcpStream>>,
    sent: u64,
}

impl TcpSampleSink {
    /// Connect to `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let peer = format!("{host}:{port}");
        let stream = TcpStream::connect(&peer)
            .map_err(|e| TraceError::io(format!("connect to {peer}"), e))?;
        info!(peer, "connected to aggregator");
        Ok(Self {
            peer: peer.clone(),
            stream: Some(BufWriter::new(stream)),
            sent: 0,
        })
    }

    /// Records delivered so far.
    pub fn records_sent(&self) -> u64 {
        self.sent
    }
}

impl SampleSink for TcpSampleSink {
    fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    fn send(&mut self, record: &SampleRecord) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TraceError::io(&self.peer, "connection closed"))?;
        let result = stream
            .write_all(&encode_wire_record(record))
            .and_then(|()| stream.flush());
        match result {
            Ok(()) => {
                self.sent += 1;
                debug!(%record, "sent");
                Ok(())
            }
            Err(e) => {
                warn!(peer = self.peer, error = %e, "connection lost while sending");
                self.stream = None;
                Err(TraceError::io(format!("send to {}", self.peer), e))
            }
        }
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.flush().ok();
            if let Ok(inner) = stream.into_inner() {
                inner.shutdown(std::net::Shutdown::Both).ok();
            }
            info!(peer = self.peer, sent = self.sent, "closed aggregator link");
        }
    }
}

/// Source that reads wire-framed records from a TCP peer.
pub struct TcpSampleSource {
    peer: String,
    stream: Option<BufReader<TcpStream>>,
    received: u64,
}

impl TcpSampleSource {
    /// Connect to `host:port`.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let peer = format!("{host}:{port}");
        let stream = TcpStream::connect(&peer)
            .map_err(|e| TraceError::io(format!("connect to {peer}"), e))?;
        info!(peer, "connected to aggregator");
        Ok(Self {
            peer: peer.clone(),
            stream: Some(BufReader::new(stream)),
            received: 0,
        })
    }

    /// Records received so far.
    pub fn records_received(&self) -> u64 {
        self.received
    }
}

impl SampleSource for TcpSampleSource {
    fn recv(&mut self) -> Result<Option<SampleRecord>> {
        let stream = match self.stream.as_mut() {
            Some(s) => s,
            None => return Ok(None),
        };
        match read_wire_record(stream) {
            Ok(Some(record)) => {
                self.received += 1;
                Ok(Some(record))
            }
            Ok(None) => {
                info!(peer = self.peer, received = self.received, "feed ended");
                self.stream = None;
                Ok(None)
            }
            Err(e) => {
                warn!(peer = self.peer, error = %e, "connection lost while receiving");
                self.stream = None;
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.into_inner().shutdown(std::net::Shutdown::Both).ok();
            info!(peer = self.peer, "closed aggregator link");
        }
    }
}
