// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Sampletrace
//!
//! Recording, merging, replaying, and rendering of RTLS sensor sample
//! traces.
//!
//! Samples arrive from a live aggregator feed or are read back from
//! previously recorded `.sst` trace files; per-sample timing is
//! preserved so recorded behavior can be reproduced later for testing
//! and analysis.
//!
//! The library is organized by role:
//! - `codec/` - record framing and the bit-packed payload decoder
//! - `io/` - buffered trace file readers, writers, and file rotation
//! - `pipeline/` - the bounded producer/consumer channel all tools share
//! - `net/` - sink/source traits and TCP adapters for the live feed
//! - `record/`, `merge/`, `replay/`, `export/` - one module per tool
//!
//! ## Example: Reading a trace
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sampletrace::io::TraceReader;
//!
//! let reader = TraceReader::open("session.sst")?;
//! for record in reader {
//!     let record = record?;
//!     println!("{} @{}ms", record.device_id_hex(), record.offset_ms);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Merging recorded sessions
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sampletrace::merge::{merge_traces, MergeOptions};
//! use std::path::{Path, PathBuf};
//!
//! let inputs = vec![PathBuf::from("a.sst"), PathBuf::from("b.sst")];
//! let stats = merge_traces(&inputs, Path::new("merged.sst"), &MergeOptions::default())?;
//! println!("{} records merged", stats.records_written);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{Result, SampleRecord, TraceError};

// Record framing and payload decoding
pub mod codec;

pub use codec::{decode_payload, DecodedPayload};

// Bounded producer/consumer channel
pub mod pipeline;

// Trace file I/O
pub mod io;

pub use io::{RotatingWriter, TraceReader, TraceWriter};

// Live feed boundary
pub mod net;

pub use net::{SampleSink, SampleSource};

// Tools
pub mod export;
pub mod merge;
pub mod record;
pub mod replay;
