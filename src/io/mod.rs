// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace file I/O: sequential reader, writer, and rotating writer.

pub mod reader;
pub mod rotate;
pub mod writer;

pub use reader::TraceReader;
pub use rotate::{timestamped_file_name, RotatingWriter, TRACE_EXTENSION};
pub use writer::TraceWriter;
