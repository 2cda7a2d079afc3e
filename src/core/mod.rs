// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared across the crate.
//!
//! - [`SampleRecord`]: the unit of data flowing through every role
//! - [`TraceError`] and the crate-wide [`Result`] alias

pub mod error;
pub mod sample;

pub use error::{Result, TraceError};
pub use sample::{
    short_id, short_id_hex, unix_millis, SampleRecord, DEVICE_ID_SIZE, PHYSICAL_LAYER_PACKED,
};
