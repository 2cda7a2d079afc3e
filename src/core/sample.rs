// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The sample record: one timestamped sensor observation.
//!
//! A `SampleRecord` is the unit of data moved by every role in the
//! system: recorded from a live feed, stored in a trace file, rebased
//! by the merger, paced by replay, and rendered to CSV.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size of device and receiver identifiers in bytes.
pub const DEVICE_ID_SIZE: usize = 16;

/// Physical layer tag of the bit-packed sensor family.
///
/// Payloads from this family can be decoded into typed readings; all
/// other physical layers are treated as opaque.
pub const PHYSICAL_LAYER_PACKED: u8 = 1;

/// One timestamped sensor observation.
///
/// `offset_ms` is context-dependent: elapsed milliseconds since the
/// start of the recording when stored in a trace file, or the rebased
/// composite-timeline position in a merged file.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// File-relative offset in milliseconds
    pub offset_ms: i64,
    /// Physical layer tag of the sensing technology
    pub physical_layer: u8,
    /// Emitting device identifier
    pub device_id: [u8; DEVICE_ID_SIZE],
    /// Receiving sensor identifier
    pub receiver_id: [u8; DEVICE_ID_SIZE],
    /// Capture timestamp in milliseconds since the Unix epoch, set by
    /// the receiver
    pub receiver_timestamp: i64,
    /// Signal strength
    pub rssi: f32,
    /// Opaque sensed payload; absent when the sample carried no data
    pub sensed_data: Option<Vec<u8>>,
}

impl SampleRecord {
    /// Length of the sensed payload in bytes.
    pub fn sensed_len(&self) -> usize {
        self.sensed_data.as_ref().map_or(0, |d| d.len())
    }

    /// The emitting device's short identifier.
    ///
    /// Only the 3-byte suffix of an identifier is semantically
    /// significant for known device families; the remainder is a
    /// namespace prefix.
    pub fn short_device_id(&self) -> u32 {
        short_id(&self.device_id)
    }

    /// The receiving sensor's short identifier.
    pub fn short_receiver_id(&self) -> u32 {
        short_id(&self.receiver_id)
    }

    /// Full device identifier as a hexadecimal string.
    pub fn device_id_hex(&self) -> String {
        hex::encode(self.device_id)
    }

    /// Full receiver identifier as a hexadecimal string.
    pub fn receiver_id_hex(&self) -> String {
        hex::encode(self.receiver_id)
    }
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample[layer={}, device={:06x}, receiver={:06x}, ts={}, rssi={:.3}, {}B]",
            self.physical_layer,
            self.short_device_id(),
            self.short_receiver_id(),
            self.receiver_timestamp,
            self.rssi,
            self.sensed_len()
        )
    }
}

/// Interpret the last 3 bytes of an identifier as a 24-bit integer.
pub fn short_id(id: &[u8; DEVICE_ID_SIZE]) -> u32 {
    ((id[13] as u32) << 16) | ((id[14] as u32) << 8) | (id[15] as u32)
}

/// Render the short form of an identifier as six hex digits.
pub fn short_id_hex(id: &[u8; DEVICE_ID_SIZE]) -> String {
    format!("{:06x}", short_id(id))
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
