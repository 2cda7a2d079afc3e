// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bit-packed payload decoder.
//!
//! Payloads from the bit-packed sensor family start with a feature
//! bitmask byte; each set bit claims a fixed number of the following
//! bytes, consumed in bit order. Decoding never fails: payloads the
//! decoder does not understand are reported verbatim as hex, and a
//! malformed field degrades to "absent" rather than aborting the
//! record.
//!
//! Header bit layout:
//!
//! | bit  | bytes | field |
//! |------|-------|-------|
//! | 0x01 | 1     | binary flag (low bit) + coarse temperature |
//! | 0x02 | 2     | fine temperature, 1/16 °C fixed point |
//! | 0x04 | 1     | light level, raw 0-255 |
//! | 0x40 | 4     | battery millivolts + millijoules |
//!
//! A first byte with the high bit set marks an opaque/encoded payload
//! variant and short-circuits to the hex escape hatch.

use tracing::warn;

use crate::core::{TraceError, PHYSICAL_LAYER_PACKED};

/// Feature bit: binary flag and coarse temperature.
pub const FLAG_TEMP7: u8 = 0x01;
/// Feature bit: fine temperature.
pub const FLAG_TEMP16: u8 = 0x02;
/// Feature bit: light level.
pub const FLAG_LIGHT: u8 = 0x04;
/// Feature bit: battery state.
pub const FLAG_BATTERY: u8 = 0x40;
/// High bit marking an opaque/encoded payload variant.
pub const OPAQUE_MARKER: u8 = 0x80;

/// Typed view of a bit-packed sensed payload.
///
/// Every field is independently present or absent, governed by the
/// header bitmask. Computed on demand from a sample record, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedPayload {
    /// Application-defined boolean flag
    pub binary_flag: Option<bool>,
    /// Coarse temperature in whole degrees Celsius
    pub temp7: Option<i32>,
    /// Fine temperature in Celsius, 1/16-degree resolution
    pub temp16: Option<f32>,
    /// Raw light level, 0-255
    pub light_level: Option<u8>,
    /// Battery potential in millivolts
    pub battery_millivolts: Option<u32>,
    /// Remaining battery energy in millijoules
    pub battery_millijoules: Option<u32>,
    /// Hex rendering of payloads the decoder does not interpret
    pub raw_hex: Option<String>,
}

impl DecodedPayload {
    /// Whether the payload fell through to the hex escape hatch.
    pub fn is_opaque(&self) -> bool {
        self.raw_hex.is_some()
    }

    /// Whether any typed field decoded successfully.
    pub fn has_typed_fields(&self) -> bool {
        self.binary_flag.is_some()
            || self.temp7.is_some()
            || self.temp16.is_some()
            || self.light_level.is_some()
            || self.battery_millivolts.is_some()
            || self.battery_millijoules.is_some()
    }

    fn opaque(data: &[u8]) -> Self {
        DecodedPayload {
            raw_hex: Some(hex::encode(data)),
            ..Default::default()
        }
    }
}

/// Decode a sensed payload into typed readings.
///
/// Degrades gracefully instead of failing: an absent payload, a
/// payload shorter than 2 bytes, a first byte with [`OPAQUE_MARKER`]
/// set, or a physical layer outside the bit-packed family all yield a
/// hex rendering and no typed fields.
pub fn decode_payload(physical_layer: u8, data: Option<&[u8]>) -> DecodedPayload {
    let data = match data {
        Some(d) => d,
        None => return DecodedPayload::default(),
    };

    if physical_layer != PHYSICAL_LAYER_PACKED || data.len() < 2 || data[0] & OPAQUE_MARKER != 0 {
        return DecodedPayload::opaque(data);
    }

    let header = data[0];
    let mut decoded = DecodedPayload::default();
    let mut cursor = 1usize;

    // Consumed in bit order; insufficient bytes abort the remaining
    // bits but keep every field decoded so far.
    if header & FLAG_TEMP7 != 0 {
        match take(data, &mut cursor, 1, "temp7") {
            Some(bytes) => {
                let b = bytes[0];
                decoded.binary_flag = Some(b & 0x01 != 0);
                decoded.temp7 = Some((b >> 1) as i32 - 40);
            }
            None => return decoded,
        }
    }

    if header & FLAG_TEMP16 != 0 {
        match take(data, &mut cursor, 2, "temp16") {
            Some(bytes) => {
                let raw = ((bytes[0] as u16) << 8) | bytes[1] as u16;
                let whole = (raw >> 4) as f32 - 40.0;
                let fraction = (raw & 0x0F) as f32 / 16.0;
                decoded.temp16 = Some(whole + fraction);
            }
            None => return decoded,
        }
    }

    if header & FLAG_LIGHT != 0 {
        match take(data, &mut cursor, 1, "light_level") {
            Some(bytes) => decoded.light_level = Some(bytes[0]),
            None => return decoded,
        }
    }

    if header & FLAG_BATTERY != 0 {
        match take(data, &mut cursor, 4, "battery") {
            Some(bytes) => {
                decoded.battery_millivolts =
                    Some(((bytes[0] as u32) << 8) | bytes[1] as u32);
                decoded.battery_millijoules =
                    Some(((bytes[2] as u32) << 8) | bytes[3] as u32);
            }
            None => return decoded,
        }
    }

    decoded
}

/// Claim `count` bytes for one field, or log and give up.
fn take<'a>(data: &'a [u8], cursor: &mut usize, count: usize, field: &str) -> Option<&'a [u8]> {
    let available = data.len() - *cursor;
    if available < count {
        let err = TraceError::field_decode(
            field,
            format!("{count} bytes required, {available} available"),
        );
        warn!(error = %err, "skipping field, ignoring remaining bits");
        return None;
    }
    let bytes = &data[*cursor..*cursor + count];
    *cursor += count;
    Some(bytes)
}
