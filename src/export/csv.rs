// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CSV row rendering.
//!
//! Pure string projection of sample records, shared by the export
//! tool. Two renderings exist because different downstream tools want
//! different id forms: the generic path keeps full 16-byte hex ids and
//! a raw payload dump, the packed path uses the short 24-bit id form
//! and breaks the payload out into typed columns.

use crate::codec::DecodedPayload;
use crate::core::{short_id_hex, SampleRecord};

/// Header row for the generic rendering.
pub const GENERIC_HEADER: &str = "\"Offset (ms)\",\"Receiver Timestamp (ms)\",\"Physical Layer\",\"Device ID\",\"Receiver ID\",\"RSSI\",\"Received Data\"";

/// Header row for the bit-packed rendering.
pub const PACKED_HEADER: &str = "\"Offset (ms)\",\"Receiver Timestamp (ms)\",\"Physical Layer\",\"Device ID\",\"Receiver ID\",\"RSSI\",\"Binary Flag\",\"Coarse Temperature (C)\",\"Fine Temperature (C)\",\"Light Level\",\"Battery (V)\",\"Battery (mJ)\",\"Raw Data\"";

/// Render one record with full hex ids and a hex payload dump.
pub fn render_generic_row(record: &SampleRecord) -> String {
    let payload = record
        .sensed_data
        .as_deref()
        .map(hex::encode)
        .unwrap_or_default();
    format!(
        "{},{},{},{},{},{:.3},{}",
        record.offset_ms,
        record.receiver_timestamp,
        record.physical_layer,
        record.device_id_hex(),
        record.receiver_id_hex(),
        record.rssi,
        payload
    )
}

/// Render one record with short ids and typed payload columns.
///
/// Absent fields render as empty cells. Payloads that fell through to
/// the hex escape hatch land in the trailing raw-data column.
pub fn render_packed_row(record: &SampleRecord, payload: &DecodedPayload) -> String {
    let mut row = format!(
        "{},{},{},{},{},{:.3}",
        record.offset_ms,
        record.receiver_timestamp,
        record.physical_layer,
        short_id_hex(&record.device_id),
        short_id_hex(&record.receiver_id),
        record.rssi
    );
    push_cell(&mut row, payload.binary_flag.map(|b| u8::from(b).to_string()));
    push_cell(&mut row, payload.temp7.map(|t| t.to_string()));
    push_cell(&mut row, payload.temp16.map(|t| format!("{t:.4}")));
    push_cell(&mut row, payload.light_level.map(|l| l.to_string()));
    push_cell(
        &mut row,
        payload
            .battery_millivolts
            .map(|mv| format!("{:.3}", mv as f32 / 1000.0)),
    );
    push_cell(&mut row, payload.battery_millijoules.map(|mj| mj.to_string()));
    push_cell(&mut row, payload.raw_hex.clone());
    row
}

fn push_cell(row: &mut String, value: Option<String>) {
    row.push(',');
    if let Some(v) = value {
        row.push_str(&v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_payload;
    use crate::core::DEVICE_ID_SIZE;

    fn record() -> SampleRecord {
        let mut device_id = [0u8; DEVICE_ID_SIZE];
        device_id[13] = 0x00;
        device_id[14] = 0x01;
        device_id[15] = 0x02;
        SampleRecord {
            offset_ms: 1500,
            physical_layer: 1,
            device_id,
            receiver_id: [0xAB; DEVICE_ID_SIZE],
            receiver_timestamp: 1_700_000_000_123,
            rssi: -71.25,
            sensed_data: Some(vec![0x41, 0x19, 0x0B, 0xB8, 0x01, 0xF4]),
        }
    }

    #[test]
    fn test_generic_row_full_ids_and_hex_payload() {
        let row = render_generic_row(&record());
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0], "1500");
        assert_eq!(cells[1], "1700000000123");
        assert_eq!(cells[2], "1");
        assert_eq!(cells[3].len(), 32);
        assert!(cells[3].ends_with("000102"));
        assert_eq!(cells[4], "abababababababababababababababab");
        assert_eq!(cells[5], "-71.250");
        assert_eq!(cells[6], "41190bb801f4");
    }

    #[test]
    fn test_generic_row_empty_payload_cell() {
        let mut r = record();
        r.sensed_data = None;
        let row = render_generic_row(&r);
        assert!(row.ends_with(",-71.250,"));
    }

    #[test]
    fn test_packed_row_typed_columns() {
        let r = record();
        let payload = decode_payload(r.physical_layer, r.sensed_data.as_deref());
        let row = render_packed_row(&r, &payload);
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), 13);
        assert_eq!(cells[3], "000102");
        assert_eq!(cells[4], "ababab");
        // Header 0x41: temp7 + battery decoded, temp16 and light empty.
        assert_eq!(cells[6], "1");
        assert_eq!(cells[7], "-28");
        assert_eq!(cells[8], "");
        assert_eq!(cells[9], "");
        assert_eq!(cells[10], "3.000");
        assert_eq!(cells[11], "500");
        assert_eq!(cells[12], "");
    }

    #[test]
    fn test_packed_row_opaque_payload() {
        let mut r = record();
        r.sensed_data = Some(vec![0x80, 0xDE, 0xAD]);
        let payload = decode_payload(r.physical_layer, r.sensed_data.as_deref());
        let row = render_packed_row(&r, &payload);
        let cells: Vec<&str> = row.split(',').collect();
        // Typed cells empty, raw data carries the hex dump.
        assert_eq!(cells[6], "");
        assert_eq!(cells[12], "80dead");
    }

    #[test]
    fn test_headers_column_counts_match_rows() {
        assert_eq!(GENERIC_HEADER.split(',').count(), 7);
        assert_eq!(PACKED_HEADER.split(',').count(), 13);
    }
}
