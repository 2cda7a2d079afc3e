// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Binary record codec for sensor sample traces.
//!
//! Two framings share one record body, all fields big-endian:
//!
//! - **file framing** (on-disk trace records):
//!   `[i64 offset][u32 length][length bytes of body]`
//! - **wire framing** (records exchanged with an aggregator link):
//!   `[u32 length][length bytes of body]`
//!
//! Record body layout:
//! `[u8 physical_layer][16B device_id][16B receiver_id][i64 receiver_timestamp][f32 rssi][rest: sensed_data]`
//!
//! A record whose declared length cannot hold the fixed body fields is
//! a [`TraceError::MalformedLength`] decode failure, never a record
//! with a negative payload length. A stream ending mid-record is
//! [`TraceError::TruncatedRecord`]; clean EOF at a record boundary
//! decodes to `Ok(None)`.

use std::io::{ErrorKind, Read, Write};

use byteorder::{BigEndian, ByteOrder};

use crate::core::{SampleRecord, TraceError, DEVICE_ID_SIZE};
use crate::Result;

/// Minimum record body length: physical layer, two identifiers,
/// timestamp, and RSSI.
pub const MIN_BODY_LEN: u32 = (1 + DEVICE_ID_SIZE + DEVICE_ID_SIZE + 8 + 4) as u32;

/// Size of the file-framing prefix (offset + length).
pub const FILE_PREFIX_LEN: usize = 12;

/// Read exactly `buf.len()` bytes, or detect a record boundary.
///
/// Returns `Ok(None)` when the stream is exhausted before the first
/// byte, `TruncatedRecord` when it ends partway through.
fn read_exact_or_eof<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<Option<()>> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(TraceError::truncated(context, buf.len() - filled));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TraceError::io(context, e)),
        }
    }
    Ok(Some(()))
}

/// Read exactly `buf.len()` bytes; any shortfall is a truncation.
fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], context: &'static str) -> Result<()> {
    match read_exact_or_eof(reader, buf, context)? {
        Some(()) => Ok(()),
        None => Err(TraceError::truncated(context, buf.len())),
    }
}

/// Decode a record body of `body.len() >= MIN_BODY_LEN` bytes.
fn decode_body(offset_ms: i64, body: &[u8]) -> SampleRecord {
    let mut device_id = [0u8; DEVICE_ID_SIZE];
    let mut receiver_id = [0u8; DEVICE_ID_SIZE];

    let physical_layer = body[0];
    device_id.copy_from_slice(&body[1..1 + DEVICE_ID_SIZE]);
    receiver_id.copy_from_slice(&body[17..17 + DEVICE_ID_SIZE]);
    let receiver_timestamp = BigEndian::read_i64(&body[33..41]);
    let rssi = BigEndian::read_f32(&body[41..45]);

    let sensed_data = if body.len() > MIN_BODY_LEN as usize {
        Some(body[MIN_BODY_LEN as usize..].to_vec())
    } else {
        None
    };

    SampleRecord {
        offset_ms,
        physical_layer,
        device_id,
        receiver_id,
        receiver_timestamp,
        rssi,
        sensed_data,
    }
}

/// Read the length prefix and body shared by both framings.
fn read_length_and_body<R: Read>(reader: &mut R, offset_ms: i64) -> Result<SampleRecord> {
    let mut len_buf = [0u8; 4];
    read_exact(reader, &mut len_buf, "record length")?;
    let declared = BigEndian::read_u32(&len_buf);

    if declared < MIN_BODY_LEN {
        return Err(TraceError::malformed_length(declared, MIN_BODY_LEN));
    }

    let mut body = vec![0u8; declared as usize];
    read_exact(reader, &mut body, "record body")?;

    Ok(decode_body(offset_ms, &body))
}

/// Decode one file-framed record from a stream.
///
/// Returns `Ok(None)` at a clean end of file. A stream ending inside
/// the offset, length, or body is a `TruncatedRecord` error; both it
/// and `Io` end the stream for the caller without retry.
pub fn read_file_record<R: Read>(reader: &mut R) -> Result<Option<SampleRecord>> {
    let mut offset_buf = [0u8; 8];
    if read_exact_or_eof(reader, &mut offset_buf, "offset prefix")?.is_none() {
        return Ok(None);
    }
    let offset_ms = BigEndian::read_i64(&offset_buf);

    Ok(Some(read_length_and_body(reader, offset_ms)?))
}

/// Decode one wire-framed record (no offset prefix) from a stream.
///
/// The decoded record's `offset_ms` is zero; wire records carry no
/// file-relative timing.
pub fn read_wire_record<R: Read>(reader: &mut R) -> Result<Option<SampleRecord>> {
    let mut len_buf = [0u8; 4];
    if read_exact_or_eof(reader, &mut len_buf, "record length")?.is_none() {
        return Ok(None);
    }
    let declared = BigEndian::read_u32(&len_buf);

    if declared < MIN_BODY_LEN {
        return Err(TraceError::malformed_length(declared, MIN_BODY_LEN));
    }

    let mut body = vec![0u8; declared as usize];
    read_exact(reader, &mut body, "record body")?;

    Ok(Some(decode_body(0, &body)))
}

/// Encode the record body shared by both framings.
fn encode_body(record: &SampleRecord, out: &mut Vec<u8>) {
    out.push(record.physical_layer);
    out.extend_from_slice(&record.device_id);
    out.extend_from_slice(&record.receiver_id);
    out.extend_from_slice(&record.receiver_timestamp.to_be_bytes());
    out.extend_from_slice(&record.rssi.to_be_bytes());
    if let Some(data) = &record.sensed_data {
        out.extend_from_slice(data);
    }
}

/// Length of the record body for the given record.
pub fn body_len(record: &SampleRecord) -> u32 {
    MIN_BODY_LEN + record.sensed_len() as u32
}

/// Encode one record in file framing.
///
/// Byte-for-byte inverse of [`read_file_record`]: for every valid
/// record `r`, decoding the encoded bytes reproduces `r` unchanged.
/// An empty `sensed_data` vector is normalized to absent on decode.
pub fn encode_file_record(record: &SampleRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(FILE_PREFIX_LEN + body_len(record) as usize);
    out.extend_from_slice(&record.offset_ms.to_be_bytes());
    out.extend_from_slice(&body_len(record).to_be_bytes());
    encode_body(record, &mut out);
    out
}

/// Encode one record in wire framing (no offset prefix).
pub fn encode_wire_record(record: &SampleRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + body_len(record) as usize);
    out.extend_from_slice(&body_len(record).to_be_bytes());
    encode_body(record, &mut out);
    out
}

/// Write one file-framed record to a stream.
pub fn write_file_record<W: Write>(writer: &mut W, record: &SampleRecord) -> Result<()> {
    writer
        .write_all(&encode_file_record(record))
        .map_err(|e| TraceError::io("write record", e))
}
