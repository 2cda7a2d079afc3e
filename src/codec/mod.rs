// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec implementations for trace records and sensed payloads.
//!
//! - [`record`]: binary encode/decode of sample records in both the
//!   on-disk (file) and on-wire framings
//! - [`payload`]: typed decoding of bit-packed sensor payloads

pub mod payload;
pub mod record;

pub use payload::{decode_payload, DecodedPayload};
pub use record::{
    encode_file_record, encode_wire_record, read_file_record, read_wire_record, write_file_record,
    MIN_BODY_LEN,
};
