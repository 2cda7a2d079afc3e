// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for sampletrace.
//!
//! Provides error types for trace stream operations:
//! - Record decoding and encoding
//! - Trace file reading and writing
//! - Payload field decoding
//! - Replay configuration

use std::fmt;

/// Errors that can occur during trace stream operations.
#[derive(Debug, Clone)]
pub enum TraceError {
    /// Stream ended in the middle of a record.
    ///
    /// Trace files are append-only and may be read while still being
    /// written, so readers treat this as end-of-stream rather than as
    /// corruption.
    TruncatedRecord {
        /// What was being read when the stream ended
        context: String,
        /// Bytes still required to complete the read
        needed: usize,
    },

    /// Declared record length cannot hold the fixed body fields
    MalformedLength {
        /// Length declared in the record prefix
        declared: u32,
        /// Minimum length of a record body
        minimum: u32,
    },

    /// Underlying read or write failure
    Io {
        /// What was being done when the failure occurred
        context: String,
        /// Error message
        message: String,
    },

    /// One payload field failed to decode.
    ///
    /// Recovered locally: the field is reported absent and payload
    /// decoding continues.
    FieldDecodeError {
        /// Field name
        field: String,
        /// Underlying cause
        cause: String,
    },

    /// Replay speed multiplier out of range
    InvalidSpeed {
        /// The rejected multiplier
        speed: f32,
    },

    /// Other error
    Other(String),
}

impl TraceError {
    /// Create a truncated-record error.
    pub fn truncated(context: impl Into<String>, needed: usize) -> Self {
        TraceError::TruncatedRecord {
            context: context.into(),
            needed,
        }
    }

    /// Create a malformed-length error.
    pub fn malformed_length(declared: u32, minimum: u32) -> Self {
        TraceError::MalformedLength { declared, minimum }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl fmt::Display) -> Self {
        TraceError::Io {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a field decode error.
    pub fn field_decode(field: impl Into<String>, cause: impl Into<String>) -> Self {
        TraceError::FieldDecodeError {
            field: field.into(),
            cause: cause.into(),
        }
    }

    /// Create an invalid-speed error.
    pub fn invalid_speed(speed: f32) -> Self {
        TraceError::InvalidSpeed { speed }
    }

    /// Whether this error marks the natural end of a trace stream.
    ///
    /// Readers stop at the first truncated record; everything else is a
    /// hard failure for the stream.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, TraceError::TruncatedRecord { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            TraceError::TruncatedRecord { context, needed } => vec![
                ("context", context.clone()),
                ("needed", needed.to_string()),
            ],
            TraceError::MalformedLength { declared, minimum } => vec![
                ("declared", declared.to_string()),
                ("minimum", minimum.to_string()),
            ],
            TraceError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            TraceError::FieldDecodeError { field, cause } => {
                vec![("field", field.clone()), ("cause", cause.clone())]
            }
            TraceError::InvalidSpeed { speed } => vec![("speed", speed.to_string())],
            TraceError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::TruncatedRecord { context, needed } => write!(
                f,
                "Stream ended mid-record while reading {context}: {needed} more bytes required"
            ),
            TraceError::MalformedLength { declared, minimum } => write!(
                f,
                "Declared record length {declared} is below the {minimum}-byte minimum"
            ),
            TraceError::Io { context, message } => {
                write!(f, "I/O failure in {context}: {message}")
            }
            TraceError::FieldDecodeError { field, cause } => {
                write!(f, "Failed to decode payload field '{field}': {cause}")
            }
            TraceError::InvalidSpeed { speed } => {
                write!(f, "Invalid playback speed {speed}: must be greater than zero")
            }
            TraceError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for TraceError {}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::Io {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for sampletrace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_error() {
        let err = TraceError::truncated("record body", 12);
        assert!(matches!(err, TraceError::TruncatedRecord { .. }));
        assert_eq!(
            err.to_string(),
            "Stream ended mid-record while reading record body: 12 more bytes required"
        );
        assert!(err.is_end_of_stream());
    }

    #[test]
    fn test_malformed_length_error() {
        let err = TraceError::malformed_length(12, 45);
        assert!(matches!(err, TraceError::MalformedLength { .. }));
        assert_eq!(
            err.to_string(),
            "Declared record length 12 is below the 45-byte minimum"
        );
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn test_io_error() {
        let err = TraceError::io("TraceReader::open", "permission denied");
        assert!(matches!(err, TraceError::Io { .. }));
        assert_eq!(
            err.to_string(),
            "I/O failure in TraceReader::open: permission denied"
        );
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn test_field_decode_error() {
        let err = TraceError::field_decode("temp16", "two bytes required");
        assert!(matches!(err, TraceError::FieldDecodeError { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to decode payload field 'temp16': two bytes required"
        );
    }

    #[test]
    fn test_invalid_speed_error() {
        let err = TraceError::invalid_speed(-1.5);
        assert_eq!(
            err.to_string(),
            "Invalid playback speed -1.5: must be greater than zero"
        );
    }

    #[test]
    fn test_other_error() {
        let err = TraceError::Other("something went wrong".to_string());
        assert_eq!(err.to_string(), "Other error: something went wrong");
    }

    #[test]
    fn test_log_fields_truncated() {
        let err = TraceError::truncated("offset prefix", 8);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "context");
        assert_eq!(fields[0].1, "offset prefix");
        assert_eq!(fields[1].0, "needed");
        assert_eq!(fields[1].1, "8");
    }

    #[test]
    fn test_log_fields_malformed_length() {
        let err = TraceError::malformed_length(44, 45);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].1, "44");
        assert_eq!(fields[1].1, "45");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TraceError = io_err.into();
        assert!(matches!(err, TraceError::Io { .. }));
        assert_eq!(err.to_string(), "I/O failure in IO: file not found");
    }

    #[test]
    fn test_error_clone() {
        let err1 = TraceError::malformed_length(10, 45);
        let err2 = err1.clone();
        assert_eq!(err1.to_string(), err2.to_string());
    }
}
