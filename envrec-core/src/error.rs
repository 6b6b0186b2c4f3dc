//! Error types for record encoding and decoding

use thiserror::Error;

/// Errors that can occur when encoding or decoding envelope records
#[derive(Error, Debug)]
pub enum CodecError {
    /// Record does not start with the expected magic bytes
    #[error("Invalid record header: expected {expected:02X?}, got {actual:02X?}")]
    InvalidHeader { expected: [u8; 2], actual: [u8; 2] },

    /// Input ended in the middle of a record
    #[error("Record truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Length field exceeds what a single record may carry
    #[error("Record too large: {0} bytes")]
    TooLarge(usize),

    /// Body could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Envelope does not carry the expected data type
    #[error("Unexpected data type: expected {expected}, got {actual}")]
    UnexpectedType { expected: i32, actual: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for CodecError {
    fn from(e: bincode::Error) -> Self {
        CodecError::Serialization(e.to_string())
    }
}
