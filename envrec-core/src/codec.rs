//! Envelope record format.
//!
//! Recording files and datagrams are a plain concatenation of records:
//!
//! ```text
//! ┌──────────┬──────────────┬───────────────────────────┐
//! │ 0D A4    │ length (u32) │ body (bincode Envelope)   │
//! │ 2 bytes  │ LE, 4 bytes  │ `length` bytes            │
//! └──────────┴──────────────┴───────────────────────────┘
//! ```
//!
//! There is no file header, index or trailer, so a file that was cut short
//! by a crash is readable up to the last complete record.

use std::io::{self, Read, Write};

use crate::envelope::Envelope;
use crate::error::CodecError;

/// Magic bytes at the start of every record
pub const RECORD_MAGIC: [u8; 2] = [0x0D, 0xA4];

/// Size of the magic plus the length field
pub const RECORD_HEADER_SIZE: usize = 6;

/// Largest body accepted when reading (16 MiB)
pub const MAX_RECORD_LEN: usize = 16 * 1024 * 1024;

/// Encode an envelope as one complete record.
pub fn encode_record(envelope: &Envelope) -> Result<Vec<u8>, CodecError> {
    let body = bincode::serialize(envelope)?;
    if body.len() > MAX_RECORD_LEN {
        return Err(CodecError::TooLarge(body.len()));
    }

    let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + body.len());
    buf.extend_from_slice(&RECORD_MAGIC);
    buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Write an envelope as one record.
pub fn write_record<W: Write>(writer: &mut W, envelope: &Envelope) -> Result<(), CodecError> {
    let record = encode_record(envelope)?;
    writer.write_all(&record)?;
    Ok(())
}

/// Read the next record.
///
/// Returns `Ok(None)` on a clean end of input (no bytes left before a
/// record starts); a record cut off anywhere after its first byte is an error.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<Envelope>, CodecError> {
    let mut header = [0u8; RECORD_HEADER_SIZE];
    let got = read_fully(reader, &mut header)?;
    if got == 0 {
        return Ok(None);
    }
    if got < RECORD_HEADER_SIZE {
        return Err(CodecError::Truncated {
            expected: RECORD_HEADER_SIZE,
            actual: got,
        });
    }

    let len = parse_header(&header)?;

    let mut body = vec![0u8; len];
    let got = read_fully(reader, &mut body)?;
    if got < len {
        return Err(CodecError::Truncated {
            expected: len,
            actual: got,
        });
    }

    Ok(Some(bincode::deserialize(&body)?))
}

/// Decode every record in a buffer, such as a single datagram.
pub fn decode_records(mut data: &[u8]) -> Result<Vec<Envelope>, CodecError> {
    let mut envelopes = Vec::new();
    while let Some(envelope) = read_record(&mut data)? {
        envelopes.push(envelope);
    }
    Ok(envelopes)
}

fn parse_header(header: &[u8; RECORD_HEADER_SIZE]) -> Result<usize, CodecError> {
    let magic = [header[0], header[1]];
    if magic != RECORD_MAGIC {
        return Err(CodecError::InvalidHeader {
            expected: RECORD_MAGIC,
            actual: magic,
        });
    }

    let len = u32::from_le_bytes([header[2], header[3], header[4], header[5]]) as usize;
    if len > MAX_RECORD_LEN {
        return Err(CodecError::TooLarge(len));
    }
    Ok(len)
}

/// Like `read_exact`, but reports how many bytes were read before EOF.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Iterator over the records of a recording.
///
/// Stops after the first error.
pub struct RecordReader<R: Read> {
    reader: R,
    failed: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            failed: false,
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Envelope, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match read_record(&mut self.reader) {
            Ok(Some(envelope)) => Some(Ok(envelope)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
