//! Sans-IO parsing primitives for the box layout.
//!
//! These functions work on byte slices without any I/O traits. All of them
//! return `(value, bytes_consumed)` on success, allowing the caller to manage
//! buffer positions.

use byteorder::ByteOrder;

use crate::header::{Endian, LENGTH_PREFIX_SIZE};

/// Error type for parsing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Need more bytes to complete parsing. Contains minimum additional bytes needed.
    NeedMoreBytes(usize),
    /// Invalid UTF-8 in string.
    InvalidUtf8(std::str::Utf8Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NeedMoreBytes(n) => write!(f, "need {} more bytes", n),
            ParseError::InvalidUtf8(e) => write!(f, "invalid UTF-8: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for std::io::Error {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::NeedMoreBytes(_) => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, e)
            }
            ParseError::InvalidUtf8(_) => std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }
    }
}

pub type ParseResult<T> = Result<(T, usize), ParseError>;

/// Parse a little-endian u32.
#[inline]
pub fn parse_u32(data: &[u8]) -> ParseResult<u32> {
    if data.len() < LENGTH_PREFIX_SIZE {
        return Err(ParseError::NeedMoreBytes(LENGTH_PREFIX_SIZE - data.len()));
    }
    Ok((Endian::read_u32(&data[..LENGTH_PREFIX_SIZE]), LENGTH_PREFIX_SIZE))
}

/// Take exactly `len` bytes off the front of `data`.
#[inline]
pub fn parse_slice(data: &[u8], len: usize) -> ParseResult<&[u8]> {
    if data.len() < len {
        return Err(ParseError::NeedMoreBytes(len - data.len()));
    }
    Ok((&data[..len], len))
}

/// Parse a u32 length prefix followed by that many bytes.
///
/// The consumed count includes the prefix.
pub fn parse_bytes(data: &[u8]) -> ParseResult<&[u8]> {
    let (len, prefix) = parse_u32(data)?;
    let (bytes, len) = parse_slice(&data[prefix..], len as usize)?;
    Ok((bytes, prefix + len))
}

/// Parse a u32 length prefix followed by that many bytes of UTF-8.
pub fn parse_str(data: &[u8]) -> ParseResult<&str> {
    let (bytes, consumed) = parse_bytes(data)?;
    let s = std::str::from_utf8(bytes).map_err(ParseError::InvalidUtf8)?;
    Ok((s, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_needs_four_bytes() {
        assert_eq!(parse_u32(&[1, 0]), Err(ParseError::NeedMoreBytes(2)));
        assert_eq!(parse_u32(&[1, 0, 0, 0, 9]), Ok((1, 4)));
    }

    #[test]
    fn bytes_reports_missing_payload() {
        let data = [5, 0, 0, 0, b'a', b'b'];
        assert_eq!(parse_bytes(&data), Err(ParseError::NeedMoreBytes(3)));
    }

    #[test]
    fn str_consumes_prefix_and_body() {
        let data = [3, 0, 0, 0, b'a', b'b', b'c', 0xff];
        assert_eq!(parse_str(&data), Ok(("abc", 7)));
    }

    #[test]
    fn str_rejects_invalid_utf8() {
        let data = [2, 0, 0, 0, 0xc3, 0x28];
        match parse_str(&data) {
            Err(ParseError::InvalidUtf8(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
