//! Fixed-width fields of the wire layout.

use byteorder::{ByteOrder, LittleEndian};

use crate::parse::{parse_u32, ParseResult};

/// Byte order of every integer field in a box.
pub type Endian = LittleEndian;

/// Width of the leading entry count.
pub const ENTRY_COUNT_SIZE: usize = 4;

/// Width of the `name_len` and `comp_len` prefixes of an entry.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest possible entry: empty name and empty compressed segment.
pub const MIN_ENTRY_SIZE: usize = LENGTH_PREFIX_SIZE * 2;

/// Number of bytes an entry with the given name and compressed lengths takes up.
pub const fn wire_len(name_len: u64, compressed_len: u64) -> u64 {
    LENGTH_PREFIX_SIZE as u64 + name_len + LENGTH_PREFIX_SIZE as u64 + compressed_len
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxHeader {
    pub entry_count: u32,
}

impl BoxHeader {
    pub const fn new(entry_count: u32) -> BoxHeader {
        BoxHeader { entry_count }
    }

    pub fn parse(data: &[u8]) -> ParseResult<BoxHeader> {
        let (entry_count, consumed) = parse_u32(data)?;
        Ok((BoxHeader { entry_count }, consumed))
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        put_u32(out, self.entry_count);
    }

    /// Overwrite the count at the start of an already written box.
    pub(crate) fn patch(&self, out: &mut [u8]) {
        Endian::write_u32(&mut out[..ENTRY_COUNT_SIZE], self.entry_count);
    }
}

pub(crate) fn put_u32(out: &mut Vec<u8>, value: u32) {
    let mut field = [0u8; LENGTH_PREFIX_SIZE];
    Endian::write_u32(&mut field, value);
    out.extend_from_slice(&field);
}
