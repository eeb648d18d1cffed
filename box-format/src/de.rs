use std::fmt;
use std::io::Read;

use crate::compression::CodecError;
use crate::header::{BoxHeader, ENTRY_COUNT_SIZE, LENGTH_PREFIX_SIZE, MIN_ENTRY_SIZE};
use crate::parse::{parse_slice, parse_u32};
use crate::record::{Entry, RawEntry};

/// The wire field being read when decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EntryCount,
    NameLength,
    Name,
    CompressedLength,
    CompressedData,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::EntryCount => "entry count",
            Field::NameLength => "name length",
            Field::Name => "name",
            Field::CompressedLength => "compressed length",
            Field::CompressedData => "compressed data",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Box is truncated: {field} at offset {offset:#x} needs {needed} bytes, {available} available.")]
    Truncated {
        field: Field,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Name of entry {index} is not valid UTF-8.")]
    InvalidName {
        index: u32,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Data of entry {index} (`{name}`) is corrupt.")]
    CorruptData {
        index: u32,
        name: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to read box.")]
    Io(#[from] std::io::Error),
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline(always)]
    fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn truncated(&self, field: Field, needed: usize) -> DecodeError {
        DecodeError::Truncated {
            field,
            offset: self.pos,
            needed,
            available: self.data.len() - self.pos,
        }
    }

    fn u32(&mut self, field: Field) -> Result<u32, DecodeError> {
        match parse_u32(self.remaining()) {
            Ok((value, consumed)) => {
                self.pos += consumed;
                Ok(value)
            }
            Err(_) => Err(self.truncated(field, LENGTH_PREFIX_SIZE)),
        }
    }

    fn slice(&mut self, field: Field, len: u32) -> Result<&'a [u8], DecodeError> {
        let len = len as usize;
        match parse_slice(self.remaining(), len) {
            Ok((bytes, consumed)) => {
                self.pos += consumed;
                Ok(bytes)
            }
            Err(_) => Err(self.truncated(field, len)),
        }
    }
}

/// A box whose layout has been fully validated, borrowing its entries from
/// the encoded buffer without decompressing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxView<'a> {
    header: BoxHeader,
    entries: Vec<RawEntry<'a>>,
    trailing: usize,
}

impl<'a> BoxView<'a> {
    /// Walk every header field of `data`.
    ///
    /// Fails on the first field that is missing bytes or on a name that is
    /// not UTF-8. Bytes after the last entry are tolerated.
    pub fn parse(data: &'a [u8]) -> Result<BoxView<'a>, DecodeError> {
        let header = match BoxHeader::parse(data) {
            Ok((header, _)) => header,
            Err(_) => {
                return Err(DecodeError::Truncated {
                    field: Field::EntryCount,
                    offset: 0,
                    needed: ENTRY_COUNT_SIZE,
                    available: data.len(),
                })
            }
        };

        let mut cursor = Cursor {
            data,
            pos: ENTRY_COUNT_SIZE,
        };

        // The count is untrusted, so never reserve more than the bytes could hold.
        let capacity = (header.entry_count as usize).min(cursor.remaining().len() / MIN_ENTRY_SIZE);
        let mut entries = Vec::with_capacity(capacity);

        for index in 0..header.entry_count {
            let start = cursor.pos;

            let name_len = cursor.u32(Field::NameLength)?;
            let name = cursor.slice(Field::Name, name_len)?;
            let name = std::str::from_utf8(name)
                .map_err(|source| DecodeError::InvalidName { index, source })?;

            let compressed_len = cursor.u32(Field::CompressedLength)?;
            let compressed = cursor.slice(Field::CompressedData, compressed_len)?;

            tracing::debug!(
                start = format_args!("{:#x}", start),
                end = format_args!("{:#x}", cursor.pos),
                bytes = cursor.pos - start,
                index,
                %name,
                "parsed entry"
            );

            entries.push(RawEntry {
                name,
                compressed,
                offset: start,
            });
        }

        let trailing = cursor.remaining().len();
        if trailing > 0 {
            tracing::debug!(
                start = format_args!("{:#x}", cursor.pos),
                bytes = trailing,
                "ignoring trailing bytes after last entry"
            );
        }

        Ok(BoxView {
            header,
            entries,
            trailing,
        })
    }

    #[inline(always)]
    pub fn header(&self) -> BoxHeader {
        self.header
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    pub fn entries(&self) -> &[RawEntry<'a>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawEntry<'a>> {
        self.entries.iter()
    }

    /// Number of bytes after the last entry.
    #[inline(always)]
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// Decompress every entry, in order. Stops at the first corrupt payload.
    pub fn decompress(&self) -> Result<Vec<Entry>, DecodeError> {
        self.entries
            .iter()
            .zip(0u32..)
            .map(|(raw, index)| {
                raw.to_entry().map_err(|source| DecodeError::CorruptData {
                    index,
                    name: raw.name.to_string(),
                    source,
                })
            })
            .collect()
    }
}

impl<'a, 'b> IntoIterator for &'b BoxView<'a> {
    type Item = &'b RawEntry<'a>;
    type IntoIter = std::slice::Iter<'b, RawEntry<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Decode a complete box held in memory.
pub fn decode(data: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    BoxView::parse(data)?.decompress()
}

/// Read `reader` to its end, then decode the bytes as a box.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Vec<Entry>, DecodeError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    decode(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::encode;

    fn sample() -> Vec<u8> {
        encode(&[
            Entry::new("a.txt", b"hello".to_vec()),
            Entry::new("b.txt", b"world".to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn view_exposes_layout_without_decompressing() {
        let data = sample();
        let view = BoxView::parse(&data).unwrap();

        assert_eq!(view.header().entry_count, 2);
        assert_eq!(view.len(), 2);
        assert_eq!(view.trailing_bytes(), 0);

        let names = view.iter().map(|e| e.name).collect::<Vec<_>>();
        assert_eq!(names, ["a.txt", "b.txt"]);

        let first = &view.entries()[0];
        assert_eq!(first.offset, ENTRY_COUNT_SIZE);
        assert_eq!(view.entries()[1].offset, 4 + 4 + 5 + 4 + first.compressed_len());
    }

    #[test]
    fn short_header() {
        match decode(&[1, 0]) {
            Err(DecodeError::Truncated {
                field: Field::EntryCount,
                offset: 0,
                needed: 4,
                available: 2,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn count_larger_than_contents() {
        let data = [2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        match BoxView::parse(&data) {
            Err(DecodeError::Truncated {
                field: Field::NameLength,
                offset: 12,
                ..
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let data = [0xff, 0xff, 0xff, 0xff];
        assert!(matches!(
            BoxView::parse(&data),
            Err(DecodeError::Truncated {
                field: Field::NameLength,
                ..
            })
        ));
    }

    #[test]
    fn name_length_past_end() {
        let data = [1, 0, 0, 0, 0xff, 0, 0, 0, b'a'];
        match BoxView::parse(&data) {
            Err(DecodeError::Truncated {
                field: Field::Name,
                offset: 8,
                needed: 255,
                available: 1,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_name() {
        let data = [1, 0, 0, 0, 2, 0, 0, 0, 0xc3, 0x28, 0, 0, 0, 0];
        match decode(&data) {
            Err(DecodeError::InvalidName { index: 0, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_compressed_segment_is_corrupt() {
        let data = [1, 0, 0, 0, 1, 0, 0, 0, b'x', 0, 0, 0, 0];
        let view = BoxView::parse(&data).unwrap();
        assert_eq!(view.entries()[0].name, "x");

        match view.decompress() {
            Err(DecodeError::CorruptData { index: 0, name, .. }) => assert_eq!(name, "x"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn trailing_bytes_are_tolerated() {
        let mut data = sample();
        data.extend_from_slice(b"garbage");

        let view = BoxView::parse(&data).unwrap();
        assert_eq!(view.trailing_bytes(), 7);
        assert_eq!(decode(&data).unwrap().len(), 2);
    }

    #[test]
    fn reader_matches_slice() {
        let data = sample();
        let from_reader = decode_reader(std::io::Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, decode(&data).unwrap());
    }

    #[test]
    fn reader_failure_is_io() {
        struct Failing;

        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }

        assert!(matches!(decode_reader(Failing), Err(DecodeError::Io(_))));
    }
}
