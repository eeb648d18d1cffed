use crate::compression::{decompress_buffer, CodecError};

/// A named file as stored in, or recovered from, a box.
///
/// The name is kept exactly as given. It may contain path separators or
/// parent references; see [crate::path::sanitize] before using it on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    pub name: String,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new<N: Into<String>, D: Into<Vec<u8>>>(name: N, data: D) -> Entry {
        Entry {
            name: name.into(),
            data: data.into(),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.data)
    }
}

impl<N: Into<String>, D: Into<Vec<u8>>> From<(N, D)> for Entry {
    fn from((name, data): (N, D)) -> Entry {
        Entry::new(name, data)
    }
}

/// An entry borrowed from an encoded box, payload still compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    pub name: &'a str,
    pub compressed: &'a [u8],
    /// Offset of the entry's `name_len` field within the box.
    pub offset: usize,
}

impl<'a> RawEntry<'a> {
    #[inline(always)]
    pub fn compressed_len(&self) -> usize {
        self.compressed.len()
    }

    pub fn decompress(&self) -> Result<Vec<u8>, CodecError> {
        decompress_buffer(self.compressed)
    }

    pub fn to_entry(&self) -> Result<Entry, CodecError> {
        Ok(Entry::new(self.name, self.decompress()?))
    }
}
