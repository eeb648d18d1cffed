use std::convert::TryFrom;

use crate::compression::{compress_buffer, CodecError};
use crate::header::{put_u32, wire_len, BoxHeader, ENTRY_COUNT_SIZE};
use crate::record::Entry;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Too many entries: a box holds at most {} entries.", u32::MAX)]
    TooManyEntries,

    #[error("Name of entry {index} is {len} bytes long, more than a 32-bit length can hold.")]
    NameTooLong { index: usize, len: usize },

    #[error("Entry {index} (`{name}`) compresses to {len} bytes, more than a 32-bit length can hold.")]
    PayloadTooLarge {
        index: usize,
        name: String,
        len: usize,
    },

    #[error("Compressing entry {index} (`{name}`) failed.")]
    Compress {
        index: usize,
        name: String,
        #[source]
        source: CodecError,
    },
}

/// Builds a box in memory one entry at a time.
///
/// Payloads are compressed as they are inserted, so only the compressed form
/// of earlier entries is kept around.
#[derive(Debug, Clone)]
pub struct BoxWriter {
    buf: Vec<u8>,
    count: u32,
}

impl Default for BoxWriter {
    fn default() -> Self {
        BoxWriter::new()
    }
}

impl BoxWriter {
    pub fn new() -> BoxWriter {
        let mut buf = Vec::new();
        // Placeholder count, rewritten by `finish`.
        BoxHeader::default().write_to(&mut buf);
        BoxWriter { buf, count: 0 }
    }

    /// Number of entries inserted so far.
    #[inline(always)]
    pub fn len(&self) -> u32 {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes the box would take up if finished now.
    #[inline(always)]
    pub fn encoded_len(&self) -> usize {
        self.buf.len()
    }

    /// Compress `data` and append it under `name`.
    ///
    /// On error the writer is left exactly as it was before the call.
    pub fn insert(&mut self, name: &str, data: &[u8]) -> Result<(), EncodeError> {
        let index = self.count as usize;
        let next_count = self.count.checked_add(1).ok_or(EncodeError::TooManyEntries)?;

        let name_len = u32::try_from(name.len()).map_err(|_| EncodeError::NameTooLong {
            index,
            len: name.len(),
        })?;

        let compressed = compress_buffer(data).map_err(|source| EncodeError::Compress {
            index,
            name: name.to_string(),
            source,
        })?;

        let compressed_len =
            u32::try_from(compressed.len()).map_err(|_| EncodeError::PayloadTooLarge {
                index,
                name: name.to_string(),
                len: compressed.len(),
            })?;

        self.buf
            .reserve(wire_len(name_len as u64, compressed_len as u64) as usize);
        put_u32(&mut self.buf, name_len);
        self.buf.extend_from_slice(name.as_bytes());
        put_u32(&mut self.buf, compressed_len);
        self.buf.extend_from_slice(&compressed);
        self.count = next_count;

        tracing::debug!(
            index,
            %name,
            decompressed = data.len(),
            compressed = compressed.len(),
            "inserted entry"
        );

        Ok(())
    }

    /// Write the final entry count and hand back the encoded box.
    pub fn finish(mut self) -> Vec<u8> {
        BoxHeader::new(self.count).patch(&mut self.buf[..ENTRY_COUNT_SIZE]);
        tracing::debug!(
            entries = self.count,
            bytes = self.buf.len(),
            "finished box"
        );
        self.buf
    }
}

/// Encode `entries`, in order, into a single box.
pub fn encode(entries: &[Entry]) -> Result<Vec<u8>, EncodeError> {
    if u32::try_from(entries.len()).is_err() {
        return Err(EncodeError::TooManyEntries);
    }

    let mut writer = BoxWriter::new();
    for entry in entries {
        writer.insert(&entry.name, &entry.data)?;
    }
    Ok(writer.finish())
}
