//! The xz/LZMA primitive applied to each entry's payload.
//!
//! Every payload becomes one complete xz stream written with the liblzma
//! defaults (preset 6, CRC64 check). Neither side is configurable, so any
//! two builds agree on the codec without storing its parameters.

use xz2::stream::{Action, Check, Status, Stream};

/// liblzma's default preset.
pub const PRESET: u32 = 6;

/// Integrity check embedded in every stream.
pub const CHECK: Check = Check::Crc64;

/// Smallest amount of spare output capacity handed to liblzma per call.
const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("xz stream error: {0}")]
    Stream(#[from] xz2::stream::Error),

    #[error("xz stream ended before it was complete")]
    UnexpectedEnd,

    #[error("{0} bytes follow the end of the xz stream")]
    TrailingData(usize),
}

fn ensure_spare(output: &mut Vec<u8>) {
    if output.capacity() - output.len() < CHUNK_SIZE {
        output.reserve(output.capacity().max(CHUNK_SIZE));
    }
}

/// Compress a complete buffer into a single xz stream.
pub fn compress_buffer(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut stream = Stream::new_easy_encoder(PRESET, CHECK)?;
    let mut output = Vec::with_capacity(input.len() / 2 + CHUNK_SIZE);

    loop {
        ensure_spare(&mut output);
        let consumed = stream.total_in() as usize;

        match stream.process_vec(&input[consumed..], &mut output, Action::Finish)? {
            Status::StreamEnd => break,
            Status::Ok | Status::GetCheck | Status::MemNeeded => {}
        }
    }

    Ok(output)
}

/// Decompress a buffer that must hold exactly one complete xz stream.
pub fn decompress_buffer(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut stream = Stream::new_stream_decoder(u64::MAX, 0)?;
    let mut output = Vec::with_capacity(input.len().saturating_mul(2).max(CHUNK_SIZE));

    loop {
        ensure_spare(&mut output);
        let consumed = stream.total_in();
        let produced = stream.total_out();

        match stream.process_vec(&input[consumed as usize..], &mut output, Action::Run)? {
            Status::StreamEnd => break,
            Status::Ok | Status::GetCheck | Status::MemNeeded => {
                // With spare output on hand, no progress means the input ran dry.
                if stream.total_in() == consumed && stream.total_out() == produced {
                    return Err(CodecError::UnexpectedEnd);
                }
            }
        }
    }

    let used = stream.total_in() as usize;
    if used != input.len() {
        return Err(CodecError::TrailingData(input.len() - used));
    }

    Ok(output)
}
