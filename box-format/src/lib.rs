//! Herein lies the brains of the `lzbox` container format.
//!
//! A box is a 32-bit entry count followed by that many entries, each a
//! length-prefixed UTF-8 name and a length-prefixed xz stream holding the
//! file's bytes. Every integer is a little-endian `u32`.
//!
//! Use [encode] or [BoxWriter] to build a box, and [decode] or [BoxView] to
//! read one back.

pub mod compression;
mod de;
pub mod header;
pub mod parse;
pub mod path;
mod record;
mod ser;

pub use compression::CodecError;
pub use de::{decode, decode_reader, BoxView, DecodeError, Field};
pub use header::BoxHeader;
pub use parse::{ParseError, ParseResult};
pub use record::{Entry, RawEntry};
pub use ser::{encode, BoxWriter, EncodeError};
