//! Length-prefixed framing helpers used to put payloads on a byte stream.

mod decode;
mod encode;
mod varint;

pub use decode::*;
pub use encode::*;
pub use varint::*;

// Re-export the bytes crate
pub use bytes::*;
