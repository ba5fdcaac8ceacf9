use bytes::{Buf, BufMut, Bytes};
use derive_more::Debug;

use crate::coding::{Decode, DecodeError, Encode};

/// The output of a converter.
///
/// Ownership of the buffer passes to the caller; neither the registry nor the
/// converter keeps a reference once it is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
	/// The encoded bytes.
	///
	/// The debug implementation shows only the length for brevity.
	#[debug("{} bytes", buffer.len())]
	pub buffer: Bytes,

	/// The component that generated the event(s).
	pub component_id: u32,
}

impl Payload {
	pub fn new(buffer: impl Into<Bytes>, component_id: u32) -> Self {
		Self {
			buffer: buffer.into(),
			component_id,
		}
	}

	/// The size of the buffer in bytes.
	pub fn size(&self) -> usize {
		self.buffer.len()
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.buffer
	}
}

/// Framed as the component ID followed by the size-prefixed buffer.
impl Encode for Payload {
	fn encode<W: BufMut>(&self, w: &mut W) {
		self.component_id.encode(w);
		self.buffer.encode(w);
	}
}

impl Decode for Payload {
	fn decode<B: Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let component_id = u32::decode(buf)?;
		let buffer = Bytes::decode(buf)?;

		Ok(Self { buffer, component_id })
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn framing() {
		let payloads = vec![
			Payload::new(&b"{\"type\":\"MOVING\"}"[..], 3),
			Payload::new(Bytes::new(), 0),
			Payload::new(vec![0u8; 300], 70_000),
		];

		let mut buf = Vec::new();
		payloads.encode(&mut buf);

		let mut reader = Bytes::from(buf);
		let decoded = Vec::<Payload>::decode(&mut reader).unwrap();
		assert_eq!(decoded, payloads);
		assert!(!reader.has_remaining());
	}

	#[test]
	fn layout() {
		let mut buf = Vec::new();
		Payload::new(vec![0xaa, 0xbb], 7).encode(&mut buf);
		assert_eq!(buf, [0x07, 0x02, 0xaa, 0xbb]);
	}

	#[test]
	fn truncated() {
		let mut buf = &[0x07, 0x05, 0xaa][..];
		assert_eq!(Payload::decode(&mut buf), Err(DecodeError::Short));
	}

	#[test]
	fn debug_hides_bytes() {
		let payload = Payload::new(vec![1, 2, 3], 9);
		assert_eq!(format!("{payload:?}"), "Payload { buffer: 3 bytes, component_id: 9 }");
	}
}
