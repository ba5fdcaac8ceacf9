use super::VarInt;

pub trait Encode: Sized {
	// Encode the value to the given writer.
	// This will panic if the Buf is not large enough; use a Vec to be safe.
	fn encode<W: bytes::BufMut>(&self, w: &mut W);
}

impl Encode for u8 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u8(*self);
	}
}

impl Encode for u32 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		VarInt::from(*self).encode(w);
	}
}

impl Encode for usize {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let v = VarInt::try_from(*self).expect("length too large");
		v.encode(w);
	}
}

impl Encode for &[u8] {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.len().encode(w);
		w.put_slice(self);
	}
}

impl Encode for bytes::Bytes {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.len().encode(w);
		w.put_slice(self);
	}
}

impl<T: Encode> Encode for Vec<T> {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.len().encode(w);
		for item in self.iter() {
			item.encode(w);
		}
	}
}
