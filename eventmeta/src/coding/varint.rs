use std::fmt;

use super::{Decode, DecodeError, Encode};

/// The value was too large to fit in a [VarInt].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("value too large for varint encoding")]
pub struct BoundsExceeded;

/// A QUIC-style variable-length integer.
///
/// The two most significant bits of the first byte hold the length (1, 2, 4 or 8 bytes),
/// leaving 62 bits for the value.
#[derive(Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarInt(u64);

impl VarInt {
	/// The largest representable value.
	pub const MAX: Self = Self((1 << 62) - 1);

	/// The smallest representable value.
	pub const ZERO: Self = Self(0);

	pub const fn from_u32(x: u32) -> Self {
		Self(x as u64)
	}

	pub const fn into_inner(self) -> u64 {
		self.0
	}

	/// The number of bytes this value occupies once encoded.
	pub const fn size(self) -> usize {
		match self.0 {
			x if x < (1 << 6) => 1,
			x if x < (1 << 14) => 2,
			x if x < (1 << 30) => 4,
			_ => 8,
		}
	}
}

impl From<u8> for VarInt {
	fn from(x: u8) -> Self {
		Self(x.into())
	}
}

impl From<u16> for VarInt {
	fn from(x: u16) -> Self {
		Self(x.into())
	}
}

impl From<u32> for VarInt {
	fn from(x: u32) -> Self {
		Self::from_u32(x)
	}
}

impl TryFrom<u64> for VarInt {
	type Error = BoundsExceeded;

	fn try_from(x: u64) -> Result<Self, BoundsExceeded> {
		match x <= Self::MAX.0 {
			true => Ok(Self(x)),
			false => Err(BoundsExceeded),
		}
	}
}

impl TryFrom<usize> for VarInt {
	type Error = BoundsExceeded;

	fn try_from(x: usize) -> Result<Self, BoundsExceeded> {
		Self::try_from(x as u64)
	}
}

impl From<VarInt> for u64 {
	fn from(x: VarInt) -> Self {
		x.0
	}
}

impl fmt::Debug for VarInt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl fmt::Display for VarInt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl Encode for VarInt {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let x = self.0;
		match self.size() {
			1 => w.put_u8(x as u8),
			2 => w.put_u16((0b01 << 14) | x as u16),
			4 => w.put_u32((0b10 << 30) | x as u32),
			_ => w.put_u64((0b11 << 62) | x),
		}
	}
}

impl Decode for VarInt {
	fn decode<B: bytes::Buf>(r: &mut B) -> Result<Self, DecodeError> {
		let first = u8::decode(r)?;
		let size = 1usize << (first >> 6);

		if r.remaining() < size - 1 {
			return Err(DecodeError::Short);
		}

		let mut value = u64::from(first & 0b0011_1111);
		for _ in 1..size {
			value = (value << 8) | u64::from(r.get_u8());
		}

		Ok(Self(value))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn encode(v: VarInt) -> Vec<u8> {
		let mut buf = Vec::new();
		v.encode(&mut buf);
		buf
	}

	#[test]
	fn boundaries() {
		assert_eq!(encode(VarInt::from(63u8)), [0x3f]);
		assert_eq!(encode(VarInt::from(64u8)), [0x40, 0x40]);
		assert_eq!(encode(VarInt::from(16383u16)), [0x7f, 0xff]);
		assert_eq!(encode(VarInt::from(16384u16)), [0x80, 0x00, 0x40, 0x00]);
		assert_eq!(encode(VarInt::MAX).len(), 8);
	}

	#[test]
	fn decode_rfc_samples() {
		// Samples from RFC 9000, appendix A.1.
		let mut buf = &[0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c][..];
		assert_eq!(VarInt::decode(&mut buf).unwrap().into_inner(), 151_288_809_941_952_652);

		let mut buf = &[0x9d, 0x7f, 0x3e, 0x7d][..];
		assert_eq!(VarInt::decode(&mut buf).unwrap().into_inner(), 494_878_333);

		let mut buf = &[0x7b, 0xbd][..];
		assert_eq!(VarInt::decode(&mut buf).unwrap().into_inner(), 15_293);

		let mut buf = &[0x25][..];
		assert_eq!(VarInt::decode(&mut buf).unwrap().into_inner(), 37);
	}

	#[test]
	fn short() {
		let mut buf = &[0x80, 0x00][..];
		assert_eq!(VarInt::decode(&mut buf), Err(DecodeError::Short));

		let mut buf: &[u8] = &[];
		assert_eq!(VarInt::decode(&mut buf), Err(DecodeError::Short));
	}

	#[test]
	fn too_large() {
		assert_eq!(VarInt::try_from(1u64 << 62), Err(BoundsExceeded));
	}
}
