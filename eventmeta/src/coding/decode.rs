use super::VarInt;

pub trait Decode: Sized {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError>;
}

/// A decode error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
	#[error("short buffer")]
	Short,

	#[error("bounds exceeded")]
	BoundsExceeded,
}

impl Decode for u8 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match buf.has_remaining() {
			true => Ok(buf.get_u8()),
			false => Err(DecodeError::Short),
		}
	}
}

impl Decode for u32 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let v = VarInt::decode(buf)?;
		v.into_inner().try_into().map_err(|_| DecodeError::BoundsExceeded)
	}
}

impl Decode for usize {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let v = VarInt::decode(buf)?;
		v.into_inner().try_into().map_err(|_| DecodeError::BoundsExceeded)
	}
}

impl Decode for bytes::Bytes {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let size = usize::decode(buf)?;
		if buf.remaining() < size {
			return Err(DecodeError::Short);
		}

		Ok(buf.copy_to_bytes(size))
	}
}

impl<T: Decode> Decode for Vec<T> {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let count = usize::decode(buf)?;

		// Don't trust the count for the allocation; each item is at least one byte.
		let mut items = Vec::with_capacity(count.min(buf.remaining()));
		for _ in 0..count {
			items.push(T::decode(buf)?);
		}

		Ok(items)
	}
}
