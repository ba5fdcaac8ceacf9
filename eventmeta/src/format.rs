use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Identifies the wire format a converter produces.
///
/// `0..=2` are built in, `0x100` and above are custom. Everything in between is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadFormat {
	/// Full JSON encoding of every populated field.
	DeepStream,

	/// Reduced JSON encoding without descriptive strings or masks.
	DeepStreamMinimal,

	/// Protobuf encoding with a fixed schema.
	DeepStreamProtobuf,

	/// A caller defined format, served by a registered custom converter.
	Custom(u32),
}

impl PayloadFormat {
	/// Custom formats must use this value or higher.
	pub const RESERVED: u32 = 0x100;
	/// The conventional id for a single custom format.
	pub const CUSTOM: u32 = 0x101;

	/// The built-in formats, in id order.
	pub const BUILTIN: [Self; 3] = [Self::DeepStream, Self::DeepStreamMinimal, Self::DeepStreamProtobuf];

	/// Create a custom format, validating the tag.
	pub fn custom(tag: u32) -> Result<Self> {
		match tag >= Self::RESERVED {
			true => Ok(Self::Custom(tag)),
			false => Err(Error::ReservedFormat(tag)),
		}
	}

	pub fn value(self) -> u32 {
		match self {
			Self::DeepStream => 0,
			Self::DeepStreamMinimal => 1,
			Self::DeepStreamProtobuf => 2,
			Self::Custom(tag) => tag,
		}
	}
}

impl TryFrom<u32> for PayloadFormat {
	type Error = Error;

	fn try_from(value: u32) -> Result<Self> {
		match value {
			0 => Ok(Self::DeepStream),
			1 => Ok(Self::DeepStreamMinimal),
			2 => Ok(Self::DeepStreamProtobuf),
			tag => Self::custom(tag),
		}
	}
}

impl From<PayloadFormat> for u32 {
	fn from(format: PayloadFormat) -> Self {
		format.value()
	}
}

impl fmt::Display for PayloadFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DeepStream => write!(f, "deepstream"),
			Self::DeepStreamMinimal => write!(f, "minimal"),
			Self::DeepStreamProtobuf => write!(f, "protobuf"),
			Self::Custom(tag) => write!(f, "{tag:#x}"),
		}
	}
}

impl FromStr for PayloadFormat {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"deepstream" => Ok(Self::DeepStream),
			"minimal" | "deepstream-minimal" => Ok(Self::DeepStreamMinimal),
			"protobuf" | "deepstream-protobuf" => Ok(Self::DeepStreamProtobuf),
			other => match parse_tag(other) {
				Some(value) => Self::try_from(value),
				None => Err(Error::InvalidName(s.to_string())),
			},
		}
	}
}

/// Parse a tag written either in decimal or as `0x` prefixed hex.
pub(crate) fn parse_tag(s: &str) -> Option<u32> {
	match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => u32::from_str_radix(hex, 16).ok(),
		None => s.parse().ok(),
	}
}
