use std::sync::Arc;

use crate::{ObjectKind, PayloadFormat};

/// Error types for event metadata conversion.
///
/// This enum represents everything that can go wrong while building, validating,
/// converting, or decoding events.
#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
	/// An object variant was accessed as the wrong kind.
	#[error("type mismatch: expected {expected}, found {actual}")]
	TypeMismatch { expected: &'static str, actual: ObjectKind },

	/// No converter is registered for the requested format.
	#[error("unknown format: {0}")]
	UnknownFormat(PayloadFormat),

	/// A converter is already registered for the format.
	#[error("duplicate format: {0}")]
	DuplicateFormat(PayloadFormat),

	/// A custom converter could not interpret an opaque buffer.
	#[error("malformed custom buffer (tag {tag:#x}): {reason}")]
	MalformedCustomBuffer { tag: u32, reason: String },

	/// An event inside a batch failed, failing the whole batch.
	#[error("event {index}: {source}")]
	Batch { index: usize, source: Box<Error> },

	/// The payload format id falls in the reserved range.
	#[error("reserved format: {0:#x}")]
	ReservedFormat(u32),

	/// A custom event or object tag collides with a reserved value.
	#[error("reserved kind: {0:#x}")]
	ReservedKind(u32),

	/// The numeric kind is not assigned.
	#[error("invalid kind: {0:#x}")]
	InvalidKind(u32),

	/// The name could not be parsed.
	#[error("invalid name: {0}")]
	InvalidName(String),

	/// The plugin name does not follow `<prefix>_<tag>`.
	#[error("invalid plugin name: {0}")]
	InvalidPluginName(String),

	/// More lanes than the lane array can hold.
	#[error("invalid lane count: {0}")]
	InvalidLaneCount(usize),

	/// A lane slot inside the count still holds the sentinel.
	#[error("lane {0} was counted but never populated")]
	UnpopulatedLane(usize),

	/// A lane number was negative.
	#[error("invalid lane number: {0}")]
	InvalidLane(i32),

	/// A reverse lane was set without the reverse-drive flag.
	#[error("reverse lane {0} set without reverse drive")]
	StrayReverseLane(i32),

	/// The confidence is NaN or infinite.
	#[error("invalid confidence: {0}")]
	InvalidConfidence(f64),

	/// JSON serialization/deserialization error.
	#[error("json error: {0}")]
	Json(Arc<serde_json::Error>),

	/// Protobuf decoding error.
	#[error("protobuf error: {0}")]
	Protobuf(#[from] prost::DecodeError),

	/// Configuration parsing error.
	#[error("toml error: {0}")]
	Toml(Arc<toml::de::Error>),

	/// Failed to read a file.
	#[error("io error: {0}")]
	Io(Arc<std::io::Error>),

	/// Failed to decode a framed payload.
	#[error("decode error: {0}")]
	Decode(#[from] crate::coding::DecodeError),
}

/// A Result type alias for eventmeta operations.
///
/// This is used throughout the crate as a convenient shorthand
/// for `std::result::Result<T, eventmeta::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

// Wrap in an Arc so it is Clone
impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Json(Arc::new(err))
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::Toml(Arc::new(err))
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(Arc::new(err))
	}
}
