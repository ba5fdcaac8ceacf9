use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, DisplayFromStr};

use crate::{
	format::parse_tag, AnalyticsStatus, Coordinate, Embedding, Error, GeoLocation, ObjectVariant, Pose, Rect, Result,
	Signature,
};

/// What happened to the object.
///
/// The numeric values are stable. Custom events use values from [EventKind::RESERVED]
/// upwards, except for [EventKind::FRAME_ANALYSIS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
	#[default]
	Entry,
	Exit,
	Moving,
	Stopped,
	Empty,
	Parked,
	Reset,
	Custom(u32),
	FrameAnalysis,
}

impl EventKind {
	pub const RESERVED: u32 = 0x100;
	/// The conventional tag for a single custom event type.
	pub const CUSTOM: u32 = 0x101;
	pub const FRAME_ANALYSIS: u32 = 0x102;

	pub fn value(self) -> u32 {
		match self {
			Self::Entry => 0,
			Self::Exit => 1,
			Self::Moving => 2,
			Self::Stopped => 3,
			Self::Empty => 4,
			Self::Parked => 5,
			Self::Reset => 6,
			Self::Custom(tag) => tag,
			Self::FrameAnalysis => Self::FRAME_ANALYSIS,
		}
	}

	/// Make sure a tag can be used for a custom event.
	pub fn check_custom(tag: u32) -> Result<()> {
		match tag {
			Self::FRAME_ANALYSIS => Err(Error::ReservedKind(tag)),
			tag if tag < Self::RESERVED => Err(Error::ReservedKind(tag)),
			_ => Ok(()),
		}
	}
}

impl TryFrom<u32> for EventKind {
	type Error = Error;

	fn try_from(value: u32) -> Result<Self> {
		Ok(match value {
			0 => Self::Entry,
			1 => Self::Exit,
			2 => Self::Moving,
			3 => Self::Stopped,
			4 => Self::Empty,
			5 => Self::Parked,
			6 => Self::Reset,
			Self::FRAME_ANALYSIS => Self::FrameAnalysis,
			tag if tag >= Self::RESERVED => Self::Custom(tag),
			_ => return Err(Error::InvalidKind(value)),
		})
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Entry => write!(f, "ENTRY"),
			Self::Exit => write!(f, "EXIT"),
			Self::Moving => write!(f, "MOVING"),
			Self::Stopped => write!(f, "STOPPED"),
			Self::Empty => write!(f, "EMPTY"),
			Self::Parked => write!(f, "PARKED"),
			Self::Reset => write!(f, "RESET"),
			Self::Custom(tag) => write!(f, "CUSTOM:{tag:#x}"),
			Self::FrameAnalysis => write!(f, "FRAME_ANALYSIS"),
		}
	}
}

impl FromStr for EventKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s {
			"ENTRY" => Self::Entry,
			"EXIT" => Self::Exit,
			"MOVING" => Self::Moving,
			"STOPPED" => Self::Stopped,
			"EMPTY" => Self::Empty,
			"PARKED" => Self::Parked,
			"RESET" => Self::Reset,
			"FRAME_ANALYSIS" => Self::FrameAnalysis,
			"CUSTOM" => Self::Custom(Self::CUSTOM),
			_ => {
				let tag = s
					.strip_prefix("CUSTOM:")
					.and_then(parse_tag)
					.ok_or_else(|| Error::InvalidName(s.to_string()))?;
				Self::check_custom(tag)?;
				Self::Custom(tag)
			}
		})
	}
}

/// A single analytics event: the unit handed to a converter.
///
/// The event is built by the producer and only borrowed during conversion.
/// Optional strings are `None` when not collected, which is distinct from an empty string.
#[serde_with::serde_as]
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
	/// The kind of event.
	#[serde(rename = "type")]
	#[serde_as(as = "DisplayFromStr")]
	pub kind: EventKind,

	/// The object the event is about.
	#[serde(skip_serializing_if = "ObjectVariant::is_unknown")]
	pub object: ObjectVariant,

	/// The object's bounding box.
	pub bbox: Rect,
	pub location: GeoLocation,
	pub coordinate: Coordinate,

	#[serde(skip_serializing_if = "Signature::is_empty")]
	pub signature: Signature,

	pub class_id: i32,

	/// The sensor that generated the event.
	pub sensor_id: i32,

	/// The analytics module that generated the event.
	pub module_id: i32,
	pub place_id: i32,

	/// The component that generated the event; becomes the payload's source.
	pub component_id: i32,
	pub frame_id: i32,

	/// The inference confidence, usually from 0 to 1 but not clamped.
	pub confidence: f64,

	/// Stable across frames for the same tracked object.
	pub tracking_id: u64,

	pub timestamp: Option<String>,
	pub object_id: Option<String>,
	pub sensor_str: Option<String>,
	pub other_attrs: Option<String>,
	pub video_path: Option<String>,

	/// Caller defined data, only understood by a matching custom converter.
	#[serde_as(as = "Option<Hex>")]
	pub extension: Option<Bytes>,

	#[serde(skip_serializing_if = "Pose::is_empty")]
	pub pose: Pose,

	#[serde(skip_serializing_if = "Embedding::is_empty")]
	pub embedding: Embedding,

	#[serde(skip_serializing_if = "AnalyticsStatus::is_default")]
	pub analytics: AnalyticsStatus,
}

impl Event {
	pub fn new(kind: EventKind, object: impl Into<ObjectVariant>) -> Self {
		Self {
			kind,
			object: object.into(),
			..Default::default()
		}
	}

	/// Parse an event from its JSON representation.
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(s: &str) -> Result<Self> {
		Ok(serde_json::from_str(s)?)
	}

	/// Parse an event from a slice of bytes.
	pub fn from_slice(v: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(v)?)
	}

	/// Parse an event from a reader.
	pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
		Ok(serde_json::from_reader(reader)?)
	}

	/// Serialize the event to a JSON string.
	pub fn to_string(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Serialize the event to a pretty JSON string.
	pub fn to_string_pretty(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Check the event before conversion.
	///
	/// Confidence is not clamped; only values that can't be encoded are rejected.
	pub fn validate(&self) -> Result<()> {
		if let EventKind::Custom(tag) = self.kind {
			EventKind::check_custom(tag)?;
		}

		if !self.confidence.is_finite() {
			return Err(Error::InvalidConfidence(self.confidence));
		}

		if !(0.0..=1.0).contains(&self.confidence) {
			tracing::debug!(confidence = self.confidence, tracking_id = self.tracking_id, "confidence out of range");
		}

		self.object.validate()?;
		self.analytics.validate()?;

		Ok(())
	}
}

impl From<ObjectVariant> for Event {
	fn from(object: ObjectVariant) -> Self {
		Self {
			object,
			..Default::default()
		}
	}
}
