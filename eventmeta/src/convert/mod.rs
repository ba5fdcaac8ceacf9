//! Converters turn an [Event] into a [Payload] for one wire format.
//!
//! The built-in converters each come with a matching [Decoder], which is how the
//! payloads are inspected and how the conversions are tested.

mod deepstream;
mod minimal;
mod passthrough;
mod proto;
mod protobuf;

pub use deepstream::*;
pub use minimal::*;
pub use passthrough::*;
pub use protobuf::*;

use crate::{Event, Payload, Result};

/// A pluggable implementation of a single wire format.
///
/// Converters are shared between threads and must not keep references to the
/// events they are given.
pub trait Converter: Send + Sync {
	/// A short name used in logs.
	fn name(&self) -> &str;

	/// Convert a single event.
	fn convert(&self, event: &Event) -> Result<Payload>;

	/// Convert a batch of events.
	///
	/// The default produces one payload per event, keeping per-event failures in place
	/// so a bad event doesn't drop its siblings. Formats that encode the whole batch as
	/// a single message override this and fail as a unit.
	fn convert_batch(&self, events: &[Event]) -> Result<Vec<Result<Payload>>> {
		Ok(events.iter().map(|event| self.convert(event)).collect())
	}
}

/// The inverse of a [Converter], for formats that can be read back.
pub trait Decoder {
	fn decode(&self, buffer: &[u8]) -> Result<Event>;

	/// Decode a payload produced by [Converter::convert_batch].
	fn decode_batch(&self, buffer: &[u8]) -> Result<Vec<Event>> {
		Ok(vec![self.decode(buffer)?])
	}
}
