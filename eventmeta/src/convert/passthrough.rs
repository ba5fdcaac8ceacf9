use bytes::Bytes;

use crate::{Converter, Decoder, Error, Event, ObjectKind, ObjectVariant, Payload, Result};

/// A custom converter that forwards the buffer of a custom object untouched.
///
/// Only objects with the configured tag are accepted. Everything else is reported
/// as a malformed custom buffer, including an empty buffer.
#[derive(Debug, Clone)]
pub struct Passthrough {
	tag: u32,
}

impl Passthrough {
	pub fn new(tag: u32) -> Result<Self> {
		ObjectKind::check_custom(tag)?;
		Ok(Self { tag })
	}

	pub fn tag(&self) -> u32 {
		self.tag
	}
}

impl Converter for Passthrough {
	fn name(&self) -> &str {
		"passthrough"
	}

	fn convert(&self, event: &Event) -> Result<Payload> {
		let data = match &event.object {
			ObjectVariant::Custom { tag, data } if *tag == self.tag => data,
			object => {
				return Err(Error::MalformedCustomBuffer {
					tag: self.tag,
					reason: format!("expected custom object, found {}", object.kind()),
				})
			}
		};

		if data.is_empty() {
			return Err(Error::MalformedCustomBuffer {
				tag: self.tag,
				reason: "empty buffer".to_string(),
			});
		}

		let component_id = u32::try_from(event.component_id).unwrap_or_default();
		Ok(Payload::new(data.clone(), component_id))
	}
}

impl Decoder for Passthrough {
	fn decode(&self, buffer: &[u8]) -> Result<Event> {
		let object = ObjectVariant::custom(self.tag, Bytes::copy_from_slice(buffer))?;
		Ok(Event::from(object))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::EventKind;

	#[test]
	fn forwards_buffer() {
		let converter = Passthrough::new(0x150).unwrap();

		let mut event = Event::new(EventKind::Moving, ObjectVariant::custom(0x150, vec![0xaa, 0xbb]).unwrap());
		event.component_id = 2;

		let payload = converter.convert(&event).unwrap();
		assert_eq!(payload.as_slice(), &[0xaa, 0xbb]);
		assert_eq!(payload.component_id, 2);

		let decoded = converter.decode(payload.as_slice()).unwrap();
		assert_eq!(decoded.object, event.object);
	}

	#[test]
	fn malformed() {
		let converter = Passthrough::new(0x150).unwrap();

		let other = Event::from(ObjectVariant::custom(0x151, vec![1]).unwrap());
		assert!(matches!(
			converter.convert(&other),
			Err(Error::MalformedCustomBuffer { tag: 0x150, .. })
		));

		let empty = Event::from(ObjectVariant::custom(0x150, Bytes::new()).unwrap());
		assert!(matches!(converter.convert(&empty), Err(Error::MalformedCustomBuffer { .. })));

		let bag = Event::from(ObjectVariant::Bag);
		assert!(converter.convert(&bag).is_err());
	}

	#[test]
	fn batch_keeps_siblings() {
		let converter = Passthrough::new(0x150).unwrap();
		let events = [
			Event::from(ObjectVariant::custom(0x150, vec![1]).unwrap()),
			Event::from(ObjectVariant::Bag),
			Event::from(ObjectVariant::custom(0x150, vec![2]).unwrap()),
		];

		let payloads = converter.convert_batch(&events).unwrap();
		assert_eq!(payloads[0].as_ref().unwrap().as_slice(), &[1]);
		assert!(matches!(payloads[1], Err(Error::MalformedCustomBuffer { .. })));
		assert_eq!(payloads[2].as_ref().unwrap().as_slice(), &[2]);
	}

	#[test]
	fn reserved_tag() {
		assert!(matches!(Passthrough::new(0x102), Err(Error::ReservedKind(0x102))));
	}
}
