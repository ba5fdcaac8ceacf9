use std::sync::Arc;

use prost::Message;

use super::proto;
use crate::{Config, Converter, Decoder, Error, Event, Payload, Result};

/// The protobuf encoding.
///
/// A single event is encoded as an `Event` message, a batch as one `EventBatch`
/// message. Batches fail as a unit: one invalid event fails the whole batch.
#[derive(Debug, Clone, Default)]
pub struct Protobuf {
	config: Arc<Config>,
}

impl Protobuf {
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	fn message(&self, event: &Event) -> Result<proto::Event> {
		event.validate()?;

		let event = self.config.include.apply(event);
		Ok(proto::Event::from(&*event))
	}
}

impl Converter for Protobuf {
	fn name(&self) -> &str {
		"protobuf"
	}

	fn convert(&self, event: &Event) -> Result<Payload> {
		let message = self.message(event)?;
		Ok(Payload::new(message.encode_to_vec(), self.config.component_id(event)))
	}

	fn convert_batch(&self, events: &[Event]) -> Result<Vec<Result<Payload>>> {
		let events = events
			.iter()
			.enumerate()
			.map(|(index, event)| {
				self.message(event).map_err(|err| Error::Batch {
					index,
					source: Box::new(err),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let component_id = match self.config.component_id {
			Some(id) => id,
			None => events
				.first()
				.and_then(|event| u32::try_from(event.component_id).ok())
				.unwrap_or_default(),
		};

		let batch = proto::EventBatch { events };
		Ok(vec![Ok(Payload::new(batch.encode_to_vec(), component_id))])
	}
}

impl Decoder for Protobuf {
	fn decode(&self, buffer: &[u8]) -> Result<Event> {
		let message = proto::Event::decode(buffer)?;
		let event = Event::try_from(message)?;
		event.validate()?;

		Ok(event)
	}

	fn decode_batch(&self, buffer: &[u8]) -> Result<Vec<Event>> {
		let batch = proto::EventBatch::decode(buffer)?;
		batch
			.events
			.into_iter()
			.map(|message| {
				let event = Event::try_from(message)?;
				event.validate()?;
				Ok(event)
			})
			.collect()
	}
}
