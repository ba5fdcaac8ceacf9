use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Config, Converter, Decoder, Event, Module, Payload, Place, Result, Sensor};

/// The full JSON encoding.
///
/// Every populated field is written, along with any sensor, place and module
/// descriptions found in the configuration.
#[derive(Debug, Clone, Default)]
pub struct DeepStream {
	config: Arc<Config>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Message<'a> {
	version: &'a str,
	sensor: Option<&'a Sensor>,
	place: Option<&'a Place>,
	analytics_module: Option<&'a Module>,

	#[serde(flatten)]
	event: &'a Event,
}

// Descriptions are informational and dropped when decoding.
#[derive(Deserialize)]
struct Received {
	#[allow(dead_code)]
	version: Option<String>,

	#[serde(flatten)]
	event: Event,
}

impl DeepStream {
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	fn encode(&self, event: &Event) -> Result<Vec<u8>> {
		event.validate()?;

		let event = self.config.include.apply(event);
		let message = Message {
			version: &self.config.version,
			sensor: self.config.sensor(event.sensor_id),
			place: self.config.place(event.place_id),
			analytics_module: self.config.module(event.module_id),
			event: &event,
		};

		Ok(serde_json::to_vec(&message)?)
	}
}

impl Converter for DeepStream {
	fn name(&self) -> &str {
		"deepstream"
	}

	fn convert(&self, event: &Event) -> Result<Payload> {
		let buffer = self.encode(event)?;
		Ok(Payload::new(buffer, self.config.component_id(event)))
	}
}

impl Decoder for DeepStream {
	fn decode(&self, buffer: &[u8]) -> Result<Event> {
		let received: Received = serde_json::from_slice(buffer)?;
		received.event.validate()?;

		Ok(received.event)
	}
}
