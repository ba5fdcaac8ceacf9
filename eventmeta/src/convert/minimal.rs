use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, DisplayFromStr};

use crate::{
	AnalyticsStatus, Config, Converter, Coordinate, Decoder, Embedding, Event, EventKind, GeoLocation, ObjectKind,
	ObjectVariant, Payload, Pose, Rect, Result, Signature,
};

/// A reduced JSON encoding for bandwidth constrained consumers.
///
/// Descriptive strings and masks are dropped: objects are reduced to their numeric
/// kind, the age when the kind has one, and the buffer of a custom object.
#[derive(Debug, Clone, Default)]
pub struct Minimal {
	config: Arc<Config>,
}

#[serde_with::serde_as]
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
struct Object {
	kind: u32,
	age: Option<u32>,
	#[serde_as(as = "Option<Hex>")]
	data: Option<Bytes>,
}

impl Object {
	fn encode(object: &ObjectVariant) -> Option<Self> {
		let age = match object {
			ObjectVariant::Person(person) => Some(person.age),
			ObjectVariant::PersonExt(person) => Some(person.attrs.age),
			ObjectVariant::Face(face) => Some(face.age),
			ObjectVariant::FaceExt(face) => Some(face.attrs.age),
			ObjectVariant::Unknown(_) => return None,
			_ => None,
		};

		Some(Self {
			kind: object.kind().value(),
			age,
			data: object.raw().ok().cloned(),
		})
	}

	fn decode(self) -> Result<ObjectVariant> {
		let kind = ObjectKind::try_from(self.kind)?;

		let mut object = match (kind, self.data) {
			(ObjectKind::Custom(tag), Some(data)) => ObjectVariant::custom(tag, data)?,
			_ => ObjectVariant::empty(kind),
		};

		if let Some(age) = self.age {
			match &mut object {
				ObjectVariant::Person(person) => person.age = age,
				ObjectVariant::PersonExt(person) => person.attrs.age = age,
				ObjectVariant::Face(face) => face.age = age,
				ObjectVariant::FaceExt(face) => face.attrs.age = age,
				_ => {}
			}
		}

		Ok(object)
	}
}

#[serde_with::serde_as]
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
struct Message {
	version: Option<String>,

	#[serde(rename = "type")]
	#[serde_as(as = "DisplayFromStr")]
	kind: EventKind,

	object: Option<Object>,

	bbox: Rect,
	location: GeoLocation,
	coordinate: Coordinate,

	#[serde(skip_serializing_if = "Signature::is_empty")]
	signature: Signature,

	class_id: i32,
	sensor_id: i32,
	module_id: i32,
	place_id: i32,
	component_id: i32,
	frame_id: i32,
	confidence: f64,
	tracking_id: u64,

	timestamp: Option<String>,
	object_id: Option<String>,
	sensor_str: Option<String>,

	#[serde_as(as = "Option<Hex>")]
	extension: Option<Bytes>,

	#[serde(skip_serializing_if = "Pose::is_empty")]
	pose: Pose,

	#[serde(skip_serializing_if = "Embedding::is_empty")]
	embedding: Embedding,

	#[serde(skip_serializing_if = "AnalyticsStatus::is_default")]
	analytics: AnalyticsStatus,
}

impl Minimal {
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	fn message(&self, event: &Event) -> Message {
		let event = self.config.include.apply(event);

		Message {
			version: Some(self.config.version.clone()),
			kind: event.kind,
			object: Object::encode(&event.object),
			bbox: event.bbox,
			location: event.location,
			coordinate: event.coordinate,
			signature: event.signature.clone(),
			class_id: event.class_id,
			sensor_id: event.sensor_id,
			module_id: event.module_id,
			place_id: event.place_id,
			component_id: event.component_id,
			frame_id: event.frame_id,
			confidence: event.confidence,
			tracking_id: event.tracking_id,
			timestamp: event.timestamp.clone(),
			object_id: event.object_id.clone(),
			sensor_str: event.sensor_str.clone(),
			extension: event.extension.clone(),
			pose: event.pose.clone(),
			embedding: event.embedding.clone(),
			analytics: event.analytics.clone(),
		}
	}
}

impl Converter for Minimal {
	fn name(&self) -> &str {
		"minimal"
	}

	fn convert(&self, event: &Event) -> Result<Payload> {
		event.validate()?;

		let buffer = serde_json::to_vec(&self.message(event))?;
		Ok(Payload::new(buffer, self.config.component_id(event)))
	}
}

impl Decoder for Minimal {
	fn decode(&self, buffer: &[u8]) -> Result<Event> {
		let message: Message = serde_json::from_slice(buffer)?;

		let object = match message.object {
			Some(object) => object.decode()?,
			None => ObjectVariant::default(),
		};

		let event = Event {
			kind: message.kind,
			object,
			bbox: message.bbox,
			location: message.location,
			coordinate: message.coordinate,
			signature: message.signature,
			class_id: message.class_id,
			sensor_id: message.sensor_id,
			module_id: message.module_id,
			place_id: message.place_id,
			component_id: message.component_id,
			frame_id: message.frame_id,
			confidence: message.confidence,
			tracking_id: message.tracking_id,
			timestamp: message.timestamp,
			object_id: message.object_id,
			sensor_str: message.sensor_str,
			extension: message.extension,
			pose: message.pose,
			embedding: message.embedding,
			analytics: message.analytics,
			..Default::default()
		};
		event.validate()?;

		Ok(event)
	}
}
