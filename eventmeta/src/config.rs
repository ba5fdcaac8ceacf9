use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AnalyticsStatus, Embedding, Event, Pose, Result, Signature};

fn default_version() -> String {
	"1.0".to_string()
}

/// Static configuration shared by the built-in converters.
///
/// Loaded once at startup and never modified afterwards; converters hold it behind an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// The schema version stamped into JSON payloads.
	pub version: String,

	/// Overrides the component id of every payload when set.
	pub component_id: Option<u32>,

	/// Which optional parts of an event are converted.
	pub include: Include,

	/// Sensor descriptions, keyed by sensor id.
	pub sensors: BTreeMap<String, Sensor>,

	/// Place descriptions, keyed by place id.
	pub places: BTreeMap<String, Place>,

	/// Analytics module descriptions, keyed by module id.
	pub modules: BTreeMap<String, Module>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			version: default_version(),
			component_id: None,
			include: Include::default(),
			sensors: BTreeMap::new(),
			places: BTreeMap::new(),
			modules: BTreeMap::new(),
		}
	}
}

impl Config {
	/// Parse the configuration from TOML.
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(s: &str) -> Result<Self> {
		Ok(toml::from_str(s)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_str(&content)
	}

	pub fn sensor(&self, id: i32) -> Option<&Sensor> {
		self.sensors.get(&id.to_string())
	}

	pub fn place(&self, id: i32) -> Option<&Place> {
		self.places.get(&id.to_string())
	}

	pub fn module(&self, id: i32) -> Option<&Module> {
		self.modules.get(&id.to_string())
	}

	/// The component id a payload for this event should carry.
	///
	/// Negative ids in the event can't be represented and fall back to zero.
	pub fn component_id(&self, event: &Event) -> u32 {
		self.component_id
			.unwrap_or_else(|| u32::try_from(event.component_id).unwrap_or_default())
	}
}

/// The field inclusion policy; everything is included by default.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Include {
	pub analytics: bool,
	pub pose: bool,
	pub embedding: bool,
	pub signature: bool,
	pub extension: bool,
}

impl Default for Include {
	fn default() -> Self {
		Self {
			analytics: true,
			pose: true,
			embedding: true,
			signature: true,
			extension: true,
		}
	}
}

impl Include {
	pub fn all(&self) -> bool {
		*self == Self::default()
	}

	/// Strip the excluded parts from an event, borrowing when nothing is excluded.
	pub fn apply<'a>(&self, event: &'a Event) -> Cow<'a, Event> {
		if self.all() {
			return Cow::Borrowed(event);
		}

		let mut event = event.clone();
		if !self.analytics {
			event.analytics = AnalyticsStatus::default();
		}
		if !self.pose {
			event.pose = Pose::default();
		}
		if !self.embedding {
			event.embedding = Embedding::default();
		}
		if !self.signature {
			event.signature = Signature::default();
		}
		if !self.extension {
			event.extension = None;
		}

		Cow::Owned(event)
	}
}

/// A sensor description merged into the full JSON payload.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Sensor {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub description: Option<String>,
	pub location: Option<crate::GeoLocation>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Place {
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub location: Option<crate::GeoLocation>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Module {
	pub description: Option<String>,
	pub source: Option<String>,
	pub version: Option<String>,
}
