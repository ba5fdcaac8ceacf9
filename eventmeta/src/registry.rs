use std::collections::{hash_map, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::convert::{DeepStream, Minimal, Protobuf};
use crate::{Config, Converter, Error, Event, Payload, PayloadFormat, Result};

/// Binds payload formats to converters.
///
/// Converters are registered once at startup with `&mut self`, after which the registry
/// is typically wrapped in an `Arc` and shared. Conversion only needs `&self`, so
/// registration can never race a conversion.
#[derive(Clone, Default)]
pub struct Registry {
	converters: HashMap<PayloadFormat, Arc<dyn Converter>>,
}

impl Registry {
	/// An empty registry, without even the built-in converters.
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry with the built-in converters sharing the given configuration.
	pub fn with_defaults(config: Config) -> Self {
		let config = Arc::new(config);

		let mut converters: HashMap<PayloadFormat, Arc<dyn Converter>> = HashMap::new();
		converters.insert(PayloadFormat::DeepStream, Arc::new(DeepStream::new(config.clone())));
		converters.insert(PayloadFormat::DeepStreamMinimal, Arc::new(Minimal::new(config.clone())));
		converters.insert(PayloadFormat::DeepStreamProtobuf, Arc::new(Protobuf::new(config)));

		Self { converters }
	}

	/// Bind a converter to a format.
	///
	/// Fails if the format is already bound, leaving the original converter in place.
	/// A `Custom` format carrying a built-in id is that built-in; a reserved id fails.
	pub fn register<C: Converter + 'static>(&mut self, format: PayloadFormat, converter: C) -> Result<()> {
		let format = canonical(format)?;

		match self.converters.entry(format) {
			hash_map::Entry::Occupied(_) => Err(Error::DuplicateFormat(format)),
			hash_map::Entry::Vacant(entry) => {
				tracing::debug!(%format, converter = converter.name(), "registered converter");
				entry.insert(Arc::new(converter));
				Ok(())
			}
		}
	}

	/// Bind a converter to a format, returning the converter it displaced.
	pub fn replace<C: Converter + 'static>(
		&mut self,
		format: PayloadFormat,
		converter: C,
	) -> Result<Option<Arc<dyn Converter>>> {
		let format = canonical(format)?;

		tracing::debug!(%format, converter = converter.name(), "replaced converter");
		Ok(self.converters.insert(format, Arc::new(converter)))
	}

	/// Register a custom converter named `<prefix>_<tag>`.
	///
	/// The tag is decimal or `0x` prefixed hex and must be outside the reserved range.
	/// Returns the format the converter was bound to.
	pub fn register_plugin<C: Converter + 'static>(&mut self, name: &str, converter: C) -> Result<PayloadFormat> {
		let format = parse_plugin_name(name)?;
		self.register(format, converter)?;
		Ok(format)
	}

	pub fn get(&self, format: PayloadFormat) -> Option<Arc<dyn Converter>> {
		let format = canonical(format).ok()?;
		self.converters.get(&format).cloned()
	}

	/// The bound formats, in id order.
	pub fn formats(&self) -> Vec<PayloadFormat> {
		let mut formats: Vec<_> = self.converters.keys().copied().collect();
		formats.sort();
		formats
	}

	fn converter(&self, format: PayloadFormat) -> Result<&dyn Converter> {
		canonical(format)
			.ok()
			.and_then(|canonical| self.converters.get(&canonical))
			.map(|converter| converter.as_ref())
			.ok_or(Error::UnknownFormat(format))
	}

	/// Convert a single event with the converter bound to `format`.
	pub fn convert(&self, format: PayloadFormat, event: &Event) -> Result<Payload> {
		let converter = self.converter(format)?;
		tracing::trace!(%format, kind = %event.kind, tracking_id = event.tracking_id, "converting event");

		converter.convert(event)
	}

	/// Convert a batch of events with the converter bound to `format`.
	///
	/// Whether a bad event fails the whole batch or only its own payload depends on the format.
	pub fn convert_batch(&self, format: PayloadFormat, events: &[Event]) -> Result<Vec<Result<Payload>>> {
		let converter = self.converter(format)?;
		tracing::trace!(%format, count = events.len(), "converting batch");

		let payloads = converter.convert_batch(events)?;
		for (index, payload) in payloads.iter().enumerate() {
			if let Err(err) = payload {
				tracing::warn!(%format, index, %err, "failed to convert event");
			}
		}

		Ok(payloads)
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut map = f.debug_map();
		for format in self.formats() {
			if let Some(converter) = self.converters.get(&format) {
				map.entry(&format, &converter.name());
			}
		}
		map.finish()
	}
}

// Custom(1) and DeepStreamMinimal must share a slot, and reserved ids get none.
fn canonical(format: PayloadFormat) -> Result<PayloadFormat> {
	PayloadFormat::try_from(format.value())
}

fn parse_plugin_name(name: &str) -> Result<PayloadFormat> {
	let invalid = || Error::InvalidPluginName(name.to_string());

	let (prefix, tag) = name.rsplit_once('_').ok_or_else(invalid)?;
	if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err(invalid());
	}

	let tag = crate::format::parse_tag(tag).ok_or_else(invalid)?;
	PayloadFormat::custom(tag)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::convert::Passthrough;
	use crate::{EventKind, ObjectVariant};

	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Default)]
	struct Counting {
		calls: Arc<AtomicUsize>,
	}

	impl Converter for Counting {
		fn name(&self) -> &str {
			"counting"
		}

		fn convert(&self, _event: &Event) -> Result<Payload> {
			self.calls.fetch_add(1, Ordering::Relaxed);
			Ok(Payload::new(&b"counted"[..], 0))
		}
	}

	#[test]
	fn defaults() {
		let registry = Registry::with_defaults(Config::default());
		assert_eq!(registry.formats(), PayloadFormat::BUILTIN.to_vec());
		assert!(Registry::new().formats().is_empty());
		assert_eq!(
			format!("{registry:?}"),
			r#"{DeepStream: "deepstream", DeepStreamMinimal: "minimal", DeepStreamProtobuf: "protobuf"}"#
		);
	}

	#[test]
	fn duplicate() {
		let mut registry = Registry::with_defaults(Config::default());

		let calls = Arc::new(AtomicUsize::new(0));
		let counting = Counting { calls: calls.clone() };
		assert!(matches!(
			registry.register(PayloadFormat::DeepStream, counting),
			Err(Error::DuplicateFormat(PayloadFormat::DeepStream))
		));

		// The original converter is still bound.
		let payload = registry.convert(PayloadFormat::DeepStream, &Event::default()).unwrap();
		assert!(payload.as_slice().starts_with(b"{"));
		assert_eq!(calls.load(Ordering::Relaxed), 0);
	}

	#[test]
	fn replace() {
		let mut registry = Registry::with_defaults(Config::default());

		let previous = registry.replace(PayloadFormat::DeepStream, Counting::default()).unwrap();
		assert_eq!(previous.unwrap().name(), "deepstream");
		assert_eq!(registry.get(PayloadFormat::DeepStream).unwrap().name(), "counting");

		let previous = registry.replace(PayloadFormat::Custom(0x150), Counting::default()).unwrap();
		assert!(previous.is_none());

		assert!(matches!(
			registry.replace(PayloadFormat::Custom(9), Counting::default()),
			Err(Error::ReservedFormat(9))
		));
		assert_eq!(registry.formats().len(), 4);
	}

	#[test]
	fn builtin_ids_as_custom() {
		let mut registry = Registry::with_defaults(Config::default());

		let calls = Arc::new(AtomicUsize::new(0));
		let counting = Counting { calls: calls.clone() };
		assert!(matches!(
			registry.register(PayloadFormat::Custom(1), counting),
			Err(Error::DuplicateFormat(PayloadFormat::DeepStreamMinimal))
		));
		assert!(matches!(
			registry.register(PayloadFormat::Custom(7), Counting::default()),
			Err(Error::ReservedFormat(7))
		));
		assert!(matches!(
			registry.register(PayloadFormat::Custom(0xff), Counting::default()),
			Err(Error::ReservedFormat(0xff))
		));
		assert_eq!(registry.formats(), PayloadFormat::BUILTIN.to_vec());

		// Lookups by the aliased id reach the built-in converter.
		assert_eq!(registry.get(PayloadFormat::Custom(1)).unwrap().name(), "minimal");
		let event = Event::new(EventKind::Moving, ObjectVariant::Bag);
		registry.convert(PayloadFormat::Custom(2), &event).unwrap();
		assert!(matches!(
			registry.convert(PayloadFormat::Custom(7), &event),
			Err(Error::UnknownFormat(PayloadFormat::Custom(7)))
		));
		assert_eq!(calls.load(Ordering::Relaxed), 0);
	}

	#[test]
	fn unknown_format() {
		let calls = Arc::new(AtomicUsize::new(0));

		let mut registry = Registry::new();
		registry
			.register(PayloadFormat::Custom(0x151), Counting { calls: calls.clone() })
			.unwrap();

		let event = Event::new(EventKind::Moving, ObjectVariant::Bag);
		assert!(matches!(
			registry.convert(PayloadFormat::Custom(0x150), &event),
			Err(Error::UnknownFormat(PayloadFormat::Custom(0x150)))
		));
		assert!(matches!(
			registry.convert_batch(PayloadFormat::DeepStream, &[event]),
			Err(Error::UnknownFormat(PayloadFormat::DeepStream))
		));
		assert_eq!(calls.load(Ordering::Relaxed), 0);
	}

	#[test]
	fn plugin() {
		let mut registry = Registry::new();

		let format = registry
			.register_plugin("passthrough_0x150", Passthrough::new(0x150).unwrap())
			.unwrap();
		assert_eq!(format, PayloadFormat::Custom(0x150));

		let format = registry.register_plugin("my_codec_400", Counting::default()).unwrap();
		assert_eq!(format, PayloadFormat::Custom(400));

		let event = Event::from(ObjectVariant::custom(0x150, vec![0xaa]).unwrap());
		let payload = registry.convert(PayloadFormat::Custom(0x150), &event).unwrap();
		assert_eq!(payload.as_slice(), &[0xaa]);

		assert!(matches!(
			registry.register_plugin("other_336", Counting::default()),
			Err(Error::DuplicateFormat(PayloadFormat::Custom(0x150)))
		));
	}

	#[test]
	fn plugin_names() {
		assert_eq!(parse_plugin_name("acme_0x101").unwrap(), PayloadFormat::Custom(0x101));
		assert_eq!(parse_plugin_name("a_b_512").unwrap(), PayloadFormat::Custom(512));

		for name in ["acme", "_0x150", "acme_", "acme_xyz", "ac-me_0x150", ""] {
			assert!(
				matches!(parse_plugin_name(name), Err(Error::InvalidPluginName(_))),
				"{name}"
			);
		}

		assert!(matches!(parse_plugin_name("acme_2"), Err(Error::ReservedFormat(2))));
	}

	#[test]
	fn batch() {
		let mut registry = Registry::with_defaults(Config::default());
		registry
			.register_plugin("passthrough_0x150", Passthrough::new(0x150).unwrap())
			.unwrap();

		let events = [
			Event::from(ObjectVariant::custom(0x150, vec![1]).unwrap()),
			Event::from(ObjectVariant::Bag),
		];

		let payloads = registry.convert_batch(PayloadFormat::Custom(0x150), &events).unwrap();
		assert!(payloads[0].is_ok());
		assert!(matches!(payloads[1], Err(Error::MalformedCustomBuffer { .. })));

		let payloads = registry.convert_batch(PayloadFormat::DeepStreamProtobuf, &events).unwrap();
		assert_eq!(payloads.len(), 1);
	}

	#[test]
	fn shared() {
		let registry = Arc::new(Registry::with_defaults(Config::default()));

		let handles: Vec<_> = (0..4u64)
			.map(|tracking_id| {
				let registry = registry.clone();
				std::thread::spawn(move || {
					let mut event = Event::new(EventKind::Moving, ObjectVariant::Bicycle);
					event.tracking_id = tracking_id;
					registry.convert(PayloadFormat::DeepStreamMinimal, &event).unwrap()
				})
			})
			.collect();

		for handle in handles {
			assert!(!handle.join().unwrap().buffer.is_empty());
		}
	}
}
