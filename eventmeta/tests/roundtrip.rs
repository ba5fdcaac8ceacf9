use std::sync::Arc;

use bytes::Bytes;
use eventmeta::coding::{Decode, Encode};
use eventmeta::convert::{DeepStream, Minimal, Protobuf};
use eventmeta::{
	AnalyticsStatus, Config, Converter, Coordinate, Decoder, Event, EventKind, Face, GeoLocation, Joint, LaneCrossing,
	Masked, MoveDirection, ObjectStatus, ObjectVariant, Payload, PayloadFormat, Person, Pose, PoseType, Product, Rect,
	Registry, StatusFlags, Vehicle,
};

fn objects() -> Vec<ObjectVariant> {
	let square = vec![
		Coordinate { x: 0.0, y: 0.0, z: 0.0 },
		Coordinate { x: 1.0, y: 0.0, z: 0.0 },
		Coordinate { x: 1.0, y: 1.0, z: 0.0 },
		Coordinate { x: 0.0, y: 1.0, z: 0.0 },
	];

	vec![
		ObjectVariant::Vehicle(Vehicle {
			kind: Some("truck".to_string()),
			license: Some("XYZ 987".to_string()),
			..Default::default()
		}),
		ObjectVariant::Person(Person {
			apparel: Some("formal".to_string()),
			age: 45,
			..Default::default()
		}),
		ObjectVariant::Face(Face {
			hair: Some("black".to_string()),
			age: 31,
			..Default::default()
		}),
		ObjectVariant::Bag,
		ObjectVariant::Bicycle,
		ObjectVariant::VehicleExt(
			Masked::new(Vehicle {
				make: Some("acme".to_string()),
				..Default::default()
			})
			.with_mask(vec![square.clone()]),
		),
		ObjectVariant::PersonExt(Masked::new(Person {
			cap: Some("red".to_string()),
			age: 8,
			..Default::default()
		})),
		ObjectVariant::FaceExt(
			Masked::new(Face {
				glasses: Some("yes".to_string()),
				age: 22,
				..Default::default()
			})
			.with_mask(vec![square.clone(), square.clone()]),
		),
		ObjectVariant::Product(Product {
			brand: Some("acme".to_string()),
			shape: Some("box".to_string()),
			..Default::default()
		}),
		ObjectVariant::ProductExt(
			Masked::new(Product {
				kind: Some("bottle".to_string()),
				..Default::default()
			})
			.with_mask(vec![square]),
		),
		ObjectVariant::RoadSign,
		ObjectVariant::FrameAnalysis,
		ObjectVariant::custom(0x101, vec![0, 1, 2, 3]).unwrap(),
		ObjectVariant::default(),
	]
}

fn event(object: ObjectVariant) -> Event {
	Event {
		kind: EventKind::Moving,
		object,
		bbox: Rect {
			top: 10.0,
			left: 20.0,
			width: 64.0,
			height: 128.0,
		},
		location: GeoLocation {
			lat: 37.5,
			lon: -122.25,
			alt: 12.0,
		},
		coordinate: Coordinate { x: 5.0, y: 6.0, z: 7.0 },
		signature: vec![0.5, 0.25].into(),
		class_id: 2,
		sensor_id: 1,
		module_id: 4,
		place_id: 8,
		component_id: 3,
		frame_id: 1200,
		confidence: 0.93,
		tracking_id: 42,
		timestamp: Some("2024-05-01T12:00:00.000Z".to_string()),
		object_id: Some("42".to_string()),
		sensor_str: Some("cam-1".to_string()),
		other_attrs: Some("weather=rain".to_string()),
		video_path: Some("/data/cam-1.mp4".to_string()),
		extension: Some(Bytes::from_static(b"ext")),
		pose: Pose {
			joints: vec![Joint {
				x: 1.0,
				y: 1.5,
				z: 0.0,
				confidence: 0.5,
			}],
			pose_type: PoseType::Depth,
		},
		embedding: vec![0.125, -0.5].into(),
		analytics: AnalyticsStatus {
			direction: MoveDirection::RightDown,
			status: ObjectStatus::PersonLoitering,
			move_length: 3.5,
			move_millis: 250.0,
			speed: 14.0,
			long_stay_millis: 0.0,
			lanes: LaneCrossing::try_from(vec![1, 3, 2]).unwrap(),
			reverse_lane: 3,
			flags: StatusFlags {
				lane_cross: true,
				reverse_drive: true,
				..Default::default()
			},
		},
	}
}

#[test]
fn deepstream() {
	let converter = DeepStream::default();

	for object in objects() {
		let event = event(object);
		let payload = converter.convert(&event).unwrap();
		assert_eq!(converter.decode(&payload.buffer).unwrap(), event);
	}
}

#[test]
fn protobuf() {
	let converter = Protobuf::default();

	for object in objects() {
		let event = event(object);
		let payload = converter.convert(&event).unwrap();

		let mut decoded = converter.decode(&payload.buffer).unwrap();
		if let ObjectVariant::Unknown(_) = event.object {
			// The buffer of an unknown object is never encoded.
			decoded.object = event.object.clone();
		}
		assert_eq!(decoded, event);
	}
}

#[test]
fn minimal() {
	let converter = Minimal::default();

	for object in objects() {
		let event = event(object);
		let payload = converter.convert(&event).unwrap();
		let decoded = converter.decode(&payload.buffer).unwrap();

		assert_eq!(decoded.kind, event.kind);
		assert_eq!(decoded.object.kind(), event.object.kind());
		assert_eq!(decoded.bbox, event.bbox);
		assert_eq!(decoded.location, event.location);
		assert_eq!(decoded.coordinate, event.coordinate);
		assert_eq!(decoded.signature, event.signature);
		assert_eq!(decoded.tracking_id, event.tracking_id);
		assert_eq!(decoded.frame_id, event.frame_id);
		assert_eq!(decoded.confidence, event.confidence);
		assert_eq!(decoded.timestamp, event.timestamp);
		assert_eq!(decoded.object_id, event.object_id);
		assert_eq!(decoded.sensor_str, event.sensor_str);
		assert_eq!(decoded.extension, event.extension);
		assert_eq!(decoded.pose, event.pose);
		assert_eq!(decoded.embedding, event.embedding);
		assert_eq!(decoded.analytics, event.analytics);

		assert!(decoded.other_attrs.is_none());
		assert!(decoded.video_path.is_none());

		if let ObjectVariant::Custom { .. } = event.object {
			assert_eq!(decoded.object, event.object);
		}
	}
}

#[test]
fn unknown_never_serialized() {
	let registry = Registry::with_defaults(Config::default());
	let event = event(ObjectVariant::Unknown(Bytes::from_static(b"secret")));

	for format in [PayloadFormat::DeepStream, PayloadFormat::DeepStreamMinimal] {
		let payload = registry.convert(format, &event).unwrap();
		let json: serde_json::Value = serde_json::from_slice(&payload.buffer).unwrap();
		assert!(json.get("object").is_none(), "{format}");
	}

	let payload = registry.convert(PayloadFormat::DeepStreamProtobuf, &event).unwrap();
	let needle = b"secret";
	assert!(!payload.buffer.windows(needle.len()).any(|window| window == needle));
}

#[test]
fn lanes_past_count() {
	let mut event = event(ObjectVariant::Bag);
	event.analytics.lanes = LaneCrossing::from_raw([7, 8, 99, 99], 2).unwrap();
	event.analytics.reverse_lane = -1;
	event.analytics.flags.reverse_drive = false;

	let registry = Registry::with_defaults(Config::default());
	for format in [PayloadFormat::DeepStream, PayloadFormat::DeepStreamMinimal] {
		let payload = registry.convert(format, &event).unwrap();
		let json: serde_json::Value = serde_json::from_slice(&payload.buffer).unwrap();
		assert_eq!(json["analytics"]["lanes"], serde_json::json!([7, 8]), "{format}");
		assert!(json["analytics"].get("reverseLane").is_none());
	}

	let payload = registry.convert(PayloadFormat::DeepStreamProtobuf, &event).unwrap();
	let decoded = Protobuf::default().decode(&payload.buffer).unwrap();
	assert_eq!(decoded.analytics.lanes.as_slice(), &[7, 8]);
	assert_eq!(decoded.analytics.lanes.raw(), [7, 8, -1, -1]);
}

#[test]
fn include_policy() {
	let config = Config::from_str(
		r#"
[include]
analytics = false
pose = false
embedding = false
signature = false
extension = false
"#,
	)
	.unwrap();
	let config = Arc::new(config);
	let event = event(ObjectVariant::Bag);

	let converter = DeepStream::new(config.clone());
	let decoded = converter.decode(&converter.convert(&event).unwrap().buffer).unwrap();
	assert!(decoded.analytics.is_default());
	assert!(decoded.pose.is_empty());
	assert!(decoded.embedding.is_empty());
	assert!(decoded.signature.is_empty());
	assert!(decoded.extension.is_none());
	assert_eq!(decoded.tracking_id, 42);

	let converter = Protobuf::new(config);
	let decoded = converter.decode(&converter.convert(&event).unwrap().buffer).unwrap();
	assert!(decoded.analytics.is_default());
	assert!(decoded.extension.is_none());
}

#[test]
fn framed_stream() {
	let registry = Registry::with_defaults(Config::default());
	let events: Vec<_> = objects().into_iter().map(event).collect();

	let payloads: Vec<Payload> = events
		.iter()
		.map(|event| registry.convert(PayloadFormat::DeepStreamProtobuf, event).unwrap())
		.collect();

	let mut stream = Vec::new();
	for payload in &payloads {
		payload.encode(&mut stream);
	}

	let mut reader = Bytes::from(stream);
	let decoder = Protobuf::default();
	for expected in &payloads {
		let payload = Payload::decode(&mut reader).unwrap();
		assert_eq!(&payload, expected);
		assert_eq!(payload.component_id, 3);
		decoder.decode(payload.as_slice()).unwrap();
	}
	assert!(reader.is_empty());
}
