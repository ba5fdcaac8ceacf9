//! The protobuf schema, mirroring the event layout.
//!
//! Field numbers are part of the wire format and must never be reused.

use bytes::Bytes;

use crate::{Error, Masked, ObjectKind, Result};

#[derive(Clone, PartialEq, prost::Message)]
pub struct Rect {
	#[prost(float, tag = "1")]
	pub top: f32,
	#[prost(float, tag = "2")]
	pub left: f32,
	#[prost(float, tag = "3")]
	pub width: f32,
	#[prost(float, tag = "4")]
	pub height: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GeoLocation {
	#[prost(double, tag = "1")]
	pub lat: f64,
	#[prost(double, tag = "2")]
	pub lon: f64,
	#[prost(double, tag = "3")]
	pub alt: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Coordinate {
	#[prost(double, tag = "1")]
	pub x: f64,
	#[prost(double, tag = "2")]
	pub y: f64,
	#[prost(double, tag = "3")]
	pub z: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Polygon {
	#[prost(message, repeated, tag = "1")]
	pub points: Vec<Coordinate>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Joint {
	#[prost(float, tag = "1")]
	pub x: f32,
	#[prost(float, tag = "2")]
	pub y: f32,
	#[prost(float, tag = "3")]
	pub z: f32,
	#[prost(float, tag = "4")]
	pub confidence: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Pose {
	#[prost(message, repeated, tag = "1")]
	pub joints: Vec<Joint>,
	#[prost(uint32, tag = "2")]
	pub pose_type: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Vehicle {
	#[prost(string, optional, tag = "1")]
	pub kind: Option<String>,
	#[prost(string, optional, tag = "2")]
	pub make: Option<String>,
	#[prost(string, optional, tag = "3")]
	pub model: Option<String>,
	#[prost(string, optional, tag = "4")]
	pub color: Option<String>,
	#[prost(string, optional, tag = "5")]
	pub region: Option<String>,
	#[prost(string, optional, tag = "6")]
	pub license: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Person {
	#[prost(string, optional, tag = "1")]
	pub gender: Option<String>,
	#[prost(string, optional, tag = "2")]
	pub hair: Option<String>,
	#[prost(string, optional, tag = "3")]
	pub cap: Option<String>,
	#[prost(string, optional, tag = "4")]
	pub apparel: Option<String>,
	#[prost(uint32, tag = "5")]
	pub age: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Face {
	#[prost(string, optional, tag = "1")]
	pub gender: Option<String>,
	#[prost(string, optional, tag = "2")]
	pub hair: Option<String>,
	#[prost(string, optional, tag = "3")]
	pub cap: Option<String>,
	#[prost(string, optional, tag = "4")]
	pub glasses: Option<String>,
	#[prost(string, optional, tag = "5")]
	pub facial_hair: Option<String>,
	#[prost(string, optional, tag = "6")]
	pub name: Option<String>,
	#[prost(string, optional, tag = "7")]
	pub eye_color: Option<String>,
	#[prost(uint32, tag = "8")]
	pub age: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Product {
	#[prost(string, optional, tag = "1")]
	pub brand: Option<String>,
	#[prost(string, optional, tag = "2")]
	pub kind: Option<String>,
	#[prost(string, optional, tag = "3")]
	pub shape: Option<String>,
}

/// The object, identified by its numeric kind.
///
/// At most one of the attribute messages is set, matching the kind. Custom objects
/// carry their buffer in `data` instead.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Object {
	#[prost(uint32, tag = "1")]
	pub kind: u32,
	#[prost(message, optional, tag = "2")]
	pub vehicle: Option<Vehicle>,
	#[prost(message, optional, tag = "3")]
	pub person: Option<Person>,
	#[prost(message, optional, tag = "4")]
	pub face: Option<Face>,
	#[prost(message, optional, tag = "5")]
	pub product: Option<Product>,
	#[prost(message, repeated, tag = "6")]
	pub mask: Vec<Polygon>,
	#[prost(bytes = "bytes", optional, tag = "7")]
	pub data: Option<Bytes>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Analytics {
	#[prost(uint32, tag = "1")]
	pub direction: u32,
	#[prost(uint32, tag = "2")]
	pub status: u32,
	#[prost(float, tag = "3")]
	pub move_length: f32,
	#[prost(float, tag = "4")]
	pub move_millis: f32,
	#[prost(float, tag = "5")]
	pub speed: f32,
	#[prost(float, tag = "6")]
	pub long_stay_millis: f32,
	#[prost(int32, repeated, tag = "7")]
	pub lanes: Vec<i32>,
	#[prost(int32, tag = "8")]
	pub reverse_lane: i32,
	#[prost(bool, tag = "9")]
	pub lane_cross: bool,
	#[prost(bool, tag = "10")]
	pub reverse_drive: bool,
	#[prost(bool, tag = "11")]
	pub overcrowd: bool,
	#[prost(bool, tag = "12")]
	pub long_park: bool,
	#[prost(bool, tag = "13")]
	pub loitering: bool,
	#[prost(bool, tag = "14")]
	pub break_in: bool,
	#[prost(bool, tag = "15")]
	pub jaywalk: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Event {
	#[prost(uint32, tag = "1")]
	pub kind: u32,
	/// Absent for unknown objects.
	#[prost(message, optional, tag = "2")]
	pub object: Option<Object>,
	#[prost(message, optional, tag = "3")]
	pub bbox: Option<Rect>,
	#[prost(message, optional, tag = "4")]
	pub location: Option<GeoLocation>,
	#[prost(message, optional, tag = "5")]
	pub coordinate: Option<Coordinate>,
	#[prost(double, repeated, tag = "6")]
	pub signature: Vec<f64>,
	#[prost(int32, tag = "7")]
	pub class_id: i32,
	#[prost(int32, tag = "8")]
	pub sensor_id: i32,
	#[prost(int32, tag = "9")]
	pub module_id: i32,
	#[prost(int32, tag = "10")]
	pub place_id: i32,
	#[prost(int32, tag = "11")]
	pub component_id: i32,
	#[prost(int32, tag = "12")]
	pub frame_id: i32,
	#[prost(double, tag = "13")]
	pub confidence: f64,
	#[prost(uint64, tag = "14")]
	pub tracking_id: u64,
	#[prost(string, optional, tag = "15")]
	pub timestamp: Option<String>,
	#[prost(string, optional, tag = "16")]
	pub object_id: Option<String>,
	#[prost(string, optional, tag = "17")]
	pub sensor_str: Option<String>,
	#[prost(string, optional, tag = "18")]
	pub other_attrs: Option<String>,
	#[prost(string, optional, tag = "19")]
	pub video_path: Option<String>,
	#[prost(bytes = "bytes", optional, tag = "20")]
	pub extension: Option<Bytes>,
	#[prost(message, optional, tag = "21")]
	pub pose: Option<Pose>,
	#[prost(float, repeated, tag = "22")]
	pub embedding: Vec<f32>,
	#[prost(message, optional, tag = "23")]
	pub analytics: Option<Analytics>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EventBatch {
	#[prost(message, repeated, tag = "1")]
	pub events: Vec<Event>,
}

impl From<crate::Rect> for Rect {
	fn from(rect: crate::Rect) -> Self {
		Self {
			top: rect.top,
			left: rect.left,
			width: rect.width,
			height: rect.height,
		}
	}
}

impl From<Rect> for crate::Rect {
	fn from(rect: Rect) -> Self {
		Self {
			top: rect.top,
			left: rect.left,
			width: rect.width,
			height: rect.height,
		}
	}
}

impl From<crate::GeoLocation> for GeoLocation {
	fn from(location: crate::GeoLocation) -> Self {
		Self {
			lat: location.lat,
			lon: location.lon,
			alt: location.alt,
		}
	}
}

impl From<GeoLocation> for crate::GeoLocation {
	fn from(location: GeoLocation) -> Self {
		Self {
			lat: location.lat,
			lon: location.lon,
			alt: location.alt,
		}
	}
}

impl From<crate::Coordinate> for Coordinate {
	fn from(coord: crate::Coordinate) -> Self {
		Self {
			x: coord.x,
			y: coord.y,
			z: coord.z,
		}
	}
}

impl From<Coordinate> for crate::Coordinate {
	fn from(coord: Coordinate) -> Self {
		Self {
			x: coord.x,
			y: coord.y,
			z: coord.z,
		}
	}
}

impl From<&crate::Polygon> for Polygon {
	fn from(polygon: &crate::Polygon) -> Self {
		Self {
			points: polygon.iter().copied().map(Into::into).collect(),
		}
	}
}

impl From<Polygon> for crate::Polygon {
	fn from(polygon: Polygon) -> Self {
		polygon.points.into_iter().map(Into::into).collect()
	}
}

impl From<&crate::Pose> for Pose {
	fn from(pose: &crate::Pose) -> Self {
		Self {
			joints: pose
				.joints
				.iter()
				.map(|joint| Joint {
					x: joint.x,
					y: joint.y,
					z: joint.z,
					confidence: joint.confidence,
				})
				.collect(),
			pose_type: pose.pose_type.into(),
		}
	}
}

impl TryFrom<Pose> for crate::Pose {
	type Error = Error;

	fn try_from(pose: Pose) -> Result<Self> {
		Ok(Self {
			joints: pose
				.joints
				.into_iter()
				.map(|joint| crate::Joint {
					x: joint.x,
					y: joint.y,
					z: joint.z,
					confidence: joint.confidence,
				})
				.collect(),
			pose_type: crate::PoseType::try_from(pose.pose_type).map_err(|_| Error::InvalidKind(pose.pose_type))?,
		})
	}
}

impl From<&crate::Vehicle> for Vehicle {
	fn from(vehicle: &crate::Vehicle) -> Self {
		Self {
			kind: vehicle.kind.clone(),
			make: vehicle.make.clone(),
			model: vehicle.model.clone(),
			color: vehicle.color.clone(),
			region: vehicle.region.clone(),
			license: vehicle.license.clone(),
		}
	}
}

impl From<Vehicle> for crate::Vehicle {
	fn from(vehicle: Vehicle) -> Self {
		Self {
			kind: vehicle.kind,
			make: vehicle.make,
			model: vehicle.model,
			color: vehicle.color,
			region: vehicle.region,
			license: vehicle.license,
		}
	}
}

impl From<&crate::Person> for Person {
	fn from(person: &crate::Person) -> Self {
		Self {
			gender: person.gender.clone(),
			hair: person.hair.clone(),
			cap: person.cap.clone(),
			apparel: person.apparel.clone(),
			age: person.age,
		}
	}
}

impl From<Person> for crate::Person {
	fn from(person: Person) -> Self {
		Self {
			gender: person.gender,
			hair: person.hair,
			cap: person.cap,
			apparel: person.apparel,
			age: person.age,
		}
	}
}

impl From<&crate::Face> for Face {
	fn from(face: &crate::Face) -> Self {
		Self {
			gender: face.gender.clone(),
			hair: face.hair.clone(),
			cap: face.cap.clone(),
			glasses: face.glasses.clone(),
			facial_hair: face.facial_hair.clone(),
			name: face.name.clone(),
			eye_color: face.eye_color.clone(),
			age: face.age,
		}
	}
}

impl From<Face> for crate::Face {
	fn from(face: Face) -> Self {
		Self {
			gender: face.gender,
			hair: face.hair,
			cap: face.cap,
			glasses: face.glasses,
			facial_hair: face.facial_hair,
			name: face.name,
			eye_color: face.eye_color,
			age: face.age,
		}
	}
}

impl From<&crate::Product> for Product {
	fn from(product: &crate::Product) -> Self {
		Self {
			brand: product.brand.clone(),
			kind: product.kind.clone(),
			shape: product.shape.clone(),
		}
	}
}

impl From<Product> for crate::Product {
	fn from(product: Product) -> Self {
		Self {
			brand: product.brand,
			kind: product.kind,
			shape: product.shape,
		}
	}
}

fn mask(mask: &[crate::Polygon]) -> Vec<Polygon> {
	mask.iter().map(Into::into).collect()
}

impl Object {
	/// Returns `None` for unknown objects, which are never encoded.
	pub fn encode(object: &crate::ObjectVariant) -> Option<Self> {
		use crate::ObjectVariant as Variant;

		let mut encoded = Self {
			kind: object.kind().value(),
			..Default::default()
		};

		match object {
			Variant::Vehicle(vehicle) => encoded.vehicle = Some(vehicle.into()),
			Variant::Person(person) => encoded.person = Some(person.into()),
			Variant::Face(face) => encoded.face = Some(face.into()),
			Variant::Product(product) => encoded.product = Some(product.into()),
			Variant::VehicleExt(masked) => {
				encoded.vehicle = Some((&masked.attrs).into());
				encoded.mask = mask(&masked.mask);
			}
			Variant::PersonExt(masked) => {
				encoded.person = Some((&masked.attrs).into());
				encoded.mask = mask(&masked.mask);
			}
			Variant::FaceExt(masked) => {
				encoded.face = Some((&masked.attrs).into());
				encoded.mask = mask(&masked.mask);
			}
			Variant::ProductExt(masked) => {
				encoded.product = Some((&masked.attrs).into());
				encoded.mask = mask(&masked.mask);
			}
			Variant::Custom { data, .. } => encoded.data = Some(data.clone()),
			Variant::Unknown(_) => return None,
			Variant::Bag | Variant::Bicycle | Variant::RoadSign | Variant::FrameAnalysis => {}
		}

		Some(encoded)
	}

	pub fn decode(self) -> Result<crate::ObjectVariant> {
		use crate::ObjectVariant as Variant;

		let Self {
			kind,
			vehicle,
			person,
			face,
			product,
			mask,
			data,
		} = self;

		let kind = ObjectKind::try_from(kind)?;
		let mask: Vec<crate::Polygon> = mask.into_iter().map(Into::into).collect();

		let vehicle = vehicle.map(crate::Vehicle::from).unwrap_or_default();
		let person = person.map(crate::Person::from).unwrap_or_default();
		let face = face.map(crate::Face::from).unwrap_or_default();
		let product = product.map(crate::Product::from).unwrap_or_default();

		Ok(match kind {
			ObjectKind::Vehicle => Variant::Vehicle(vehicle),
			ObjectKind::Person => Variant::Person(person),
			ObjectKind::Face => Variant::Face(face),
			ObjectKind::Product => Variant::Product(product),
			ObjectKind::VehicleExt => Variant::VehicleExt(Masked::new(vehicle).with_mask(mask)),
			ObjectKind::PersonExt => Variant::PersonExt(Masked::new(person).with_mask(mask)),
			ObjectKind::FaceExt => Variant::FaceExt(Masked::new(face).with_mask(mask)),
			ObjectKind::ProductExt => Variant::ProductExt(Masked::new(product).with_mask(mask)),
			ObjectKind::Custom(tag) => Variant::custom(tag, data.unwrap_or_default())?,
			kind => Variant::empty(kind),
		})
	}
}

impl From<&crate::AnalyticsStatus> for Analytics {
	fn from(status: &crate::AnalyticsStatus) -> Self {
		Self {
			direction: status.direction.into(),
			status: status.status.into(),
			move_length: status.move_length,
			move_millis: status.move_millis,
			speed: status.speed,
			long_stay_millis: status.long_stay_millis,
			lanes: status.lanes.as_slice().to_vec(),
			reverse_lane: status.reverse_lane,
			lane_cross: status.flags.lane_cross,
			reverse_drive: status.flags.reverse_drive,
			overcrowd: status.flags.overcrowd,
			long_park: status.flags.long_park,
			loitering: status.flags.loitering,
			break_in: status.flags.break_in,
			jaywalk: status.flags.jaywalk,
		}
	}
}

impl TryFrom<Analytics> for crate::AnalyticsStatus {
	type Error = Error;

	fn try_from(status: Analytics) -> Result<Self> {
		Ok(Self {
			direction: crate::MoveDirection::try_from(status.direction)
				.map_err(|_| Error::InvalidKind(status.direction))?,
			status: crate::ObjectStatus::try_from(status.status).map_err(|_| Error::InvalidKind(status.status))?,
			move_length: status.move_length,
			move_millis: status.move_millis,
			speed: status.speed,
			long_stay_millis: status.long_stay_millis,
			lanes: crate::LaneCrossing::try_from(status.lanes)?,
			reverse_lane: status.reverse_lane,
			flags: crate::StatusFlags {
				lane_cross: status.lane_cross,
				reverse_drive: status.reverse_drive,
				overcrowd: status.overcrowd,
				long_park: status.long_park,
				loitering: status.loitering,
				break_in: status.break_in,
				jaywalk: status.jaywalk,
			},
		})
	}
}

impl From<&crate::Event> for Event {
	fn from(event: &crate::Event) -> Self {
		Self {
			kind: event.kind.value(),
			object: Object::encode(&event.object),
			bbox: Some(event.bbox.into()),
			location: Some(event.location.into()),
			coordinate: Some(event.coordinate.into()),
			signature: event.signature.values.clone(),
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
			other_attrs: event.other_attrs.clone(),
			video_path: event.video_path.clone(),
			extension: event.extension.clone(),
			pose: (!event.pose.is_empty()).then(|| (&event.pose).into()),
			embedding: event.embedding.vector.clone(),
			analytics: (!event.analytics.is_default()).then(|| (&event.analytics).into()),
		}
	}
}

impl TryFrom<Event> for crate::Event {
	type Error = Error;

	fn try_from(event: Event) -> Result<Self> {
		let object = match event.object {
			Some(object) => object.decode()?,
			None => crate::ObjectVariant::default(),
		};

		Ok(Self {
			kind: crate::EventKind::try_from(event.kind)?,
			object,
			bbox: event.bbox.map(Into::into).unwrap_or_default(),
			location: event.location.map(Into::into).unwrap_or_default(),
			coordinate: event.coordinate.map(Into::into).unwrap_or_default(),
			signature: event.signature.into(),
			class_id: event.class_id,
			sensor_id: event.sensor_id,
			module_id: event.module_id,
			place_id: event.place_id,
			component_id: event.component_id,
			frame_id: event.frame_id,
			confidence: event.confidence,
			tracking_id: event.tracking_id,
			timestamp: event.timestamp,
			object_id: event.object_id,
			sensor_str: event.sensor_str,
			other_attrs: event.other_attrs,
			video_path: event.video_path,
			extension: event.extension,
			pose: event.pose.map(crate::Pose::try_from).transpose()?.unwrap_or_default(),
			embedding: event.embedding.into(),
			analytics: event
				.analytics
				.map(crate::AnalyticsStatus::try_from)
				.transpose()?
				.unwrap_or_default(),
		})
	}
}
