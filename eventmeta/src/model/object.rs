use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;

use crate::{format::parse_tag, Error, Polygon, Result};

/// Vehicle attributes.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Vehicle {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub make: Option<String>,
	pub model: Option<String>,
	pub color: Option<String>,
	pub region: Option<String>,
	pub license: Option<String>,
}

/// Person attributes.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Person {
	pub gender: Option<String>,
	pub hair: Option<String>,
	pub cap: Option<String>,
	pub apparel: Option<String>,
	pub age: u32,
}

/// Face attributes.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Face {
	pub gender: Option<String>,
	pub hair: Option<String>,
	pub cap: Option<String>,
	pub glasses: Option<String>,
	#[serde(rename = "facialhair")]
	pub facial_hair: Option<String>,
	pub name: Option<String>,
	#[serde(rename = "eyecolor")]
	pub eye_color: Option<String>,
	pub age: u32,
}

/// Retail product attributes.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Product {
	pub brand: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub shape: Option<String>,
}

/// Object attributes along with a segmentation mask.
///
/// The mask is an ordered list of polygons and is empty when none was supplied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Masked<T> {
	#[serde(flatten)]
	pub attrs: T,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub mask: Vec<Polygon>,
}

impl<T> Masked<T> {
	pub fn new(attrs: T) -> Self {
		Self {
			attrs,
			mask: Vec::new(),
		}
	}

	pub fn with_mask(mut self, mask: Vec<Polygon>) -> Self {
		self.mask = mask;
		self
	}
}

/// The kind of object attached to an event.
///
/// The numeric values are stable and shared with every payload format.
/// Values from [ObjectKind::RESERVED] upwards belong to custom objects, except for
/// [ObjectKind::UNKNOWN] and [ObjectKind::FRAME_ANALYSIS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
	Vehicle,
	Person,
	Face,
	Bag,
	Bicycle,
	RoadSign,
	VehicleExt,
	PersonExt,
	FaceExt,
	Product,
	ProductExt,
	Custom(u32),
	Unknown,
	FrameAnalysis,
}

impl ObjectKind {
	/// Custom objects must use this value or higher.
	pub const RESERVED: u32 = 0x100;
	/// The conventional tag for a single custom object type.
	pub const CUSTOM: u32 = 0x101;
	pub const UNKNOWN: u32 = 0x102;
	pub const FRAME_ANALYSIS: u32 = 0x103;

	/// Returns the stable numeric value.
	pub fn value(self) -> u32 {
		match self {
			Self::Vehicle => 0,
			Self::Person => 1,
			Self::Face => 2,
			Self::Bag => 3,
			Self::Bicycle => 4,
			Self::RoadSign => 5,
			Self::VehicleExt => 6,
			Self::PersonExt => 7,
			Self::FaceExt => 8,
			Self::Product => 9,
			Self::ProductExt => 10,
			Self::Custom(tag) => tag,
			Self::Unknown => Self::UNKNOWN,
			Self::FrameAnalysis => Self::FRAME_ANALYSIS,
		}
	}

	/// Returns true for the kinds that carry a mask.
	pub fn is_masked(self) -> bool {
		matches!(
			self,
			Self::VehicleExt | Self::PersonExt | Self::FaceExt | Self::ProductExt
		)
	}

	/// Make sure a tag can be used for a custom object.
	pub fn check_custom(tag: u32) -> Result<()> {
		match tag {
			Self::UNKNOWN | Self::FRAME_ANALYSIS => Err(Error::ReservedKind(tag)),
			tag if tag < Self::RESERVED => Err(Error::ReservedKind(tag)),
			_ => Ok(()),
		}
	}
}

impl TryFrom<u32> for ObjectKind {
	type Error = Error;

	fn try_from(value: u32) -> Result<Self> {
		Ok(match value {
			0 => Self::Vehicle,
			1 => Self::Person,
			2 => Self::Face,
			3 => Self::Bag,
			4 => Self::Bicycle,
			5 => Self::RoadSign,
			6 => Self::VehicleExt,
			7 => Self::PersonExt,
			8 => Self::FaceExt,
			9 => Self::Product,
			10 => Self::ProductExt,
			Self::UNKNOWN => Self::Unknown,
			Self::FRAME_ANALYSIS => Self::FrameAnalysis,
			tag if tag >= Self::RESERVED => Self::Custom(tag),
			_ => return Err(Error::InvalidKind(value)),
		})
	}
}

impl From<ObjectKind> for u32 {
	fn from(kind: ObjectKind) -> Self {
		kind.value()
	}
}

impl fmt::Display for ObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Vehicle => write!(f, "vehicle"),
			Self::Person => write!(f, "person"),
			Self::Face => write!(f, "face"),
			Self::Bag => write!(f, "bag"),
			Self::Bicycle => write!(f, "bicycle"),
			Self::RoadSign => write!(f, "roadSign"),
			Self::VehicleExt => write!(f, "vehicleExt"),
			Self::PersonExt => write!(f, "personExt"),
			Self::FaceExt => write!(f, "faceExt"),
			Self::Product => write!(f, "product"),
			Self::ProductExt => write!(f, "productExt"),
			Self::Custom(tag) => write!(f, "custom:{tag:#x}"),
			Self::Unknown => write!(f, "unknown"),
			Self::FrameAnalysis => write!(f, "frameAnalysis"),
		}
	}
}

impl FromStr for ObjectKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s {
			"vehicle" => Self::Vehicle,
			"person" => Self::Person,
			"face" => Self::Face,
			"bag" => Self::Bag,
			"bicycle" => Self::Bicycle,
			"roadSign" => Self::RoadSign,
			"vehicleExt" => Self::VehicleExt,
			"personExt" => Self::PersonExt,
			"faceExt" => Self::FaceExt,
			"product" => Self::Product,
			"productExt" => Self::ProductExt,
			"unknown" => Self::Unknown,
			"frameAnalysis" => Self::FrameAnalysis,
			"custom" => Self::Custom(Self::CUSTOM),
			_ => {
				let tag = s
					.strip_prefix("custom:")
					.and_then(parse_tag)
					.ok_or_else(|| Error::InvalidName(s.to_string()))?;
				Self::check_custom(tag)?;
				Self::Custom(tag)
			}
		})
	}
}

/// The object attached to an event.
///
/// Exactly one arm is populated. The built-in arms are strongly typed, while
/// [ObjectVariant::Custom] carries an opaque buffer that only a converter registered
/// for that tag understands. [ObjectVariant::Unknown] is never serialized.
#[serde_with::serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ObjectVariant {
	Vehicle(Vehicle),
	Person(Person),
	Face(Face),
	Bag,
	Bicycle,
	RoadSign,
	VehicleExt(Masked<Vehicle>),
	PersonExt(Masked<Person>),
	FaceExt(Masked<Face>),
	Product(Product),
	ProductExt(Masked<Product>),
	Custom {
		tag: u32,
		#[serde_as(as = "Hex")]
		data: Bytes,
	},
	#[serde(skip)]
	Unknown(Bytes),
	FrameAnalysis,
}

impl Default for ObjectVariant {
	fn default() -> Self {
		Self::Unknown(Bytes::new())
	}
}

impl ObjectVariant {
	/// Create a custom object, validating the tag.
	pub fn custom(tag: u32, data: impl Into<Bytes>) -> Result<Self> {
		ObjectKind::check_custom(tag)?;
		Ok(Self::Custom {
			tag,
			data: data.into(),
		})
	}

	/// Create a variant of the given kind with no attributes populated.
	pub fn empty(kind: ObjectKind) -> Self {
		match kind {
			ObjectKind::Vehicle => Self::Vehicle(Vehicle::default()),
			ObjectKind::Person => Self::Person(Person::default()),
			ObjectKind::Face => Self::Face(Face::default()),
			ObjectKind::Bag => Self::Bag,
			ObjectKind::Bicycle => Self::Bicycle,
			ObjectKind::RoadSign => Self::RoadSign,
			ObjectKind::VehicleExt => Self::VehicleExt(Masked::default()),
			ObjectKind::PersonExt => Self::PersonExt(Masked::default()),
			ObjectKind::FaceExt => Self::FaceExt(Masked::default()),
			ObjectKind::Product => Self::Product(Product::default()),
			ObjectKind::ProductExt => Self::ProductExt(Masked::default()),
			ObjectKind::Custom(tag) => Self::Custom { tag, data: Bytes::new() },
			ObjectKind::Unknown => Self::Unknown(Bytes::new()),
			ObjectKind::FrameAnalysis => Self::FrameAnalysis,
		}
	}

	/// Returns the active kind.
	pub fn kind(&self) -> ObjectKind {
		match self {
			Self::Vehicle(_) => ObjectKind::Vehicle,
			Self::Person(_) => ObjectKind::Person,
			Self::Face(_) => ObjectKind::Face,
			Self::Bag => ObjectKind::Bag,
			Self::Bicycle => ObjectKind::Bicycle,
			Self::RoadSign => ObjectKind::RoadSign,
			Self::VehicleExt(_) => ObjectKind::VehicleExt,
			Self::PersonExt(_) => ObjectKind::PersonExt,
			Self::FaceExt(_) => ObjectKind::FaceExt,
			Self::Product(_) => ObjectKind::Product,
			Self::ProductExt(_) => ObjectKind::ProductExt,
			Self::Custom { tag, .. } => ObjectKind::Custom(*tag),
			Self::Unknown(_) => ObjectKind::Unknown,
			Self::FrameAnalysis => ObjectKind::FrameAnalysis,
		}
	}

	pub fn is_unknown(&self) -> bool {
		matches!(self, Self::Unknown(_))
	}

	fn mismatch(&self, expected: &'static str) -> Error {
		Error::TypeMismatch {
			expected,
			actual: self.kind(),
		}
	}

	pub fn as_vehicle(&self) -> Result<&Vehicle> {
		match self {
			Self::Vehicle(vehicle) => Ok(vehicle),
			_ => Err(self.mismatch("vehicle")),
		}
	}

	pub fn as_person(&self) -> Result<&Person> {
		match self {
			Self::Person(person) => Ok(person),
			_ => Err(self.mismatch("person")),
		}
	}

	pub fn as_face(&self) -> Result<&Face> {
		match self {
			Self::Face(face) => Ok(face),
			_ => Err(self.mismatch("face")),
		}
	}

	pub fn as_product(&self) -> Result<&Product> {
		match self {
			Self::Product(product) => Ok(product),
			_ => Err(self.mismatch("product")),
		}
	}

	pub fn as_vehicle_ext(&self) -> Result<&Masked<Vehicle>> {
		match self {
			Self::VehicleExt(vehicle) => Ok(vehicle),
			_ => Err(self.mismatch("vehicleExt")),
		}
	}

	pub fn as_person_ext(&self) -> Result<&Masked<Person>> {
		match self {
			Self::PersonExt(person) => Ok(person),
			_ => Err(self.mismatch("personExt")),
		}
	}

	pub fn as_face_ext(&self) -> Result<&Masked<Face>> {
		match self {
			Self::FaceExt(face) => Ok(face),
			_ => Err(self.mismatch("faceExt")),
		}
	}

	pub fn as_product_ext(&self) -> Result<&Masked<Product>> {
		match self {
			Self::ProductExt(product) => Ok(product),
			_ => Err(self.mismatch("productExt")),
		}
	}

	/// Returns the mask polygons of an extended object, in order.
	///
	/// The slice is empty when no mask was supplied.
	pub fn mask(&self) -> Result<&[Polygon]> {
		match self {
			Self::VehicleExt(masked) => Ok(&masked.mask),
			Self::PersonExt(masked) => Ok(&masked.mask),
			Self::FaceExt(masked) => Ok(&masked.mask),
			Self::ProductExt(masked) => Ok(&masked.mask),
			_ => Err(self.mismatch("masked object")),
		}
	}

	/// Returns the opaque buffer of a custom or unknown object.
	pub fn raw(&self) -> Result<&Bytes> {
		match self {
			Self::Custom { data, .. } => Ok(data),
			Self::Unknown(data) => Ok(data),
			_ => Err(self.mismatch("custom object")),
		}
	}

	/// Make sure any custom tag is outside of the reserved range.
	pub fn validate(&self) -> Result<()> {
		match self {
			Self::Custom { tag, .. } => ObjectKind::check_custom(*tag),
			_ => Ok(()),
		}
	}
}

impl From<Vehicle> for ObjectVariant {
	fn from(vehicle: Vehicle) -> Self {
		Self::Vehicle(vehicle)
	}
}

impl From<Person> for ObjectVariant {
	fn from(person: Person) -> Self {
		Self::Person(person)
	}
}

impl From<Face> for ObjectVariant {
	fn from(face: Face) -> Self {
		Self::Face(face)
	}
}

impl From<Product> for ObjectVariant {
	fn from(product: Product) -> Self {
		Self::Product(product)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::Coordinate;

	fn sedan() -> Vehicle {
		Vehicle {
			kind: Some("sedan".to_string()),
			color: Some("blue".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn typed_access() {
		let object = ObjectVariant::from(sedan());
		assert_eq!(object.kind(), ObjectKind::Vehicle);
		assert_eq!(object.as_vehicle().unwrap().color.as_deref(), Some("blue"));

		let err = object.as_person().unwrap_err();
		assert!(matches!(
			err,
			Error::TypeMismatch {
				expected: "person",
				actual: ObjectKind::Vehicle
			}
		));

		// The extended arm is a different kind.
		assert!(object.as_vehicle_ext().is_err());
		assert!(object.mask().is_err());
	}

	#[test]
	fn mask_defaults_to_empty() {
		let object = ObjectVariant::VehicleExt(Masked::new(sedan()));
		assert_eq!(object.mask().unwrap(), &[] as &[Polygon]);

		let polygon = vec![Coordinate::default(), Coordinate { x: 1.0, y: 0.0, z: 0.0 }];
		let object = ObjectVariant::FaceExt(Masked::new(Face::default()).with_mask(vec![polygon.clone()]));
		assert_eq!(object.mask().unwrap(), &[polygon]);
	}

	#[test]
	fn custom_is_opaque() {
		let object = ObjectVariant::custom(0x150, vec![0xaa, 0xbb]).unwrap();
		assert_eq!(object.kind(), ObjectKind::Custom(0x150));
		assert_eq!(object.raw().unwrap().as_ref(), &[0xaa, 0xbb]);
		assert!(object.as_vehicle().is_err());
		assert!(object.mask().is_err());

		let unknown = ObjectVariant::default();
		assert!(unknown.is_unknown());
		assert!(unknown.raw().unwrap().is_empty());
		assert!(unknown.as_face().is_err());
	}

	#[test]
	fn custom_tags() {
		assert!(ObjectVariant::custom(0x100, Bytes::new()).is_ok());
		assert!(matches!(
			ObjectVariant::custom(0x42, Bytes::new()),
			Err(Error::ReservedKind(0x42))
		));
		assert!(ObjectVariant::custom(ObjectKind::UNKNOWN, Bytes::new()).is_err());
		assert!(ObjectVariant::custom(ObjectKind::FRAME_ANALYSIS, Bytes::new()).is_err());
	}

	#[test]
	fn kind_values() {
		for value in (0u32..=10).chain([0x102, 0x103, 0x150]) {
			let kind = ObjectKind::try_from(value).unwrap();
			assert_eq!(kind.value(), value);
			assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
		}

		assert!(matches!(ObjectKind::try_from(11u32), Err(Error::InvalidKind(11))));
		assert_eq!(ObjectKind::try_from(0x100u32).unwrap(), ObjectKind::Custom(0x100));
		assert_eq!("custom".parse::<ObjectKind>().unwrap(), ObjectKind::Custom(0x101));
		assert_eq!("custom:336".parse::<ObjectKind>().unwrap(), ObjectKind::Custom(0x150));
	}

	#[test]
	fn json_layout() {
		let object = ObjectVariant::VehicleExt(Masked::new(sedan()).with_mask(vec![vec![Coordinate::default()]]));
		let json = serde_json::to_value(&object).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"vehicleExt": {
					"type": "sedan",
					"color": "blue",
					"mask": [[{ "x": 0.0, "y": 0.0, "z": 0.0 }]],
				}
			})
		);

		let decoded: ObjectVariant = serde_json::from_value(json).unwrap();
		assert_eq!(decoded, object);

		let custom = ObjectVariant::custom(0x150, vec![0xaa, 0xbb]).unwrap();
		let json = serde_json::to_value(&custom).unwrap();
		assert_eq!(json, serde_json::json!({ "custom": { "tag": 336, "data": "aabb" } }));

		assert_eq!(serde_json::to_value(ObjectVariant::Bag).unwrap(), "bag");
	}
}
