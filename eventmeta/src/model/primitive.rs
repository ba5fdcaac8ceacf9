use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// A rectangle's position and size in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
	pub top: f32,
	pub left: f32,
	pub width: f32,
	pub height: f32,
}

/// A latitude, longitude and altitude.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoLocation {
	pub lat: f64,
	pub lon: f64,
	pub alt: f64,
}

/// A position in 3-D space.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

/// An ordered list of points outlining part of a mask.
pub type Polygon = Vec<Coordinate>;

/// An object's signature, used for re-identification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Signature {
	pub values: Vec<f64>,
}

impl Signature {
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl From<Vec<f64>> for Signature {
	fn from(values: Vec<f64>) -> Self {
		Self { values }
	}
}

/// A single joint of a body pose.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Joint {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub confidence: f32,
}

/// How the joints of a [Pose] should be interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum PoseType {
	#[default]
	#[serde(rename = "2D")]
	Flat = 0,
	#[serde(rename = "3D")]
	Spatial = 1,
	#[serde(rename = "2.5D")]
	Depth = 2,
}

/// A body pose made of joints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Pose {
	pub joints: Vec<Joint>,
	pub pose_type: PoseType,
}

impl Pose {
	/// True when nothing was collected: no joints and the default pose type.
	pub fn is_empty(&self) -> bool {
		self.joints.is_empty() && self.pose_type == PoseType::Flat
	}
}

/// An embedding vector produced by a model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Embedding {
	pub vector: Vec<f32>,
}

impl Embedding {
	pub fn is_empty(&self) -> bool {
		self.vector.is_empty()
	}
}

impl From<Vec<f32>> for Embedding {
	fn from(vector: Vec<f32>) -> Self {
		Self { vector }
	}
}
