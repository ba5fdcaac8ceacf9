use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The number of lane slots carried by [LaneCrossing].
pub const MAX_LANES: usize = 4;

/// The sentinel stored in unused lane slots.
pub const NO_LANE: i32 = -1;

fn is_false(value: &bool) -> bool {
	!value
}

fn is_no_lane(value: &i32) -> bool {
	*value == NO_LANE
}

/// The direction an object is moving in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum MoveDirection {
	Up = 0,
	Down = 1,
	Left = 2,
	Right = 3,
	RightUp = 4,
	RightDown = 5,
	LeftUp = 6,
	LeftDown = 7,
	Little = 8,
	#[default]
	NoDirection = 9,
}

/// The most recent status raised by the analytics stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ObjectStatus {
	VehicleLongPark = 0,
	PersonLongStanding = 1,
	PersonLongWalk = 2,
	PersonLoitering = 3,
	PersonBreakin = 4,
	PersonJaywalk = 5,
	PersonOvercrowd = 6,
	CollidePre = 7,
	CollideClose = 8,
	ObjMove = 9,
	#[default]
	NoStatus = 10,
}

/// The lanes an object crossed, in order.
///
/// Backed by a fixed array of [MAX_LANES] slots. Only the first `len` slots are
/// meaningful; the rest always hold [NO_LANE] and are never serialized.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct LaneCrossing {
	lanes: [i32; MAX_LANES],
	len: usize,
}

impl Default for LaneCrossing {
	fn default() -> Self {
		Self {
			lanes: [NO_LANE; MAX_LANES],
			len: 0,
		}
	}
}

impl LaneCrossing {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from the raw array and count, as filled in by the analytics stage.
	///
	/// Every slot inside the count must hold a lane number. Slots past the count are ignored.
	pub fn from_raw(lanes: [i32; MAX_LANES], len: usize) -> Result<Self> {
		if len > MAX_LANES {
			return Err(Error::InvalidLaneCount(len));
		}

		let mut crossing = Self::default();
		for (index, lane) in lanes.iter().take(len).enumerate() {
			if *lane == NO_LANE {
				return Err(Error::UnpopulatedLane(index));
			}
			crossing.push(*lane)?;
		}

		Ok(crossing)
	}

	/// Record another crossed lane.
	pub fn push(&mut self, lane: i32) -> Result<()> {
		if lane < 0 {
			return Err(Error::InvalidLane(lane));
		}

		if self.len == MAX_LANES {
			return Err(Error::InvalidLaneCount(MAX_LANES + 1));
		}

		self.lanes[self.len] = lane;
		self.len += 1;

		Ok(())
	}

	/// The meaningful lanes, in the order they were crossed.
	pub fn as_slice(&self) -> &[i32] {
		&self.lanes[..self.len]
	}

	/// The full array including [NO_LANE] sentinels.
	pub fn raw(&self) -> [i32; MAX_LANES] {
		self.lanes
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl TryFrom<&[i32]> for LaneCrossing {
	type Error = Error;

	fn try_from(lanes: &[i32]) -> Result<Self> {
		if lanes.len() > MAX_LANES {
			return Err(Error::InvalidLaneCount(lanes.len()));
		}

		let mut crossing = Self::default();
		for lane in lanes {
			crossing.push(*lane)?;
		}

		Ok(crossing)
	}
}

impl TryFrom<Vec<i32>> for LaneCrossing {
	type Error = Error;

	fn try_from(lanes: Vec<i32>) -> Result<Self> {
		Self::try_from(lanes.as_slice())
	}
}

impl From<LaneCrossing> for Vec<i32> {
	fn from(crossing: LaneCrossing) -> Self {
		crossing.as_slice().to_vec()
	}
}

/// Boolean detections raised for the object.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusFlags {
	#[serde(skip_serializing_if = "is_false")]
	pub lane_cross: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub reverse_drive: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub overcrowd: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub long_park: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub loitering: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub break_in: bool,
	#[serde(skip_serializing_if = "is_false")]
	pub jaywalk: bool,
}

/// State derived by the analytics stage, kept apart from the raw detection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsStatus {
	pub direction: MoveDirection,
	pub status: ObjectStatus,

	/// The distance moved, in pixels.
	pub move_length: f32,

	/// How long the movement took.
	pub move_millis: f32,
	pub speed: f32,

	/// How long the object has stayed in place.
	pub long_stay_millis: f32,

	#[serde(skip_serializing_if = "LaneCrossing::is_empty")]
	pub lanes: LaneCrossing,

	/// The lane driven in reverse, or [NO_LANE].
	#[serde(skip_serializing_if = "is_no_lane")]
	pub reverse_lane: i32,

	pub flags: StatusFlags,
}

impl Default for AnalyticsStatus {
	fn default() -> Self {
		Self {
			direction: MoveDirection::default(),
			status: ObjectStatus::default(),
			move_length: 0.0,
			move_millis: 0.0,
			speed: 0.0,
			long_stay_millis: 0.0,
			lanes: LaneCrossing::default(),
			reverse_lane: NO_LANE,
			flags: StatusFlags::default(),
		}
	}
}

impl AnalyticsStatus {
	/// True when nothing was derived for the object.
	pub fn is_default(&self) -> bool {
		*self == Self::default()
	}

	pub fn validate(&self) -> Result<()> {
		if self.reverse_lane == NO_LANE {
			return Ok(());
		}

		if self.reverse_lane < 0 {
			return Err(Error::InvalidLane(self.reverse_lane));
		}

		if !self.flags.reverse_drive {
			return Err(Error::StrayReverseLane(self.reverse_lane));
		}

		Ok(())
	}
}
