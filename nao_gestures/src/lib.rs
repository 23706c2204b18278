use std::fmt;
use std::str::FromStr;

use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

pub mod errors;
pub use errors::*;

pub mod geometry;
pub mod selector;
pub mod ports;
pub mod sequencer;
pub mod robot;

pub use geometry::{compute_arm_target, compute_pitch_yaw, magnitude};
pub use ports::{ActuatorPort, SpeechPort};
pub use robot::GestureRobot;
pub use selector::{select_arm, select_arm_for};
pub use sequencer::*;

/// A point or offset in the torso frame, in meters.
///
/// The origin is the center of the torso, x points forward, y points left
/// and z points up.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Joint names addressed by a head command, in the order the angles are sent.
pub const HEAD_JOINTS: [&str; 2] = ["HeadPitch", "HeadYaw"];

/// Head orientation in radians.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HeadAngles {
    pub pitch: f64,
    pub yaw: f64,
}

impl HeadAngles {
    /// Head looking straight ahead.
    pub const CENTER: HeadAngles = HeadAngles { pitch: 0.0, yaw: 0.0 };

    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self { pitch, yaw }
    }

    /// Angles in `HEAD_JOINTS` order.
    pub fn as_array(&self) -> [f64; 2] {
        [self.pitch, self.yaw]
    }
}

impl Default for HeadAngles {
    fn default() -> Self {
        Self::CENTER
    }
}

/// A six component effector pose: position in meters followed by a
/// rotation vector in radians.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose6 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl Pose6 {
    pub fn new(x: f64, y: f64, z: f64, wx: f64, wy: f64, wz: f64) -> Self {
        Self { x, y, z, wx, wy, wz }
    }

    /// Pose at `position` with zero orientation.
    pub fn from_position(position: &Vector3) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.wx, self.wy, self.wz]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; 6]> for Pose6 {
    fn from(v: [f64; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

impl From<Pose6> for [f64; 6] {
    fn from(pose: Pose6) -> Self {
        pose.to_array()
    }
}

/// The kind of deictic gesture to perform.
///
/// # Variants
///
/// * `None` - No effector moves; only the stance bracketing is issued.
/// * `Look` - The head turns toward the target and back.
/// * `Point` - One arm points toward the target and returns to rest.
/// * `LookAndPoint` - Head and arm move together toward the target and back.
///
/// Labels accepted by [`GestureType::from_str`] are `none`, `look`, `point`
/// and `lookandpoint`, compared case-insensitively.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GestureType {
    None,
    Look,
    Point,
    LookAndPoint,
}

impl GestureType {
    pub const ALL: [GestureType; 4] = [
        GestureType::None,
        GestureType::Look,
        GestureType::Point,
        GestureType::LookAndPoint,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GestureType::None => "none",
            GestureType::Look => "look",
            GestureType::Point => "point",
            GestureType::LookAndPoint => "lookandpoint",
        }
    }

    /// Whether this gesture moves the head.
    pub fn uses_head(&self) -> bool {
        matches!(self, GestureType::Look | GestureType::LookAndPoint)
    }

    /// Whether this gesture moves an arm.
    pub fn uses_arm(&self) -> bool {
        matches!(self, GestureType::Point | GestureType::LookAndPoint)
    }
}

impl FromStr for GestureType {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(GestureType::None),
            "look" => Ok(GestureType::Look),
            "point" => Ok(GestureType::Point),
            "lookandpoint" => Ok(GestureType::LookAndPoint),
            _ => Err(GestureError::Validation(format!(
                "gesture type must be 'none', 'look', 'point', or 'lookandpoint', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmSide {
    Left,
    Right,
}

impl ArmSide {
    /// Effector chain name used by the motion controller.
    pub fn effector_name(&self) -> &'static str {
        match self {
            ArmSide::Left => "LArm",
            ArmSide::Right => "RArm",
        }
    }

    pub fn effector(&self) -> Effector {
        match self {
            ArmSide::Left => Effector::LeftArm,
            ArmSide::Right => Effector::RightArm,
        }
    }
}

impl FromStr for ArmSide {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LArm" | "left" | "Left" => Ok(ArmSide::Left),
            "RArm" | "right" | "Right" => Ok(ArmSide::Right),
            _ => Err(GestureError::Validation(format!(
                "arm must be 'LArm' or 'RArm', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ArmSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.effector_name())
    }
}

/// An effector addressed by a motion command.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effector {
    Head,
    LeftArm,
    RightArm,
}

impl Effector {
    /// The arm side for arm effectors, `None` for the head.
    pub fn arm_side(&self) -> Option<ArmSide> {
        match self {
            Effector::Head => None,
            Effector::LeftArm => Some(ArmSide::Left),
            Effector::RightArm => Some(ArmSide::Right),
        }
    }
}

/// Coordinate frame of a Cartesian effector command.
///
/// The integer values match the frame identifiers of the motion controller.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
pub enum Frame {
    Torso = 0,
    World = 1,
    Robot = 2,
}

impl Default for Frame {
    fn default() -> Self {
        Self::Torso
    }
}

/// Bitmask of the degrees of freedom a Cartesian command controls.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AxisMask(pub u8);

impl AxisMask {
    pub const X: AxisMask = AxisMask(1);
    pub const Y: AxisMask = AxisMask(2);
    pub const Z: AxisMask = AxisMask(4);
    pub const WX: AxisMask = AxisMask(8);
    pub const WY: AxisMask = AxisMask(16);
    pub const WZ: AxisMask = AxisMask(32);
    /// x, y and z only.
    pub const POSITION: AxisMask = AxisMask(7);
    pub const ROTATION: AxisMask = AxisMask(56);
    pub const ALL: AxisMask = AxisMask(63);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: AxisMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Non-empty and within the six controllable axes.
    pub fn is_valid(&self) -> bool {
        self.0 != 0 && self.0 & !Self::ALL.0 == 0
    }
}

impl Default for AxisMask {
    fn default() -> Self {
        Self::POSITION
    }
}

/// One gesture invocation: what to do and where.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GestureRequest {
    pub gesture: GestureType,
    pub target: [f64; 3],
}

impl GestureRequest {
    pub fn new(gesture: GestureType, target: Vector3) -> Self {
        Self {
            gesture,
            target: [target.x, target.y, target.z],
        }
    }

    pub fn target(&self) -> Vector3 {
        Vector3::from(self.target)
    }
}
