use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ArmSide, AxisMask, Frame, GestureError, Pose6, Vector3};

/// Fixed hold durations standing in for motion-completion feedback.
///
/// Serialized as milliseconds. Missing holds take their default.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WaitPolicy {
    #[serde(with = "millis")]
    pub look_hold: Duration,
    #[serde(with = "millis")]
    pub point_hold: Duration,
    #[serde(with = "millis")]
    pub look_and_point_hold: Duration,
}

impl WaitPolicy {
    /// Every hold set to zero. Useful against a simulator.
    pub fn immediate() -> Self {
        Self {
            look_hold: Duration::ZERO,
            point_hold: Duration::ZERO,
            look_and_point_hold: Duration::ZERO,
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            look_hold: Duration::from_secs(2),
            point_hold: Duration::from_secs(3),
            look_and_point_hold: Duration::from_secs(3),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Body geometry and motion parameters, loaded once and never mutated.
///
/// ```rust
/// use nao_gestures::GestureConfig;
///
/// let config = GestureConfig::from_json_str(r#"{ "arm_length": 0.25 }"#).unwrap();
/// assert_eq!(config.arm_length, 0.25);
/// assert_eq!(config.stance_name, "StandInit");
///
/// assert!(GestureConfig::from_json_str(r#"{ "arm_length": 0.0 }"#).is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Torso origin to head base.
    pub head_offset: [f64; 3],
    pub left_shoulder_offset: [f64; 3],
    pub right_shoulder_offset: [f64; 3],
    /// Pose each arm returns to after pointing.
    pub left_arm_rest: Pose6,
    pub right_arm_rest: Pose6,
    /// Reach used to rescale pointing targets, in meters.
    pub arm_length: f64,
    pub head_speed_fraction: f64,
    pub arm_speed_fraction: f64,
    pub stance_name: String,
    pub stance_blend_speed: f64,
    pub frame: Frame,
    pub axis_mask: AxisMask,
    pub waits: WaitPolicy,
}

impl GestureConfig {
    pub fn head_offset(&self) -> Vector3 {
        Vector3::from(self.head_offset)
    }

    pub fn shoulder_offset(&self, arm: ArmSide) -> Vector3 {
        match arm {
            ArmSide::Left => Vector3::from(self.left_shoulder_offset),
            ArmSide::Right => Vector3::from(self.right_shoulder_offset),
        }
    }

    pub fn rest_pose(&self, arm: ArmSide) -> Pose6 {
        match arm {
            ArmSide::Left => self.left_arm_rest,
            ArmSide::Right => self.right_arm_rest,
        }
    }

    pub fn with_waits(mut self, waits: WaitPolicy) -> Self {
        self.waits = waits;
        self
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        let offsets = [
            ("head_offset", &self.head_offset),
            ("left_shoulder_offset", &self.left_shoulder_offset),
            ("right_shoulder_offset", &self.right_shoulder_offset),
        ];
        for (name, offset) in offsets {
            if !offset.iter().all(|v| v.is_finite()) {
                return Err(config_error(format!("{} must be finite.", name)));
            }
        }
        if !self.left_arm_rest.is_finite() || !self.right_arm_rest.is_finite() {
            return Err(config_error("Arm rest poses must be finite."));
        }
        if !(self.arm_length > 0.0 && self.arm_length.is_finite()) {
            return Err(config_error("Arm length must be greater than 0."));
        }
        let fractions = [
            ("head_speed_fraction", self.head_speed_fraction),
            ("arm_speed_fraction", self.arm_speed_fraction),
            ("stance_blend_speed", self.stance_blend_speed),
        ];
        for (name, value) in fractions {
            if !is_fraction(value) {
                return Err(config_error(format!("{} must be in (0, 1], got {}.", name, value)));
            }
        }
        if self.stance_name.trim().is_empty() {
            return Err(config_error("Stance name cannot be empty."));
        }
        if !self.axis_mask.is_valid() {
            return Err(config_error(format!("Invalid axis mask {}.", self.axis_mask.bits())));
        }
        Ok(())
    }

    /// Parses a JSON document; missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, GestureError> {
        let config: GestureConfig = serde_json::from_str(json)
            .map_err(|e| config_error(format!("Could not parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GestureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("Could not read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, GestureError> {
        serde_json::to_string_pretty(self).map_err(|e| config_error(e.to_string()))
    }
}

/// Dimensions and rest poses of a NAO robot.
impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            head_offset: [0.0, 0.0, 0.1264999955892563],
            left_shoulder_offset: [0.0, 0.09000000357627869, 0.10599999874830246],
            right_shoulder_offset: [0.0, -0.09000000357627869, 0.10599999874830246],
            left_arm_rest: Pose6::new(
                0.11841137707233429,
                0.13498550653457642,
                -0.04563630372285843,
                -1.2062638998031616,
                0.4280231297016144,
                0.03072221577167511,
            ),
            right_arm_rest: Pose6::new(
                0.11877211928367615,
                -0.13329118490219116,
                -0.04420270770788193,
                1.2169694900512695,
                0.4153063893318176,
                -0.012792877852916718,
            ),
            arm_length: 0.22,
            head_speed_fraction: 0.1,
            arm_speed_fraction: 0.9,
            stance_name: "StandInit".to_string(),
            stance_blend_speed: 0.5,
            frame: Frame::Torso,
            axis_mask: AxisMask::POSITION,
            waits: WaitPolicy::default(),
        }
    }
}

fn is_fraction(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

fn config_error<T: Into<String>>(message: T) -> GestureError {
    GestureError::Configuration(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GestureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.waits.look_hold, Duration::from_secs(2));
        assert_eq!(config.waits.point_hold, Duration::from_secs(3));
        assert_eq!(config.shoulder_offset(ArmSide::Right).y, -0.09000000357627869);
        assert_eq!(config.rest_pose(ArmSide::Left), config.left_arm_rest);
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let cases: [fn(&mut GestureConfig); 9] = [
            |c| c.arm_length = 0.0,
            |c| c.arm_length = -1.0,
            |c| c.head_speed_fraction = 0.0,
            |c| c.arm_speed_fraction = 1.5,
            |c| c.stance_blend_speed = f64::NAN,
            |c| c.stance_name = "  ".to_string(),
            |c| c.head_offset[2] = f64::INFINITY,
            |c| c.right_arm_rest.wx = f64::NAN,
            |c| c.axis_mask = AxisMask(0),
        ];
        for mutate in cases {
            let mut config = GestureConfig::default();
            mutate(&mut config);
            assert!(matches!(config.validate(), Err(GestureError::Configuration(_))));
        }
    }

    #[test]
    fn test_json_roundtrip_keeps_wait_millis() {
        let config = GestureConfig::default().with_waits(WaitPolicy {
            look_hold: Duration::from_millis(250),
            point_hold: Duration::from_millis(500),
            look_and_point_hold: Duration::from_millis(750),
        });
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"look_hold\": 250"));
        let parsed = GestureConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_waits_keep_remaining_defaults() {
        let config = GestureConfig::from_json_str(r#"{ "waits": { "look_hold": 100 } }"#).unwrap();
        let defaults = WaitPolicy::default();
        assert_eq!(config.waits.look_hold, Duration::from_millis(100));
        assert_eq!(config.waits.point_hold, defaults.point_hold);
        assert_eq!(config.waits.look_and_point_hold, defaults.look_and_point_hold);
    }

    #[test]
    fn test_malformed_json() {
        let err = GestureConfig::from_json_str("{ arm_length: ").unwrap_err();
        assert!(matches!(err, GestureError::Configuration(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GestureConfig::load("/nonexistent/gestures.json").unwrap_err();
        assert!(matches!(err, GestureError::Configuration(_)));
    }
}
