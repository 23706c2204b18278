//! In-process stand-in for a NAO robot.
//!
//! Implements both the actuator and speech ports. Commands are applied
//! instantly to a tracked state and appended to a journal, so a gesture run
//! can be inspected afterwards.

use async_trait::async_trait;
use nalgebra::Vector3;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use nao_gestures::{
    ActuatorError, ActuatorPort, ArmSide, AxisMask, Frame, GestureConfig, HeadAngles, Pose6,
    SpeechPort,
};

/// Postures the posture controller knows how to reach.
pub const KNOWN_STANCES: [&str; 8] = [
    "Stand",
    "StandInit",
    "StandZero",
    "Crouch",
    "Sit",
    "SitRelax",
    "LyingBelly",
    "LyingBack",
];

// Joint limits in radians.
const HEAD_PITCH_LIMITS: (f64, f64) = (-0.6720, 0.5149);
const HEAD_YAW_LIMITS: (f64, f64) = (-2.0857, 2.0857);

/// One accepted command, in arrival order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum SimCommand {
    Stance { name: String, blend_speed: f64 },
    Head(HeadAngles),
    Arm { arm: ArmSide, frame: Frame, target: Pose6, axis_mask: AxisMask },
    Say(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimState {
    pub stance: Option<String>,
    pub head: HeadAngles,
    pub left_arm: Pose6,
    pub right_arm: Pose6,
    pub journal: Vec<SimCommand>,
}

impl SimState {
    pub fn arm(&self, arm: ArmSide) -> &Pose6 {
        match arm {
            ArmSide::Left => &self.left_arm,
            ArmSide::Right => &self.right_arm,
        }
    }

    pub fn spoken(&self) -> Vec<&str> {
        self.journal
            .iter()
            .filter_map(|c| match c {
                SimCommand::Say(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct SimulatedRobot {
    state: Mutex<SimState>,
    left_shoulder: Vector3<f64>,
    right_shoulder: Vector3<f64>,
    fail_after: Option<usize>,
}

impl SimulatedRobot {
    /// Robot standing with both arms at their configured rest poses.
    pub fn from_config(config: &GestureConfig) -> Self {
        Self {
            state: Mutex::new(SimState {
                stance: None,
                head: HeadAngles::CENTER,
                left_arm: config.left_arm_rest,
                right_arm: config.right_arm_rest,
                journal: Vec::new(),
            }),
            left_shoulder: Vector3::from(config.left_shoulder_offset),
            right_shoulder: Vector3::from(config.right_shoulder_offset),
            fail_after: None,
        }
    }

    /// Behaves like a robot that drops off the network after accepting
    /// `commands` commands.
    pub fn failing_after(mut self, commands: usize) -> Self {
        self.fail_after = Some(commands);
        self
    }

    pub async fn snapshot(&self) -> SimState {
        self.state.lock().await.clone()
    }

    /// Distance from the arm's shoulder to its end effector, in meters.
    pub async fn arm_reach(&self, arm: ArmSide) -> f64 {
        let state = self.state.lock().await;
        let shoulder = match arm {
            ArmSide::Left => &self.left_shoulder,
            ArmSide::Right => &self.right_shoulder,
        };
        (state.arm(arm).position() - shoulder).norm()
    }

    fn check_connected(&self, state: &SimState) -> Result<(), ActuatorError> {
        match self.fail_after {
            Some(limit) if state.journal.len() >= limit => Err(ActuatorError::Disconnected),
            _ => Ok(()),
        }
    }
}

fn check_speed(speed: f64) -> Result<(), ActuatorError> {
    if speed > 0.0 && speed <= 1.0 {
        Ok(())
    } else {
        Err(ActuatorError::Rejected(format!("speed {} outside (0, 1]", speed)))
    }
}

fn clamp_joint(name: &str, value: f64, (low, high): (f64, f64)) -> f64 {
    let clamped = value.clamp(low, high);
    if clamped != value {
        warn!("{} {:.4} clamped to {:.4}", name, value, clamped);
    }
    clamped
}

#[async_trait]
impl ActuatorPort for SimulatedRobot {
    async fn set_stance(&self, name: &str, blend_speed: f64) -> Result<(), ActuatorError> {
        let mut state = self.state.lock().await;
        self.check_connected(&state)?;
        check_speed(blend_speed)?;
        if !KNOWN_STANCES.contains(&name) {
            return Err(ActuatorError::Rejected(format!("unknown posture {}", name)));
        }

        info!("Posture {} (blend {})", name, blend_speed);
        state.stance = Some(name.to_string());
        state.journal.push(SimCommand::Stance {
            name: name.to_string(),
            blend_speed,
        });
        Ok(())
    }

    async fn set_joint_angles(
        &self,
        joint_names: &[&str],
        angles: &[f64],
        speed_fraction: f64,
    ) -> Result<(), ActuatorError> {
        let mut state = self.state.lock().await;
        self.check_connected(&state)?;
        check_speed(speed_fraction)?;
        if joint_names.len() != angles.len() {
            return Err(ActuatorError::Rejected(format!(
                "{} joints but {} angles",
                joint_names.len(),
                angles.len()
            )));
        }

        let mut head = state.head;
        for (name, angle) in joint_names.iter().zip(angles) {
            match *name {
                "HeadPitch" => head.pitch = clamp_joint(name, *angle, HEAD_PITCH_LIMITS),
                "HeadYaw" => head.yaw = clamp_joint(name, *angle, HEAD_YAW_LIMITS),
                other => return Err(ActuatorError::Rejected(format!("unknown joint {}", other))),
            }
        }

        info!("Head to pitch {:.4}, yaw {:.4}", head.pitch, head.yaw);
        state.head = head;
        state.journal.push(SimCommand::Head(head));
        Ok(())
    }

    async fn set_effector_position(
        &self,
        arm: ArmSide,
        frame: Frame,
        position: &Pose6,
        speed_fraction: f64,
        axis_mask: AxisMask,
    ) -> Result<(), ActuatorError> {
        let mut state = self.state.lock().await;
        self.check_connected(&state)?;
        check_speed(speed_fraction)?;
        if frame != Frame::Torso {
            return Err(ActuatorError::Rejected(format!(
                "only the torso frame is simulated, got frame {}",
                u8::from(frame)
            )));
        }
        if !axis_mask.is_valid() {
            return Err(ActuatorError::Rejected(format!("bad axis mask {}", axis_mask.bits())));
        }

        // Only the masked axes follow the command.
        let mut current = match arm {
            ArmSide::Left => state.left_arm,
            ArmSide::Right => state.right_arm,
        }
        .to_array();
        let target = position.to_array();
        for (axis, value) in current.iter_mut().enumerate() {
            if axis_mask.contains(AxisMask(1 << axis)) {
                *value = target[axis];
            }
        }
        let pose = Pose6::from(current);

        info!("{} to [{:.4}, {:.4}, {:.4}]", arm, pose.x, pose.y, pose.z);
        match arm {
            ArmSide::Left => state.left_arm = pose,
            ArmSide::Right => state.right_arm = pose,
        }
        state.journal.push(SimCommand::Arm {
            arm,
            frame,
            target: *position,
            axis_mask,
        });
        Ok(())
    }
}

#[async_trait]
impl SpeechPort for SimulatedRobot {
    async fn say(&self, text: &str) -> Result<(), ActuatorError> {
        let mut state = self.state.lock().await;
        self.check_connected(&state)?;
        info!("Saying {:?}", text);
        state.journal.push(SimCommand::Say(text.to_string()));
        Ok(())
    }
}
