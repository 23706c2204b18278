use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ArmSide, AxisMask, Effector, Frame, GestureError, GestureType, HeadAngles, Pose6};

/// Where the sequencer is within one gesture execution.
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    PoseToGestureStance,
    Executing,
    PoseToRestStance,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq)]
pub enum CommandPayload {
    Angles(HeadAngles),
    Pose(Pose6),
}

/// A single motion command produced and dispatched within one gesture.
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq)]
pub struct EffectorCommand {
    pub effector: Effector,
    pub payload: CommandPayload,
    pub speed_fraction: f64,
    pub frame: Frame,
    pub axis_mask: AxisMask,
}

/// A validated command, split by the port call that carries it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion<'a> {
    Head(&'a HeadAngles),
    Arm(ArmSide, &'a Pose6),
}

impl EffectorCommand {
    /// Checks the speed and that the payload suits the effector.
    pub fn validate(&self) -> Result<Motion<'_>, GestureError> {
        if !(self.speed_fraction > 0.0 && self.speed_fraction <= 1.0) {
            return Err(GestureError::Validation(format!(
                "speed fraction must be in (0, 1], got {}",
                self.speed_fraction
            )));
        }
        match (self.effector.arm_side(), &self.payload) {
            (None, CommandPayload::Angles(angles)) => Ok(Motion::Head(angles)),
            (Some(arm), CommandPayload::Pose(pose)) => Ok(Motion::Arm(arm, pose)),
            (_, payload) => Err(GestureError::Validation(format!(
                "{:?} cannot take {:?}",
                self.effector, payload
            ))),
        }
    }
}

/// Progress notifications broadcast by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    StateChanged(SequencerState),
    StanceIssued(String),
    CommandIssued(EffectorCommand),
    Holding(Duration),
    Completed(GestureType),
    Failed(GestureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_command(speed_fraction: f64) -> EffectorCommand {
        EffectorCommand {
            effector: Effector::Head,
            payload: CommandPayload::Angles(HeadAngles::CENTER),
            speed_fraction,
            frame: Frame::Torso,
            axis_mask: AxisMask::POSITION,
        }
    }

    #[test]
    fn test_speed_fraction_bounds() {
        assert!(head_command(1.0).validate().is_ok());
        assert!(head_command(0.1).validate().is_ok());
        assert!(head_command(0.0).validate().is_err());
        assert!(head_command(1.01).validate().is_err());
    }

    #[test]
    fn test_payload_must_match_effector() {
        let mut command = head_command(0.5);
        command.effector = Effector::LeftArm;
        assert!(matches!(command.validate(), Err(GestureError::Validation(_))));

        let pose = Pose6::default();
        command.payload = CommandPayload::Pose(pose);
        assert_eq!(command.validate(), Ok(Motion::Arm(ArmSide::Left, &pose)));

        command.effector = Effector::Head;
        assert!(matches!(command.validate(), Err(GestureError::Validation(_))));
        command.payload = CommandPayload::Angles(HeadAngles::CENTER);
        assert_eq!(command.validate(), Ok(Motion::Head(&HeadAngles::CENTER)));
    }
}
