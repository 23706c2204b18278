//! Capability interfaces the gesture core drives.
//!
//! The sequencer only ever talks to the robot through [`ActuatorPort`]. Speech
//! is a separate port owned by the application and never touched by the
//! sequencer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ActuatorError, ArmSide, AxisMask, Frame, Pose6};

/// Motion and posture commands.
///
/// Calls are fire-and-forget: an `Ok` means the command was accepted, not
/// that the motion has finished.
#[async_trait]
pub trait ActuatorPort: Send + Sync {
    /// Blend the whole body into the named posture.
    async fn set_stance(&self, name: &str, blend_speed: f64) -> Result<(), ActuatorError>;

    /// Drive the named joints to `angles` (radians), in the same order.
    async fn set_joint_angles(
        &self,
        joint_names: &[&str],
        angles: &[f64],
        speed_fraction: f64,
    ) -> Result<(), ActuatorError>;

    /// Move an arm's end effector to a Cartesian pose.
    async fn set_effector_position(
        &self,
        arm: ArmSide,
        frame: Frame,
        position: &Pose6,
        speed_fraction: f64,
        axis_mask: AxisMask,
    ) -> Result<(), ActuatorError>;
}

#[async_trait]
pub trait SpeechPort: Send + Sync {
    async fn say(&self, text: &str) -> Result<(), ActuatorError>;
}

#[async_trait]
impl<T: ActuatorPort + ?Sized> ActuatorPort for Arc<T> {
    async fn set_stance(&self, name: &str, blend_speed: f64) -> Result<(), ActuatorError> {
        (**self).set_stance(name, blend_speed).await
    }

    async fn set_joint_angles(
        &self,
        joint_names: &[&str],
        angles: &[f64],
        speed_fraction: f64,
    ) -> Result<(), ActuatorError> {
        (**self).set_joint_angles(joint_names, angles, speed_fraction).await
    }

    async fn set_effector_position(
        &self,
        arm: ArmSide,
        frame: Frame,
        position: &Pose6,
        speed_fraction: f64,
        axis_mask: AxisMask,
    ) -> Result<(), ActuatorError> {
        (**self)
            .set_effector_position(arm, frame, position, speed_fraction, axis_mask)
            .await
    }
}

#[async_trait]
impl<T: SpeechPort + ?Sized> SpeechPort for Arc<T> {
    async fn say(&self, text: &str) -> Result<(), ActuatorError> {
        (**self).say(text).await
    }
}
