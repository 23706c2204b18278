use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::geometry::{compute_arm_target, compute_pitch_yaw};
use crate::ports::ActuatorPort;
use crate::selector::select_arm_for;
use crate::{
    ArmSide, Effector, GestureError, GestureRequest, GestureType, HeadAngles, Pose6, Vector3,
    HEAD_JOINTS,
};

use super::{CommandPayload, EffectorCommand, GestureConfig, Motion, SequencerEvent, SequencerState};

/// Turns gesture requests into ordered, timed effector commands.
///
/// One gesture runs at a time. A second call made while a gesture is in
/// progress is rejected with [`GestureError::Busy`] without touching the
/// actuators.
///
/// Every accepted gesture, including [`GestureType::None`], is bracketed by
/// two stance commands. Motion completion is never observed; the configured
/// [`WaitPolicy`](super::WaitPolicy) holds are slept instead.
///
/// # Example
///
/// ```rust,ignore
/// let sequencer = GestureSequencer::new(GestureConfig::default(), robot)?;
/// sequencer.execute_gesture(GestureType::Look, Vector3::new(1.0, -1.0, 1.0)).await?;
/// ```
#[derive(Debug)]
pub struct GestureSequencer<A> {
    config: GestureConfig,
    actuator: A,
    state: Mutex<SequencerState>,
    exclusive: Mutex<()>,
    event_channel: broadcast::Sender<SequencerEvent>,
}

impl<A: ActuatorPort> GestureSequencer<A> {
    /// Builds a sequencer after validating `config`.
    ///
    /// # Errors
    ///
    /// `GestureError::Configuration` if any configured value is out of range.
    pub fn new(config: GestureConfig, actuator: A) -> Result<Self, GestureError> {
        config.validate()?;
        let (event_channel, _rx) = broadcast::channel(100);
        Ok(Self {
            config,
            actuator,
            state: Mutex::new(SequencerState::Idle),
            exclusive: Mutex::new(()),
            event_channel,
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub async fn state(&self) -> SequencerState {
        *self.state.lock().await
    }

    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SequencerEvent> {
        self.event_channel.subscribe()
    }

    /// Parses `label` and executes the gesture.
    ///
    /// An unrecognized label fails with `GestureError::Validation` before any
    /// command is sent, stance commands included.
    pub async fn execute_named(&self, label: &str, target: Vector3) -> Result<(), GestureError> {
        let gesture: GestureType = label.parse().map_err(|e: GestureError| {
            warn!("Rejected gesture request: {}", e);
            e
        })?;
        self.execute_gesture(gesture, target).await
    }

    pub async fn perform(&self, request: &GestureRequest) -> Result<(), GestureError> {
        self.execute_gesture(request.gesture, request.target()).await
    }

    /// Runs one full gesture: stance, motion with holds, stance again.
    ///
    /// # Errors
    ///
    /// * `Busy` if another gesture is executing.
    /// * `Computation` if the target coincides with the head or the shoulder.
    ///   Commands already sent stay in effect.
    /// * `Actuator` as returned by the port. Nothing further is sent.
    pub async fn execute_gesture(&self, gesture: GestureType, target: Vector3) -> Result<(), GestureError> {
        let _guard = self.exclusive.try_lock().map_err(|_| {
            warn!("Rejected {} gesture: another gesture is executing", gesture);
            GestureError::Busy
        })?;

        info!(
            "Starting {} gesture toward [{:.3}, {:.3}, {:.3}]",
            gesture, target.x, target.y, target.z
        );
        let result = self.run(gesture, &target).await;
        self.transition(SequencerState::Idle).await;

        match &result {
            Ok(()) => {
                info!("Finished {} gesture", gesture);
                self.emit(SequencerEvent::Completed(gesture));
            }
            Err(e) => {
                warn!("{} gesture aborted: {}", gesture, e);
                self.emit(SequencerEvent::Failed(e.clone()));
            }
        }
        result
    }

    async fn run(&self, gesture: GestureType, target: &Vector3) -> Result<(), GestureError> {
        self.transition(SequencerState::PoseToGestureStance).await;
        self.go_to_stance().await?;

        self.transition(SequencerState::Executing).await;
        match gesture {
            GestureType::None => {}
            GestureType::Look => self.look(target).await?,
            GestureType::Point => self.point(select_arm_for(target), target).await?,
            GestureType::LookAndPoint => self.look_and_point(select_arm_for(target), target).await?,
        }

        self.transition(SequencerState::PoseToRestStance).await;
        self.go_to_stance().await
    }

    async fn look(&self, target: &Vector3) -> Result<(), GestureError> {
        let angles = compute_pitch_yaw(target, &self.config.head_offset())?;
        let hold = self.config.waits.look_hold;

        self.dispatch(&self.head_command(angles)).await?;
        self.hold(hold).await;
        self.dispatch(&self.head_command(HeadAngles::CENTER)).await?;
        self.hold(hold).await;
        Ok(())
    }

    async fn point(&self, arm: ArmSide, target: &Vector3) -> Result<(), GestureError> {
        let reach = self.arm_target(arm, target)?;
        let hold = self.config.waits.point_hold;

        self.dispatch(&self.arm_command(arm, reach)).await?;
        self.hold(hold).await;
        self.dispatch(&self.arm_command(arm, self.config.rest_pose(arm))).await?;
        self.hold(hold).await;
        Ok(())
    }

    async fn look_and_point(&self, arm: ArmSide, target: &Vector3) -> Result<(), GestureError> {
        let angles = compute_pitch_yaw(target, &self.config.head_offset())?;
        let reach = self.arm_target(arm, target)?;
        let hold = self.config.waits.look_and_point_hold;

        // Arm and head are sent back to back so both effectors move together.
        self.dispatch(&self.arm_command(arm, reach)).await?;
        self.dispatch(&self.head_command(angles)).await?;
        self.hold(hold).await;

        self.dispatch(&self.arm_command(arm, self.config.rest_pose(arm))).await?;
        self.dispatch(&self.head_command(HeadAngles::CENTER)).await?;
        self.hold(hold).await;
        Ok(())
    }

    fn arm_target(&self, arm: ArmSide, target: &Vector3) -> Result<Pose6, GestureError> {
        compute_arm_target(target, &self.config.shoulder_offset(arm), self.config.arm_length)
    }

    fn head_command(&self, angles: HeadAngles) -> EffectorCommand {
        EffectorCommand {
            effector: Effector::Head,
            payload: CommandPayload::Angles(angles),
            speed_fraction: self.config.head_speed_fraction,
            frame: self.config.frame,
            axis_mask: self.config.axis_mask,
        }
    }

    fn arm_command(&self, arm: ArmSide, pose: Pose6) -> EffectorCommand {
        EffectorCommand {
            effector: arm.effector(),
            payload: CommandPayload::Pose(pose),
            speed_fraction: self.config.arm_speed_fraction,
            frame: self.config.frame,
            axis_mask: self.config.axis_mask,
        }
    }

    async fn go_to_stance(&self) -> Result<(), GestureError> {
        let name = &self.config.stance_name;
        debug!("Stance {} (blend {})", name, self.config.stance_blend_speed);
        self.actuator
            .set_stance(name, self.config.stance_blend_speed)
            .await?;
        self.emit(SequencerEvent::StanceIssued(name.clone()));
        Ok(())
    }

    async fn dispatch(&self, command: &EffectorCommand) -> Result<(), GestureError> {
        match command.validate()? {
            Motion::Head(angles) => {
                debug!("Head to pitch {:.4}, yaw {:.4}", angles.pitch, angles.yaw);
                self.actuator
                    .set_joint_angles(&HEAD_JOINTS, &angles.as_array(), command.speed_fraction)
                    .await?;
            }
            Motion::Arm(arm, pose) => {
                debug!("{} to [{:.4}, {:.4}, {:.4}]", arm, pose.x, pose.y, pose.z);
                self.actuator
                    .set_effector_position(
                        arm,
                        command.frame,
                        pose,
                        command.speed_fraction,
                        command.axis_mask,
                    )
                    .await?;
            }
        }
        self.emit(SequencerEvent::CommandIssued(*command));
        Ok(())
    }

    async fn hold(&self, duration: Duration) {
        self.emit(SequencerEvent::Holding(duration));
        sleep(duration).await;
    }

    async fn transition(&self, next: SequencerState) {
        let mut state = self.state.lock().await;
        if *state != next {
            debug!("Sequencer {:?} -> {:?}", *state, next);
            *state = next;
            self.emit(SequencerEvent::StateChanged(next));
        }
    }

    fn emit(&self, event: SequencerEvent) {
        // No subscribers is fine.
        let _ = self.event_channel.send(event);
    }
}
