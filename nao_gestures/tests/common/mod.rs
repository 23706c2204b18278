//! Recording test double shared by the integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use nao_gestures::{ActuatorError, ActuatorPort, ArmSide, AxisMask, Frame, Pose6, SpeechPort};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Stance {
        name: String,
        blend_speed: f64,
    },
    JointAngles {
        joints: Vec<String>,
        angles: Vec<f64>,
        speed_fraction: f64,
    },
    EffectorPosition {
        arm: ArmSide,
        frame: Frame,
        pose: Pose6,
        speed_fraction: f64,
        axis_mask: AxisMask,
    },
    Say(String),
}

impl Call {
    pub fn is_stance(&self) -> bool {
        matches!(self, Call::Stance { .. })
    }

    pub fn is_head(&self) -> bool {
        matches!(self, Call::JointAngles { .. })
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Call::EffectorPosition { .. })
    }
}

/// Records every port call with the (tokio) time it was made.
///
/// With `fail_at` set, the call with that zero-based index is rejected and
/// not recorded.
#[derive(Default)]
pub struct RecordingPort {
    log: Mutex<Vec<(Instant, Call)>>,
    attempts: Mutex<usize>,
    fail_at: Option<usize>,
}

impl RecordingPort {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.log.lock().unwrap().clone()
    }

    pub fn motion_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !matches!(c, Call::Say(_))).collect()
    }

    fn record(&self, call: Call) -> Result<(), ActuatorError> {
        let mut attempts = self.attempts.lock().unwrap();
        let index = *attempts;
        *attempts += 1;
        if self.fail_at == Some(index) {
            return Err(ActuatorError::Rejected(format!("call #{} refused", index)));
        }
        self.log.lock().unwrap().push((Instant::now(), call));
        Ok(())
    }
}

#[async_trait]
impl ActuatorPort for RecordingPort {
    async fn set_stance(&self, name: &str, blend_speed: f64) -> Result<(), ActuatorError> {
        self.record(Call::Stance {
            name: name.to_string(),
            blend_speed,
        })
    }

    async fn set_joint_angles(
        &self,
        joint_names: &[&str],
        angles: &[f64],
        speed_fraction: f64,
    ) -> Result<(), ActuatorError> {
        self.record(Call::JointAngles {
            joints: joint_names.iter().map(|j| j.to_string()).collect(),
            angles: angles.to_vec(),
            speed_fraction,
        })
    }

    async fn set_effector_position(
        &self,
        arm: ArmSide,
        frame: Frame,
        position: &Pose6,
        speed_fraction: f64,
        axis_mask: AxisMask,
    ) -> Result<(), ActuatorError> {
        self.record(Call::EffectorPosition {
            arm,
            frame,
            pose: *position,
            speed_fraction,
            axis_mask,
        })
    }
}

#[async_trait]
impl SpeechPort for RecordingPort {
    async fn say(&self, text: &str) -> Result<(), ActuatorError> {
        self.record(Call::Say(text.to_string()))
    }
}

/// Asserts `later - earlier` equals `expected`, allowing timer granularity.
pub fn assert_gap(earlier: Instant, later: Instant, expected: Duration) {
    let gap = later - earlier;
    assert!(
        gap >= expected && gap < expected + Duration::from_millis(5),
        "expected a gap of {:?}, got {:?}",
        expected,
        gap
    );
}
