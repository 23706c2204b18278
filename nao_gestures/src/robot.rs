use tracing::{info, warn};

use crate::ports::{ActuatorPort, SpeechPort};
use crate::{GestureConfig, GestureError, GestureSequencer, GestureType, Vector3};

/// Target used by [`GestureRobot::test_movements`]: ahead, to the right and up.
pub const SMOKE_TEST_TARGET: [f64; 3] = [1.0, -1.0, 1.0];

/// Gestures run by the smoke test, in order.
pub const SMOKE_TEST_GESTURES: [GestureType; 3] = [
    GestureType::Look,
    GestureType::Point,
    GestureType::LookAndPoint,
];

/// Application-level handle pairing the gesture sequencer with speech.
///
/// Speech bypasses the sequencer entirely and may be used while a gesture is
/// in progress.
pub struct GestureRobot<A, S> {
    sequencer: GestureSequencer<A>,
    speech: S,
}

impl<A: ActuatorPort, S: SpeechPort> GestureRobot<A, S> {
    pub fn new(config: GestureConfig, actuator: A, speech: S) -> Result<Self, GestureError> {
        Ok(Self {
            sequencer: GestureSequencer::new(config, actuator)?,
            speech,
        })
    }

    pub fn sequencer(&self) -> &GestureSequencer<A> {
        &self.sequencer
    }

    /// Reads `text` aloud.
    pub async fn speak(&self, text: &str) -> Result<(), GestureError> {
        info!("Saying {:?}", text);
        self.speech.say(text).await?;
        Ok(())
    }

    /// Performs the gesture named by `label` (`none`, `look`, `point` or
    /// `lookandpoint`) toward `target`.
    pub async fn do_gesture(&self, label: &str, target: Vector3) -> Result<(), GestureError> {
        self.sequencer.execute_named(label, target).await
    }

    /// Looks, points, then looks and points at [`SMOKE_TEST_TARGET`].
    ///
    /// Stops at the first failing gesture.
    pub async fn test_movements(&self) -> Result<(), GestureError> {
        let target = Vector3::from(SMOKE_TEST_TARGET);
        for gesture in SMOKE_TEST_GESTURES {
            if let Err(e) = self.sequencer.execute_gesture(gesture, target).await {
                if e.may_have_moved() {
                    warn!(
                        "Movement test stopped during {}; robot may be away from its stance",
                        gesture
                    );
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
