use serde::{Deserialize, Serialize};

/// Failures reported by the gesture core.
///
/// Every variant is surfaced to the caller of the sequencer; nothing is
/// retried or logged-and-dropped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureError {
    /// Unrecognized gesture type or arm label. Raised before any motion command.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Zero-length vector or out-of-domain trigonometric input.
    #[error("Computation error: {0}")]
    Computation(String),
    /// Passed through unmodified from the actuator port.
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Another gesture currently owns the actuators.
    #[error("A gesture is already executing")]
    Busy,
}

impl GestureError {
    pub(crate) fn zero_length() -> Self {
        GestureError::Computation("zero-length vector".to_string())
    }

    pub(crate) fn out_of_domain() -> Self {
        GestureError::Computation("out-of-domain value".to_string())
    }

    /// Whether any motion command may have been issued before this error.
    pub fn may_have_moved(&self) -> bool {
        !matches!(
            self,
            GestureError::Validation(_) | GestureError::Configuration(_) | GestureError::Busy
        )
    }
}

/// Errors raised by an [`ActuatorPort`](crate::ActuatorPort) or
/// [`SpeechPort`](crate::SpeechPort) implementation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("command rejected: {0}")]
    Rejected(String),
    #[error("robot appears to be disconnected")]
    Disconnected,
    #[error("I/O failure: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_error_converts_unmodified() {
        let err: GestureError = ActuatorError::Rejected("joint limit".to_string()).into();
        assert_eq!(
            err,
            GestureError::Actuator(ActuatorError::Rejected("joint limit".to_string()))
        );
        assert_eq!(err.to_string(), "Actuator error: command rejected: joint limit");
    }

    #[test]
    fn test_computation_messages() {
        assert_eq!(
            GestureError::zero_length().to_string(),
            "Computation error: zero-length vector"
        );
        assert_eq!(
            GestureError::out_of_domain().to_string(),
            "Computation error: out-of-domain value"
        );
    }

    #[test]
    fn test_pre_motion_errors() {
        assert!(!GestureError::Busy.may_have_moved());
        assert!(!GestureError::Validation("x".into()).may_have_moved());
        assert!(GestureError::zero_length().may_have_moved());
        assert!(GestureError::Actuator(ActuatorError::Disconnected).may_have_moved());
    }
}
