//! Target geometry for deictic gestures.
//!
//! Converts a target in the torso frame into head angles and an approximate
//! arm reach target. All functions are pure.
//!
//! # Examples
//!
//! ```rust
//! use nao_gestures::{compute_pitch_yaw, Vector3};
//!
//! let head_offset = Vector3::new(0.0, 0.0, 0.1265);
//! let angles = compute_pitch_yaw(&Vector3::new(1.0, 0.0, 0.1265), &head_offset).unwrap();
//! assert!(angles.pitch.abs() < 1e-12);
//! assert!(angles.yaw.abs() < 1e-12);
//! ```
//!
//! # Notes
//!
//! - The arm target is not an IK solve. The shoulder-to-target direction is
//!   rescaled to a fixed arm length and the orientation is left at zero.
//! - Yaw is `acos` of the forward component, signed by the lateral component.
//!   A lateral component of exactly zero counts as non-negative.

use crate::{GestureError, HeadAngles, Pose6, Vector3};

/// Euclidean norm. Total for every input, including the zero vector.
///
/// Components are scaled by the largest one before squaring, so very large
/// and very small vectors neither overflow nor flush to zero.
pub fn magnitude(v: &Vector3) -> f64 {
    if v.iter().any(|c| c.is_nan()) {
        return f64::NAN;
    }
    let scale = v.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }
    let scaled = v / scale;
    scale * (scaled.x * scaled.x + scaled.y * scaled.y + scaled.z * scaled.z).sqrt()
}

/// Returns `v` scaled to unit length along with its original magnitude.
fn normalize(v: &Vector3) -> Result<(Vector3, f64), GestureError> {
    let magn = magnitude(v);
    if magn == 0.0 {
        return Err(GestureError::zero_length());
    }
    if !magn.is_finite() {
        return Err(GestureError::out_of_domain());
    }
    Ok((v.map(|c| c / magn), magn))
}

/// Clamp drift just outside [-1, 1] back onto the asin/acos domain.
fn clamp_unit(value: f64) -> Result<f64, GestureError> {
    if !value.is_finite() {
        return Err(GestureError::out_of_domain());
    }
    Ok(value.clamp(-1.0, 1.0))
}

/// Head pitch and yaw that aim the head at `target`.
///
/// # Errors
///
/// `GestureError::Computation` when `target` coincides with `head_offset`
/// or a component is not finite.
pub fn compute_pitch_yaw(target: &Vector3, head_offset: &Vector3) -> Result<HeadAngles, GestureError> {
    let (unit, _) = normalize(&(target - head_offset))?;

    let pitch = -clamp_unit(unit.z)?.asin();
    let mut yaw = clamp_unit(unit.x)?.acos();
    if unit.y < 0.0 {
        yaw = -yaw;
    }
    Ok(HeadAngles { pitch, yaw })
}

/// Arm effector pose pointing at `target`.
///
/// The shoulder-to-target vector is rescaled to `arm_length` and moved back
/// into the torso frame. Orientation is always zero.
///
/// # Errors
///
/// * `GestureError::Validation` if `arm_length` is not positive.
/// * `GestureError::Computation` when `target` coincides with `shoulder_offset`.
pub fn compute_arm_target(
    target: &Vector3,
    shoulder_offset: &Vector3,
    arm_length: f64,
) -> Result<Pose6, GestureError> {
    if !(arm_length > 0.0 && arm_length.is_finite()) {
        return Err(GestureError::Validation(format!(
            "arm length must be positive, got {}",
            arm_length
        )));
    }

    let shoulder_relative = target - shoulder_offset;
    let (_, magn) = normalize(&shoulder_relative)?;
    let ratio = arm_length / magn;
    let reach = shoulder_relative * ratio + shoulder_offset;

    Ok(Pose6::from_position(&reach))
}
