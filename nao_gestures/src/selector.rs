use crate::{ArmSide, Vector3};

/// Picks the arm that points at a target with lateral component `target_y`.
///
/// Non-negative y (the robot's left, including exactly zero) selects the left
/// arm, negative y the right arm.
pub fn select_arm(target_y: f64) -> ArmSide {
    if target_y >= 0.0 {
        ArmSide::Left
    } else {
        ArmSide::Right
    }
}

/// [`select_arm`] applied to the lateral component of `target`.
pub fn select_arm_for(target: &Vector3) -> ArmSide {
    select_arm(target.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_for_non_negative_y() {
        for y in [0.0, -0.0, f64::MIN_POSITIVE, 0.5, 1e9, f64::INFINITY] {
            assert_eq!(select_arm(y), ArmSide::Left, "y = {}", y);
        }
    }

    #[test]
    fn test_right_for_negative_y() {
        for y in [-f64::MIN_POSITIVE, -0.5, -1e9, f64::NEG_INFINITY] {
            assert_eq!(select_arm(y), ArmSide::Right, "y = {}", y);
        }
    }

    #[test]
    fn test_select_from_vector() {
        assert_eq!(select_arm_for(&Vector3::new(1.0, -1.0, 1.0)), ArmSide::Right);
        assert_eq!(select_arm_for(&Vector3::new(1.0, 0.0, 1.0)), ArmSide::Left);
    }
}
