use crate::prelude::*;
use core::f32::consts::{PI, TAU};

/// Vector rejection: removes the component of `vector` along `normal`.
pub(crate) fn project_onto_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Angle from `from` to `to`, signed by the winding around `axis`.
/// Degenerate inputs contribute no angle.
pub(crate) fn signed_angle_about(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return 0.0;
    }
    let angle = from.angle_between(to);
    if from.cross(to).dot(axis) < 0.0 { -angle } else { angle }
}

/// Wraps an angle to (-PI, PI].
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Advances `current` toward `target` along the shortest angular path,
/// by at most `max_delta`. Never overshoots.
pub(crate) fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_delta {
        current + delta
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Pitch/roll corrections that tilt `rotation`'s forward and right axes onto
/// the plane with the given `normal`.
///
/// `x` is measured about the local right axis, `y` about the local +Z axis,
/// so the pair composes with [`tilted_rotation`] or adds onto `YXZ` Euler
/// components.
pub(crate) fn slope_angles(rotation: Quat, normal: Vec3) -> Vec2 {
    let forward = rotation * Vec3::NEG_Z;
    let right = rotation * Vec3::X;
    let back = rotation * Vec3::Z;
    vec2(
        signed_angle_about(forward, project_onto_plane(forward, normal), right),
        signed_angle_about(right, project_onto_plane(right, normal), back),
    )
}

/// Applies [`slope_angles`] corrections as additive rotations about the
/// rotation's own local X and Z axes.
pub(crate) fn tilted_rotation(rotation: Quat, angles: Vec2) -> Quat {
    let right = rotation * Vec3::X;
    let back = rotation * Vec3::Z;
    Quat::from_axis_angle(right, angles.x) * Quat::from_axis_angle(back, angles.y) * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn projection_removes_normal_component() {
        let projected = project_onto_plane(vec3(1.0, 2.0, 3.0), Vec3::Y);
        assert!(projected.abs_diff_eq(vec3(1.0, 0.0, 3.0), TOLERANCE));
        assert!(projected.dot(Vec3::Y).abs() < TOLERANCE);
    }

    #[test]
    fn signed_angle_follows_winding() {
        assert!((signed_angle_about(Vec3::X, Vec3::Y, Vec3::Z) - FRAC_PI_2).abs() < TOLERANCE);
        assert!((signed_angle_about(Vec3::Y, Vec3::X, Vec3::Z) + FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn signed_angle_of_degenerate_input_is_zero() {
        assert_eq!(signed_angle_about(Vec3::ZERO, Vec3::X, Vec3::Z), 0.0);
        assert_eq!(signed_angle_about(Vec3::X, Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < TOLERANCE);
        assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < TOLERANCE);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < TOLERANCE);
    }

    #[test]
    fn move_towards_angle_never_overshoots() {
        assert!((move_towards_angle(0.0, 0.3, 0.1) - 0.1).abs() < TOLERANCE);
        assert!((move_towards_angle(0.0, 0.05, 0.1) - 0.05).abs() < TOLERANCE);
    }

    #[test]
    fn move_towards_angle_takes_shortest_path() {
        // 3.0 rad to -3.0 rad is a short hop across the PI seam, upward.
        let next = move_towards_angle(3.0, -3.0, 0.1);
        assert!((next - 3.1).abs() < TOLERANCE);
    }

    #[test]
    fn flat_ground_needs_no_correction() {
        let angles = slope_angles(Quat::IDENTITY, Vec3::Y);
        assert!(angles.abs_diff_eq(Vec2::ZERO, TOLERANCE));
    }

    #[test]
    fn normal_parallel_to_axis_contributes_no_angle() {
        // A wall normal along forward projects forward to zero length.
        let angles = slope_angles(Quat::IDENTITY, Vec3::NEG_Z);
        assert!(angles.x.abs() < TOLERANCE);
    }

    #[test]
    fn pitch_correction_matches_slope_about_x() {
        let normal = Quat::from_rotation_x(0.3) * Vec3::Y;
        let angles = slope_angles(Quat::IDENTITY, normal);
        assert!((angles.x - 0.3).abs() < TOLERANCE);
        assert!(angles.y.abs() < TOLERANCE);
    }

    #[test]
    fn tilted_rotation_lays_axes_into_the_plane() {
        let normal = (Quat::from_rotation_x(0.3) * Quat::from_rotation_z(0.2)) * Vec3::Y;
        let angles = slope_angles(Quat::IDENTITY, normal);
        let tilted = tilted_rotation(Quat::IDENTITY, angles);
        let forward = tilted * Vec3::NEG_Z;
        assert!(forward.dot(normal).abs() < 1e-2);
    }

    #[test]
    fn roll_correction_matches_euler_composition() {
        let normal = Quat::from_rotation_z(0.25) * Vec3::Y;
        let angles = slope_angles(Quat::IDENTITY, normal);
        let composed = Quat::from_euler(EulerRot::YXZ, 0.0, angles.x, angles.y);
        let right = composed * Vec3::X;
        assert!(right.dot(normal).abs() < TOLERANCE);
    }
}
