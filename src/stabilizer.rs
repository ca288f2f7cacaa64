use bevy_ecs::{intern::Interned, schedule::ScheduleLabel};

use crate::{math, prelude::*};

pub(super) fn plugin(schedule: Interned<dyn ScheduleLabel>) -> impl Fn(&mut App) {
    move |app: &mut App| {
        app.add_systems(
            schedule,
            stabilize_bodies.in_set(SurefootSystems::StabilizeBody),
        );
    }
}

/// Pitch/roll lean derived from the four sensed ground normals.
///
/// `lean` is the rate-limited output the host composes with its own yaw; it
/// is also the only cross-tick state of the stabilizer. Yaw stays with the
/// movement controller so the two never write the same axis.
#[derive(Clone, Copy, Reflect, Debug)]
pub struct StabilizerState {
    /// Renormalized average of the four limbs' last-sensed ground normals.
    pub average_normal: Vec3,
    /// Absolute pitch (`x`) and roll (`y`) the lean moves toward, already
    /// clamped to the configured tilt maxima. Radians.
    pub target: Vec2,
    /// Rate-limited pitch (`x`) and roll (`y`) output. Radians.
    pub lean: Vec2,
}

impl Default for StabilizerState {
    fn default() -> Self {
        Self {
            average_normal: Vec3::Y,
            target: Vec2::ZERO,
            lean: Vec2::ZERO,
        }
    }
}

impl StabilizerState {
    /// The body orientation the host should apply: its own yaw composed with
    /// the stabilized lean.
    pub fn body_rotation(&self, yaw: f32) -> Quat {
        Quat::from_euler(EulerRot::YXZ, yaw, self.lean.x, self.lean.y)
    }
}

fn stabilize_bodies(mut bodies: Query<(&QuadrupedIk, &Transform, &mut QuadrupedIkState)>) {
    for (cfg, transform, mut state) in &mut bodies {
        let normals = [
            state.limbs[0].probe.normal,
            state.limbs[1].probe.normal,
            state.limbs[2].probe.normal,
            state.limbs[3].probe.normal,
        ];
        let (_, pitch, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        let stabilizer = stabilize(
            cfg,
            transform.rotation,
            vec2(pitch, roll),
            &state.stabilizer,
            normals,
        );
        state.stabilizer = stabilizer;
    }
}

/// Advances the stabilizer by one tick.
///
/// The raw correction tilts the body's axes onto the averaged ground plane.
/// It is clamped so `current + correction` stays within the configured tilt
/// maxima (reduced to exactly reach the limit, never clipped past it), then
/// the lean moves toward that target by at most `max_rotation_step`, taking
/// the shortest angular path. Normals that cancel out average to world-up
/// instead of a zero vector.
pub(crate) fn stabilize(
    cfg: &QuadrupedIk,
    rotation: Quat,
    current: Vec2,
    previous: &StabilizerState,
    normals: [Vec3; 4],
) -> StabilizerState {
    let average_normal = (normals.into_iter().sum::<Vec3>() / 4.0).normalize_or(Vec3::Y);
    let raw = math::slope_angles(rotation, average_normal);
    let target = vec2(
        (current.x + raw.x).clamp(-cfg.max_rotation_x, cfg.max_rotation_x),
        (current.y + raw.y).clamp(-cfg.max_rotation_z, cfg.max_rotation_z),
    );
    let lean = vec2(
        math::move_towards_angle(previous.lean.x, target.x, cfg.max_rotation_step),
        math::move_towards_angle(previous.lean.y, target.y, cfg.max_rotation_step),
    );
    StabilizerState {
        average_normal,
        target,
        lean,
    }
}
