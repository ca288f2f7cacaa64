use bevy_ecs::{intern::Interned, schedule::ScheduleLabel};

use crate::{math, prelude::*, probe};

pub(super) fn plugin(schedule: Interned<dyn ScheduleLabel>) -> impl Fn(&mut App) {
    move |app: &mut App| {
        app.add_systems(schedule, place_feet.in_set(SurefootSystems::PlaceFeet));
    }
}

fn place_feet(
    feet: Query<(&GlobalTransform, &Limb, &IkFootOf)>,
    mut bodies: Query<(&QuadrupedIk, &mut QuadrupedIkState)>,
    layers: Query<&CollisionLayers>,
    spatial_query: SpatialQuery,
) {
    for (foot_transform, &limb, foot_of) in &feet {
        let Ok((cfg, mut state)) = bodies.get_mut(foot_of.0) else {
            continue;
        };
        let (_, rotation, position) = foot_transform.to_scale_rotation_translation();
        let pose = LimbPose { position, rotation };
        let probe = probe::probe_ground(&spatial_query, &layers, cfg, pose.position);
        let target = state.limb_mut(limb);
        let (position, rotation) = place_limb(&pose, target, &probe, cfg);
        target.position = position;
        target.rotation = rotation;
        target.probe = probe;
    }
}

/// Computes a limb's target pose from its animated pose and a probe result.
///
/// A miss passes the animated pose through untouched, so the IK goes inert
/// over gaps and mid-jump. On a hit the target sits `foot_y_offset` above the
/// ground, raised further by the shortfall when the foot lags below the
/// previous target, and the animated orientation is tilted to follow the
/// surface.
pub(crate) fn place_limb(
    pose: &LimbPose,
    previous: &LimbTarget,
    probe: &GroundProbeResult,
    cfg: &QuadrupedIk,
) -> (Vec3, Quat) {
    if !probe.hit {
        return (pose.position, pose.rotation);
    }

    let mut y_offset = cfg.foot_y_offset;
    if pose.position.y < previous.position.y - cfg.foot_lag_slack {
        y_offset += previous.position.y - pose.position.y;
    }

    let angles = math::slope_angles(pose.rotation, probe.normal);
    let position = vec3(pose.position.x, probe.point.y + y_offset, pose.position.z);
    let rotation = math::tilted_rotation(pose.rotation, angles);
    (position, rotation)
}
