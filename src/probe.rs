use tracing::error;

use crate::prelude::*;

/// Outcome of one downward ground probe.
///
/// A miss keeps the downstream math well defined: the normal defaults to
/// world-up and the point to the probe origin, so consumers never branch on
/// an uninitialized pose.
#[derive(Clone, Copy, Reflect, Debug)]
pub struct GroundProbeResult {
    pub hit: bool,
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance from the probe origin to the hit, not from the raised cast
    /// start.
    pub distance: f32,
    /// Collision layer memberships of the hit surface.
    pub layer: LayerMask,
}

impl Default for GroundProbeResult {
    fn default() -> Self {
        Self::missed(Vec3::ZERO)
    }
}

impl GroundProbeResult {
    pub fn missed(origin: Vec3) -> Self {
        Self {
            hit: false,
            point: origin,
            normal: Vec3::Y,
            distance: 0.0,
            layer: LayerMask::DEFAULT,
        }
    }
}

/// Casts a sphere from `added_height` above `origin` straight down.
///
/// A filter that matches no layers is a configuration mistake, reported once
/// per probe and treated exactly like a miss. Nothing here raises upward; a
/// perception failure must degrade, not halt the tick.
pub(crate) fn probe_ground(
    spatial_query: &SpatialQuery,
    layers: &Query<&CollisionLayers>,
    cfg: &QuadrupedIk,
    origin: Vec3,
) -> GroundProbeResult {
    if cfg.filter.mask == LayerMask::NONE {
        error!("ground probe filter matches no collision layers");
        return GroundProbeResult::missed(origin);
    }

    let start = origin + Vec3::Y * cfg.added_height;
    let shape = Collider::sphere(cfg.probe_radius);
    let config = ShapeCastConfig {
        max_distance: cfg.max_hit_distance,
        ..default()
    };
    let Some(hit) = spatial_query.cast_shape(
        &shape,
        start,
        Quat::IDENTITY,
        Dir3::NEG_Y,
        &config,
        &cfg.filter,
    ) else {
        return GroundProbeResult::missed(origin);
    };

    GroundProbeResult {
        hit: true,
        point: hit.point1,
        normal: hit.normal1,
        distance: hit.distance - cfg.added_height,
        layer: layers
            .get(hit.entity)
            .map(|layers| layers.memberships)
            .unwrap_or(LayerMask::DEFAULT),
    }
}
