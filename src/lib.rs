#![doc = include_str!("../readme.md")]

/// Everything you need to get started with `bevy_surefoot`
pub mod prelude {
    pub(crate) use {
        avian3d::prelude::*,
        bevy_app::prelude::*,
        bevy_derive::{Deref, DerefMut},
        bevy_ecs::prelude::*,
        bevy_math::prelude::*,
        bevy_reflect::prelude::*,
        bevy_transform::prelude::*,
        bevy_utils::prelude::*,
    };

    pub use crate::{
        QuadrupedIk, QuadrupedIkState, SurefootPlugin, SurefootSystems,
        channels::AnimationChannels,
        envelope::{EnvelopeState, LimbExtension},
        limb::{IkFeet, IkFootOf, Limb, LimbPose, LimbTarget},
        probe::GroundProbeResult,
        stabilizer::StabilizerState,
    };
}

use crate::prelude::*;
use bevy_ecs::{
    intern::Interned, lifecycle::HookContext,
    relationship::RelationshipSourceCollection as _, schedule::ScheduleLabel,
    world::DeferredWorld,
};

pub mod channels;
pub mod envelope;
mod foot;
pub mod limb;
mod math;
pub mod probe;
pub mod stabilizer;

/// Also requires you to add [`PhysicsPlugins`] to work properly.
pub struct SurefootPlugin {
    schedule: Interned<dyn ScheduleLabel>,
}

impl SurefootPlugin {
    /// Create a new plugin in the given schedule. The default is [`FixedPostUpdate`].
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for SurefootPlugin {
    fn default() -> Self {
        Self {
            schedule: FixedPostUpdate.intern(),
        }
    }
}

impl Plugin for SurefootPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            self.schedule,
            (
                SurefootSystems::PlaceFeet,
                SurefootSystems::StabilizeBody,
                SurefootSystems::AdjustEnvelope,
            )
                .chain()
                .in_set(PhysicsSystems::First),
        )
        .add_plugins((
            channels::plugin,
            foot::plugin(self.schedule),
            stabilizer::plugin(self.schedule),
            envelope::plugin(self.schedule),
        ));
    }
}

/// System set used by all systems of `bevy_surefoot`.
///
/// The fixed-tick sets run chained in the order they are declared here.
/// [`SurefootSystems::RefreshWeights`] runs at frame cadence in
/// [`RunFixedMainLoop`] instead, before any fixed ticks of the same frame.
#[derive(SystemSet, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SurefootSystems {
    RefreshWeights,
    PlaceFeet,
    StabilizeBody,
    AdjustEnvelope,
}

/// Configuration for one four-legged character.
///
/// Distances are in world units, angles in radians. The defaults match a
/// large rig whose feet probe from 3 units above themselves and may reach
/// ground up to 2 units below.
#[derive(Component, Clone, Reflect, Debug)]
#[reflect(Component)]
#[require(QuadrupedIkState, AnimationChannels, Transform)]
#[component(on_add = QuadrupedIk::on_add)]
pub struct QuadrupedIk {
    pub filter: SpatialQueryFilter,
    /// Radius of the volumetric ground probe.
    pub probe_radius: f32,
    /// Maximum probe length, measured from the raised cast start.
    pub max_hit_distance: f32,
    /// How far above a foot the probe starts.
    pub added_height: f32,
    /// Vertical clearance between the ground hit and the foot target.
    pub foot_y_offset: f32,
    /// How far a foot may lag below its previous target before the target
    /// is biased upward by the shortfall.
    pub foot_lag_slack: f32,
    /// Body-local target height above which a limb counts as over-extended.
    pub upper_foot_y_limit: f32,
    /// Body-local target height below which a limb counts as compressed.
    pub lower_foot_y_limit: f32,
    pub max_rotation_x: f32,
    pub max_rotation_z: f32,
    /// Largest change of the body lean per fixed tick.
    pub max_rotation_step: f32,
    pub envelope_step: f32,
    pub envelope_lower_limit: f32,
    pub envelope_upper_limit: f32,
    /// Offset the envelope snaps to when it would drop past the lower limit.
    pub envelope_reset_offset: f32,
}

impl Default for QuadrupedIk {
    fn default() -> Self {
        Self {
            filter: SpatialQueryFilter::default(),
            probe_radius: 0.2,
            max_hit_distance: 5.0,
            added_height: 3.0,
            foot_y_offset: 0.15,
            foot_lag_slack: 0.1,
            upper_foot_y_limit: 0.3,
            lower_foot_y_limit: -0.1,
            max_rotation_x: 50.0_f32.to_radians(),
            max_rotation_z: 20.0_f32.to_radians(),
            max_rotation_step: 1.0_f32.to_radians(),
            envelope_step: 0.05,
            envelope_lower_limit: -1.4,
            envelope_upper_limit: 1.5,
            envelope_reset_offset: 3.4,
        }
    }
}

impl QuadrupedIk {
    fn on_add(mut world: DeferredWorld, ctx: HookContext) {
        let Some(mut ik) = world.get_mut::<Self>(ctx.entity) else {
            return;
        };
        // The probe must see the ground, not the character's own colliders.
        ik.filter.excluded_entities.add(ctx.entity);
    }
}

/// Everything this crate computes, for the host to apply.
///
/// Per limb: the target pose and blend weight for a two-bone IK solver.
/// For the body: the stabilized pitch/roll lean, to be composed with the
/// yaw owned by the movement controller. For the collider: the vertical
/// envelope center offset.
#[derive(Component, Clone, Reflect, Default, Debug)]
#[reflect(Component)]
pub struct QuadrupedIkState {
    pub limbs: [LimbTarget; 4],
    pub stabilizer: StabilizerState,
    pub envelope: EnvelopeState,
}

impl QuadrupedIkState {
    pub fn limb(&self, limb: Limb) -> &LimbTarget {
        &self.limbs[limb.index()]
    }

    pub fn limb_mut(&mut self, limb: Limb) -> &mut LimbTarget {
        &mut self.limbs[limb.index()]
    }
}
