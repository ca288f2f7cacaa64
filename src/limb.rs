use crate::prelude::*;

/// One of the four fixed ground-contact limbs.
///
/// Also used as a marker component on foot entities to tell the plugin which
/// slot of the target table that foot drives. Ordering only matters for the
/// diagonal pairing used by the envelope adjuster.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect)]
pub enum Limb {
    FrontRight,
    BackRight,
    BackLeft,
    FrontLeft,
}

impl Limb {
    pub const ALL: [Self; 4] = [
        Self::FrontRight,
        Self::BackRight,
        Self::BackLeft,
        Self::FrontLeft,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The limb on the opposite corner of the body.
    pub const fn diagonal(self) -> Self {
        match self {
            Self::FrontRight => Self::BackLeft,
            Self::BackRight => Self::FrontLeft,
            Self::BackLeft => Self::FrontRight,
            Self::FrontLeft => Self::BackRight,
        }
    }

    /// Name of the animation channel carrying this limb's IK blend weight.
    pub const fn weight_channel(self) -> &'static str {
        match self {
            Self::FrontRight => "front_right_foot_weight",
            Self::BackRight => "back_right_foot_weight",
            Self::BackLeft => "back_left_foot_weight",
            Self::FrontLeft => "front_left_foot_weight",
        }
    }
}

/// Marks an entity as one of the four feet of a [`QuadrupedIk`] body.
///
/// Spawn it on the foot bone together with a [`Limb`]; the foot's
/// [`GlobalTransform`] stays owned by the animation system and is only read
/// here.
#[derive(Component, Clone, Copy)]
#[relationship(relationship_target = IkFeet)]
pub struct IkFootOf(pub Entity);

/// All feet registered on a body.
#[derive(Component, Debug)]
#[relationship_target(relationship = IkFootOf)]
pub struct IkFeet(Vec<Entity>);

/// A limb's animation-driven pose, sampled once per fixed tick.
#[derive(Clone, Copy, Debug, Reflect)]
pub struct LimbPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Per-limb output record, consumed by the host's two-bone IK solver.
#[derive(Clone, Reflect, Debug)]
pub struct LimbTarget {
    pub position: Vec3,
    pub rotation: Quat,
    /// IK blend weight, passed through unchanged from the animation channels.
    pub weight: f32,
    /// The ground probe result this target was computed from.
    pub probe: GroundProbeResult,
}

impl Default for LimbTarget {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            weight: 0.0,
            probe: GroundProbeResult::default(),
        }
    }
}
