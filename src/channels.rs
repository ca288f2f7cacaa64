use bevy_platform::collections::HashMap;

use crate::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        RunFixedMainLoop,
        refresh_weights
            .in_set(SurefootSystems::RefreshWeights)
            .in_set(RunFixedMainLoopSystems::BeforeFixedMainLoop),
    );
}

/// Named scalar channels published by the host's animation layer.
///
/// The plugin only reads the four per-limb weight channels (see
/// [`Limb::weight_channel`]); any other entries are ignored. Writing happens
/// at the host's frame cadence, reading right before the fixed main loop, so
/// the fixed-tick pipeline always sees the most recently published values and
/// lags the animation system by at most one frame.
#[derive(Component, Clone, Default, Deref, DerefMut, Reflect, Debug)]
#[reflect(Component)]
pub struct AnimationChannels(HashMap<String, f32>);

/// Samples the per-limb weight channels into the limb targets.
///
/// A channel that was never published reads as 0, keeping the IK inert for
/// that limb. Out-of-range values are clamped to the valid weight range.
fn refresh_weights(mut bodies: Query<(&AnimationChannels, &mut QuadrupedIkState)>) {
    for (channels, mut state) in &mut bodies {
        for limb in Limb::ALL {
            let weight = channels
                .get(limb.weight_channel())
                .copied()
                .unwrap_or(0.0);
            state.limb_mut(limb).weight = weight.clamp(0.0, 1.0);
        }
    }
}
