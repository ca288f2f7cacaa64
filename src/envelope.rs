use bevy_ecs::{intern::Interned, schedule::ScheduleLabel};

use crate::prelude::*;

pub(super) fn plugin(schedule: Interned<dyn ScheduleLabel>) -> impl Fn(&mut App) {
    move |app: &mut App| {
        app.add_systems(
            schedule,
            adjust_envelopes.in_set(SurefootSystems::AdjustEnvelope),
        );
    }
}

/// Stretch classification of one limb, from its target's body-local height.
#[derive(Clone, Copy, PartialEq, Eq, Default, Reflect, Debug)]
pub enum LimbExtension {
    #[default]
    Normal,
    /// Target above the upper limit: the leg is pushed up into the body.
    OverExtended,
    /// Target below the lower limit: the leg reaches down.
    Compressed,
}

/// Vertical center offset for the host's collision volume, plus the per-limb
/// classifications it was derived from this tick.
///
/// The offset only moves when a diagonal limb pair agrees on a state. Its two
/// extremes behave differently: the upper bound is a hard clamp, while
/// crossing the lower bound snaps the offset back to a tall reset value.
#[derive(Clone, Copy, Reflect, Default, Debug)]
pub struct EnvelopeState {
    pub offset: f32,
    pub extensions: [LimbExtension; 4],
}

fn adjust_envelopes(mut bodies: Query<(&QuadrupedIk, &Transform, &mut QuadrupedIkState)>) {
    for (cfg, transform, mut state) in &mut bodies {
        let state = &mut *state;
        for limb in Limb::ALL {
            let target = &state.limbs[limb.index()];
            let local = transform.rotation.inverse() * (target.position - transform.translation);
            state.envelope.extensions[limb.index()] = classify(local.y, cfg);
        }
        adjust_envelope(&mut state.envelope, cfg);
    }
}

fn classify(local_height: f32, cfg: &QuadrupedIk) -> LimbExtension {
    if local_height > cfg.upper_foot_y_limit {
        LimbExtension::OverExtended
    } else if local_height < cfg.lower_foot_y_limit {
        LimbExtension::Compressed
    } else {
        LimbExtension::Normal
    }
}

/// Whether either diagonal pair is entirely in the given state.
fn diagonals_agree(extensions: &[LimbExtension; 4], extension: LimbExtension) -> bool {
    [Limb::FrontRight, Limb::BackRight].into_iter().any(|limb| {
        extensions[limb.index()] == extension && extensions[limb.diagonal().index()] == extension
    })
}

/// Nudges the envelope offset from this tick's limb classifications.
///
/// Diagonal over-extension lowers the offset one step per tick until it sits
/// at or below the lower limit, where the next step snaps it to the reset
/// offset instead. Diagonal compression raises it one step per tick, clamped
/// at the upper limit. Anything short of diagonal agreement leaves the offset
/// untouched.
pub(crate) fn adjust_envelope(state: &mut EnvelopeState, cfg: &QuadrupedIk) {
    if diagonals_agree(&state.extensions, LimbExtension::OverExtended) {
        if state.offset > cfg.envelope_lower_limit {
            state.offset -= cfg.envelope_step;
        } else {
            state.offset = cfg.envelope_reset_offset;
        }
    } else if diagonals_agree(&state.extensions, LimbExtension::Compressed) {
        state.offset = (state.offset + cfg.envelope_step).min(cfg.envelope_upper_limit);
    }
}
