// Ground click handler - click-to-move plus a short pulse marker where the ground was hit
use bevy::prelude::*;

use crate::constants::*;
use crate::input::{now_ms, PointerEvent, PointerPhase};
use crate::interaction_lock::InteractionLock;
use crate::raycast::SceneView;
use crate::state::SceneState;
use crate::types::*;

/// Ground click feedback marker; the render layer gives it a ring mesh
#[derive(Component, Clone, Copy, Debug)]
pub struct GroundPulse {
    pub position: Vec3,
    pub started_at_ms: f64,
}

impl GroundPulse {
    /// Ease-out progress in [0, 1]
    pub fn eased_progress(&self, now_ms: f64) -> f32 {
        let progress = ((now_ms - self.started_at_ms) / PULSE_DURATION_MS).clamp(0.0, 1.0) as f32;
        1.0 - (1.0 - progress) * (1.0 - progress)
    }

    pub fn scale(&self, now_ms: f64) -> f32 {
        PULSE_START_SCALE + (PULSE_END_SCALE - PULSE_START_SCALE) * self.eased_progress(now_ms)
    }

    pub fn opacity(&self, now_ms: f64) -> f32 {
        PULSE_START_OPACITY * (1.0 - self.eased_progress(now_ms))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= PULSE_DURATION_MS
    }
}

/// System: ground clicks in normal mode
pub fn ground_click_system(
    mut commands: Commands,
    mut pointer_events: EventReader<PointerEvent>,
    mut scene: ResMut<SceneState>,
    mut lock: ResMut<InteractionLock>,
    scene_view: Res<SceneView>,
    transform_query: Query<&Transform>,
) {
    if lock.is_locked() || scene.mode() != InteractionMode::Normal {
        pointer_events.clear();
        return;
    }

    for event in pointer_events.read() {
        if event.phase != PointerPhase::Click || event.over_ui {
            continue;
        }
        // A box selection just ended on this release
        if lock.consume_ground_click_suppression(event.time_ms) {
            continue;
        }
        let Some(point) = scene_view.pointer_to_ground(event.position) else { continue };

        commands.spawn((
            GroundPulse { position: point, started_at_ms: event.time_ms },
            Transform::from_translation(point),
        ));

        if !scene.selected_ids().is_empty() {
            scene.issue_move_order(point, |agent| {
                agent.avatar.and_then(|e| transform_query.get(e).ok()).map(|t| t.translation)
            });
        }
    }
}

/// System: despawn pulses once their animation has run
pub fn expire_ground_pulses(mut commands: Commands, time: Res<Time<Real>>, pulses: Query<(Entity, &GroundPulse)>) {
    let now = now_ms(&time);
    for (entity, pulse) in pulses.iter() {
        if pulse.is_finished(now) {
            commands.entity(entity).despawn();
        }
    }
}
