// Editor keyboard shortcuts
use bevy::prelude::*;

use crate::input::TextInputFocus;
use crate::interaction_lock::InteractionLock;
use crate::modal::{AgentConfigDraft, ModalRequest};
use crate::state::SceneState;

/// E: configure the first selected agent
pub fn configure_agent_shortcut(
    keys: Res<ButtonInput<KeyCode>>,
    text_focus: Res<TextInputFocus>,
    lock: Res<InteractionLock>,
    scene: Res<SceneState>,
    mut requests: EventWriter<ModalRequest>,
) {
    if lock.is_locked() || text_focus.0 || !keys.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Some(agent) = scene.selected_ids().first().and_then(|id| scene.agent(id)) else { return };
    requests.write(ModalRequest::ConfigureAgent(AgentConfigDraft::from_agent(agent)));
}

/// Shift+Tab: toggle between normal and build mode
pub fn mode_toggle_shortcut(
    keys: Res<ButtonInput<KeyCode>>,
    text_focus: Res<TextInputFocus>,
    lock: Res<InteractionLock>,
    mut scene: ResMut<SceneState>,
) {
    if lock.is_locked() || text_focus.0 {
        return;
    }
    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    if shift && keys.just_pressed(KeyCode::Tab) {
        scene.toggle_interaction_mode();
    }
}
