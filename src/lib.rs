// Agent scene editor: selection, click-to-move and zone building on a ground grid
//
// Two plugins:
// - InteractionCorePlugin: shared state and every interaction rule. Runs headless.
// - EditorRenderPlugin: window input, camera, meshes, gizmos and UI on top of the core.

pub mod agent;
pub mod animation;
pub mod cli;
pub mod constants;
pub mod formation;
pub mod hud;
pub mod input;
pub mod interaction_lock;
pub mod math_utils;
pub mod modal;
pub mod movement;
pub mod probe;
pub mod raycast;
pub mod selection;
pub mod setup;
pub mod shortcuts;
pub mod state;
pub mod types;
pub mod zones;

#[cfg(test)]
mod test_harness;

use bevy::prelude::*;

use input::{PointerEvent, TextInputFocus};
use interaction_lock::InteractionLock;
use modal::{ModalOutcome, ModalRequest, ModalState};
use probe::ProbeConfig;
use raycast::SceneView;
use selection::BoxSelectionState;
use state::{SceneState, StateChanged};
use zones::{NotificationTimer, ZoneBuildState};

/// Frame phases of the editor, run in order each update
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorSet {
    /// Agent registration
    Sync,
    /// Pointer, keyboard and modal handling
    Input,
    /// Per-frame integration and expiry
    Frame,
    /// Drain state changes into `StateChanged` events
    Publish,
}

pub struct InteractionCorePlugin;

impl Plugin for InteractionCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneState>()
            .init_resource::<InteractionLock>()
            .init_resource::<SceneView>()
            .init_resource::<TextInputFocus>()
            .init_resource::<ModalState>()
            .init_resource::<BoxSelectionState>()
            .init_resource::<ZoneBuildState>()
            .init_resource::<NotificationTimer>()
            .init_resource::<ProbeConfig>()
            // Normally owned by InputPlugin; present here so the core runs without it
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<PointerEvent>()
            .add_event::<StateChanged>()
            .add_event::<ModalRequest>()
            .add_event::<ModalOutcome>()
            .configure_sets(
                Update,
                (EditorSet::Sync, EditorSet::Input, EditorSet::Frame, EditorSet::Publish).chain(),
            )
            .add_systems(
                Update,
                (agent::register_spawned_agents, agent::unregister_despawned_agents).in_set(EditorSet::Sync),
            )
            .add_systems(
                Update,
                (
                    shortcuts::mode_toggle_shortcut,
                    shortcuts::configure_agent_shortcut,
                    selection::box_selection_input_system,
                    selection::ground_click_system,
                    zones::zone_builder_system,
                    modal::open_modal_system,
                    modal::modal_keyboard_system,
                    modal::apply_modal_outcomes,
                )
                    .chain()
                    .in_set(EditorSet::Input),
            )
            .add_systems(
                Update,
                (
                    movement::agent_motion_system,
                    zones::prune_hover_trail_system,
                    zones::notification_expiry_system,
                    selection::expire_ground_pulses,
                )
                    .in_set(EditorSet::Frame),
            )
            .add_systems(
                Update,
                (state::publish_state_changes, probe::probe_snapshot_system)
                    .chain()
                    .in_set(EditorSet::Publish),
            );
    }
}

pub struct EditorRenderPlugin;

impl Plugin for EditorRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup::setup_scene,
                hud::spawn_hud,
                selection::visuals::spawn_box_selection_visual,
                zones::visuals::init_zone_visual_assets,
                animation::load_agent_animations,
            ),
        )
        .add_systems(
            Update,
            (
                movement::editor_camera_system,
                raycast::sync_scene_view,
                input::collect_window_pointer_events,
                hud::mode_toggle_button_system,
            )
                .chain()
                .before(EditorSet::Sync),
        )
        .add_systems(
            Update,
            modal::panel::modal_text_entry_system
                .after(modal::modal_keyboard_system)
                .before(modal::apply_modal_outcomes),
        )
        .add_systems(
            Update,
            (
                setup::ground_grid_gizmos,
                selection::visuals::box_selection_visual_system,
                selection::visuals::selection_ring_system,
                selection::visuals::spawn_ground_pulse_visuals,
                selection::visuals::animate_ground_pulses,
                zones::visuals::zone_mesh_system,
                zones::visuals::zone_outline_gizmos,
                zones::visuals::zone_preview_system,
                zones::visuals::hover_visual_system,
                zones::visuals::zone_label_position_system,
                zones::visuals::zone_label_click_system,
                hud::hud_refresh_system,
                modal::panel::modal_panel_system,
            )
                .after(EditorSet::Publish),
        )
        .add_systems(
            Update,
            (
                agent::sync_agent_characters,
                agent::agent_name_tag_system,
                agent::agent_name_tag_position_system,
                animation::build_animation_graph,
                animation::agent_animation_system,
            )
                .chain()
                .after(EditorSet::Publish),
        );
    }
}
