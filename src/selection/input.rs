// Box/click selection engine
use bevy::prelude::*;

use crate::constants::*;
use crate::input::{PointerEvent, PointerPhase};
use crate::interaction_lock::InteractionLock;
use crate::raycast::{pointer_to_ndc, SceneView};
use crate::state::SceneState;
use crate::types::*;

use super::volume::{select_roots_in_volume, SelectionVolume};

#[derive(Clone, Copy, Debug)]
pub struct BoxDrag {
    pub anchor: Vec2,
    pub current: Vec2,
    pub volume: SelectionVolume,
}

/// In-progress primary-button drag in normal mode
#[derive(Resource, Default, Debug)]
pub struct BoxSelectionState {
    pub drag: Option<BoxDrag>,
}

impl BoxSelectionState {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Screen rectangle (min corner, size) for the visual
    pub fn screen_rect(&self) -> Option<(Vec2, Vec2)> {
        let drag = self.drag.as_ref()?;
        let min = drag.anchor.min(drag.current);
        let size = (drag.anchor - drag.current).abs();
        Some((min, size))
    }
}

/// System: pointer down/move/up drives click-to-move and box selection
pub fn box_selection_input_system(
    mut pointer_events: EventReader<PointerEvent>,
    mut box_state: ResMut<BoxSelectionState>,
    mut scene: ResMut<SceneState>,
    mut lock: ResMut<InteractionLock>,
    scene_view: Res<SceneView>,
    mesh_query: Query<(Entity, &GlobalTransform), With<Mesh3d>>,
    hierarchy: Query<(Option<&ChildOf>, Has<Selectable>)>,
    avatar_query: Query<&AgentAvatar>,
    transform_query: Query<&Transform>,
) {
    // Only active in normal mode while unlocked; leaving that state drops any drag
    if lock.is_locked() || scene.mode() != InteractionMode::Normal {
        pointer_events.clear();
        box_state.drag = None;
        return;
    }

    for event in pointer_events.read() {
        match event.phase {
            PointerPhase::Down => {
                if !event.is_primary() || event.over_ui || !scene_view.viewport.contains(event.position) {
                    continue;
                }
                let Some(ndc) = pointer_to_ndc(event.position, &scene_view.viewport) else { continue };
                box_state.drag = Some(BoxDrag {
                    anchor: event.position,
                    current: event.position,
                    volume: SelectionVolume::new(ndc),
                });
            }
            PointerPhase::Move => {
                if let Some(drag) = box_state.drag.as_mut() {
                    drag.current = event.position;
                }
            }
            PointerPhase::Up => {
                if !event.is_primary() {
                    continue;
                }
                let Some(mut drag) = box_state.drag.take() else { continue };
                let drag_distance = event.position.distance(drag.anchor);

                if drag_distance < DRAG_THRESHOLD_PX {
                    // Click: move the current selection to the ground point
                    let Some(ground) = scene_view.pointer_to_ground(event.position) else { continue };
                    if !scene.selected_ids().is_empty() {
                        scene.issue_move_order(ground, |agent| {
                            agent.avatar.and_then(|e| transform_query.get(e).ok()).map(|t| t.translation)
                        });
                    }
                    continue;
                }

                lock.suppress_ground_click_for(event.time_ms, GROUND_CLICK_SUPPRESS_MS);

                let Some(end_ndc) = pointer_to_ndc(event.position, &scene_view.viewport) else { continue };
                drag.volume.end_ndc = end_ndc;

                let candidates = mesh_query.iter().map(|(entity, transform)| (entity, transform.translation()));
                let roots = select_roots_in_volume(&drag.volume, &scene_view, candidates, &hierarchy);

                let mut added = 0;
                for root in roots {
                    if let Ok(avatar) = avatar_query.get(root) {
                        scene.add_to_selection(avatar.id.clone());
                        added += 1;
                    }
                }
                info!("Box selected {} agents ({} total)", added, scene.selected_ids().len());
            }
            PointerPhase::Cancel | PointerPhase::Blur => {
                if box_state.drag.take().is_some() {
                    debug!("Box selection aborted");
                }
            }
            PointerPhase::Click => {}
        }
    }
}
