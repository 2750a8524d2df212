// Zone-build state machine - drag out rectangular zones on the ground grid in build mode
use bevy::prelude::*;

use crate::constants::*;
use crate::input::{PointerEvent, PointerPhase};
use crate::interaction_lock::InteractionLock;
use crate::math_utils::{normalize_cells, touches_or_overlaps_any_zone, world_to_grid_cell};
use crate::raycast::SceneView;
use crate::state::SceneState;
use crate::types::*;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ZoneBuildPhase {
    #[default]
    Idle,
    /// Pointer inside the viewport, not pressed
    Hovering,
    Dragging {
        start_cell: GridCell,
        end_cell: GridCell,
        pointer_down: Vec2,
    },
}

#[derive(Resource, Default, Debug)]
pub struct ZoneBuildState {
    pub phase: ZoneBuildPhase,
}

impl ZoneBuildState {
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, ZoneBuildPhase::Dragging { .. })
    }
}

/// Result of releasing a zone drag
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ZoneCommit {
    Created(ZoneId),
    /// Touches or overlaps an existing zone; the notification was shown
    Conflict,
    /// Too short, or never left its start cell
    Discarded,
}

/// Turn a finished drag into a zone if it is long enough, spans more than one
/// cell and keeps clear of every existing zone.
pub fn commit_zone_drag(scene: &mut SceneState, start_cell: GridCell, end_cell: GridCell, drag_distance: f32) -> ZoneCommit {
    if drag_distance < DRAG_THRESHOLD_PX || start_cell == end_cell {
        return ZoneCommit::Discarded;
    }

    let (min_cell, max_cell) = normalize_cells(start_cell, end_cell);
    if conflicts_with_existing_zone(scene, min_cell, max_cell) {
        warn!("Zone {} -> {} rejected: touches an existing zone", min_cell, max_cell);
        scene.show_zone_build_notification(ZONE_CONFLICT_MESSAGE);
        return ZoneCommit::Conflict;
    }

    let counter = scene.zone_counter();
    let id = ZoneId::random();
    scene.add_zone(Zone {
        id,
        name: format!("Project {}", counter + 1),
        start_cell: min_cell,
        end_cell: max_cell,
        color: palette_color(counter),
    });
    ZoneCommit::Created(id)
}

/// Whether the cell range touches or overlaps any committed zone
pub fn conflicts_with_existing_zone(scene: &SceneState, start_cell: GridCell, end_cell: GridCell) -> bool {
    touches_or_overlaps_any_zone(start_cell, end_cell, scene.zones().values())
}

fn end_drag(build: &mut ZoneBuildState, scene: &mut SceneState) {
    build.phase = ZoneBuildPhase::Idle;
    scene.clear_zone_drag();
}

/// System: pointer events drive hover feedback and zone drags in build mode
pub fn zone_builder_system(
    mut pointer_events: EventReader<PointerEvent>,
    mut build: ResMut<ZoneBuildState>,
    mut scene: ResMut<SceneState>,
    lock: Res<InteractionLock>,
    scene_view: Res<SceneView>,
) {
    // Leaving build mode or locking drops the drag and every hover visual
    if lock.is_locked() || scene.mode() != InteractionMode::Build {
        pointer_events.clear();
        build.phase = ZoneBuildPhase::Idle;
        scene.clear_zone_drag();
        scene.clear_hover_trail();
        return;
    }

    let ground_cell = |position: Vec2| scene_view.pointer_to_ground(position).map(world_to_grid_cell);

    for event in pointer_events.read() {
        let preview_color = palette_color(scene.zone_counter());

        match event.phase {
            PointerPhase::Down => {
                if !event.is_primary() || event.over_ui || !scene_view.viewport.contains(event.position) {
                    continue;
                }
                let Some(cell) = ground_cell(event.position) else { continue };
                build.phase = ZoneBuildPhase::Dragging { start_cell: cell, end_cell: cell, pointer_down: event.position };
                scene.clear_zone_drag();
                scene.set_active_hover_cell(cell, preview_color, event.time_ms);
            }
            PointerPhase::Move => {
                let inside = scene_view.viewport.contains(event.position) && !event.over_ui;
                let Some(cell) = inside.then(|| ground_cell(event.position)).flatten() else {
                    scene.clear_active_hover_cell(event.time_ms);
                    if !build.is_dragging() {
                        build.phase = ZoneBuildPhase::Idle;
                    }
                    continue;
                };
                scene.set_active_hover_cell(cell, preview_color, event.time_ms);

                match &mut build.phase {
                    ZoneBuildPhase::Dragging { start_cell, end_cell, pointer_down } => {
                        *end_cell = cell;
                        if event.position.distance(*pointer_down) >= DRAG_THRESHOLD_PX {
                            scene.set_zone_drag_start(Some(*start_cell));
                            scene.set_zone_drag_end(Some(cell));
                        }
                    }
                    phase => *phase = ZoneBuildPhase::Hovering,
                }
            }
            PointerPhase::Up => {
                let ZoneBuildPhase::Dragging { start_cell, mut end_cell, pointer_down } = build.phase else { continue };
                let drag_distance = event.position.distance(pointer_down);

                // Outside the viewport the last good cell stands
                if scene_view.viewport.contains(event.position) && drag_distance >= DRAG_THRESHOLD_PX {
                    if let Some(cell) = ground_cell(event.position) {
                        end_cell = cell;
                        scene.set_zone_drag_end(Some(cell));
                    }
                }

                let outcome = commit_zone_drag(&mut scene, start_cell, end_cell, drag_distance);
                debug!("Zone drag released: {:?}", outcome);
                end_drag(&mut build, &mut scene);
            }
            PointerPhase::Cancel | PointerPhase::Blur => {
                if build.is_dragging() {
                    end_drag(&mut build, &mut scene);
                }
                scene.clear_hover_trail();
            }
            PointerPhase::Click => {}
        }
    }
}

/// System: drop hover trail entries that have fully faded
pub fn prune_hover_trail_system(mut scene: ResMut<SceneState>, time: Res<Time<Real>>) {
    scene.prune_hover_trail(crate::input::now_ms(&time), HOVER_FADE_MS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_zone(start: GridCell, end: GridCell) -> SceneState {
        let mut scene = SceneState::default();
        let outcome = commit_zone_drag(&mut scene, start, end, 50.0);
        assert!(matches!(outcome, ZoneCommit::Created(_)));
        scene
    }

    fn single_cell_zone(cell: GridCell) -> SceneState {
        let mut scene = SceneState::default();
        scene.add_zone(Zone {
            id: ZoneId::random(),
            name: "Project 1".into(),
            start_cell: cell,
            end_cell: cell,
            color: palette_color(0),
        });
        scene
    }

    #[test]
    fn single_cell_neighbours_conflict_until_a_gap() {
        let scene = single_cell_zone(GridCell::new(0, 0));
        assert!(conflicts_with_existing_zone(&scene, GridCell::new(0, 0), GridCell::new(0, 0)));
        assert!(conflicts_with_existing_zone(&scene, GridCell::new(1, 0), GridCell::new(1, 0)));
        assert!(!conflicts_with_existing_zone(&scene, GridCell::new(2, 0), GridCell::new(2, 0)));
    }

    #[test]
    fn commit_names_and_colours_by_counter() {
        let mut scene = SceneState::default();
        let first = commit_zone_drag(&mut scene, GridCell::new(2, 2), GridCell::new(0, 0), 40.0);
        let ZoneCommit::Created(id) = first else { panic!("expected a zone, got {first:?}") };
        let zone = scene.zone(&id).unwrap();
        assert_eq!(zone.name, "Project 1");
        assert_eq!(zone.color, palette_color(0));
        // Stored normalized
        assert_eq!(zone.start_cell, GridCell::new(0, 0));
        assert_eq!(zone.end_cell, GridCell::new(2, 2));

        let second = commit_zone_drag(&mut scene, GridCell::new(5, 0), GridCell::new(6, 1), 40.0);
        let ZoneCommit::Created(id) = second else { panic!("expected a zone, got {second:?}") };
        assert_eq!(scene.zone(&id).unwrap().name, "Project 2");
        assert_eq!(scene.zone(&id).unwrap().color, palette_color(1));
        assert_eq!(scene.zone_counter(), 2);
    }

    #[test]
    fn short_or_single_cell_drags_are_discarded() {
        let mut scene = SceneState::default();
        assert_eq!(commit_zone_drag(&mut scene, GridCell::new(0, 0), GridCell::new(3, 3), 4.0), ZoneCommit::Discarded);
        assert_eq!(commit_zone_drag(&mut scene, GridCell::new(1, 1), GridCell::new(1, 1), 80.0), ZoneCommit::Discarded);
        assert!(scene.zones().is_empty());
        assert!(scene.notification().is_none());
    }

    #[test]
    fn touching_drag_is_rejected_with_notification() {
        let mut scene = scene_with_zone(GridCell::new(0, 0), GridCell::new(1, 1));
        let outcome = commit_zone_drag(&mut scene, GridCell::new(2, 0), GridCell::new(3, 1), 40.0);
        assert_eq!(outcome, ZoneCommit::Conflict);
        assert_eq!(scene.zones().len(), 1);
        assert_eq!(scene.notification().map(|n| n.message.as_str()), Some(ZONE_CONFLICT_MESSAGE));
        // Rejections do not advance the counter
        assert_eq!(scene.zone_counter(), 1);

        let outcome = commit_zone_drag(&mut scene, GridCell::new(3, 0), GridCell::new(4, 1), 40.0);
        assert!(matches!(outcome, ZoneCommit::Created(_)));
    }
}
