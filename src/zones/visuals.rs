// Zone visuals: committed zones, drag preview, hover trail and clickable name labels
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::*;
use crate::input::{now_ms, UiControl};
use crate::interaction_lock::InteractionLock;
use crate::math_utils::{grid_cell_center, grid_cells_to_world_rect, WorldZoneRect};
use crate::modal::{ModalRequest, ZoneDraft};
use crate::raycast::SceneView;
use crate::state::{SceneState, StateChange, StateChanged};
use crate::types::*;

#[derive(Component)]
pub struct ZoneFillVisual {
    pub zone: ZoneId,
}

#[derive(Component)]
pub struct ZonePreviewVisual;

#[derive(Component)]
pub struct ZoneLabel {
    pub zone: ZoneId,
}

#[derive(Component)]
pub struct HoverCellVisual {
    pub cell: GridCell,
}

/// Shared unit quad, scaled per zone
#[derive(Resource)]
pub struct ZoneVisualAssets {
    pub unit_quad: Handle<Mesh>,
}

pub fn init_zone_visual_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let unit_quad = meshes.add(Plane3d::default().mesh().size(1.0, 1.0));
    commands.insert_resource(ZoneVisualAssets { unit_quad });
}

fn overlay_material(color: Srgba, alpha: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::from(color.with_alpha(alpha)),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        ..default()
    }
}

fn rect_transform(rect: &WorldZoneRect, y: f32) -> Transform {
    let center = rect.center();
    Transform::from_xyz(center.x, y, center.y).with_scale(Vec3::new(rect.width(), 1.0, rect.depth()))
}

/// World anchor of a zone's label, just past its (x_min, z_max) corner
pub fn zone_label_anchor(zone: &Zone) -> Vec3 {
    let rect = grid_cells_to_world_rect(zone.start_cell, zone.end_cell);
    Vec3::new(rect.x_min, 0.0, rect.z_max + ZONE_LABEL_OFFSET)
}

/// System: rebuild zone fills and labels when the zone set changes
pub fn zone_mesh_system(
    mut commands: Commands,
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneState>,
    assets: Res<ZoneVisualAssets>,
    existing: Query<Entity, Or<(With<ZoneFillVisual>, With<ZoneLabel>)>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !changes.read().any(|c| c.0 == StateChange::Zones) {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for zone in scene.zones().values() {
        let rect = grid_cells_to_world_rect(zone.start_cell, zone.end_cell);
        commands.spawn((
            Mesh3d(assets.unit_quad.clone()),
            MeshMaterial3d(materials.add(overlay_material(zone.color, ZONE_FILL_ALPHA))),
            rect_transform(&rect, ZONE_FILL_Y),
            ZoneFillVisual { zone: zone.id },
            NotShadowCaster,
            NotShadowReceiver,
        ));

        commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                    display: Display::None,
                    ..default()
                },
                BackgroundColor(Color::srgba(0.06, 0.09, 0.16, 0.8)),
                BorderRadius::all(Val::Px(4.0)),
                Interaction::default(),
                UiControl,
                ZoneLabel { zone: zone.id },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(zone.name.clone()),
                    TextFont { font_size: 12.0, ..default() },
                    TextColor(Color::from(zone.color)),
                ));
            });
    }
}

/// System: outlines for committed zones and the drag preview
pub fn zone_outline_gizmos(mut gizmos: Gizmos, scene: Res<SceneState>) {
    for zone in scene.zones().values() {
        let rect = grid_cells_to_world_rect(zone.start_cell, zone.end_cell);
        draw_outline(&mut gizmos, &rect, ZONE_FILL_Y + 0.001, Color::from(zone.color));
    }

    let drag = scene.zone_drag();
    if let (Some(start), Some(end)) = (drag.start, drag.end) {
        let rect = grid_cells_to_world_rect(start, end);
        let color = palette_color(scene.zone_counter()).with_alpha(ZONE_PREVIEW_OUTLINE_ALPHA);
        draw_outline(&mut gizmos, &rect, ZONE_PREVIEW_Y + 0.001, Color::from(color));
    }
}

fn draw_outline(gizmos: &mut Gizmos, rect: &WorldZoneRect, y: f32, color: Color) {
    let [a, b, c, d] = rect.corners(y);
    gizmos.linestrip([a, b, c, d, a], color);
}

/// System: fill quad following the live drag
pub fn zone_preview_system(
    mut commands: Commands,
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneState>,
    assets: Res<ZoneVisualAssets>,
    preview_query: Query<Entity, With<ZonePreviewVisual>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !changes.read().any(|c| matches!(c.0, StateChange::ZoneDrag | StateChange::Zones)) {
        return;
    }

    for entity in preview_query.iter() {
        commands.entity(entity).despawn();
    }

    let drag = scene.zone_drag();
    let (Some(start), Some(end)) = (drag.start, drag.end) else { return };
    let rect = grid_cells_to_world_rect(start, end);
    commands.spawn((
        Mesh3d(assets.unit_quad.clone()),
        MeshMaterial3d(materials.add(overlay_material(palette_color(scene.zone_counter()), ZONE_PREVIEW_FILL_ALPHA))),
        rect_transform(&rect, ZONE_PREVIEW_Y),
        ZonePreviewVisual,
        NotShadowCaster,
        NotShadowReceiver,
    ));
}

/// System: hover quads for the active cell and the fading trail. Hidden while
/// locked or outside build mode.
pub fn hover_visual_system(
    mut commands: Commands,
    scene: Res<SceneState>,
    lock: Res<InteractionLock>,
    time: Res<Time<Real>>,
    assets: Res<ZoneVisualAssets>,
    visuals: Query<(Entity, &HoverCellVisual, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let visible = !lock.is_locked() && scene.mode() == InteractionMode::Build;
    let now = now_ms(&time);

    // Target alpha and colour per cell; the active cell wins over its own trail entry
    let mut wanted: HashMap<GridCell, (Srgba, f32)> = HashMap::new();
    if visible {
        for fx in scene.hover_trail().values() {
            let fade = (1.0 - (now - fx.started_at_ms) / HOVER_FADE_MS).clamp(0.0, 1.0) as f32;
            wanted.insert(fx.cell, (fx.color, HOVER_MAX_ALPHA * fade));
        }
        if let Some(active) = scene.active_hover_cell() {
            wanted.insert(active.cell, (active.color, HOVER_MAX_ALPHA));
        }
    }

    for (entity, visual, material_handle) in visuals.iter() {
        match wanted.remove(&visual.cell) {
            Some((color, alpha)) => {
                if let Some(material) = materials.get_mut(&material_handle.0) {
                    material.base_color = Color::from(color.with_alpha(alpha));
                }
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (cell, (color, alpha)) in wanted {
        let center = grid_cell_center(cell);
        commands.spawn((
            Mesh3d(assets.unit_quad.clone()),
            MeshMaterial3d(materials.add(overlay_material(color, alpha))),
            Transform::from_xyz(center.x, HOVER_Y, center.z).with_scale(Vec3::new(CELL_SIZE, 1.0, CELL_SIZE)),
            HoverCellVisual { cell },
            NotShadowCaster,
            NotShadowReceiver,
        ));
    }
}

/// System: keep labels pinned to their zone corner on screen
pub fn zone_label_position_system(
    scene: Res<SceneState>,
    scene_view: Res<SceneView>,
    mut labels: Query<(&ZoneLabel, &mut Node)>,
) {
    for (label, mut node) in labels.iter_mut() {
        let screen = scene
            .zone(&label.zone)
            .and_then(|zone| scene_view.world_to_screen(zone_label_anchor(zone)))
            .filter(|point| point.in_viewport);
        match screen {
            Some(point) => {
                node.display = Display::Flex;
                node.left = Val::Px(point.x);
                node.top = Val::Px(point.y);
            }
            None => node.display = Display::None,
        }
    }
}

/// System: clicking a zone label opens the zone editor
pub fn zone_label_click_system(
    labels: Query<(&Interaction, &ZoneLabel), Changed<Interaction>>,
    scene: Res<SceneState>,
    lock: Res<InteractionLock>,
    mut requests: EventWriter<ModalRequest>,
) {
    if lock.is_locked() {
        return;
    }
    for (interaction, label) in labels.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if let Some(zone) = scene.zone(&label.zone) {
            requests.write(ModalRequest::EditZone(ZoneDraft::from_zone(zone)));
        }
    }
}
