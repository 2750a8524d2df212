// Selection feedback: box rectangle, rings under selected agents, ground click pulses
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;

use crate::constants::*;
use crate::input::now_ms;
use crate::state::{SceneState, StateChange, StateChanged};
use crate::types::*;

use super::ground::GroundPulse;
use super::input::BoxSelectionState;

/// Ring under a selected agent, parented to the agent root
#[derive(Component)]
pub struct SelectionRing {
    pub agent: AgentId,
}

#[derive(Component)]
pub struct BoxSelectionVisual;

const RING_Y: f32 = 0.015;
const PULSE_Y: f32 = 0.02;

fn flat_on_ground() -> Quat {
    Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)
}

pub fn spawn_box_selection_visual(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            border: UiRect::all(Val::Px(2.0)),
            display: Display::None,
            ..default()
        },
        BackgroundColor(Color::srgba(0.294, 0.627, 1.0, 0.3)),
        BorderColor(Color::srgb(0.333, 0.667, 1.0)),
        GlobalZIndex(20),
        BoxSelectionVisual,
    ));
}

/// System: mirror the drag rectangle onto the UI node
pub fn box_selection_visual_system(
    box_state: Res<BoxSelectionState>,
    mut visual_query: Query<&mut Node, With<BoxSelectionVisual>>,
) {
    if !box_state.is_changed() {
        return;
    }
    let Ok(mut node) = visual_query.single_mut() else { return };

    match box_state.screen_rect() {
        Some((min, size)) => {
            node.display = Display::Flex;
            node.left = Val::Px(min.x);
            node.top = Val::Px(min.y);
            node.width = Val::Px(size.x);
            node.height = Val::Px(size.y);
        }
        None => node.display = Display::None,
    }
}

/// System: keep one ring per selected, registered agent
pub fn selection_ring_system(
    mut commands: Commands,
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneState>,
    existing_rings: Query<(Entity, &SelectionRing)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !changes.read().any(|c| matches!(c.0, StateChange::Selection | StateChange::Agents)) {
        return;
    }

    // Remove rings for deselected or vanished agents
    for (entity, ring) in existing_rings.iter() {
        let keep = scene.is_selected(&ring.agent) && scene.agent(&ring.agent).is_some_and(|a| a.avatar.is_some());
        if !keep {
            commands.entity(entity).despawn();
        }
    }

    for id in scene.selected_ids() {
        if existing_rings.iter().any(|(_, ring)| &ring.agent == id) {
            continue;
        }
        // Stale ids draw nothing
        let Some(avatar) = scene.agent(id).and_then(|agent| agent.avatar) else { continue };

        let ring = commands
            .spawn((
                Mesh3d(meshes.add(Annulus::new(SELECTION_RING_INNER_RADIUS, SELECTION_RING_OUTER_RADIUS))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: SELECTION_RING_COLOR,
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    cull_mode: None,
                    ..default()
                })),
                Transform::from_xyz(0.0, RING_Y, 0.0).with_rotation(flat_on_ground()),
                SelectionRing { agent: id.clone() },
                NotShadowCaster,
                NotShadowReceiver,
            ))
            .id();
        commands.entity(avatar).add_child(ring);
    }
}

/// System: give new pulses a ring mesh
pub fn spawn_ground_pulse_visuals(
    mut commands: Commands,
    new_pulses: Query<(Entity, &GroundPulse), Added<GroundPulse>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, pulse) in new_pulses.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Annulus::new(PULSE_INNER_RADIUS, PULSE_OUTER_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::from(ZONE_PALETTE[0]).with_alpha(PULSE_START_OPACITY),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                cull_mode: None,
                ..default()
            })),
            Transform::from_xyz(pulse.position.x, PULSE_Y, pulse.position.z)
                .with_rotation(flat_on_ground())
                .with_scale(Vec3::splat(PULSE_START_SCALE)),
            NotShadowCaster,
            NotShadowReceiver,
        ));
    }
}

/// System: grow and fade pulses
pub fn animate_ground_pulses(
    time: Res<Time<Real>>,
    mut pulses: Query<(&GroundPulse, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let now = now_ms(&time);
    for (pulse, mut transform, material_handle) in pulses.iter_mut() {
        transform.scale = Vec3::splat(pulse.scale(now));
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color.set_alpha(pulse.opacity(now));
        }
    }
}
