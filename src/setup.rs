// Scene setup: camera, lights, starting agents and the ground grid
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::agent::spawn_agent;
use crate::constants::*;
use crate::types::*;

const BACKGROUND_COLOR: Color = Color::srgb(0.165, 0.169, 0.22); // #2A2B38
const GRID_COLOR: Color = Color::srgba(0.55, 0.58, 0.7, 0.25);

pub fn setup_scene(mut commands: Commands) {
    commands.insert_resource(ClearColor(BACKGROUND_COLOR));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        affects_lightmapped_meshes: false,
    });

    // Orthographic camera; one world unit spans `zoom` logical pixels
    commands.spawn((
        Camera3d::default(),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::WindowSize,
            scale: 1.0 / CAMERA_START_ZOOM,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_translation(CAMERA_START_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        EditorCamera {
            focus_point: Vec3::ZERO,
            offset: CAMERA_START_POSITION,
            zoom: CAMERA_START_ZOOM,
        },
    ));

    spawn_agent(&mut commands, "ranger1", "Ranger 1", CharacterModel::Ranger, Vec3::new(-2.0, 0.0, 0.0));
    spawn_agent(&mut commands, "ranger2", "Ranger 2", CharacterModel::Ranger, Vec3::new(2.0, 0.0, 0.0));
}

/// System: unit-cell grid around the camera focus
pub fn ground_grid_gizmos(mut gizmos: Gizmos, camera_query: Query<&EditorCamera>) {
    let focus = camera_query.single().map(|camera| camera.focus_point).unwrap_or(Vec3::ZERO);
    let center_x = (focus.x / CELL_SIZE).round() as i32;
    let center_z = (focus.z / CELL_SIZE).round() as i32;
    let extent = GRID_DRAW_HALF_EXTENT as f32 * CELL_SIZE;

    for i in -GRID_DRAW_HALF_EXTENT..=GRID_DRAW_HALF_EXTENT {
        let x = (center_x + i) as f32 * CELL_SIZE;
        let z = (center_z + i) as f32 * CELL_SIZE;
        let cx = center_x as f32 * CELL_SIZE;
        let cz = center_z as f32 * CELL_SIZE;
        gizmos.line(Vec3::new(x, GRID_LINE_Y, cz - extent), Vec3::new(x, GRID_LINE_Y, cz + extent), GRID_COLOR);
        gizmos.line(Vec3::new(cx - extent, GRID_LINE_Y, z), Vec3::new(cx + extent, GRID_LINE_Y, z), GRID_COLOR);
    }
}
