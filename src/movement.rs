// Agent motion integrator and editor camera controls
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::constants::*;
use crate::interaction_lock::InteractionLock;
use crate::raycast::SceneView;
use crate::state::SceneState;
use crate::types::*;

/// Result of advancing one agent for one frame
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MotionStep {
    pub translation: Vec3,
    pub rotation: Quat,
    pub arrived: bool,
}

/// Facing that looks at `target` from `from`, turned half a revolution because
/// character models face +Z
pub fn facing_toward(from: Vec3, target: Vec3) -> Quat {
    Transform::from_translation(from).looking_at(target, Vec3::Y).rotation * Quat::from_rotation_y(std::f32::consts::PI)
}

/// Advance toward `target` at a fixed speed. Within the arrival epsilon nothing
/// moves and the step reports arrival. The step never passes the target.
pub fn step_toward_target(translation: Vec3, rotation: Quat, target: Vec3, delta_secs: f32) -> MotionStep {
    let offset = target - translation;
    let distance = offset.length();

    if distance <= ARRIVAL_EPSILON {
        return MotionStep { translation, rotation, arrived: true };
    }

    let step = (AGENT_MOVE_SPEED * delta_secs).min(distance);
    let new_translation = translation + offset / distance * step;

    let new_rotation = if new_translation.distance_squared(target) > f32::EPSILON {
        rotation.slerp(facing_toward(new_translation, target), TURN_SLERP_FACTOR)
    } else {
        rotation
    };

    MotionStep { translation: new_translation, rotation: new_rotation, arrived: false }
}

/// System: move every agent with a target; clearing the target is the only way motion ends
pub fn agent_motion_system(
    time: Res<Time>,
    mut scene: ResMut<SceneState>,
    mut transforms: Query<&mut Transform, With<AgentAvatar>>,
) {
    let delta_secs = time.delta_secs();

    let moving: Vec<(AgentId, Entity, Vec3)> = scene
        .agents()
        .filter_map(|agent| Some((agent.id.clone(), agent.avatar?, agent.target_position?)))
        .collect();

    for (id, avatar, target) in moving {
        let Ok(mut transform) = transforms.get_mut(avatar) else { continue };
        let step = step_toward_target(transform.translation, transform.rotation, target, delta_secs);
        if step.arrived {
            scene.clear_target_position(&id);
            debug!("Agent {} arrived at ({:.2}, {:.2})", id, target.x, target.z);
        } else {
            transform.translation = step.translation;
            transform.rotation = step.rotation;
        }
    }
}

/// Smallest zoom that keeps the whole view plane above the ground. Never below
/// the configured minimum.
pub fn minimum_zoom(transform: &Transform, viewport_size: Vec2) -> f32 {
    let center_y = (transform.translation.y + transform.forward().y * CAMERA_NEAR).max(0.001);
    let required = (transform.right().y.abs() * viewport_size.x + transform.up().y.abs() * viewport_size.y)
        / (2.0 * center_y)
        * CAMERA_ZOOM_SAFETY;
    required.max(CAMERA_MIN_ZOOM)
}

/// System: pan (WASD / right drag) and zoom (wheel) the orthographic editor camera
pub fn editor_camera_system(
    time: Res<Time>,
    lock: Res<InteractionLock>,
    scene_view: Res<SceneView>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &mut Projection, &mut EditorCamera)>,
) {
    let Ok((mut transform, mut projection, mut camera)) = camera_query.single_mut() else { return };

    if lock.is_locked() {
        scroll_events.clear();
        mouse_motion_events.clear();
        return;
    }

    // Ground-plane axes of the view: screen right and screen up projected flat
    let right = Vec3::new(transform.right().x, 0.0, transform.right().z).normalize_or_zero();
    let up = Vec3::new(transform.up().x, 0.0, transform.up().z).normalize_or_zero();

    let mut movement = Vec3::ZERO;
    if keyboard_input.pressed(KeyCode::KeyW) || keyboard_input.pressed(KeyCode::ArrowUp) {
        movement += up;
    }
    if keyboard_input.pressed(KeyCode::KeyS) || keyboard_input.pressed(KeyCode::ArrowDown) {
        movement -= up;
    }
    if keyboard_input.pressed(KeyCode::KeyA) || keyboard_input.pressed(KeyCode::ArrowLeft) {
        movement -= right;
    }
    if keyboard_input.pressed(KeyCode::KeyD) || keyboard_input.pressed(KeyCode::ArrowRight) {
        movement += right;
    }
    if movement.length() > 0.0 {
        // Pan speed is in screen terms, so it slows down when zoomed in
        let zoom_factor = CAMERA_START_ZOOM / camera.zoom;
        camera.focus_point += movement.normalize() * CAMERA_PAN_SPEED * zoom_factor * time.delta_secs();
    }

    // Right drag: the ground follows the cursor
    if mouse_button_input.pressed(MouseButton::Right) {
        for motion in mouse_motion_events.read() {
            let world_per_px = 1.0 / camera.zoom;
            // Screen y grows downward; the camera looks down at an angle so
            // vertical motion covers more ground
            let vertical_stretch = 1.0 / transform.forward().y.abs().max(0.1);
            camera.focus_point -= right * motion.delta.x * world_per_px;
            camera.focus_point += up * motion.delta.y * world_per_px * vertical_stretch;
        }
    } else {
        mouse_motion_events.clear();
    }

    for scroll in scroll_events.read() {
        let zoom_delta = match scroll.unit {
            MouseScrollUnit::Line => scroll.y * CAMERA_ZOOM_SPEED,
            MouseScrollUnit::Pixel => scroll.y * CAMERA_ZOOM_SPEED * 0.1,
        };
        camera.zoom += zoom_delta;
    }
    let viewport_size = Vec2::new(scene_view.viewport.width, scene_view.viewport.height);
    let min_zoom = minimum_zoom(&transform, viewport_size).min(CAMERA_MAX_ZOOM);
    camera.zoom = camera.zoom.clamp(min_zoom, CAMERA_MAX_ZOOM);

    transform.translation = camera.focus_point + camera.offset;
    if let Projection::Orthographic(ortho) = projection.as_mut() {
        ortho.scale = 1.0 / camera.zoom;
    }
}
