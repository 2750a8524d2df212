// Pointer raycasting bridge - screen point -> NDC -> camera ray -> ground plane
//
// Selection, ground clicks, zone building and the probe's world-to-screen all
// go through the same `SceneView` so they agree numerically.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::Serialize;

use crate::constants::{CAMERA_FAR, CAMERA_NEAR};
use crate::math_utils::ray_ground_intersection;
use crate::types::EditorCamera;

/// Screen-space rectangle of the 3D viewport, in logical pixels
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Edges inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        !self.is_degenerate()
            && point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// NDC for a pointer position; `None` for a zero-area viewport
pub fn pointer_to_ndc(position: Vec2, viewport: &ViewportRect) -> Option<Vec2> {
    if viewport.is_degenerate() {
        return None;
    }
    Some(Vec2::new(
        (position.x - viewport.left) / viewport.width * 2.0 - 1.0,
        -((position.y - viewport.top) / viewport.height) * 2.0 + 1.0,
    ))
}

/// Projected screen position as reported to automation
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub in_viewport: bool,
}

/// Camera projection plus viewport bounds, refreshed from the render camera
/// each frame (or fixed in headless runs).
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SceneView {
    clip_from_world: Mat4,
    world_from_clip: Mat4,
    pub viewport: ViewportRect,
}

impl SceneView {
    pub fn new(clip_from_world: Mat4, viewport: ViewportRect) -> Self {
        Self { clip_from_world, world_from_clip: clip_from_world.inverse(), viewport }
    }

    /// Orthographic camera at `eye` looking at `target`, `zoom` pixels per world
    /// unit. Reverse-Z like the engine: the near plane maps to depth 1.
    pub fn orthographic_look_at(eye: Vec3, target: Vec3, viewport: ViewportRect, zoom: f32) -> Self {
        let half_width = viewport.width * 0.5 / zoom;
        let half_height = viewport.height * 0.5 / zoom;
        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_height,
            half_height,
            CAMERA_FAR,
            CAMERA_NEAR,
        );
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        Self::new(projection * view, viewport)
    }

    pub fn clip_from_world(&self) -> Mat4 {
        self.clip_from_world
    }

    /// World-space ray through an NDC point (origin on the near plane)
    pub fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d> {
        let near = self.world_from_clip.project_point3(ndc.extend(1.0));
        let far = self.world_from_clip.project_point3(ndc.extend(0.5));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }

    pub fn ndc_to_ground(&self, ndc: Vec2) -> Option<Vec3> {
        let ray = self.ndc_to_ray(ndc)?;
        ray_ground_intersection(ray.origin, *ray.direction)
    }

    /// Ground point under a screen position; `None` means "no input"
    pub fn pointer_to_ground(&self, position: Vec2) -> Option<Vec3> {
        let ndc = pointer_to_ndc(position, &self.viewport)?;
        self.ndc_to_ground(ndc)
    }

    /// Projects a world point to NDC with depth, `None` if not finite
    pub fn world_to_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.clip_from_world * world.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }

    pub fn world_to_screen(&self, world: Vec3) -> Option<ScreenPoint> {
        if self.viewport.is_degenerate() {
            return None;
        }
        let ndc = self.world_to_ndc(world)?;
        let vp = &self.viewport;
        Some(ScreenPoint {
            x: vp.left + (ndc.x + 1.0) * 0.5 * vp.width,
            y: vp.top + (1.0 - ndc.y) * 0.5 * vp.height,
            in_viewport: (0.0..=1.0).contains(&ndc.z),
        })
    }
}

/// Copy the editor camera's matrices and viewport into `SceneView`
pub fn sync_scene_view(
    mut scene_view: ResMut<SceneView>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else { return };

    let viewport = match camera.logical_viewport_rect() {
        Some(rect) => ViewportRect::new(rect.min.x, rect.min.y, rect.width(), rect.height()),
        None => {
            let Ok(window) = window_query.single() else { return };
            ViewportRect::new(0.0, 0.0, window.width(), window.height())
        }
    };

    let clip_from_world = camera.clip_from_view() * camera_transform.compute_matrix().inverse();
    *scene_view = SceneView::new(clip_from_world, viewport);
}
