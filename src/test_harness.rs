// Headless editor app for system-level tests: the interaction core on
// MinimalPlugins, a fixed camera view and a manual clock
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use std::time::Duration;

use crate::agent::agent_bundle;
use crate::constants::*;
use crate::input::{now_ms, PointerButton, PointerEvent, PointerPhase};
use crate::interaction_lock::InteractionLock;
use crate::raycast::{SceneView, ViewportRect};
use crate::state::SceneState;
use crate::types::*;
use crate::InteractionCorePlugin;

pub const FRAME_MS: u64 = 16;
pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;

pub struct EditorTestApp {
    pub app: App,
}

impl EditorTestApp {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, InteractionCorePlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(FRAME_MS)))
            .insert_resource(SceneView::orthographic_look_at(
                CAMERA_START_POSITION,
                Vec3::ZERO,
                ViewportRect::new(0.0, 0.0, VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                CAMERA_START_ZOOM,
            ));
        // Settle the clock so event timestamps are non-zero
        app.update();
        Self { app }
    }

    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run frames until at least `ms` of real time has passed
    pub fn advance_ms(&mut self, ms: u64) {
        for _ in 0..ms.div_ceil(FRAME_MS) {
            self.app.update();
        }
    }

    pub fn now_ms(&self) -> f64 {
        now_ms(self.app.world().resource::<Time<Real>>())
    }

    pub fn scene(&self) -> &SceneState {
        self.app.world().resource::<SceneState>()
    }

    pub fn scene_mut(&mut self) -> Mut<'_, SceneState> {
        self.app.world_mut().resource_mut::<SceneState>()
    }

    pub fn is_locked(&self) -> bool {
        self.app.world().resource::<InteractionLock>().is_locked()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.app.world_mut().resource_mut::<InteractionLock>().set_locked(locked);
    }

    /// Agent root plus a mesh child, the way loaded character scenes look
    pub fn spawn_agent(&mut self, id: &str, position: Vec3) -> Entity {
        let name = format!("Agent {}", id);
        let root = self.app.world_mut().spawn(agent_bundle(id, name, CharacterModel::Ranger, position)).id();
        self.app
            .world_mut()
            .spawn((Mesh3d(Handle::default()), Transform::from_xyz(0.0, 0.5, 0.0), ChildOf(root)));
        root
    }

    /// What the render layer reports once an agent's character scene is in
    pub fn mark_model_spawned(&mut self, id: &str) {
        self.scene_mut().set_agent_visual_ready(&AgentId::from(id), true);
    }

    pub fn agent_translation(&self, entity: Entity) -> Vec3 {
        self.app.world().get::<Transform>(entity).map(|t| t.translation).unwrap_or(Vec3::NAN)
    }

    pub fn target_of(&self, id: &str) -> Option<Vec3> {
        self.scene().agent(&AgentId::from(id)).and_then(|agent| agent.target_position)
    }

    pub fn screen_of(&self, world: Vec3) -> Vec2 {
        let point = self.app.world().resource::<SceneView>().world_to_screen(world).expect("world point projects");
        Vec2::new(point.x, point.y)
    }

    pub fn send_pointer(&mut self, phase: PointerPhase, position: Vec2) {
        let event = PointerEvent::new(phase, position, self.now_ms());
        self.app.world_mut().send_event(event);
    }

    pub fn send_pointer_event(&mut self, event: PointerEvent) {
        self.app.world_mut().send_event(event);
    }

    /// Press and release in place, like a plain mouse click
    pub fn click(&mut self, position: Vec2) {
        self.send_pointer(PointerPhase::Down, position);
        self.send_pointer(PointerPhase::Up, position);
        self.send_pointer(PointerPhase::Click, position);
        self.update();
    }

    /// Press at `from`, move to `to` and release there, one frame per step.
    /// The release is followed by a click, as a browser-style pointer does.
    pub fn drag(&mut self, from: Vec2, to: Vec2) {
        self.send_pointer(PointerPhase::Down, from);
        self.update();
        self.send_pointer(PointerPhase::Move, to);
        self.update();
        self.send_pointer(PointerPhase::Up, to);
        self.send_pointer(PointerPhase::Click, to);
        self.update();
    }

    pub fn secondary_down(&mut self, position: Vec2) {
        let mut event = PointerEvent::new(PointerPhase::Down, position, self.now_ms());
        event.button = PointerButton::Secondary;
        self.send_pointer_event(event);
        self.update();
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        self.update();
        let mut keys = self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear();
    }

    pub fn hold_key(&mut self, key: KeyCode) {
        let mut keys = self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.press(key);
        keys.clear_just_pressed(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        let mut keys = self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear_just_released(key);
    }
}
