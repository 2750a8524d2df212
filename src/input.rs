// Pointer events - one device-neutral stream consumed by selection, ground clicks
// and zone building
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused};

use crate::raycast::SceneView;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Primary release whose press started inside the viewport
    Click,
    Cancel,
    Blur,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Event, Clone, Copy, PartialEq, Debug)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
    pub button: PointerButton,
    /// Pointer is over an interactive UI node (`UiControl`)
    pub over_ui: bool,
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Vec2, time_ms: f64) -> Self {
        Self { phase, position, button: PointerButton::Primary, over_ui: false, time_ms }
    }

    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

/// Marker for interactive UI nodes; pointer activity over them is not scene input
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct UiControl;

/// True while a text field owns the keyboard
#[derive(Resource, Default, Debug)]
pub struct TextInputFocus(pub bool);

/// Milliseconds on the real-time clock, the timebase for pointer events and
/// frame-driven fades
pub fn now_ms(time: &Time<Real>) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

#[derive(Default)]
pub struct PointerCollectorState {
    last_position: Option<Vec2>,
    primary_down_in_viewport: bool,
}

/// Translate window mouse input into `PointerEvent`s
pub fn collect_window_pointer_events(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut focus_events: EventReader<WindowFocused>,
    ui_query: Query<&Interaction, With<UiControl>>,
    scene_view: Res<SceneView>,
    time: Res<Time<Real>>,
    mut pointer_events: EventWriter<PointerEvent>,
    mut collector: Local<PointerCollectorState>,
) {
    let time_ms = now_ms(&time);

    if focus_events.read().any(|event| !event.focused) {
        collector.primary_down_in_viewport = false;
        let position = collector.last_position.unwrap_or_default();
        pointer_events.write(PointerEvent::new(PointerPhase::Blur, position, time_ms));
        return;
    }

    let Ok(window) = window_query.single() else { return };
    let over_ui = ui_query.iter().any(|interaction| *interaction != Interaction::None);
    let cursor = window.cursor_position();

    if let Some(position) = cursor {
        if collector.last_position != Some(position) {
            collector.last_position = Some(position);
            pointer_events.write(PointerEvent {
                phase: PointerPhase::Move,
                position,
                button: PointerButton::Primary,
                over_ui,
                time_ms,
            });
        }
    }

    // Off-window releases still end the press at the last known position
    let Some(position) = cursor.or(collector.last_position) else { return };
    let event = |phase, button| PointerEvent { phase, position, button, over_ui, time_ms };

    for (mouse, button) in [
        (MouseButton::Left, PointerButton::Primary),
        (MouseButton::Right, PointerButton::Secondary),
        (MouseButton::Middle, PointerButton::Middle),
    ] {
        if mouse_button.just_pressed(mouse) && cursor.is_some() {
            if button == PointerButton::Primary {
                collector.primary_down_in_viewport = scene_view.viewport.contains(position);
            }
            pointer_events.write(event(PointerPhase::Down, button));
        }
        if mouse_button.just_released(mouse) {
            pointer_events.write(event(PointerPhase::Up, button));
            let pressed_inside = button == PointerButton::Primary && std::mem::take(&mut collector.primary_down_in_viewport);
            if pressed_inside && cursor.is_some_and(|released| scene_view.viewport.contains(released)) {
                pointer_events.write(event(PointerPhase::Click, button));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_defaults_to_primary_off_ui() {
        let event = PointerEvent::new(PointerPhase::Down, Vec2::new(1.0, 2.0), 5.0);
        assert!(event.is_primary());
        assert!(!event.over_ui);
        assert_eq!(event.time_ms, 5.0);
    }

    #[test]
    fn real_clock_in_milliseconds() {
        let mut time = Time::<Real>::default();
        time.update_with_duration(std::time::Duration::from_millis(250));
        assert!((now_ms(&time) - 250.0).abs() < 1e-6);
    }

    use crate::constants::*;
    use crate::raycast::ViewportRect;
    use bevy::window::WindowResolution;

    fn collector_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<PointerEvent>()
            .add_event::<WindowFocused>()
            .insert_resource(SceneView::orthographic_look_at(
                CAMERA_START_POSITION,
                Vec3::ZERO,
                ViewportRect::new(0.0, 0.0, 800.0, 600.0),
                CAMERA_START_ZOOM,
            ))
            .add_systems(Update, collect_window_pointer_events);
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: WindowResolution::new(1000.0, 700.0).with_scale_factor_override(1.0),
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        app.update();
        (app, window)
    }

    fn set_cursor(app: &mut App, window: Entity, position: Option<Vec2>) {
        let mut entity = app.world_mut().entity_mut(window);
        let mut window = entity.get_mut::<Window>().expect("window");
        window.set_cursor_position(position);
    }

    fn mouse(app: &mut App, pressed: bool) {
        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        if pressed {
            buttons.press(MouseButton::Left);
        } else {
            buttons.release(MouseButton::Left);
        }
    }

    /// Run one frame and return the pointer events it produced
    fn frame(app: &mut App) -> Vec<PointerEvent> {
        app.update();
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().clear();
        app.world_mut().resource_mut::<Events<PointerEvent>>().drain().collect()
    }

    fn phases(events: &[PointerEvent]) -> Vec<PointerPhase> {
        events.iter().map(|event| event.phase).collect()
    }

    #[test]
    fn press_and_release_inside_produces_a_click() {
        let (mut app, window) = collector_app();
        set_cursor(&mut app, window, Some(Vec2::new(100.0, 100.0)));
        mouse(&mut app, true);
        assert_eq!(phases(&frame(&mut app)), vec![PointerPhase::Move, PointerPhase::Down]);

        set_cursor(&mut app, window, Some(Vec2::new(120.0, 110.0)));
        mouse(&mut app, false);
        let events = frame(&mut app);
        assert_eq!(phases(&events), vec![PointerPhase::Move, PointerPhase::Up, PointerPhase::Click]);
        assert_eq!(events[2].position, Vec2::new(120.0, 110.0));
        assert!(events.iter().all(|event| event.is_primary() && !event.over_ui));
    }

    #[test]
    fn press_outside_the_viewport_never_clicks() {
        let (mut app, window) = collector_app();
        set_cursor(&mut app, window, Some(Vec2::new(900.0, 100.0)));
        mouse(&mut app, true);
        frame(&mut app);
        mouse(&mut app, false);
        assert_eq!(phases(&frame(&mut app)), vec![PointerPhase::Up]);
    }

    #[test]
    fn hovered_ui_control_flags_events() {
        let (mut app, window) = collector_app();
        app.world_mut().spawn((UiControl, Interaction::Hovered));
        set_cursor(&mut app, window, Some(Vec2::new(50.0, 50.0)));
        mouse(&mut app, true);
        let events = frame(&mut app);
        assert_eq!(phases(&events), vec![PointerPhase::Move, PointerPhase::Down]);
        assert!(events.iter().all(|event| event.over_ui));
    }

    #[test]
    fn focus_loss_blurs() {
        let (mut app, window) = collector_app();
        set_cursor(&mut app, window, Some(Vec2::new(50.0, 50.0)));
        mouse(&mut app, true);
        frame(&mut app);

        app.world_mut().send_event(WindowFocused { window, focused: false });
        let events = frame(&mut app);
        assert_eq!(phases(&events), vec![PointerPhase::Blur]);
        assert_eq!(events[0].position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn release_off_window_ends_the_press_without_click() {
        let (mut app, window) = collector_app();
        set_cursor(&mut app, window, Some(Vec2::new(100.0, 100.0)));
        mouse(&mut app, true);
        frame(&mut app);
        set_cursor(&mut app, window, Some(Vec2::new(300.0, 200.0)));
        frame(&mut app);

        // Leaving the window mid-drag is not a cancel
        set_cursor(&mut app, window, None);
        assert!(frame(&mut app).is_empty());

        mouse(&mut app, false);
        let events = frame(&mut app);
        assert_eq!(phases(&events), vec![PointerPhase::Up]);
        assert_eq!(events[0].position, Vec2::new(300.0, 200.0));
    }
}
