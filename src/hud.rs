// Screen overlay: mode toggle button and the zone-build notification toast
use bevy::prelude::*;

use crate::input::UiControl;
use crate::interaction_lock::InteractionLock;
use crate::state::{SceneState, StateChange, StateChanged};
use crate::types::InteractionMode;

#[derive(Component)]
pub struct ModeToggleButton;

#[derive(Component)]
pub struct ModeToggleLabel;

#[derive(Component)]
pub struct NotificationToast;

const TOGGLE_BACKGROUND: Color = Color::srgba(0.06, 0.09, 0.16, 0.85);
const TOGGLE_BACKGROUND_HOVER: Color = Color::srgba(0.12, 0.16, 0.23, 0.9);
const TOGGLE_TEXT: Color = Color::srgb(0.81, 0.98, 1.0);
const TOAST_BACKGROUND: Color = Color::srgba(0.5, 0.11, 0.11, 0.9);

pub fn mode_toggle_text(mode: InteractionMode) -> &'static str {
    match mode {
        InteractionMode::Normal => "ADD ZONE",
        InteractionMode::Build => "EXIT BUILD",
    }
}

pub fn spawn_hud(mut commands: Commands) {
    // Mode toggle, bottom centre
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(10.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-60.0)),
                width: Val::Px(120.0),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            Button,
            BackgroundColor(TOGGLE_BACKGROUND),
            BorderColor(Color::srgba(0.4, 0.9, 0.98, 0.4)),
            BorderRadius::all(Val::Px(6.0)),
            GlobalZIndex(40),
            UiControl,
            ModeToggleButton,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(mode_toggle_text(InteractionMode::Normal)),
                TextFont { font_size: 12.0, ..default() },
                TextColor(TOGGLE_TEXT),
                ModeToggleLabel,
            ));
        });

    // Notification toast, top centre, hidden until there is a message
    commands.spawn((
        Text::new(""),
        TextFont { font_size: 14.0, ..default() },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-160.0)),
            width: Val::Px(320.0),
            padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
            display: Display::None,
            ..default()
        },
        BackgroundColor(TOAST_BACKGROUND),
        BorderRadius::all(Val::Px(8.0)),
        GlobalZIndex(45),
        NotificationToast,
    ));
}

/// System: the toggle button flips the mode; ignored while locked
pub fn mode_toggle_button_system(
    lock: Res<InteractionLock>,
    mut scene: ResMut<SceneState>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<ModeToggleButton>)>,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                if !lock.is_locked() {
                    scene.toggle_interaction_mode();
                }
            }
            Interaction::Hovered => background.0 = TOGGLE_BACKGROUND_HOVER,
            Interaction::None => background.0 = TOGGLE_BACKGROUND,
        }
    }
}

/// System: refresh the button label and the toast on state changes
pub fn hud_refresh_system(
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneState>,
    mut labels: Query<&mut Text, (With<ModeToggleLabel>, Without<NotificationToast>)>,
    mut toasts: Query<(&mut Text, &mut Node), With<NotificationToast>>,
) {
    let mut mode_changed = false;
    let mut notification_changed = false;
    for change in changes.read() {
        match change.0 {
            StateChange::Mode => mode_changed = true,
            StateChange::Notification => notification_changed = true,
            _ => {}
        }
    }

    if mode_changed {
        for mut text in labels.iter_mut() {
            text.0 = mode_toggle_text(scene.mode()).to_string();
        }
    }

    if notification_changed {
        for (mut text, mut node) in toasts.iter_mut() {
            match scene.notification() {
                Some(notification) => {
                    text.0 = notification.message.clone();
                    node.display = Display::Flex;
                }
                None => node.display = Display::None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_names_the_next_action() {
        assert_eq!(mode_toggle_text(InteractionMode::Normal), "ADD ZONE");
        assert_eq!(mode_toggle_text(InteractionMode::Build), "EXIT BUILD");
    }
}
