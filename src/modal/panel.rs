// Modal overlay panel and name text entry
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use super::{ModalRequest, ModalState};
use crate::input::{TextInputFocus, UiControl};

#[derive(Component)]
pub struct ModalPanel;

#[derive(Component)]
pub struct ModalPanelText;

const PANEL_BACKGROUND: Color = Color::srgba(0.11, 0.141, 0.208, 0.96);
const PANEL_BORDER: Color = Color::srgb(0.149, 0.196, 0.294);
const PANEL_TEXT: Color = Color::srgb(0.93, 0.94, 0.965);

fn panel_body(modal: &ModalState) -> String {
    let cursor = if modal.renaming { "_" } else { "" };
    match &modal.open {
        Some(ModalRequest::ConfigureAgent(draft)) => format!(
            "Configure Agent ({})\n\nName: {}{}\nModel: {}\nCharacter: {}\n\n[R] rename  [M] model  [C] character\n[Enter] save  [Esc] close",
            draft.id,
            draft.name,
            cursor,
            draft.model,
            draft.character.label(),
        ),
        Some(ModalRequest::EditZone(draft)) => format!(
            "Project Name\n\nName: {}{}\nColour: #{}\n\n[R] rename  [C] colour  [Delete] remove\n[Enter] done  [Esc] close",
            draft.name,
            cursor,
            draft.color.to_hex().trim_start_matches('#'),
        ),
        None => String::new(),
    }
}

/// System: show, refresh and hide the panel as the modal state changes
pub fn modal_panel_system(
    mut commands: Commands,
    modal: Res<ModalState>,
    panel_query: Query<Entity, With<ModalPanel>>,
    mut text_query: Query<&mut Text, With<ModalPanelText>>,
) {
    if !modal.is_changed() {
        return;
    }

    if !modal.is_open() {
        for entity in panel_query.iter() {
            commands.entity(entity).despawn();
        }
        return;
    }

    if let Ok(mut text) = text_query.single_mut() {
        text.0 = panel_body(&modal);
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(50.0),
                top: Val::Percent(30.0),
                margin: UiRect::left(Val::Px(-220.0)),
                width: Val::Px(440.0),
                padding: UiRect::all(Val::Px(18.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderColor(PANEL_BORDER),
            BorderRadius::all(Val::Px(14.0)),
            GlobalZIndex(50),
            Interaction::default(),
            UiControl,
            ModalPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(panel_body(&modal)),
                TextFont { font_size: 16.0, ..default() },
                TextColor(PANEL_TEXT),
                ModalPanelText,
            ));
        });
}

/// System: typed characters edit the draft name while renaming. Enter or Esc
/// ends renaming without closing the modal.
pub fn modal_text_entry_system(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut modal: ResMut<ModalState>,
    mut text_focus: ResMut<TextInputFocus>,
) {
    if !modal.renaming {
        keyboard_events.clear();
        text_focus.0 = false;
        return;
    }

    // The key that started renaming is still in this frame's events
    if !text_focus.0 {
        keyboard_events.clear();
        text_focus.0 = true;
        return;
    }

    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match &event.logical_key {
            Key::Enter | Key::Escape => {
                modal.renaming = false;
                text_focus.0 = false;
                return;
            }
            Key::Backspace => {
                if let Some(name) = modal.draft_name_mut() {
                    name.pop();
                }
            }
            Key::Space => {
                if let Some(name) = modal.draft_name_mut() {
                    name.push(' ');
                }
            }
            Key::Character(chars) => {
                if let Some(name) = modal.draft_name_mut() {
                    name.push_str(chars);
                }
            }
            _ => {}
        }
    }
}
