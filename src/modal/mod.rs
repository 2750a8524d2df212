// Modal collaborator - agent configuration and zone editing overlays
//
// Opening a modal engages the interaction lock and closing it releases the
// lock. The overlay itself (panel.rs) is render-only; the draft state, keyboard
// editing and outcome handling live here so they run headless too.

pub mod panel;

use bevy::prelude::*;

use crate::constants::*;
use crate::input::TextInputFocus;
use crate::interaction_lock::InteractionLock;
use crate::state::SceneState;
use crate::types::*;

#[derive(Clone, PartialEq, Debug)]
pub struct AgentConfigDraft {
    pub id: AgentId,
    pub name: String,
    pub model: String,
    pub character: CharacterModel,
}

impl AgentConfigDraft {
    /// Current values of an agent; agents without a model identifier get the default
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            name: agent.name.clone(),
            model: if agent.model.is_empty() { DEFAULT_AGENT_MODEL.to_string() } else { agent.model.clone() },
            character: agent.character,
        }
    }

    pub fn cycle_model(&mut self) {
        let index = AGENT_MODEL_OPTIONS.iter().position(|m| *m == self.model);
        let next = index.map_or(0, |i| (i + 1) % AGENT_MODEL_OPTIONS.len());
        self.model = AGENT_MODEL_OPTIONS[next].to_string();
    }

    pub fn config(&self) -> AgentConfig {
        AgentConfig { name: self.name.clone(), model: self.model.clone(), character: self.character }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ZoneDraft {
    pub id: ZoneId,
    pub name: String,
    pub color: Srgba,
}

impl ZoneDraft {
    pub fn from_zone(zone: &Zone) -> Self {
        Self { id: zone.id, name: zone.name.clone(), color: zone.color }
    }

    /// Step through the edit palette; colours outside it start from the first entry
    pub fn cycle_color(&mut self) {
        let index = ZONE_EDIT_PALETTE.iter().position(|c| *c == self.color);
        let next = index.map_or(0, |i| (i + 1) % ZONE_EDIT_PALETTE.len());
        self.color = ZONE_EDIT_PALETTE[next];
    }
}

/// Ask for a modal to open
#[derive(Event, Clone, PartialEq, Debug)]
pub enum ModalRequest {
    ConfigureAgent(AgentConfigDraft),
    EditZone(ZoneDraft),
}

/// How an open modal was closed
#[derive(Event, Clone, PartialEq, Debug)]
pub enum ModalOutcome {
    AgentSaved(AgentConfigDraft),
    ZoneSaved(ZoneDraft),
    ZoneDeleted(ZoneId),
    Dismissed,
}

/// The open modal and its working copy. `renaming` routes typed text into the name.
#[derive(Resource, Default, Debug)]
pub struct ModalState {
    pub open: Option<ModalRequest>,
    pub renaming: bool,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn draft_name_mut(&mut self) -> Option<&mut String> {
        match self.open.as_mut()? {
            ModalRequest::ConfigureAgent(draft) => Some(&mut draft.name),
            ModalRequest::EditZone(draft) => Some(&mut draft.name),
        }
    }

    /// Keyboard editing of the open modal. Returns the outcome when the key closes it.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<ModalOutcome> {
        let open = self.open.as_mut()?;
        match (key, open) {
            (KeyCode::Escape, _) => Some(ModalOutcome::Dismissed),
            (KeyCode::Enter, ModalRequest::ConfigureAgent(draft)) => Some(ModalOutcome::AgentSaved(draft.clone())),
            (KeyCode::Enter, ModalRequest::EditZone(draft)) => Some(ModalOutcome::ZoneSaved(draft.clone())),
            (KeyCode::Delete, ModalRequest::EditZone(draft)) => Some(ModalOutcome::ZoneDeleted(draft.id)),
            (KeyCode::KeyC, ModalRequest::ConfigureAgent(draft)) => {
                draft.character = draft.character.next();
                None
            }
            (KeyCode::KeyC, ModalRequest::EditZone(draft)) => {
                draft.cycle_color();
                None
            }
            (KeyCode::KeyM, ModalRequest::ConfigureAgent(draft)) => {
                draft.cycle_model();
                None
            }
            (KeyCode::KeyR, _) => {
                self.renaming = true;
                None
            }
            _ => None,
        }
    }
}

/// System: open requested modals and engage the lock
pub fn open_modal_system(
    mut requests: EventReader<ModalRequest>,
    mut modal: ResMut<ModalState>,
    mut lock: ResMut<InteractionLock>,
) {
    for request in requests.read() {
        if modal.is_open() {
            debug!("Modal already open, ignoring {:?}", request);
            continue;
        }
        match request {
            ModalRequest::ConfigureAgent(draft) => info!("Opening agent configuration for {}", draft.id),
            ModalRequest::EditZone(draft) => info!("Opening zone editor for '{}'", draft.name),
        }
        modal.open = Some(request.clone());
        modal.renaming = false;
        lock.set_locked(true);
    }
}

/// System: keyboard editing of the open modal, skipped while text entry owns the keyboard
pub fn modal_keyboard_system(
    keys: Res<ButtonInput<KeyCode>>,
    text_focus: Res<TextInputFocus>,
    mut modal: ResMut<ModalState>,
    mut outcomes: EventWriter<ModalOutcome>,
) {
    if !modal.is_open() || text_focus.0 {
        return;
    }
    for key in [KeyCode::Escape, KeyCode::Enter, KeyCode::Delete, KeyCode::KeyC, KeyCode::KeyM, KeyCode::KeyR] {
        if !keys.just_pressed(key) {
            continue;
        }
        if let Some(outcome) = modal.handle_key(key) {
            outcomes.write(outcome);
            return;
        }
    }
}

/// System: apply outcomes to the scene, close the modal and release the lock
pub fn apply_modal_outcomes(
    mut outcomes: EventReader<ModalOutcome>,
    mut modal: ResMut<ModalState>,
    mut scene: ResMut<SceneState>,
    mut lock: ResMut<InteractionLock>,
    mut text_focus: ResMut<TextInputFocus>,
) {
    for outcome in outcomes.read() {
        match outcome {
            ModalOutcome::AgentSaved(draft) => scene.update_agent_config(&draft.id, draft.config()),
            ModalOutcome::ZoneSaved(draft) => scene.update_zone(&draft.id, draft.name.clone(), draft.color),
            ModalOutcome::ZoneDeleted(id) => scene.delete_zone(id),
            ModalOutcome::Dismissed => {}
        }
        if modal.open.take().is_some() {
            info!("Modal closed ({})", outcome_label(outcome));
        }
        modal.renaming = false;
        text_focus.0 = false;
        lock.set_locked(false);
    }
}

fn outcome_label(outcome: &ModalOutcome) -> &'static str {
    match outcome {
        ModalOutcome::AgentSaved(_) => "agent saved",
        ModalOutcome::ZoneSaved(_) => "zone saved",
        ModalOutcome::ZoneDeleted(_) => "zone deleted",
        ModalOutcome::Dismissed => "dismissed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_draft() -> AgentConfigDraft {
        AgentConfigDraft {
            id: AgentId::from("ranger1"),
            name: "Ranger 1".into(),
            model: DEFAULT_AGENT_MODEL.into(),
            character: CharacterModel::Ranger,
        }
    }

    #[test]
    fn draft_defaults_missing_model() {
        let agent = Agent {
            id: AgentId::from("ranger1"),
            name: "Ranger 1".into(),
            model: String::new(),
            character: CharacterModel::Ranger,
            avatar: None,
            visual_ready: false,
            target_position: None,
        };
        assert_eq!(AgentConfigDraft::from_agent(&agent).model, "claude-sonnet");
    }

    #[test]
    fn agent_keys_cycle_then_save() {
        let mut modal = ModalState { open: Some(ModalRequest::ConfigureAgent(agent_draft())), renaming: false };
        assert_eq!(modal.handle_key(KeyCode::KeyC), None);
        assert_eq!(modal.handle_key(KeyCode::KeyM), None);

        let Some(ModalOutcome::AgentSaved(saved)) = modal.handle_key(KeyCode::Enter) else {
            panic!("enter should save");
        };
        assert_eq!(saved.character, CharacterModel::Rogue);
        assert_eq!(saved.model, "claude-opus");
    }

    #[test]
    fn zone_keys_recolor_delete_and_dismiss() {
        let draft = ZoneDraft { id: ZoneId::random(), name: "Project 1".into(), color: palette_color(0) };
        let id = draft.id;
        let mut modal = ModalState { open: Some(ModalRequest::EditZone(draft)), renaming: false };

        modal.handle_key(KeyCode::KeyC);
        let Some(ModalOutcome::ZoneSaved(saved)) = modal.handle_key(KeyCode::Enter) else {
            panic!("enter should save");
        };
        assert_eq!(saved.color, ZONE_EDIT_PALETTE[0]);

        assert_eq!(modal.handle_key(KeyCode::Delete), Some(ModalOutcome::ZoneDeleted(id)));
        assert_eq!(modal.handle_key(KeyCode::Escape), Some(ModalOutcome::Dismissed));
    }

    #[test]
    fn delete_does_nothing_for_agents() {
        let mut modal = ModalState { open: Some(ModalRequest::ConfigureAgent(agent_draft())), renaming: false };
        assert_eq!(modal.handle_key(KeyCode::Delete), None);
        assert!(modal.is_open());
    }

    #[test]
    fn rename_key_enters_text_entry() {
        let mut modal = ModalState { open: Some(ModalRequest::ConfigureAgent(agent_draft())), renaming: false };
        modal.handle_key(KeyCode::KeyR);
        assert!(modal.renaming);
        modal.draft_name_mut().unwrap().push_str(" II");
        let Some(ModalOutcome::AgentSaved(saved)) = modal.handle_key(KeyCode::Enter) else {
            panic!("enter should save");
        };
        assert_eq!(saved.name, "Ranger 1 II");
    }

    #[test]
    fn closed_modal_ignores_keys() {
        let mut modal = ModalState::default();
        assert_eq!(modal.handle_key(KeyCode::Escape), None);
    }
}
