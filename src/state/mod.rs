// Shared scene state - agents, selection, mode, zones, drag and hover feedback
//
// Submodules:
// - zones: zone CRUD, drag cells and the build notification
// - hover: active hover cell and the decaying hover trail
//
// Every mutation records which part of the state changed (only when it actually
// did); `publish_state_changes` turns that log into `StateChanged` events once
// per frame so render systems can react per kind.

mod hover;
mod zones;

use bevy::prelude::*;
use std::collections::HashMap;

use crate::formation::plan_move_assignments;
use crate::types::*;

/// Which slice of `SceneState` a mutation touched
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StateChange {
    Agents,
    Selection,
    Mode,
    Zones,
    ZoneDrag,
    Notification,
    Hover,
}

/// Broadcast after input and frame systems ran, one event per changed kind
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChanged(pub StateChange);

#[derive(Resource, Default, Debug)]
pub struct SceneState {
    agents: HashMap<AgentId, Agent>,
    selected: Vec<AgentId>, // Insertion order, no duplicates
    mode: InteractionMode,
    zones: HashMap<ZoneId, Zone>,
    zone_counter: u32,
    zone_drag: ZoneDrag,
    notification: Option<ZoneBuildNotification>,
    hover_trail: HashMap<GridCell, HoverCellFx>,
    active_hover: Option<ActiveHoverCell>,
    changes: Vec<StateChange>,
}

impl SceneState {
    fn mark(&mut self, change: StateChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    /// Drain the change log accumulated since the last call
    pub fn take_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.changes)
    }

    // ----- Agents -----

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn register_agent(&mut self, id: AgentId, name: impl Into<String>, character: CharacterModel, avatar: Entity) {
        let name = name.into();
        info!("Registered agent {} ({}, {})", id, name, character.label());
        self.agents.insert(
            id.clone(),
            Agent {
                id,
                name,
                model: String::new(),
                character,
                avatar: Some(avatar),
                visual_ready: false,
                target_position: None,
            },
        );
        self.mark(StateChange::Agents);
    }

    /// Removes the agent and drops it from the selection
    pub fn unregister_agent(&mut self, id: &AgentId) {
        if self.agents.remove(id).is_some() {
            info!("Unregistered agent {}", id);
            self.mark(StateChange::Agents);
        }
        let before = self.selected.len();
        self.selected.retain(|selected| selected != id);
        if self.selected.len() != before {
            self.mark(StateChange::Selection);
        }
    }

    pub fn update_agent_avatar(&mut self, id: &AgentId, avatar: Entity) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        if agent.avatar != Some(avatar) {
            agent.avatar = Some(avatar);
            self.mark(StateChange::Agents);
        }
    }

    /// Marks whether the avatar's model meshes exist
    pub fn set_agent_visual_ready(&mut self, id: &AgentId, ready: bool) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        if agent.visual_ready != ready {
            agent.visual_ready = ready;
            self.mark(StateChange::Agents);
        }
    }

    pub fn update_agent_config(&mut self, id: &AgentId, config: AgentConfig) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        if agent.name == config.name && agent.model == config.model && agent.character == config.character {
            return;
        }
        info!(
            "Agent {} configured: name '{}', model '{}', character {}",
            id,
            config.name,
            config.model,
            config.character.label()
        );
        agent.name = config.name;
        agent.model = config.model;
        agent.character = config.character;
        self.mark(StateChange::Agents);
    }

    pub fn set_target_position(&mut self, id: &AgentId, target: Vec3) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        if agent.target_position != Some(target) {
            agent.target_position = Some(target);
            self.mark(StateChange::Agents);
        }
    }

    pub fn clear_target_position(&mut self, id: &AgentId) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        if agent.target_position.take().is_some() {
            self.mark(StateChange::Agents);
        }
    }

    // ----- Selection -----

    pub fn selected_ids(&self) -> &[AgentId] {
        &self.selected
    }

    pub fn is_selected(&self, id: &AgentId) -> bool {
        self.selected.contains(id)
    }

    pub fn add_to_selection(&mut self, id: AgentId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
            self.mark(StateChange::Selection);
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.mark(StateChange::Selection);
        }
    }

    /// Plan destinations for the current selection and write them as target
    /// positions. `position_of` resolves an agent's current world position;
    /// selected ids without an agent or a position are skipped.
    pub fn move_selected_agents_to(&mut self, destination: Vec3, position_of: impl Fn(&Agent) -> Option<Vec3>) {
        if self.selected.is_empty() {
            return;
        }

        let selected: Vec<(AgentId, Option<Vec3>)> = self
            .selected
            .iter()
            .map(|id| (id.clone(), self.agents.get(id).and_then(&position_of)))
            .collect();

        let assignments = plan_move_assignments(destination, &selected);
        info!(
            "Move command to ({:.1}, {:.1}) for {} agents",
            destination.x,
            destination.z,
            assignments.len()
        );

        for (id, target) in assignments {
            self.set_target_position(&id, target);
        }
    }

    /// Move order as issued from the scene: assign targets, then deselect
    pub fn issue_move_order(&mut self, destination: Vec3, position_of: impl Fn(&Agent) -> Option<Vec3>) {
        self.move_selected_agents_to(destination, position_of);
        self.clear_selection();
    }

    // ----- Mode -----

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switching clears the selection, zone drag and all hover feedback
    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            info!("Interaction mode: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.mark(StateChange::Mode);
        }
        self.clear_selection();
        self.clear_zone_drag();
        self.clear_hover_trail();
    }

    pub fn toggle_interaction_mode(&mut self) {
        self.set_interaction_mode(self.mode.toggled());
    }
}

/// Turns the recorded change log into events
pub fn publish_state_changes(mut scene: ResMut<SceneState>, mut events: EventWriter<StateChanged>) {
    if scene.changes.is_empty() {
        return;
    }
    for change in scene.take_changes() {
        events.write(StateChanged(change));
    }
}
