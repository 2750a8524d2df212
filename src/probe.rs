// Automation probe: read-only view of the editor for end-to-end tests.
//
// Off unless `--e2e` is passed. With `--probe-out` a JSON snapshot is rewritten
// every frame in which the shared state changed.
use anyhow::{Context, Result};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::interaction_lock::InteractionLock;
use crate::raycast::{SceneView, ScreenPoint};
use crate::state::{SceneState, StateChanged};
use crate::types::*;

#[derive(Resource, Clone, Debug, Default)]
pub struct ProbeConfig {
    pub enabled: bool,
    pub snapshot_path: Option<PathBuf>,
    pub required_agents: Vec<String>,
}

impl ProbeConfig {
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            enabled: args.e2e,
            snapshot_path: args.probe_out.clone(),
            required_agents: args.required_agent_ids(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct ProbeVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for ProbeVec3 {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub position: Option<ProbeVec3>,
    pub target_position: Option<ProbeVec3>,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ProbeSnapshot {
    pub agents: Vec<AgentSnapshot>,
    pub selected_agent_ids: Vec<AgentId>,
    pub interaction_locked: bool,
    pub scene_ready: bool,
}

/// Ready when every required agent is registered and its model has spawned;
/// with no required ids, when any agent exists
pub fn is_scene_ready(scene: &SceneState, required: &[String]) -> bool {
    if required.is_empty() {
        return scene.agent_count() > 0;
    }
    required
        .iter()
        .all(|id| scene.agent(&AgentId::new(id.as_str())).is_some_and(|agent| agent.avatar.is_some() && agent.visual_ready))
}

#[derive(SystemParam)]
pub struct SceneProbe<'w, 's> {
    config: Res<'w, ProbeConfig>,
    scene: Res<'w, SceneState>,
    lock: Res<'w, InteractionLock>,
    view: Res<'w, SceneView>,
    transforms: Query<'w, 's, &'static Transform, With<AgentAvatar>>,
}

impl SceneProbe<'_, '_> {
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Agents sorted by id
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        let mut agents: Vec<AgentSnapshot> = self
            .scene
            .agents()
            .map(|agent| AgentSnapshot {
                id: agent.id.clone(),
                name: agent.name.clone(),
                position: agent
                    .avatar
                    .and_then(|avatar| self.transforms.get(avatar).ok())
                    .map(|transform| transform.translation.into()),
                target_position: agent.target_position.map(Into::into),
            })
            .collect();
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        agents
    }

    pub fn selected_agent_ids(&self) -> Vec<AgentId> {
        self.scene.selected_ids().to_vec()
    }

    pub fn is_interaction_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn world_to_screen(&self, world: Vec3) -> Option<ScreenPoint> {
        self.view.world_to_screen(world)
    }

    pub fn is_scene_ready(&self) -> bool {
        is_scene_ready(&self.scene, &self.config.required_agents)
    }

    pub fn snapshot(&self) -> ProbeSnapshot {
        ProbeSnapshot {
            agents: self.agents(),
            selected_agent_ids: self.selected_agent_ids(),
            interaction_locked: self.is_interaction_locked(),
            scene_ready: self.is_scene_ready(),
        }
    }
}

pub fn write_snapshot(path: &Path, snapshot: &ProbeSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serializing probe snapshot")?;
    std::fs::write(path, json).with_context(|| format!("writing probe snapshot to {}", path.display()))?;
    Ok(())
}

/// System: rewrite the snapshot file after state changes. Lock changes don't
/// publish a state change, so they are watched directly.
pub fn probe_snapshot_system(mut changes: EventReader<StateChanged>, probe: SceneProbe) {
    let changed = changes.read().count() > 0 || probe.lock.is_changed();
    if !probe.is_enabled() || !changed {
        return;
    }
    let Some(path) = probe.config.snapshot_path.as_deref() else { return };
    if let Err(err) = write_snapshot(path, &probe.snapshot()) {
        warn!("Probe snapshot failed: {:#}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::EditorTestApp;
    use bevy::ecs::system::SystemState;

    #[test]
    fn readiness_rules() {
        let mut scene = SceneState::default();
        assert!(!is_scene_ready(&scene, &[]));
        scene.register_agent(AgentId::from("ranger1"), "Ranger 1", CharacterModel::Ranger, Entity::from_raw(1));
        assert!(is_scene_ready(&scene, &[]));

        let required = vec!["ranger1".to_string(), "ranger2".to_string()];
        scene.set_agent_visual_ready(&AgentId::from("ranger1"), true);
        assert!(!is_scene_ready(&scene, &required));
        scene.register_agent(AgentId::from("ranger2"), "Ranger 2", CharacterModel::Ranger, Entity::from_raw(2));
        assert!(!is_scene_ready(&scene, &required), "ranger2 has no model yet");
        scene.set_agent_visual_ready(&AgentId::from("ranger2"), true);
        assert!(is_scene_ready(&scene, &required));
    }

    #[test]
    fn probe_reports_agents_selection_and_lock() {
        let mut harness = EditorTestApp::new();
        harness.spawn_agent("ranger2", Vec3::new(2.0, 0.0, 0.0));
        harness.spawn_agent("ranger1", Vec3::new(-2.0, 0.0, 0.0));
        harness.update();
        harness.mark_model_spawned("ranger1");
        harness.mark_model_spawned("ranger2");
        harness.scene_mut().add_to_selection(AgentId::from("ranger1"));
        harness.set_locked(true);

        let mut state: SystemState<SceneProbe> = SystemState::new(harness.app.world_mut());
        let probe = state.get(harness.app.world());
        let agents = probe.agents();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].id, AgentId::from("ranger1"));
        assert_eq!(agents[0].position, Some(ProbeVec3 { x: -2.0, y: 0.0, z: 0.0 }));
        assert_eq!(agents[0].target_position, None);
        assert_eq!(probe.selected_agent_ids(), vec![AgentId::from("ranger1")]);
        assert!(probe.is_interaction_locked());
        assert!(probe.is_scene_ready());

        let origin = probe.world_to_screen(Vec3::ZERO).expect("origin projects");
        assert!((origin.x - 400.0).abs() < 0.01 && (origin.y - 300.0).abs() < 0.01);
        assert!(origin.in_viewport);
    }

    #[test]
    fn snapshot_file_written_on_change() {
        let path = std::env::temp_dir().join(format!("probe-{}.json", random_uuid()));
        let mut harness = EditorTestApp::new();
        harness.app.insert_resource(ProbeConfig {
            enabled: true,
            snapshot_path: Some(path.clone()),
            required_agents: vec!["ranger1".into()],
        });
        harness.spawn_agent("ranger1", Vec3::ZERO);
        harness.update();

        let read = |path: &Path| -> serde_json::Value {
            let json = std::fs::read_to_string(path).expect("snapshot written");
            serde_json::from_str(&json).expect("valid json")
        };
        let value = read(&path);
        assert_eq!(value["agents"][0]["id"], "ranger1");
        assert_eq!(value["scene_ready"], false);
        assert_eq!(value["interaction_locked"], false);

        harness.mark_model_spawned("ranger1");
        harness.update();
        assert_eq!(read(&path)["scene_ready"], true);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_probe_writes_nothing() {
        let path = std::env::temp_dir().join(format!("probe-{}.json", random_uuid()));
        let mut harness = EditorTestApp::new();
        harness.app.insert_resource(ProbeConfig {
            enabled: false,
            snapshot_path: Some(path.clone()),
            required_agents: Vec::new(),
        });
        harness.spawn_agent("ranger1", Vec3::ZERO);
        harness.update();
        assert!(!path.exists());
    }
}
