// Shared rig animations: Idle_A while standing, Running_A while walking to a target
use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::*;
use crate::state::SceneState;
use crate::types::*;

/// Clips from the shared rig files, gathered into one animation graph once loaded
#[derive(Resource)]
pub struct AgentAnimationLibrary {
    sources: Vec<Handle<Gltf>>,
    graph: Option<Handle<AnimationGraph>>,
    nodes: HashMap<&'static str, AnimationNodeIndex>,
}

impl AgentAnimationLibrary {
    pub fn node(&self, clip: &str) -> Option<AnimationNodeIndex> {
        self.nodes.get(clip).copied()
    }
}

/// Which clip an agent should be playing
pub fn clip_for(agent: &Agent) -> &'static str {
    if agent.target_position.is_some() {
        RUNNING_CLIP
    } else {
        IDLE_CLIP
    }
}

/// Clip currently driven on an animation player
#[derive(Component, Default)]
pub struct PlayingClip(pub Option<&'static str>);

pub fn load_agent_animations(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(AgentAnimationLibrary {
        sources: vec![asset_server.load(MOVEMENT_ANIMATIONS_PATH), asset_server.load(GENERAL_ANIMATIONS_PATH)],
        graph: None,
        nodes: HashMap::new(),
    });
}

/// System: build the graph once every rig file is loaded. Missing clips are skipped.
pub fn build_animation_graph(
    mut library: ResMut<AgentAnimationLibrary>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    if library.graph.is_some() {
        return;
    }
    let loaded: Vec<&Gltf> = library.sources.iter().filter_map(|handle| gltfs.get(handle)).collect();
    if loaded.len() < library.sources.len() {
        return;
    }

    let mut graph = AnimationGraph::new();
    let mut nodes = HashMap::new();
    for clip_name in [IDLE_CLIP, RUNNING_CLIP] {
        let clip = loaded.iter().find_map(|gltf| gltf.named_animations.get(clip_name));
        match clip {
            Some(clip) => {
                let node = graph.add_clip(clip.clone(), 1.0, graph.root);
                nodes.insert(clip_name, node);
            }
            None => warn!("Animation clip '{}' not found in rig files, skipping", clip_name),
        }
    }

    info!("Agent animation graph ready ({} clips)", nodes.len());
    library.graph = Some(graphs.add(graph));
    library.nodes = nodes;
}

fn owning_agent(entity: Entity, parents: &Query<&ChildOf>, avatars: &Query<&AgentAvatar>) -> Option<AgentId> {
    let mut current = entity;
    loop {
        if let Ok(avatar) = avatars.get(current) {
            return Some(avatar.id.clone());
        }
        current = parents.get(current).ok()?.parent();
    }
}

/// System: switch each agent's animation player between idle and running
pub fn agent_animation_system(
    mut commands: Commands,
    library: Res<AgentAnimationLibrary>,
    scene: Res<SceneState>,
    mut players: Query<(Entity, &mut AnimationPlayer, Option<&mut PlayingClip>)>,
    parents: Query<&ChildOf>,
    avatars: Query<&AgentAvatar>,
) {
    let Some(graph) = library.graph.as_ref() else { return };

    for (entity, mut player, playing) in players.iter_mut() {
        let Some(agent) = owning_agent(entity, &parents, &avatars).and_then(|id| scene.agent(&id)) else {
            continue;
        };
        let wanted = clip_for(agent);

        let Some(mut playing) = playing else {
            // First sighting of a freshly loaded model
            commands.entity(entity).insert((AnimationGraphHandle(graph.clone()), PlayingClip(None)));
            continue;
        };
        if playing.0 == Some(wanted) {
            continue;
        }

        player.stop_all();
        if let Some(node) = library.node(wanted) {
            player.play(node).repeat();
        }
        playing.0 = Some(wanted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_only_while_targeted() {
        let mut agent = Agent {
            id: AgentId::from("ranger1"),
            name: "Ranger 1".into(),
            model: String::new(),
            character: CharacterModel::Ranger,
            avatar: None,
            visual_ready: false,
            target_position: None,
        };
        assert_eq!(clip_for(&agent), "Idle_A");
        agent.target_position = Some(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(clip_for(&agent), "Running_A");
    }
}
