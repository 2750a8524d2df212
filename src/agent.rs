// Agent lifecycle: spawning, registration with the shared state, character
// model swaps and floating name tags
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::raycast::SceneView;
use crate::state::{SceneState, StateChange, StateChanged};
use crate::types::*;

/// Height of the name tag anchor above the agent's feet
const NAME_TAG_HEIGHT: f32 = 2.2;

/// Floating UI label following one agent
#[derive(Component)]
pub struct AgentNameTag {
    pub agent: AgentId,
}

/// Components of an agent root. The character model child is attached by
/// `sync_agent_characters` once the agent is registered.
pub fn agent_bundle(id: impl Into<String>, name: impl Into<String>, character: CharacterModel, position: Vec3) -> impl Bundle {
    let id = AgentId::new(id);
    (
        Name::new(format!("Agent {}", id)),
        AgentAvatar { id, name: name.into(), character },
        Selectable,
        Transform::from_translation(position),
        Visibility::default(),
    )
}

pub fn spawn_agent(
    commands: &mut Commands,
    id: impl Into<String>,
    name: impl Into<String>,
    character: CharacterModel,
    position: Vec3,
) -> Entity {
    commands.spawn(agent_bundle(id, name, character, position)).id()
}

/// System: register newly spawned agents
pub fn register_spawned_agents(
    mut scene: ResMut<SceneState>,
    spawned: Query<(Entity, &AgentAvatar), Added<AgentAvatar>>,
) {
    for (entity, avatar) in spawned.iter() {
        scene.register_agent(avatar.id.clone(), avatar.name.clone(), avatar.character, entity);
    }
}

/// System: unregister agents whose root entity went away
pub fn unregister_despawned_agents(mut scene: ResMut<SceneState>, mut removed: RemovedComponents<AgentAvatar>) {
    for entity in removed.read() {
        let ids: Vec<AgentId> = scene
            .agents()
            .filter(|agent| agent.avatar == Some(entity))
            .map(|agent| agent.id.clone())
            .collect();
        for id in ids {
            scene.unregister_agent(&id);
        }
    }
}

fn spawn_model_child(
    commands: &mut Commands,
    asset_server: &AssetServer,
    root: Entity,
    character: CharacterModel,
) -> Entity {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(character.asset_path()));
    let child = commands
        .spawn((AgentModel { character }, SceneRoot(scene), Transform::default()))
        .observe(mark_model_spawned)
        .id();
    commands.entity(root).add_child(child);
    child
}

/// Observer: the model child's glTF scene is in the world, so its meshes are
/// pickable and the agent counts as visually bound
fn mark_model_spawned(
    trigger: Trigger<SceneInstanceReady>,
    models: Query<&ChildOf, With<AgentModel>>,
    avatars: Query<&AgentAvatar>,
    mut scene: ResMut<SceneState>,
) {
    let Some(id) = model_owner(trigger.target(), &models, &avatars) else { return };
    debug!("Agent {} model spawned", id);
    scene.set_agent_visual_ready(&id, true);
}

fn model_owner(model: Entity, models: &Query<&ChildOf, With<AgentModel>>, avatars: &Query<&AgentAvatar>) -> Option<AgentId> {
    let root = models.get(model).ok()?.parent();
    avatars.get(root).ok().map(|avatar| avatar.id.clone())
}

/// System: give each registered agent a model child matching its character,
/// replacing the child when the character changes
pub fn sync_agent_characters(
    mut commands: Commands,
    mut changes: EventReader<StateChanged>,
    asset_server: Res<AssetServer>,
    mut scene: ResMut<SceneState>,
    mut avatars: Query<&mut AgentAvatar>,
    models: Query<(Entity, &AgentModel, &ChildOf)>,
) {
    if !changes.read().any(|c| c.0 == StateChange::Agents) {
        return;
    }

    let wanted: Vec<(AgentId, Entity, CharacterModel, String)> = scene
        .agents()
        .filter_map(|agent| Some((agent.id.clone(), agent.avatar?, agent.character, agent.name.clone())))
        .collect();

    for (id, root, character, name) in wanted {
        if let Ok(mut avatar) = avatars.get_mut(root) {
            if avatar.character != character || avatar.name != name {
                avatar.character = character;
                avatar.name = name;
            }
        }

        let current = models.iter().find(|(_, _, child_of)| child_of.parent() == root);
        match current {
            Some((_, model, _)) if model.character == character => continue,
            Some((entity, model, _)) => {
                info!("Agent {} character {} -> {}", id, model.character.label(), character.label());
                commands.entity(entity).despawn();
            }
            None => {}
        }
        spawn_model_child(&mut commands, &asset_server, root, character);
        scene.update_agent_avatar(&id, root);
        scene.set_agent_visual_ready(&id, false);
    }
}

/// System: one name tag per registered agent, text kept in sync
pub fn agent_name_tag_system(
    mut commands: Commands,
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneState>,
    mut tags: Query<(Entity, &AgentNameTag, &mut Text)>,
) {
    if !changes.read().any(|c| c.0 == StateChange::Agents) {
        return;
    }

    for (entity, tag, mut text) in tags.iter_mut() {
        match scene.agent(&tag.agent) {
            Some(agent) if text.0 != agent.name => text.0 = agent.name.clone(),
            Some(_) => {}
            None => commands.entity(entity).despawn(),
        }
    }

    for agent in scene.agents() {
        if tags.iter().any(|(_, tag, _)| tag.agent == agent.id) {
            continue;
        }
        commands.spawn((
            Text::new(agent.name.clone()),
            TextFont { font_size: 13.0, ..default() },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                display: Display::None,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            BorderRadius::all(Val::Px(4.0)),
            AgentNameTag { agent: agent.id.clone() },
        ));
    }
}

/// System: pin name tags above their agents
pub fn agent_name_tag_position_system(
    scene: Res<SceneState>,
    scene_view: Res<SceneView>,
    avatars: Query<&GlobalTransform, With<AgentAvatar>>,
    mut tags: Query<(&AgentNameTag, &mut Node, &ComputedNode)>,
) {
    for (tag, mut node, computed) in tags.iter_mut() {
        let screen = scene
            .agent(&tag.agent)
            .and_then(|agent| agent.avatar)
            .and_then(|avatar| avatars.get(avatar).ok())
            .and_then(|transform| scene_view.world_to_screen(transform.translation() + Vec3::Y * NAME_TAG_HEIGHT))
            .filter(|point| point.in_viewport);
        match screen {
            Some(point) => {
                // Centre horizontally on the anchor
                let half_width = computed.size().x * computed.inverse_scale_factor() * 0.5;
                node.display = Display::Flex;
                node.left = Val::Px(point.x - half_width);
                node.top = Val::Px(point.y);
            }
            None => node.display = Display::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<SceneState>()
            .add_systems(Update, (register_spawned_agents, unregister_despawned_agents));
        app
    }

    #[test]
    fn spawned_agents_register_with_empty_model() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(agent_bundle("ranger1", "Ranger 1", CharacterModel::Ranger, Vec3::new(-2.0, 0.0, 0.0)))
            .id();
        app.update();

        let scene = app.world().resource::<SceneState>();
        let agent = scene.agent(&AgentId::from("ranger1")).expect("agent registered");
        assert_eq!(agent.name, "Ranger 1");
        assert_eq!(agent.model, "");
        assert_eq!(agent.avatar, Some(entity));
    }

    #[test]
    fn despawned_agents_unregister_and_leave_selection() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(agent_bundle("ranger2", "Ranger 2", CharacterModel::Ranger, Vec3::ZERO))
            .id();
        app.update();
        app.world_mut().resource_mut::<SceneState>().add_to_selection(AgentId::from("ranger2"));

        app.world_mut().entity_mut(entity).despawn();
        app.update();

        let scene = app.world().resource::<SceneState>();
        assert_eq!(scene.agent_count(), 0);
        assert!(scene.selected_ids().is_empty());
    }

    #[test]
    fn model_child_resolves_to_its_agent_and_starts_unbound() {
        let mut app = app();
        let root = app
            .world_mut()
            .spawn(agent_bundle("ranger1", "Ranger 1", CharacterModel::Ranger, Vec3::ZERO))
            .id();
        app.update();
        assert!(!app.world().resource::<SceneState>().agent(&AgentId::from("ranger1")).expect("agent").visual_ready);

        let model = app
            .world_mut()
            .spawn((AgentModel { character: CharacterModel::Ranger }, ChildOf(root)))
            .id();
        let stray = app.world_mut().spawn(AgentModel { character: CharacterModel::Mage }).id();

        let mut state: SystemState<(Query<&ChildOf, With<AgentModel>>, Query<&AgentAvatar>)> =
            SystemState::new(app.world_mut());
        let (models, avatars) = state.get(app.world());
        assert_eq!(model_owner(model, &models, &avatars), Some(AgentId::from("ranger1")));
        assert_eq!(model_owner(stray, &models, &avatars), None);
        assert_eq!(model_owner(root, &models, &avatars), None);
    }
}
