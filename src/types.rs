use bevy::prelude::*;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::constants::ZONE_PALETTE;

/// Stable string identity of an agent (e.g. "ranger1")
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Character rig used for an agent's model
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub enum CharacterModel {
    Barbarian,
    Knight,
    Mage,
    #[default]
    Ranger,
    Rogue,
    RogueHooded,
}

impl CharacterModel {
    pub const ALL: [CharacterModel; 6] = [
        CharacterModel::Barbarian,
        CharacterModel::Knight,
        CharacterModel::Mage,
        CharacterModel::Ranger,
        CharacterModel::Rogue,
        CharacterModel::RogueHooded,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            CharacterModel::Barbarian => "Barbarian",
            CharacterModel::Knight => "Knight",
            CharacterModel::Mage => "Mage",
            CharacterModel::Ranger => "Ranger",
            CharacterModel::Rogue => "Rogue",
            CharacterModel::RogueHooded => "Rogue_Hooded",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CharacterModel::RogueHooded => "Rogue (Hooded)",
            other => other.file_stem(),
        }
    }

    pub fn asset_path(self) -> String {
        format!("characters/{}.glb", self.file_stem())
    }

    /// Next model in the fixed list, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Editable agent settings (what the configure panel round-trips)
#[derive(Clone, PartialEq, Debug)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub character: CharacterModel,
}

/// An agent known to the shared state. The visual entity is owned by the
/// render layer; the state only keeps the handle.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub model: String,
    pub character: CharacterModel,
    pub avatar: Option<Entity>,
    /// The avatar's character model has finished spawning its meshes
    pub visual_ready: bool,
    pub target_position: Option<Vec3>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    Build,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Normal => InteractionMode::Build,
            InteractionMode::Build => InteractionMode::Normal,
        }
    }
}

/// Integer cell on the ground plane
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ZoneId(pub Uuid);

impl ZoneId {
    pub fn random() -> Self {
        Self(random_uuid())
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// v4 UUID from `rand` bytes
pub fn random_uuid() -> Uuid {
    uuid::Builder::from_random_bytes(rand::random::<[u8; 16]>()).into_uuid()
}

/// Rectangular zone spanning whole grid cells. `start_cell`/`end_cell` are
/// stored as given; geometry always normalizes them first.
#[derive(Clone, PartialEq, Debug)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub start_cell: GridCell,
    pub end_cell: GridCell,
    pub color: Srgba,
}

/// Colour of the build palette for a given zone counter value
pub fn palette_color(zone_counter: u32) -> Srgba {
    ZONE_PALETTE[zone_counter as usize % ZONE_PALETTE.len()]
}

/// Fading feedback for a cell the pointer recently left
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HoverCellFx {
    pub cell: GridCell,
    pub color: Srgba,
    pub started_at_ms: f64,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ActiveHoverCell {
    pub cell: GridCell,
    pub color: Srgba,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ZoneBuildNotification {
    pub id: Uuid,
    pub message: String,
}

/// In-progress zone drag published for the live preview
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ZoneDrag {
    pub start: Option<GridCell>,
    pub end: Option<GridCell>,
}

/// Marker for a scene-graph node that represents one controllable agent.
/// Hit-tested sub-parts resolve to the nearest ancestor carrying this.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Selectable;

/// Agent root entity; carries the agent's identity
#[derive(Component, Clone, Debug)]
pub struct AgentAvatar {
    pub id: AgentId,
    pub name: String,
    pub character: CharacterModel,
}

/// Child entity holding an agent's loaded character model
#[derive(Component, Clone, Copy, Debug)]
pub struct AgentModel {
    pub character: CharacterModel,
}

/// Orthographic editor camera rig
#[derive(Component)]
pub struct EditorCamera {
    pub focus_point: Vec3,
    pub offset: Vec3,
    pub zoom: f32,
}
