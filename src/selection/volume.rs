// Screen-space selection volume and selectable-root resolution
use bevy::prelude::*;

use crate::raycast::SceneView;
use crate::types::Selectable;

/// The frustum slice spanned by a box drag, kept in NDC. A world point is inside
/// when its projection falls in the rectangle and between the near and far planes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SelectionVolume {
    pub start_ndc: Vec2,
    pub end_ndc: Vec2,
}

impl SelectionVolume {
    pub fn new(start_ndc: Vec2) -> Self {
        Self { start_ndc, end_ndc: start_ndc }
    }

    pub fn contains_ndc(&self, ndc: Vec3) -> bool {
        let min = self.start_ndc.min(self.end_ndc);
        let max = self.start_ndc.max(self.end_ndc);
        ndc.x >= min.x && ndc.x <= max.x && ndc.y >= min.y && ndc.y <= max.y && (0.0..=1.0).contains(&ndc.z)
    }

    pub fn contains_world(&self, view: &SceneView, world: Vec3) -> bool {
        view.world_to_ndc(world).is_some_and(|ndc| self.contains_ndc(ndc))
    }
}

/// Walk up the parent chain from `entity` to the first node flagged `Selectable`
pub fn find_selectable_root(entity: Entity, hierarchy: &Query<(Option<&ChildOf>, Has<Selectable>)>) -> Option<Entity> {
    let mut current = Some(entity);
    while let Some(node) = current {
        let Ok((parent, selectable)) = hierarchy.get(node) else { return None };
        if selectable {
            return Some(node);
        }
        current = parent.map(|child_of| child_of.parent());
    }
    None
}

/// Selectable roots of every candidate inside the volume, deduplicated,
/// in first-hit order
pub fn select_roots_in_volume(
    volume: &SelectionVolume,
    view: &SceneView,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
    hierarchy: &Query<(Option<&ChildOf>, Has<Selectable>)>,
) -> Vec<Entity> {
    let mut roots = Vec::new();
    for (entity, position) in candidates {
        if !volume.contains_world(view, position) {
            continue;
        }
        if let Some(root) = find_selectable_root(entity, hierarchy) {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
    }
    roots
}
