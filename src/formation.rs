// Move-command planner: spread slots around a destination and greedy slot assignment
use bevy::prelude::*;

use crate::constants::SPREAD_RADIUS;
use crate::types::AgentId;

/// Candidate destinations for `count` agents. One agent goes to the target itself,
/// more are spread evenly on a circle starting at angle 0.
pub fn spread_positions(target: Vec3, count: usize) -> Vec<Vec3> {
    match count {
        0 => Vec::new(),
        1 => vec![target],
        _ => (0..count)
            .map(|i| {
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
                target + Vec3::new(angle.cos() * SPREAD_RADIUS, 0.0, angle.sin() * SPREAD_RADIUS)
            })
            .collect(),
    }
}

/// Assign each selected agent a destination slot.
///
/// `selected` is the selection in order, paired with each agent's current position
/// (`None` for ids that no longer resolve to an agent). Slots are generated for the
/// whole selection; agents are then ordered furthest-first (stable, so ties keep
/// selection order) and each takes the closest remaining slot. Unresolved ids are
/// skipped and receive nothing.
pub fn plan_move_assignments(target: Vec3, selected: &[(AgentId, Option<Vec3>)]) -> Vec<(AgentId, Vec3)> {
    let mut available_slots = spread_positions(target, selected.len());

    let mut by_distance: Vec<(&AgentId, Option<Vec3>, f32)> = selected
        .iter()
        .map(|(id, pos)| (id, *pos, pos.map_or(0.0, |p| p.distance(target))))
        .collect();
    by_distance.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut assignments = Vec::with_capacity(selected.len());
    for (id, pos, _) in by_distance {
        let Some(agent_pos) = pos else { continue };
        if available_slots.is_empty() {
            break;
        }

        // Find the closest available slot; first index wins ties
        let mut best_slot_idx = 0;
        let mut best_distance = f32::INFINITY;
        for (idx, slot) in available_slots.iter().enumerate() {
            let dist = agent_pos.distance(*slot);
            if dist < best_distance {
                best_distance = dist;
                best_slot_idx = idx;
            }
        }

        assignments.push((id.clone(), available_slots.remove(best_slot_idx)));
    }

    assignments
}
