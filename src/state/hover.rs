// Hover feedback: the active cell plus a trail of recently left cells
use bevy::prelude::*;
use std::collections::HashMap;

use super::{SceneState, StateChange};
use crate::types::*;

impl SceneState {
    pub fn active_hover_cell(&self) -> Option<ActiveHoverCell> {
        self.active_hover
    }

    pub fn hover_trail(&self) -> &HashMap<GridCell, HoverCellFx> {
        &self.hover_trail
    }

    /// No-op when the same cell is already active with the same colour.
    /// A different active cell is folded into the trail starting at `now_ms`.
    pub fn set_active_hover_cell(&mut self, cell: GridCell, color: Srgba, now_ms: f64) {
        if let Some(current) = self.active_hover {
            if current.cell == cell && current.color == color {
                return;
            }
            if current.cell != cell {
                self.hover_trail.insert(
                    current.cell,
                    HoverCellFx { cell: current.cell, color: current.color, started_at_ms: now_ms },
                );
            }
        }
        self.active_hover = Some(ActiveHoverCell { cell, color });
        self.mark(StateChange::Hover);
    }

    pub fn clear_active_hover_cell(&mut self, now_ms: f64) {
        let Some(current) = self.active_hover.take() else { return };
        self.hover_trail.insert(
            current.cell,
            HoverCellFx { cell: current.cell, color: current.color, started_at_ms: now_ms },
        );
        self.mark(StateChange::Hover);
    }

    /// Drop trail entries older than `max_age_ms`
    pub fn prune_hover_trail(&mut self, now_ms: f64, max_age_ms: f64) {
        let before = self.hover_trail.len();
        self.hover_trail.retain(|_, fx| now_ms - fx.started_at_ms <= max_age_ms);
        if self.hover_trail.len() != before {
            self.mark(StateChange::Hover);
        }
    }

    /// Clears the trail and the active cell
    pub fn clear_hover_trail(&mut self) {
        if self.hover_trail.is_empty() && self.active_hover.is_none() {
            return;
        }
        self.hover_trail.clear();
        self.active_hover = None;
        self.mark(StateChange::Hover);
    }
}
