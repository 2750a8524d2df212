// Zone CRUD, drag cells and the build notification
use bevy::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use super::{SceneState, StateChange};
use crate::types::*;

impl SceneState {
    pub fn zones(&self) -> &HashMap<ZoneId, Zone> {
        &self.zones
    }

    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Number of zones ever created; drives default names and palette colours
    pub fn zone_counter(&self) -> u32 {
        self.zone_counter
    }

    pub fn add_zone(&mut self, zone: Zone) {
        info!("Zone '{}' created ({} -> {})", zone.name, zone.start_cell, zone.end_cell);
        self.zones.insert(zone.id, zone);
        self.zone_counter += 1;
        self.mark(StateChange::Zones);
    }

    /// Rename and recolour
    pub fn update_zone(&mut self, id: &ZoneId, name: impl Into<String>, color: Srgba) {
        let Some(zone) = self.zones.get_mut(id) else { return };
        let name = name.into();
        if zone.name == name && zone.color == color {
            return;
        }
        info!("Zone {} updated: '{}' -> '{}'", id, zone.name, name);
        zone.name = name;
        zone.color = color;
        self.mark(StateChange::Zones);
    }

    pub fn delete_zone(&mut self, id: &ZoneId) {
        if let Some(zone) = self.zones.remove(id) {
            info!("Zone '{}' deleted", zone.name);
            self.mark(StateChange::Zones);
        }
    }

    pub fn zone_drag(&self) -> ZoneDrag {
        self.zone_drag
    }

    pub fn set_zone_drag_start(&mut self, cell: Option<GridCell>) {
        if self.zone_drag.start != cell {
            self.zone_drag.start = cell;
            self.mark(StateChange::ZoneDrag);
        }
    }

    pub fn set_zone_drag_end(&mut self, cell: Option<GridCell>) {
        if self.zone_drag.end != cell {
            self.zone_drag.end = cell;
            self.mark(StateChange::ZoneDrag);
        }
    }

    pub fn clear_zone_drag(&mut self) {
        self.set_zone_drag_start(None);
        self.set_zone_drag_end(None);
    }

    pub fn notification(&self) -> Option<&ZoneBuildNotification> {
        self.notification.as_ref()
    }

    /// Replaces any current notification with a fresh instance; returns its id
    pub fn show_zone_build_notification(&mut self, message: impl Into<String>) -> Uuid {
        let id = random_uuid();
        self.notification = Some(ZoneBuildNotification { id, message: message.into() });
        self.mark(StateChange::Notification);
        id
    }

    pub fn clear_zone_build_notification(&mut self) {
        if self.notification.take().is_some() {
            self.mark(StateChange::Notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, start: GridCell, end: GridCell) -> Zone {
        Zone { id: ZoneId::random(), name: name.to_string(), start_cell: start, end_cell: end, color: palette_color(0) }
    }

    #[test]
    fn add_zone_increments_counter() {
        let mut state = SceneState::default();
        state.add_zone(zone("Project 1", GridCell::new(0, 0), GridCell::new(1, 1)));
        state.add_zone(zone("Project 2", GridCell::new(5, 5), GridCell::new(6, 6)));
        assert_eq!(state.zone_counter(), 2);
        assert_eq!(state.zones().len(), 2);
        assert_eq!(state.take_changes(), vec![StateChange::Zones]);
    }

    #[test]
    fn update_and_delete_zone() {
        let mut state = SceneState::default();
        let z = zone("Project 1", GridCell::new(0, 0), GridCell::new(1, 1));
        let id = z.id;
        state.add_zone(z);

        let recolor = crate::constants::ZONE_EDIT_PALETTE[2];
        state.update_zone(&id, "Docs", recolor);
        let updated = state.zone(&id).unwrap();
        assert_eq!(updated.name, "Docs");
        assert_eq!(updated.color, recolor);

        state.delete_zone(&id);
        assert!(state.zone(&id).is_none());
        // Deleting does not rewind the counter
        assert_eq!(state.zone_counter(), 1);
    }

    #[test]
    fn unknown_zone_ops_are_no_ops() {
        let mut state = SceneState::default();
        let ghost = ZoneId::random();
        state.update_zone(&ghost, "x", palette_color(1));
        state.delete_zone(&ghost);
        assert!(state.take_changes().is_empty());
    }

    #[test]
    fn drag_cells_set_and_clear() {
        let mut state = SceneState::default();
        state.set_zone_drag_start(Some(GridCell::new(1, 2)));
        state.set_zone_drag_end(Some(GridCell::new(3, 4)));
        assert_eq!(
            state.zone_drag(),
            ZoneDrag { start: Some(GridCell::new(1, 2)), end: Some(GridCell::new(3, 4)) }
        );
        state.take_changes();

        state.set_zone_drag_end(Some(GridCell::new(3, 4)));
        assert!(state.take_changes().is_empty());

        state.clear_zone_drag();
        assert_eq!(state.zone_drag(), ZoneDrag::default());
        assert_eq!(state.take_changes(), vec![StateChange::ZoneDrag]);
    }

    #[test]
    fn each_notification_gets_a_fresh_id() {
        let mut state = SceneState::default();
        let first = state.show_zone_build_notification("nope");
        let second = state.show_zone_build_notification("nope");
        assert_ne!(first, second);
        assert_eq!(state.notification().map(|n| n.id), Some(second));
        state.clear_zone_build_notification();
        assert!(state.notification().is_none());
    }
}
