// Auto-dismiss for the zone build notification
use bevy::prelude::*;
use uuid::Uuid;

use crate::constants::ZONE_NOTIFICATION_MS;
use crate::input::now_ms;
use crate::state::SceneState;

/// Which notification instance is on screen and since when
#[derive(Resource, Default, Debug)]
pub struct NotificationTimer {
    tracked: Option<(Uuid, f64)>,
}

impl NotificationTimer {
    /// Clears the notification once it has been visible long enough, unless a
    /// newer one replaced it in the meantime (which restarts the clock).
    pub fn tick(&mut self, scene: &mut SceneState, now_ms: f64) {
        let Some(current) = scene.notification().map(|n| n.id) else {
            self.tracked = None;
            return;
        };

        match self.tracked {
            Some((id, shown_at)) if id == current => {
                if now_ms - shown_at >= ZONE_NOTIFICATION_MS {
                    scene.clear_zone_build_notification();
                    self.tracked = None;
                }
            }
            _ => self.tracked = Some((current, now_ms)),
        }
    }
}

pub fn notification_expiry_system(
    mut timer: ResMut<NotificationTimer>,
    mut scene: ResMut<SceneState>,
    time: Res<Time<Real>>,
) {
    timer.tick(&mut scene, now_ms(&time));
}
