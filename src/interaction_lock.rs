// Interaction lock - global gate for scene input while an overlay is open
use bevy::prelude::*;

/// Whether scene pointer/keyboard handling is suppressed, plus the one-shot
/// ground click debounce armed after a box selection.
#[derive(Resource, Default, Debug)]
pub struct InteractionLock {
    locked: bool,
    /// Timestamp (ms) until which the next ground click is swallowed; 0 = none pending
    suppress_ground_click_until: f64,
}

impl InteractionLock {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            info!("Interaction {}", if locked { "locked" } else { "unlocked" });
        }
        self.locked = locked;
    }

    pub fn suppress_ground_click_for(&mut self, now_ms: f64, duration_ms: f64) {
        self.suppress_ground_click_until = now_ms + duration_ms;
    }

    /// Read-and-clear. False when nothing is pending, otherwise whether `now_ms`
    /// still falls inside the suppressed window.
    pub fn consume_ground_click_suppression(&mut self, now_ms: f64) -> bool {
        if self.suppress_ground_click_until <= 0.0 {
            return false;
        }
        let until = self.suppress_ground_click_until;
        self.suppress_ground_click_until = 0.0;
        now_ms <= until
    }

    pub fn has_pending_suppression(&self) -> bool {
        self.suppress_ground_click_until > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_pending_is_not_suppressed() {
        let mut lock = InteractionLock::default();
        assert!(!lock.consume_ground_click_suppression(10.0));
    }

    #[test]
    fn click_inside_window_is_suppressed_once() {
        let mut lock = InteractionLock::default();
        lock.suppress_ground_click_for(1000.0, 150.0);
        assert!(lock.consume_ground_click_suppression(1100.0));
        // Read-once: the next click goes through
        assert!(!lock.consume_ground_click_suppression(1101.0));
        assert!(!lock.has_pending_suppression());
    }

    #[test]
    fn late_click_clears_stale_suppression() {
        let mut lock = InteractionLock::default();
        lock.suppress_ground_click_for(1000.0, 150.0);
        assert!(!lock.consume_ground_click_suppression(1200.0));
        assert!(!lock.has_pending_suppression());
    }

    #[test]
    fn lock_flag_round_trips() {
        let mut lock = InteractionLock::default();
        assert!(!lock.is_locked());
        lock.set_locked(true);
        assert!(lock.is_locked());
        lock.set_locked(false);
        assert!(!lock.is_locked());
    }
}
