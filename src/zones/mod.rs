// Zones module - build-mode zone drawing and its feedback
//
// Submodules:
// - builder: zone-build state machine, conflict check and commit
// - notification: auto-dismiss for the rejection notice
// - visuals: zone fills/outlines, drag preview, hover trail, labels (render only)

mod builder;
mod notification;
pub mod visuals;

pub use builder::{
    commit_zone_drag, conflicts_with_existing_zone, prune_hover_trail_system, zone_builder_system, ZoneBuildPhase,
    ZoneBuildState, ZoneCommit,
};
pub use notification::{notification_expiry_system, NotificationTimer};
