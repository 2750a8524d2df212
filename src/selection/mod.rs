// Selection module - box/click selection, click-to-move and their feedback
//
// Submodules:
// - volume: NDC selection volume and selectable-root lookup
// - input: box/click selection engine
// - ground: ground click handler and pulse markers
// - visuals: box rectangle, selection rings, pulse animation (render only)

mod ground;
mod input;
mod volume;
pub mod visuals;

pub use ground::{expire_ground_pulses, ground_click_system, GroundPulse};
pub use input::{box_selection_input_system, BoxDrag, BoxSelectionState};
pub use volume::{find_selectable_root, select_roots_in_volume, SelectionVolume};
