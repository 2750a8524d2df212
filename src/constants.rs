use bevy::color::Srgba;
use bevy::math::Vec3;

// Grid settings
pub const CELL_SIZE: f32 = 1.0;             // World units per grid cell
pub const GRID_DRAW_HALF_EXTENT: i32 = 40;  // Cells drawn on each side of the camera focus
pub const GRID_LINE_Y: f32 = 0.001;

// Pointer / drag settings
pub const DRAG_THRESHOLD_PX: f32 = 5.0;              // Screen pixels before a press becomes a drag
pub const GROUND_CLICK_SUPPRESS_MS: f64 = 150.0;     // Ground click debounce after a box select
pub const GROUND_PARALLEL_EPSILON: f32 = 1e-6;       // Rays flatter than this never reach the ground

// Move command settings
pub const SPREAD_RADIUS: f32 = 1.5;          // Radius of the multi-agent destination circle
pub const AGENT_MOVE_SPEED: f32 = 5.0;       // World units per second
pub const ARRIVAL_EPSILON: f32 = 0.01;       // Target is cleared below this distance
pub const TURN_SLERP_FACTOR: f32 = 0.1;      // Per-frame rotation blend toward the target facing

// Zone build settings
pub const HOVER_FADE_MS: f64 = 550.0;
pub const HOVER_MAX_ALPHA: f32 = 0.22;
pub const HOVER_Y: f32 = 0.006;
pub const ZONE_FILL_ALPHA: f32 = 0.12;
pub const ZONE_PREVIEW_FILL_ALPHA: f32 = 0.08;
pub const ZONE_PREVIEW_OUTLINE_ALPHA: f32 = 0.7;
pub const ZONE_FILL_Y: f32 = 0.01;
pub const ZONE_PREVIEW_Y: f32 = 0.02;
pub const ZONE_LABEL_OFFSET: f32 = 0.42;     // Label sits this far outside the zone's far edge
pub const ZONE_NOTIFICATION_MS: f64 = 2400.0;
pub const ZONE_CONFLICT_MESSAGE: &str = "Zone cannot overlap or touch another zone.";

/// Build palette, cycled by the zone counter
pub const ZONE_PALETTE: [Srgba; 5] = [
    Srgba::new(0.0, 1.0, 0.533, 1.0),   // #00ff88
    Srgba::new(1.0, 0.0, 1.0, 1.0),     // #ff00ff
    Srgba::new(0.0, 1.0, 1.0, 1.0),     // #00ffff
    Srgba::new(1.0, 1.0, 0.0, 1.0),     // #ffff00
    Srgba::new(1.0, 0.4, 0.0, 1.0),     // #ff6600
];

/// Colours offered by the zone edit panel
pub const ZONE_EDIT_PALETTE: [Srgba; 6] = [
    Srgba::new(0.596, 0.875, 0.486, 1.0), // #98df7c
    Srgba::new(0.451, 0.847, 0.847, 1.0), // #73d8d8
    Srgba::new(0.812, 0.482, 0.808, 1.0), // #cf7bce
    Srgba::new(0.886, 0.690, 0.529, 1.0), // #e2b087
    Srgba::new(0.533, 0.502, 0.902, 1.0), // #8880e6
    Srgba::new(0.875, 0.518, 0.533, 1.0), // #df8488
];

// Ground click pulse
pub const PULSE_DURATION_MS: f64 = 340.0;
pub const PULSE_START_SCALE: f32 = 0.8;
pub const PULSE_END_SCALE: f32 = 1.5;
pub const PULSE_START_OPACITY: f32 = 0.95;
pub const PULSE_INNER_RADIUS: f32 = 0.14;
pub const PULSE_OUTER_RADIUS: f32 = 0.2;

// Selection feedback
pub const SELECTION_RING_INNER_RADIUS: f32 = 0.55;
pub const SELECTION_RING_OUTER_RADIUS: f32 = 0.7;
pub const SELECTION_RING_COLOR: bevy::prelude::Color = bevy::prelude::Color::srgba(0.0, 1.0, 0.533, 0.7);

// Camera settings
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(20.0, 20.0, 20.0);
pub const CAMERA_START_ZOOM: f32 = 64.0;
pub const CAMERA_MIN_ZOOM: f32 = 8.0;
pub const CAMERA_MAX_ZOOM: f32 = 64.0;
pub const CAMERA_ZOOM_SAFETY: f32 = 1.03;     // Margin on the view-plane zoom floor
pub const CAMERA_ZOOM_SPEED: f32 = 4.0;      // Zoom steps per wheel line
pub const CAMERA_PAN_SPEED: f32 = 12.0;      // World units per second for keyboard panning
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 5000.0;

// Agents
pub const DEFAULT_AGENT_MODEL: &str = "claude-sonnet";
pub const AGENT_MODEL_OPTIONS: [&str; 3] = ["claude-sonnet", "claude-opus", "claude-haiku"];
pub const IDLE_CLIP: &str = "Idle_A";
pub const RUNNING_CLIP: &str = "Running_A";
pub const MOVEMENT_ANIMATIONS_PATH: &str = "animations/Rig_Medium_MovementBasic.glb";
pub const GENERAL_ANIMATIONS_PATH: &str = "animations/Rig_Medium_General.glb";
pub const DEFAULT_REQUIRED_AGENTS: [&str; 2] = ["ranger1", "ranger2"];
