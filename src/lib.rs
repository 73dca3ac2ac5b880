//! Sledline - deterministic physics core for a 2D line-drawing sledding game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track, spatial index, rider, physics step)
//! - `session`: Owned simulation context and fixed-timestep clock
//! - `camera`: World/screen mapping, zoom, and follow behavior
//! - `settings`: User preferences with JSON persistence
//! - `characters`: Selectable rider characters
//! - `math`: Segment geometry shared by physics and erasing

pub mod camera;
pub mod characters;
pub mod math;
pub mod session;
pub mod settings;
pub mod sim;

pub use camera::{Camera, Viewport};
pub use characters::Character;
pub use session::{Hud, Session, Tool};
pub use settings::{PlaybackSpeed, Settings};

/// Simulation tuning constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Largest wall-clock delta one frame may feed the clock
    pub const MAX_FRAME_DELTA: f32 = 0.05;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 4;

    /// Downward acceleration per tick at 1x time scale
    pub const GRAVITY: f32 = 0.25;
    /// Verlet sub-steps per physics tick
    pub const SUBSTEPS: u32 = 8;
    /// Collision radius around every rider point
    pub const RIDER_RADIUS: f32 = 10.0;
    /// Tangential velocity fraction removed per contact on normal lines
    pub const FRICTION_NORMAL: f32 = 0.02;
    /// Acceleration lines are frictionless
    pub const FRICTION_ACCEL: f32 = 0.0;
    /// Speed added along an acceleration line per contact
    pub const ACCEL_BOOST: f32 = 0.05;
    /// Velocity fraction carried across a sub-step while airborne
    pub const AIR_RESISTANCE: f32 = 0.9995;
    /// Hard cap on speed in world units per tick
    pub const MAX_VELOCITY: f32 = 40.0;
    /// Relaxation passes over the constraint list per sub-step
    pub const CONSTRAINT_ITERATIONS: u32 = 3;
    /// Push-out passes over the contact set per sub-step
    pub const COLLISION_ITERATIONS: u32 = 4;
    /// Broad-phase query radius around each rider point
    pub const QUERY_RADIUS: f32 = 100.0;
    /// Normal-velocity restitution on contact (fully inelastic)
    pub const BOUNCE: f32 = 0.0;

    /// Spatial hash cell edge in world units
    pub const SPATIAL_CELL_SIZE: f32 = 200.0;
    /// Undo snapshots retained before the oldest is dropped
    pub const MAX_HISTORY: usize = 200;

    /// Fall depth beyond which playback auto-pauses
    pub const MAX_FALL_DEPTH: f32 = 100_000.0;
    /// Horizontal travel beyond which playback auto-pauses
    pub const MAX_TRAVEL_X: f32 = 500_000.0;

    /// Camera zoom bounds and button step
    pub const ZOOM_MIN: f32 = 0.2;
    pub const ZOOM_MAX: f32 = 5.0;
    pub const ZOOM_DEFAULT: f32 = 1.5;
    pub const ZOOM_STEP: f32 = 1.25;
    /// Follow distance beyond which the camera snaps instead of easing
    pub const CAMERA_SNAP_DISTANCE: f32 = 500.0;

    pub const DEFAULT_CAMERA_POS: Vec2 = Vec2::new(0.0, -50.0);
    pub const DEFAULT_RIDER_START: Vec2 = Vec2::new(0.0, -100.0);
}
