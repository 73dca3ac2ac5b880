//! Deterministic simulation module
//!
//! The track, spatial index, rider model, and stepper all live here. This
//! module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (construction order for points and constraints,
//!   row order for grid cells)
//! - No rendering or platform dependencies
//!
//! The owning `Session` decides when ticks run; nothing here reads wall
//! clocks or global state.

pub mod rider;
pub mod spatial;
pub mod step;
pub mod track;

pub use rider::{RiderConstraint, RiderPoint, RiderState};
pub use spatial::SpatialHash;
pub use step::step_rider;
pub use track::{LineKind, Segment, Track};
