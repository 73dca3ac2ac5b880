//! Rider body: mass points joined by rigid-length constraints.
//!
//! Pure structure and initial pose construction. All motion lives in the
//! stepper; all derived queries here are pure reads.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FRICTION_NORMAL, MAX_FALL_DEPTH, MAX_TRAVEL_X};

/// A single Verlet mass point.
///
/// Velocity is implicit: always `pos - prev_pos`, never stored. The
/// integrator's stability under the constraint solver depends on this
/// representation; do not add an explicit velocity field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiderPoint {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    /// Per-point contact friction in [0, 1]
    pub friction: f32,
}

impl RiderPoint {
    /// A point at rest: `prev_pos == pos`, zero implicit velocity
    pub fn at_rest(pos: Vec2, friction: f32) -> Self {
        Self {
            pos,
            prev_pos: pos,
            friction,
        }
    }

    /// Implicit velocity in world units per sub-step
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev_pos
    }
}

/// Rigid rod between two points, enforced every sub-step.
/// Rest length is fixed at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiderConstraint {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
}

/// Complete rider body state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderState {
    pub points: Vec<RiderPoint>,
    pub constraints: Vec<RiderConstraint>,
    /// Terminal flag: the stepper freezes a crashed rider. No internal path
    /// sets it; reserved for a future crash rule, cleared by external reset.
    pub crashed: bool,
    /// Physics tick counter, incremented once per tick. The replay clock.
    pub frame: u32,
}

impl RiderState {
    /// Single-point rider (the ball): no constraints, zero initial velocity
    pub fn simple(start: Vec2) -> Self {
        Self {
            points: vec![RiderPoint::at_rest(start, FRICTION_NORMAL)],
            constraints: Vec::new(),
            crashed: false,
            frame: 0,
        }
    }

    /// Six-point sledder ragdoll.
    ///
    /// Points: sled back, sled front (contact friction), then hip, head,
    /// shoulder, hand (frictionless body). Constraints hold the sled rigid,
    /// the torso upright, strut the hip to both sled ends, run the arm from
    /// head to hand, rope the hand to the sled front, and brace two
    /// diagonals so the shape cannot fold over.
    pub fn sledder(start: Vec2) -> Self {
        let points = vec![
            RiderPoint::at_rest(start + Vec2::new(-10.0, 0.0), 0.8), // 0: sled back
            RiderPoint::at_rest(start + Vec2::new(10.0, 0.0), 0.8),  // 1: sled front
            RiderPoint::at_rest(start + Vec2::new(-5.0, -15.0), 0.0), // 2: hip
            RiderPoint::at_rest(start + Vec2::new(-2.0, -35.0), 0.0), // 3: head
            RiderPoint::at_rest(start + Vec2::new(3.0, -30.0), 0.0), // 4: shoulder
            RiderPoint::at_rest(start + Vec2::new(12.0, -20.0), 0.0), // 5: hand
        ];

        let constraints = vec![
            // Sled
            RiderConstraint { a: 0, b: 1, rest_length: 20.0 },
            // Torso
            RiderConstraint { a: 2, b: 3, rest_length: 20.0 },
            // Hip struts to the sled
            RiderConstraint { a: 0, b: 2, rest_length: 18.0 },
            RiderConstraint { a: 1, b: 2, rest_length: 18.0 },
            // Arm
            RiderConstraint { a: 4, b: 5, rest_length: 15.0 },
            RiderConstraint { a: 3, b: 4, rest_length: 8.0 },
            // Rope to the sled front
            RiderConstraint { a: 5, b: 1, rest_length: 12.0 },
            // Diagonal bracing
            RiderConstraint { a: 0, b: 3, rest_length: 38.0 },
            RiderConstraint { a: 1, b: 3, rest_length: 35.0 },
        ];

        Self {
            points,
            constraints,
            crashed: false,
            frame: 0,
        }
    }

    /// Arithmetic mean of point positions; camera-follow target
    pub fn center(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::ZERO;
        }
        let sum: Vec2 = self.points.iter().map(|p| p.pos).sum();
        sum / self.points.len() as f32
    }

    /// Mean implicit velocity across all points
    pub fn velocity(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::ZERO;
        }
        let sum: Vec2 = self.points.iter().map(|p| p.velocity()).sum();
        sum / self.points.len() as f32
    }

    /// Speed magnitude, for the HUD
    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// True once the center leaves the (very large) world extents;
    /// the session observes this every tick and pauses playback
    pub fn is_out_of_bounds(&self) -> bool {
        let center = self.center();
        center.y > MAX_FALL_DEPTH || center.x.abs() > MAX_TRAVEL_X
    }
}
