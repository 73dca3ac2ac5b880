//! Verlet physics stepper: the simulation core.
//!
//! One call advances the rider by one fixed tick, internally subdivided into
//! sub-steps. Each sub-step integrates, relaxes the distance constraints,
//! then resolves point-vs-segment collisions. All tunables are scaled by
//! `dt * 60` so behavior stays comparable to the 60 Hz baseline at other
//! tick rates.

use glam::Vec2;

use super::rider::{RiderPoint, RiderState};
use super::spatial::SpatialHash;
use super::track::{LineKind, Segment};
use crate::consts::{
    ACCEL_BOOST, AIR_RESISTANCE, BOUNCE, COLLISION_ITERATIONS, CONSTRAINT_ITERATIONS, GRAVITY,
    MAX_VELOCITY, QUERY_RADIUS, RIDER_RADIUS, SUBSTEPS,
};
use crate::math::{closest_point_on_segment, normalize_safe};

/// Distance below which a contact or rod is treated as degenerate
const DEGENERATE_DIST: f32 = 1e-4;
/// Push-out factor slightly above 1 so a resolved contact does not stick
const OVERCORRECT: f32 = 1.01;
/// Minimum velocity/line alignment for an accel boost to fire
const BOOST_ALIGNMENT_MIN: f32 = -0.5;

/// Advance the rider by one physics tick of `dt` seconds.
///
/// A crashed rider is frozen: the state is left untouched until external
/// reset. The broad phase uses `spatial` when supplied, otherwise every
/// segment is tested. Never panics; a tick is a deterministic pure
/// transformation of the previous state.
pub fn step_rider(
    rider: &mut RiderState,
    segments: &[Segment],
    spatial: Option<&SpatialHash>,
    dt: f32,
) {
    if rider.crashed {
        return;
    }

    let time_scale = dt * 60.0;

    for _ in 0..SUBSTEPS {
        integrate(rider, time_scale);
        relax_constraints(rider);
        resolve_collisions(rider, segments, spatial, time_scale);
    }

    rider.frame += 1;
}

/// Verlet integration with the tunneling guard: clamp the implicit
/// velocity, roll `prev_pos` forward, advance by damped velocity plus
/// gravity on the downward axis.
fn integrate(rider: &mut RiderState, time_scale: f32) {
    let gravity = GRAVITY * time_scale / SUBSTEPS as f32;

    for point in &mut rider.points {
        let velocity = point.velocity().clamp_length_max(MAX_VELOCITY);
        point.prev_pos = point.pos;
        point.pos += velocity * AIR_RESISTANCE + Vec2::new(0.0, gravity);
    }
}

/// Position-based rod solve. Gauss-Seidel: corrections land in place, in
/// construction order, and feed into later constraints within the same
/// pass. Do not batch the deltas; convergence is tuned around this.
fn relax_constraints(rider: &mut RiderState) {
    for _ in 0..CONSTRAINT_ITERATIONS {
        for i in 0..rider.constraints.len() {
            let c = rider.constraints[i];
            let delta = rider.points[c.b].pos - rider.points[c.a].pos;
            let dist = delta.length();
            if dist < DEGENERATE_DIST {
                continue;
            }

            let diff = (dist - c.rest_length) / dist;
            let correction = delta * (diff * 0.5);
            rider.points[c.a].pos += correction;
            rider.points[c.b].pos -= correction;
        }
    }
}

fn resolve_collisions(
    rider: &mut RiderState,
    segments: &[Segment],
    spatial: Option<&SpatialHash>,
    time_scale: f32,
) {
    for _ in 0..COLLISION_ITERATIONS {
        for point in &mut rider.points {
            let nearby;
            let candidates: &[Segment] = match spatial {
                Some(hash) => {
                    nearby = hash.query(point.pos, QUERY_RADIUS);
                    &nearby
                }
                None => segments,
            };

            for seg in candidates {
                collide_point(point, seg, time_scale);
            }
        }
    }
}

/// Resolve one point against one segment: push out along the contact
/// normal, damp the tangential velocity by the line kind's friction,
/// absorb inbound normal velocity, and boost along accel lines.
fn collide_point(point: &mut RiderPoint, seg: &Segment, time_scale: f32) {
    if !seg.kind.is_collidable() {
        return;
    }

    let closest = closest_point_on_segment(point.pos, seg.a, seg.b);
    if closest.dist_sq >= RIDER_RADIUS * RIDER_RADIUS {
        return;
    }

    let dist = closest.dist_sq.sqrt();

    // Normal points from the line toward the rider. A point exactly on the
    // line gets the segment's left-hand perpendicular (walking a->b) so
    // resolution never divides by zero.
    let normal = if dist < DEGENERATE_DIST {
        normalize_safe((seg.b - seg.a).perp())
    } else {
        (point.pos - closest.point) / dist
    };

    let penetration = RIDER_RADIUS - dist;
    point.pos += normal * (penetration * OVERCORRECT);

    // Velocity after push-out, decomposed in the surface frame
    let velocity = point.velocity();
    let tangent = normalize_safe(seg.b - seg.a);
    let vn = velocity.dot(normal);
    let vt = velocity.dot(tangent);

    let vt_damped = vt * (1.0 - seg.kind.friction());
    // Inbound normal velocity is absorbed (bounce is configured fully
    // inelastic); outbound velocity passes through
    let vn_out = if vn < 0.0 { -vn * BOUNCE } else { vn };

    point.prev_pos = point.pos - (tangent * vt_damped + normal * vn_out);

    // Accel lines add a positional kick along a->b unless the rider moves
    // sharply against the line direction
    if seg.kind == LineKind::Accel {
        let alignment = normalize_safe(velocity).dot(tangent);
        if alignment > BOOST_ALIGNMENT_MIN {
            point.pos += tangent * (ACCEL_BOOST * time_scale / SUBSTEPS as f32);
        }
    }
}
