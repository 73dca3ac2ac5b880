//! Track segments, bounded undo history, and the version counter dependent
//! caches key off.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FRICTION_ACCEL, FRICTION_NORMAL, MAX_HISTORY};
use crate::math::dist_point_to_segment;

/// Line kinds, matching classic Line Rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineKind {
    /// Blue: rider slides with normal friction
    #[default]
    Normal,
    /// Red: low friction plus a directional speed boost
    Accel,
    /// Green: decoration only, no collision response
    Scenery,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Normal => "normal",
            LineKind::Accel => "accel",
            LineKind::Scenery => "scenery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(LineKind::Normal),
            "accel" => Some(LineKind::Accel),
            "scenery" => Some(LineKind::Scenery),
            _ => None,
        }
    }

    /// Whether the stepper collides against this kind
    pub fn is_collidable(&self) -> bool {
        match self {
            LineKind::Normal | LineKind::Accel => true,
            LineKind::Scenery => false,
        }
    }

    /// Tangential friction coefficient applied on contact
    pub fn friction(&self) -> f32 {
        match self {
            LineKind::Normal | LineKind::Scenery => FRICTION_NORMAL,
            LineKind::Accel => FRICTION_ACCEL,
        }
    }
}

/// A drawn line segment. Immutable once created; edits are delete + recreate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub a: Vec2,
    pub b: Vec2,
    pub kind: LineKind,
}

/// The authoritative segment collection with bounded linear undo.
///
/// Every mutation that actually changes the collection snapshots the prior
/// collection onto the history stack and bumps `version`; no-op mutations
/// leave both untouched so undo slots and dependent caches aren't wasted.
#[derive(Debug, Clone)]
pub struct Track {
    segments: Vec<Segment>,
    history: Vec<Vec<Segment>>,
    version: u64,
    next_id: u32,
}

impl Track {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            history: Vec::new(),
            version: 0,
            next_id: 0,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Monotonic counter; bumps on every real mutation including undo
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Allocate a segment id. Never reused, even across undo.
    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Snapshot the current collection, install `next`, bump the version
    fn commit(&mut self, next: Vec<Segment>) {
        let prev = std::mem::replace(&mut self.segments, next);
        self.history.push(prev);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.version += 1;
    }

    /// Append a single segment
    pub fn add_segment(&mut self, a: Vec2, b: Vec2, kind: LineKind) {
        let id = self.alloc_id();
        let mut next = self.segments.clone();
        next.push(Segment { id, a, b, kind });
        self.commit(next);
    }

    /// Append a whole stroke as one undo step. Empty strokes are a no-op.
    pub fn add_segments(&mut self, strokes: &[(Vec2, Vec2)], kind: LineKind) {
        if strokes.is_empty() {
            return;
        }
        let mut next = self.segments.clone();
        for &(a, b) in strokes {
            let id = self.alloc_id();
            next.push(Segment { id, a, b, kind });
        }
        self.commit(next);
    }

    /// Remove every segment within `radius` of `p`. No matches, no history.
    pub fn erase_at(&mut self, p: Vec2, radius: f32) {
        let next: Vec<Segment> = self
            .segments
            .iter()
            .filter(|seg| dist_point_to_segment(p, seg.a, seg.b) > radius)
            .copied()
            .collect();
        if next.len() != self.segments.len() {
            self.commit(next);
        }
    }

    /// Remove every segment within `radius` of any point of a drag polyline
    pub fn erase_path(&mut self, points: &[Vec2], radius: f32) {
        let next: Vec<Segment> = self
            .segments
            .iter()
            .filter(|seg| {
                points
                    .iter()
                    .all(|&p| dist_point_to_segment(p, seg.a, seg.b) > radius)
            })
            .copied()
            .collect();
        if next.len() != self.segments.len() {
            self.commit(next);
        }
    }

    /// Remove all segments. Already-empty tracks are a no-op.
    pub fn clear(&mut self) {
        if self.segments.is_empty() {
            return;
        }
        self.commit(Vec::new());
    }

    /// Restore the most recent history snapshot. Empty history is a no-op.
    pub fn undo(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.segments = prev;
            self.version += 1;
        }
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}
