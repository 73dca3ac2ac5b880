//! Camera state, viewport transforms, and the follow behavior the session
//! drives while playback runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CAMERA_SNAP_DISTANCE, DEFAULT_CAMERA_POS, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

/// Render surface dimensions in screen units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// World camera: `pos` is the world point mapped to the viewport center,
/// `zoom` the world-to-screen scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: DEFAULT_CAMERA_POS,
            zoom: ZOOM_DEFAULT,
        }
    }
}

impl Camera {
    #[inline]
    pub fn world_to_screen(&self, world: Vec2, viewport: Viewport) -> Vec2 {
        (world - self.pos) * self.zoom + viewport.center()
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2, viewport: Viewport) -> Vec2 {
        (screen - viewport.center()) / self.zoom + self.pos
    }

    /// Pan by a screen-space drag delta (content follows the cursor)
    pub fn pan_by_screen_delta(&mut self, delta_screen: Vec2) {
        self.pos -= delta_screen / self.zoom;
    }

    /// Multiply zoom by `factor`, clamped, keeping the world point under
    /// the cursor fixed on screen
    pub fn zoom_at(&mut self, cursor_screen: Vec2, viewport: Viewport, factor: f32) {
        let next_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let offset = cursor_screen - viewport.center();
        let world_at_cursor = offset / self.zoom + self.pos;
        self.pos = world_at_cursor - offset / next_zoom;
        self.zoom = next_zoom;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Ease toward `target`: dead zone within 1 unit, hard snap beyond the
    /// snap threshold, and in between a blend that firms up with distance
    pub fn follow(&mut self, target: Vec2) {
        let delta = target - self.pos;
        let dist_sq = delta.length_squared();
        if dist_sq <= 1.0 {
            return;
        }

        let dist = dist_sq.sqrt();
        if dist > CAMERA_SNAP_DISTANCE {
            self.pos = target;
        } else {
            let smoothing = (0.15 + (dist / CAMERA_SNAP_DISTANCE) * 0.35).min(0.5);
            self.pos += delta * smoothing;
        }
    }

    /// Center directly on `target` (playback start with follow enabled)
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = target;
    }
}
