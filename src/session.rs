//! Owned simulation context and fixed-timestep clock.
//!
//! One `Session` is the single writer for the track, rider, camera, and
//! settings. The embedding front end calls [`Session::advance`] once per
//! render frame with the measured wall-clock delta, drives edits through the
//! action methods, and renders from the read accessors. Whoever owns the
//! `Session` owns the simulation; there is no global store.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Viewport};
use crate::characters::Character;
use crate::consts::{
    DEFAULT_RIDER_START, MAX_FRAME_DELTA, MAX_TICKS_PER_FRAME, PHYSICS_DT, SPATIAL_CELL_SIZE,
};
use crate::settings::{PlaybackSpeed, Settings};
use crate::sim::{LineKind, RiderState, Segment, SpatialHash, Track, step_rider};

/// Editing tools the input layer can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Draw,
    Pan,
    Erase,
}

/// Scalar values for the render overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    /// Simulated seconds since the last rider reset
    pub elapsed: f32,
    /// Rider speed magnitude in world units per sub-step
    pub speed: f32,
    pub playing: bool,
}

/// The simulation context: track, rider, camera, preferences, and the
/// accumulator that decouples render framerate from the physics tick.
#[derive(Debug, Clone)]
pub struct Session {
    track: Track,
    rider: RiderState,
    rider_start: Vec2,
    camera: Camera,
    settings: Settings,
    tool: Tool,
    line_kind: LineKind,
    character: Character,
    playing: bool,
    elapsed: f32,
    accumulator: f32,
    // Broad-phase cache, rebuilt whenever the stamped version falls behind
    // the track's
    spatial: Option<SpatialHash>,
    spatial_version: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            track: Track::new(),
            rider: RiderState::simple(DEFAULT_RIDER_START),
            rider_start: DEFAULT_RIDER_START,
            camera: Camera::default(),
            settings: Settings::default(),
            tool: Tool::Draw,
            line_kind: LineKind::Normal,
            character: Character::Ball,
            playing: false,
            elapsed: 0.0,
            accumulator: 0.0,
            spatial: None,
            spatial_version: 0,
        }
    }

    // === Read access ===

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn segments(&self) -> &[Segment] {
        self.track.segments()
    }

    pub fn rider(&self) -> &RiderState {
        &self.rider
    }

    pub fn rider_start(&self) -> Vec2 {
        self.rider_start
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn line_kind(&self) -> LineKind {
        self.line_kind
    }

    pub fn character(&self) -> Character {
        self.character
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn hud(&self) -> Hud {
        Hud {
            elapsed: self.elapsed,
            speed: self.rider.speed(),
            playing: self.playing,
        }
    }

    // === Selection ===

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_line_kind(&mut self, kind: LineKind) {
        self.line_kind = kind;
    }

    pub fn set_character(&mut self, character: Character) {
        self.character = character;
    }

    // === Track mutation ===

    /// Append one segment of the currently selected line kind
    pub fn add_segment(&mut self, a: Vec2, b: Vec2) {
        self.track.add_segment(a, b, self.line_kind);
    }

    /// Append a stroke of the currently selected line kind as one undo step
    pub fn add_segments(&mut self, strokes: &[(Vec2, Vec2)]) {
        self.track.add_segments(strokes, self.line_kind);
    }

    pub fn erase_at(&mut self, p: Vec2, radius: f32) {
        self.track.erase_at(p, radius);
    }

    pub fn erase_path(&mut self, points: &[Vec2], radius: f32) {
        self.track.erase_path(points, radius);
    }

    /// Remove all segments. Clearing mid-run is an implicit pause: no tick
    /// may integrate against a collection mid-replacement.
    pub fn clear_track(&mut self) {
        if self.playing {
            self.playing = false;
            log::info!("Playback paused for track clear");
        }
        self.track.clear();
    }

    pub fn undo(&mut self) {
        self.track.undo();
    }

    // === Camera ===

    pub fn pan_by_screen_delta(&mut self, delta_screen: Vec2) {
        self.camera.pan_by_screen_delta(delta_screen);
    }

    pub fn zoom_at(&mut self, cursor_screen: Vec2, viewport: Viewport, factor: f32) {
        self.camera.zoom_at(cursor_screen, viewport, factor);
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn set_camera_pos(&mut self, pos: Vec2) {
        self.camera.pos = pos;
    }

    pub fn reset_camera(&mut self) {
        self.camera = Camera::default();
    }

    // === Settings ===

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.settings.grid_visible = visible;
    }

    pub fn toggle_grid(&mut self) {
        self.settings.grid_visible = !self.settings.grid_visible;
    }

    pub fn set_camera_following(&mut self, following: bool) {
        self.settings.camera_following = following;
    }

    pub fn toggle_camera_following(&mut self) {
        self.settings.camera_following = !self.settings.camera_following;
    }

    pub fn set_playback_speed(&mut self, speed: PlaybackSpeed) {
        self.settings.playback_speed = speed;
    }

    /// Replace the whole preference block (e.g. restored from storage)
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    // === Playback control ===

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.playing);
    }

    pub fn set_playing(&mut self, playing: bool) {
        if playing == self.playing {
            return;
        }
        if playing {
            self.start_playback();
        } else {
            self.playing = false;
            log::info!("Playback paused at frame {}", self.rider.frame);
        }
    }

    fn start_playback(&mut self) {
        self.refresh_spatial();
        if self.settings.camera_following {
            self.camera.snap_to(self.rider.center());
        }
        // Prime the accumulator so the first frame ticks immediately
        self.accumulator = PHYSICS_DT;
        self.playing = true;
        log::info!("Playback started at frame {}", self.rider.frame);
    }

    /// Pause and rebuild the rider at the start point; elapsed time resets
    pub fn reset_rider(&mut self) {
        self.playing = false;
        self.rider = RiderState::simple(self.rider_start);
        self.elapsed = 0.0;
    }

    /// Move the start point and reset the rider onto it
    pub fn set_rider_start(&mut self, p: Vec2) {
        self.rider_start = p;
        self.reset_rider();
    }

    // === Clock ===

    /// Advance by one render frame of `frame_dt` wall-clock seconds,
    /// running zero or more fixed physics ticks.
    ///
    /// The delta is clamped to bound worst-case catch-up; at most
    /// [`MAX_TICKS_PER_FRAME`] ticks run per call; leftover time beyond
    /// twice the timestep is dropped rather than allowed to snowball.
    pub fn advance(&mut self, frame_dt: f32) {
        if !self.playing {
            // Resuming must never see a startup time burst
            self.accumulator = 0.0;
            return;
        }

        self.accumulator += frame_dt.min(MAX_FRAME_DELTA);

        let mut ticks = 0;
        while self.accumulator >= PHYSICS_DT && ticks < MAX_TICKS_PER_FRAME && self.playing {
            self.step_once();
            self.accumulator -= PHYSICS_DT;
            ticks += 1;
        }

        if self.accumulator > PHYSICS_DT * 2.0 {
            self.accumulator = PHYSICS_DT;
        }
    }

    /// One fixed physics tick: refresh the broad phase, step the rider at
    /// the playback-scaled delta, then observe terminal conditions.
    fn step_once(&mut self) {
        self.refresh_spatial();

        let scaled_dt = PHYSICS_DT * self.settings.playback_speed.multiplier();
        step_rider(
            &mut self.rider,
            self.track.segments(),
            self.spatial.as_ref(),
            scaled_dt,
        );

        if self.rider.is_out_of_bounds() {
            self.playing = false;
            log::info!(
                "Rider out of bounds at {:?}, pausing playback",
                self.rider.center()
            );
            return;
        }

        self.elapsed += scaled_dt;

        if self.settings.camera_following {
            self.camera.follow(self.rider.center());
        }
    }

    /// Rebuild the broad-phase index when the track version has moved
    fn refresh_spatial(&mut self) {
        let version = self.track.version();
        if self.spatial.is_none() || self.spatial_version != version {
            let hash = SpatialHash::build(self.track.segments(), SPATIAL_CELL_SIZE);
            log::debug!(
                "Rebuilt spatial hash: {} segments in {} cells (track version {})",
                self.track.len(),
                hash.cell_count(),
                version
            );
            self.spatial = Some(hash);
            self.spatial_version = version;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::RIDER_RADIUS;

    /// Run playback for `seconds` of wall-clock time in uniform frames
    fn run(session: &mut Session, seconds: f32) {
        let frames = (seconds / PHYSICS_DT).ceil() as usize;
        for _ in 0..frames {
            session.advance(PHYSICS_DT);
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(!session.is_playing());
        assert_eq!(session.elapsed_time(), 0.0);
        assert!(session.segments().is_empty());
        assert_eq!(session.tool(), Tool::Draw);
        assert_eq!(session.line_kind(), LineKind::Normal);
        assert_eq!(session.character(), Character::Ball);
        assert_eq!(session.rider().points[0].pos, DEFAULT_RIDER_START);
        assert_eq!(session.camera().pos, Vec2::new(0.0, -50.0));
    }

    #[test]
    fn test_add_segment_uses_selected_line_kind() {
        let mut session = Session::new();
        session.set_line_kind(LineKind::Accel);
        session.add_segment(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(session.segments()[0].kind, LineKind::Accel);
    }

    #[test]
    fn test_paused_advance_does_nothing() {
        let mut session = Session::new();
        session.advance(1.0);
        assert_eq!(session.rider().frame, 0);
        assert_eq!(session.elapsed_time(), 0.0);
    }

    #[test]
    fn test_priming_runs_one_tick_on_zero_delta() {
        let mut session = Session::new();
        session.toggle_playing();
        session.advance(0.0);
        assert_eq!(session.rider().frame, 1);
    }

    #[test]
    fn test_catchup_is_capped_per_frame() {
        let mut session = Session::new();
        session.toggle_playing();
        // A one-second stall is clamped to 50 ms of debt, a few ticks
        session.advance(1.0);
        let frame = session.rider().frame;
        assert!(frame <= MAX_TICKS_PER_FRAME, "frame = {frame}");
        assert!(frame >= 3, "clamped debt still covers 50 ms, frame = {frame}");
    }

    #[test]
    fn test_steady_frames_track_real_time() {
        let mut session = Session::new();
        session.toggle_playing();
        run(&mut session, 1.0);
        // One simulated second per real second, the priming tick aside
        let frames = session.rider().frame;
        assert!((59..=62).contains(&frames), "frames = {frames}");
        assert!((session.elapsed_time() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_playback_speed_scales_simulated_time() {
        let mut session = Session::new();
        session.set_playback_speed(PlaybackSpeed::Double);
        session.toggle_playing();
        run(&mut session, 1.0);
        // Same tick cadence as 1x, but each tick simulates twice the time
        let frames = session.rider().frame;
        assert!((59..=62).contains(&frames), "frames = {frames}");
        let expected = frames as f32 * 2.0 * PHYSICS_DT;
        assert!((session.elapsed_time() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_pause_resets_accumulated_debt() {
        let mut session = Session::new();
        session.toggle_playing();
        run(&mut session, 0.5);
        session.toggle_playing();
        let frame = session.rider().frame;

        // A long paused frame must not bank time
        session.advance(10.0);
        assert_eq!(session.rider().frame, frame);

        session.toggle_playing();
        session.advance(0.0);
        // Only the priming tick runs after resume
        assert_eq!(session.rider().frame, frame + 1);
    }

    #[test]
    fn test_rider_settles_on_drawn_line() {
        let mut session = Session::new();
        // Rider starts at (0, -100); draw a floor at y = -60
        session.add_segment(Vec2::new(-200.0, -60.0), Vec2::new(200.0, -60.0));
        session.toggle_playing();
        run(&mut session, 5.0);

        let y = session.rider().points[0].pos.y;
        assert!(
            (y - (-60.0 - RIDER_RADIUS)).abs() < 1.0,
            "rider should rest on the line, y = {y}"
        );
        assert!(session.is_playing(), "settled rider stays in bounds");
    }

    #[test]
    fn test_erase_during_playback_invalidates_broad_phase() {
        let mut session = Session::new();
        session.add_segment(Vec2::new(-200.0, -60.0), Vec2::new(200.0, -60.0));
        session.toggle_playing();
        run(&mut session, 3.0);
        let resting_y = session.rider().points[0].pos.y;
        assert!(resting_y < -60.0 + 1.0);

        // Remove the floor mid-run; the stale index must not keep it solid
        session.erase_at(Vec2::new(0.0, -60.0), 5.0);
        assert!(session.segments().is_empty());
        run(&mut session, 2.0);

        assert!(
            session.rider().points[0].pos.y > resting_y + 50.0,
            "rider should fall through the erased line"
        );
    }

    #[test]
    fn test_out_of_bounds_pauses_mid_frame() {
        let mut session = Session::new();
        session.set_rider_start(Vec2::new(0.0, 99_999.5));
        session.toggle_playing();
        session.advance(MAX_FRAME_DELTA);

        assert!(!session.is_playing());
        // The loop stopped at the terminal tick instead of running the cap
        assert_eq!(session.rider().frame, 1);
        // The terminal tick contributes no elapsed time
        assert_eq!(session.elapsed_time(), 0.0);
    }

    #[test]
    fn test_reset_rider() {
        let mut session = Session::new();
        session.toggle_playing();
        run(&mut session, 0.5);
        assert!(session.rider().frame > 0);

        session.reset_rider();
        assert!(!session.is_playing());
        assert_eq!(session.rider().frame, 0);
        assert_eq!(session.rider().points[0].pos, DEFAULT_RIDER_START);
        assert_eq!(session.elapsed_time(), 0.0);
    }

    #[test]
    fn test_set_rider_start_moves_and_pauses() {
        let mut session = Session::new();
        session.toggle_playing();
        let start = Vec2::new(50.0, -20.0);
        session.set_rider_start(start);

        assert!(!session.is_playing());
        assert_eq!(session.rider_start(), start);
        assert_eq!(session.rider().points[0].pos, start);
    }

    #[test]
    fn test_clear_track_is_implicit_pause() {
        let mut session = Session::new();
        session.add_segment(Vec2::ZERO, Vec2::new(10.0, 0.0));
        session.toggle_playing();

        session.clear_track();
        assert!(!session.is_playing());
        assert!(session.segments().is_empty());

        // The clear itself is undoable
        session.undo();
        assert_eq!(session.segments().len(), 1);
    }

    #[test]
    fn test_camera_snaps_to_rider_on_play() {
        let mut session = Session::new();
        assert_eq!(session.camera().pos, Vec2::new(0.0, -50.0));
        session.toggle_playing();
        assert_eq!(session.camera().pos, DEFAULT_RIDER_START);
    }

    #[test]
    fn test_camera_stays_put_when_follow_disabled() {
        let mut session = Session::new();
        session.set_camera_following(false);
        session.toggle_playing();
        run(&mut session, 1.0);
        assert_eq!(session.camera().pos, Vec2::new(0.0, -50.0));
    }

    #[test]
    fn test_camera_follows_falling_rider() {
        let mut session = Session::new();
        session.toggle_playing();
        run(&mut session, 2.0);

        let rider_y = session.rider().center().y;
        let cam_y = session.camera().pos.y;
        assert!(cam_y > -100.0, "camera moved down from the snap point");
        assert!(cam_y <= rider_y + 1.0, "camera trails the rider");
    }

    #[test]
    fn test_reset_camera_restores_defaults() {
        let mut session = Session::new();
        session.pan_by_screen_delta(Vec2::new(300.0, 120.0));
        session.zoom_in();
        session.reset_camera();
        assert_eq!(session.camera().pos, Vec2::new(0.0, -50.0));
        assert_eq!(session.camera().zoom, 1.5);
    }

    #[test]
    fn test_setting_toggles() {
        let mut session = Session::new();
        session.toggle_grid();
        assert!(!session.settings().grid_visible);
        session.toggle_camera_following();
        assert!(!session.settings().camera_following);
        session.set_tool(Tool::Erase);
        assert_eq!(session.tool(), Tool::Erase);
        session.set_character(Character::Horse);
        assert_eq!(session.character(), Character::Horse);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut session = Session::new();
        let hud = session.hud();
        assert_eq!(hud.elapsed, 0.0);
        assert_eq!(hud.speed, 0.0);
        assert!(!hud.playing);

        session.toggle_playing();
        run(&mut session, 0.5);
        let hud = session.hud();
        assert!(hud.playing);
        assert!(hud.elapsed > 0.0);
        assert!(hud.speed > 0.0, "free fall shows on the HUD");
    }

    #[test]
    fn test_set_playing_is_idempotent() {
        let mut session = Session::new();
        session.set_playing(true);
        session.advance(0.0);
        let frame = session.rider().frame;

        // Setting the same state again must not re-prime the clock
        session.set_playing(true);
        session.advance(0.0);
        assert_eq!(session.rider().frame, frame);
    }
}
