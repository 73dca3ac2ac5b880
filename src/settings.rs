//! Session settings and preferences
//!
//! The embedding shell persists these wherever it likes (LocalStorage on
//! the web, a profile document, disk); this crate only defines the shape
//! and the JSON round-trip.

use serde::{Deserialize, Serialize};

/// Playback speed steps
///
/// The speed multiplies the physics time delta, not the tick rate: higher
/// speeds simulate more seconds per real second instead of taking larger,
/// less stable ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackSpeed {
    Quarter,
    Half,
    #[default]
    Normal,
    Double,
    Quadruple,
}

impl PlaybackSpeed {
    /// Every selectable speed, slowest first
    pub const ALL: [PlaybackSpeed; 5] = [
        PlaybackSpeed::Quarter,
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Double,
        PlaybackSpeed::Quadruple,
    ];

    /// Factor applied to the physics time delta
    pub fn multiplier(&self) -> f32 {
        match self {
            PlaybackSpeed::Quarter => 0.25,
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Quadruple => 4.0,
        }
    }

    pub fn from_multiplier(m: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.multiplier() == m)
    }

    /// UI label
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackSpeed::Quarter => "0.25x",
            PlaybackSpeed::Half => "0.5x",
            PlaybackSpeed::Normal => "1x",
            PlaybackSpeed::Double => "2x",
            PlaybackSpeed::Quadruple => "4x",
        }
    }
}

/// Session preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Draw the background grid
    pub grid_visible: bool,
    /// Camera tracks the rider during playback
    pub camera_following: bool,
    /// Simulated-seconds-per-real-second factor
    pub playback_speed: PlaybackSpeed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            camera_following: true,
            playback_speed: PlaybackSpeed::Normal,
        }
    }
}

impl Settings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Restore persisted settings, falling back to defaults when the
    /// stored blob is missing or unreadable
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(err)) => {
                log::warn!("Discarding unreadable settings: {err}");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
