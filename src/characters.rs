//! Cosmetic character catalog for the selection UI.
//!
//! Display metadata only: every character shares identical collision
//! geometry and physics parameters, so switching characters never changes
//! a run.

use serde::{Deserialize, Serialize};

/// Selectable rider characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Character {
    #[default]
    Ball,
    Snowboarder,
    Skateboarder,
    Horse,
}

impl Character {
    /// Every selectable character, in display order
    pub const ALL: [Character; 4] = [
        Character::Ball,
        Character::Snowboarder,
        Character::Skateboarder,
        Character::Horse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Ball => "ball",
            Character::Snowboarder => "snowboarder",
            Character::Skateboarder => "skateboarder",
            Character::Horse => "horse",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ball" => Some(Character::Ball),
            "snowboarder" => Some(Character::Snowboarder),
            "skateboarder" => Some(Character::Skateboarder),
            "horse" => Some(Character::Horse),
            _ => None,
        }
    }

    /// Display name for the selection UI
    pub fn name(&self) -> &'static str {
        match self {
            Character::Ball => "Classic Ball",
            Character::Snowboarder => "Snowboarder",
            Character::Skateboarder => "Skateboarder",
            Character::Horse => "Horse Rider",
        }
    }

    /// One-line blurb for the selection UI
    pub fn description(&self) -> &'static str {
        match self {
            Character::Ball => "The original rider with a trailing flag",
            Character::Snowboarder => "Shredding the slopes in style",
            Character::Skateboarder => "Kickflipping through the lines",
            Character::Horse => "Galloping majestically",
        }
    }
}
