//! Player and Position data structures.

use crate::ids::generate_id;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a player.
pub type PlayerId = Uuid;

/// Court position of a player.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Setter,
    OutsideHitter,
    Opposite,
    MiddleBlocker,
    Libero,
}

impl Position {
    /// All positions, in roster display order.
    pub const ALL: [Position; 5] = [
        Position::Setter,
        Position::OutsideHitter,
        Position::Opposite,
        Position::MiddleBlocker,
        Position::Libero,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Position::Setter => "Setter",
            Position::OutsideHitter => "Outside Hitter",
            Position::Opposite => "Opposite",
            Position::MiddleBlocker => "Middle Blocker",
            Position::Libero => "Libero",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for a position label that is not one of [`Position::ALL`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown position: {}", self.0)
    }
}

impl FromStr for Position {
    type Err = UnknownPosition;

    /// Accepts the display label or the snake_case wire name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        Position::ALL
            .into_iter()
            .find(|p| p.label().to_ascii_lowercase().replace(' ', "_") == normalized)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

/// A player on a team roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Manually tracked scoring tally; independent of match results.
    pub points_scored: u32,
}

impl Player {
    /// Create a new player with no points scored.
    pub fn new<R: Rng + ?Sized>(name: impl Into<String>, position: Position, rng: &mut R) -> Self {
        Self {
            id: generate_id(rng),
            name: name.into(),
            position,
            points_scored: 0,
        }
    }

    /// Add `delta` (which may be negative) to the scored points, stopping at zero.
    pub fn adjust_points(&mut self, delta: i32) {
        self.points_scored = self.points_scored.saturating_add_signed(delta);
    }
}
