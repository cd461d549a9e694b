//! Team and its derived league record.

use crate::ids::generate_id;
use crate::models::player::{Player, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// League record of a team, derived from finished matches.
///
/// Only the standings calculator builds these; a team's record is a pure function of its id and
/// the tournament's match list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    /// League points (3 for a win, 2 for a 2-3 loss, 1 for any other loss).
    pub points: u32,
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    /// Rally points won across all sets.
    pub points_won: u32,
    pub points_lost: u32,
}

impl TeamRecord {
    pub fn matches_lost(&self) -> u32 {
        self.matches_played - self.matches_won
    }

    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }
}

/// A team in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<Player>,
    #[serde(flatten)]
    pub(crate) record: TeamRecord,
}

impl Team {
    /// Create a new team with an empty roster and a zero record.
    pub fn new<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        Self {
            id: generate_id(rng),
            name: name.into(),
            players: Vec::new(),
            record: TeamRecord::default(),
        }
    }

    /// Current derived record (as of the last standings refresh).
    pub fn record(&self) -> &TeamRecord {
        &self.record
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}
