//! Player scorer ranking across all teams.

use crate::models::{PlayerId, Position, Tournament};
use serde::Serialize;

/// One row of the scorer ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRanking {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub team_name: String,
    pub points_scored: u32,
}

/// All players, highest `points_scored` first. Ties keep roster order.
pub fn player_rankings(tournament: &Tournament) -> Vec<PlayerRanking> {
    let mut rows: Vec<PlayerRanking> = tournament
        .teams
        .iter()
        .flat_map(|team| {
            team.players.iter().map(move |p| PlayerRanking {
                player_id: p.id,
                name: p.name.clone(),
                position: p.position,
                team_name: team.name.clone(),
                points_scored: p.points_scored,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.points_scored.cmp(&a.points_scored));
    rows
}
