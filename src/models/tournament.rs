//! Tournament and TournamentError.

use crate::ids::generate_id;
use crate::logic::refresh_standings;
use crate::models::game::{Match, MatchId};
use crate::models::player::{Player, PlayerId, Position};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No tournament with this id in the store.
    TournamentNotFound(TournamentId),
    TeamNotFound(TeamId),
    PlayerNotFound(PlayerId),
    MatchNotFound(MatchId),
    /// Names must contain something other than whitespace.
    EmptyName,
    /// A team with this name already exists (case-insensitive).
    DuplicateTeamName,
    /// The current set has not reached its point floor with a two-point lead.
    SetNotComplete { required_points: u32, margin: u32 },
    /// The match is over; scores and sets can no longer change.
    MatchFinished,
    /// A roster CSV could not be read.
    Csv(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::SetNotComplete {
                required_points,
                margin,
            } => write!(
                f,
                "The set is not finished: it needs at least {} points and a {}-point lead",
                required_points, margin
            ),
            TournamentError::MatchFinished => write!(f, "The match is already finished"),
            TournamentError::Csv(msg) => write!(f, "Invalid roster CSV: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A league: its teams and the generated match list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Teams in standings order after every refresh.
    pub teams: Vec<Team>,
    /// Schedule in generation order.
    pub matches: Vec<Match>,
}

fn clean_name(name: &str) -> Result<&str, TournamentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    Ok(trimmed)
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new<R: Rng + ?Sized>(name: impl AsRef<str>, rng: &mut R) -> Result<Self, TournamentError> {
        let name = clean_name(name.as_ref())?;
        Ok(Self {
            id: generate_id(rng),
            name: name.to_string(),
            created_at: Utc::now(),
            teams: Vec::new(),
            matches: Vec::new(),
        })
    }

    /// Rename the tournament. A blank name leaves the current one in place.
    pub fn rename(&mut self, name: &str) {
        if let Ok(name) = clean_name(name) {
            self.name = name.to_string();
        }
    }

    pub fn get_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn find_team_by_name(&self, name: &str) -> Option<&Team> {
        let name = name.trim();
        self.teams.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Add a team. Names are trimmed and must be unique (case-insensitive).
    pub fn add_team<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<TeamId, TournamentError> {
        let name = clean_name(name)?;
        if self.find_team_by_name(name).is_some() {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = Team::new(name, rng);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Remove a team. Already generated matches keep their reference; standings are recomputed
    /// and skip them.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        refresh_standings(self);
        Ok(())
    }

    /// Add a player to a team's roster.
    pub fn add_player<R: Rng + ?Sized>(
        &mut self,
        team_id: TeamId,
        name: &str,
        position: Position,
        rng: &mut R,
    ) -> Result<PlayerId, TournamentError> {
        let name = clean_name(name)?;
        let team = self
            .get_team_mut(team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        let player = Player::new(name, position, rng);
        let id = player.id;
        team.players.push(player);
        Ok(id)
    }

    pub fn remove_player(&mut self, team_id: TeamId, player_id: PlayerId) -> Result<(), TournamentError> {
        let team = self
            .get_team_mut(team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        let idx = team
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        team.players.remove(idx);
        Ok(())
    }

    /// Change a player's scored points by `delta`; the tally never drops below zero.
    pub fn adjust_player_points(
        &mut self,
        team_id: TeamId,
        player_id: PlayerId,
        delta: i32,
    ) -> Result<(), TournamentError> {
        self.get_team_mut(team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?
            .get_player_mut(player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?
            .adjust_points(delta);
        Ok(())
    }

    /// A schedule can only be generated with at least two teams.
    pub fn can_generate_schedule(&self) -> bool {
        self.teams.len() >= 2
    }

    /// (finished, total) matches.
    pub fn progress(&self) -> (usize, usize) {
        let finished = self.matches.iter().filter(|m| m.is_finished()).count();
        (finished, self.matches.len())
    }

    /// Demo league: four teams, two players on the first one.
    pub fn demo<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, TournamentError> {
        let mut t = Self::new("Regional Championship", rng)?;
        let first = t.add_team("Paris Volley", rng)?;
        for name in ["Tours VB", "Montpellier", "Chaumont"] {
            t.add_team(name, rng)?;
        }
        let setter = t.add_player(first, "Jean Dupont", Position::Setter, rng)?;
        let middle = t.add_player(first, "Lucas Martin", Position::MiddleBlocker, rng)?;
        t.adjust_player_points(first, setter, 12)?;
        t.adjust_player_points(first, middle, 24)?;
        Ok(t)
    }
}
