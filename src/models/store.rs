//! In-memory collection of tournaments, addressed by id.

use crate::models::tournament::{Tournament, TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Listing view of a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub team_count: usize,
    pub finished_matches: usize,
    pub total_matches: usize,
}

impl TournamentSummary {
    pub fn from_tournament(t: &Tournament) -> Self {
        let (finished_matches, total_matches) = t.progress();
        Self {
            id: t.id,
            name: t.name.clone(),
            created_at: t.created_at,
            team_count: t.teams.len(),
            finished_matches,
            total_matches,
        }
    }
}

/// All tournaments of a session, in creation order.
#[derive(Clone, Debug, Default)]
pub struct TournamentStore {
    tournaments: Vec<Tournament>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tournament and return its id.
    pub fn create<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<TournamentId, TournamentError> {
        let tournament = Tournament::new(name, rng)?;
        let id = tournament.id;
        self.tournaments.push(tournament);
        Ok(id)
    }

    /// Add an already built tournament (e.g. the demo league).
    pub fn insert(&mut self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments.push(tournament);
        id
    }

    pub fn get(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .iter()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn get_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Delete a tournament with all its teams and matches.
    pub fn delete(&mut self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let idx = self
            .tournaments
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        Ok(self.tournaments.remove(idx))
    }

    /// Keep only the tournaments for which `keep` returns true; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Tournament) -> bool) -> usize {
        let before = self.tournaments.len();
        self.tournaments.retain(|t| keep(t));
        before - self.tournaments.len()
    }

    pub fn summaries(&self) -> Vec<TournamentSummary> {
        self.tournaments.iter().map(TournamentSummary::from_tournament).collect()
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}
