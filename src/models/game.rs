//! Match, SetScore and the per-match scoring state machine (best of five sets).

use crate::ids::generate_id;
use crate::models::team::{Team, TeamId};
use crate::models::tournament::TournamentError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Sets needed to win a match.
pub const SETS_TO_WIN: u32 = 3;
/// Points needed to take sets one to four.
pub const SET_POINTS: u32 = 25;
/// Points needed to take the deciding fifth set.
pub const TIE_BREAK_POINTS: u32 = 15;
/// Zero-based index of the tie-break set.
pub const TIE_BREAK_SET: usize = 4;
/// Lead required to close any set.
pub const MIN_SET_MARGIN: u32 = 2;

/// Which side of a match (team A is the home side).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Lifecycle of a match. Transitions only move forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

/// Rally points of both sides in one set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    pub team_a: u32,
    pub team_b: u32,
}

impl SetScore {
    pub fn new(team_a: u32, team_b: u32) -> Self {
        Self { team_a, team_b }
    }

    /// Side with strictly more points, if any.
    pub fn leader(&self) -> Option<Side> {
        match self.team_a.cmp(&self.team_b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }
}

/// Points needed to take the set at `set_index` (zero-based).
pub fn set_target(set_index: usize) -> u32 {
    if set_index == TIE_BREAK_SET {
        TIE_BREAK_POINTS
    } else {
        SET_POINTS
    }
}

/// Whether `score` closes the set at `set_index`: one side at the target or above, with a lead of
/// at least two.
pub fn is_set_complete(score: SetScore, set_index: usize) -> bool {
    let target = set_target(set_index);
    (score.team_a >= target || score.team_b >= target)
        && score.team_a.abs_diff(score.team_b) >= MIN_SET_MARGIN
}

/// Result of successfully closing a set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SetOutcome {
    /// Match continues; the set at `set_index` starts at 0-0.
    NextSet { set_index: usize },
    /// A side reached three sets.
    MatchWon { winner: TeamId },
}

/// A single fixture between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    /// Names as they were when the schedule was generated.
    pub team_a_name: String,
    pub team_b_name: String,
    pub sets: Vec<SetScore>,
    /// Zero-based index into `sets` of the set being played.
    pub current_set: usize,
    pub status: MatchStatus,
    /// Present iff `status` is `Finished`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub round: Option<String>,
}

impl Match {
    /// Create a scheduled match with one empty set.
    pub fn new<R: Rng + ?Sized>(
        team_a: &Team,
        team_b: &Team,
        round: Option<String>,
        rng: &mut R,
    ) -> Self {
        Self {
            id: generate_id(rng),
            team_a_id: team_a.id,
            team_b_id: team_b.id,
            team_a_name: team_a.name.clone(),
            team_b_name: team_b.name.clone(),
            sets: vec![SetScore::default()],
            current_set: 0,
            status: MatchStatus::Scheduled,
            winner_id: None,
            round,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a_id == team_id || self.team_b_id == team_id
    }

    pub fn team_id(&self, side: Side) -> TeamId {
        match side {
            Side::A => self.team_a_id,
            Side::B => self.team_b_id,
        }
    }

    /// Score of the set being played.
    pub fn current_score(&self) -> SetScore {
        self.sets.get(self.current_set).copied().unwrap_or_default()
    }

    /// Points needed to take the set being played (15 in the tie-break, else 25).
    pub fn current_target(&self) -> u32 {
        set_target(self.current_set)
    }

    /// Sets won by (team A, team B) across all recorded sets.
    pub fn sets_won(&self) -> (u32, u32) {
        self.sets
            .iter()
            .fold((0, 0), |(a, b), s| match s.leader() {
                Some(Side::A) => (a + 1, b),
                Some(Side::B) => (a, b + 1),
                None => (a, b),
            })
    }

    /// Set scores joined for display, e.g. `25-20, 18-25`.
    pub fn score_line(&self) -> String {
        self.sets
            .iter()
            .map(|s| format!("{}-{}", s.team_a, s.team_b))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner_id.map(|w| {
            if w == self.team_a_id {
                self.team_a_name.as_str()
            } else {
                self.team_b_name.as_str()
            }
        })
    }

    /// Scheduled -> Live. Starting a live match does nothing.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        match self.status {
            MatchStatus::Scheduled => {
                self.status = MatchStatus::Live;
                Ok(())
            }
            MatchStatus::Live => Ok(()),
            MatchStatus::Finished => Err(TournamentError::MatchFinished),
        }
    }

    /// Add `delta` to `side`'s points in the current set, clamped at zero.
    ///
    /// A scheduled match goes live on its first score change. Finished matches are left as they are.
    /// Scores are not validated here; that happens in [`Match::finish_set`].
    pub fn update_score(&mut self, side: Side, delta: i32) {
        if self.is_finished() {
            return;
        }
        let Some(set) = self.sets.get_mut(self.current_set) else {
            return;
        };
        let points = set.side_mut(side);
        *points = points.saturating_add_signed(delta);
        self.status = MatchStatus::Live;
    }

    /// Close the current set.
    ///
    /// Fails with [`TournamentError::SetNotComplete`] without touching the match when the set is
    /// not over. Otherwise either finishes the match (a side has three sets) or opens the next set.
    pub fn finish_set(&mut self) -> Result<SetOutcome, TournamentError> {
        if self.is_finished() {
            return Err(TournamentError::MatchFinished);
        }
        if !is_set_complete(self.current_score(), self.current_set) {
            return Err(TournamentError::SetNotComplete {
                required_points: self.current_target(),
                margin: MIN_SET_MARGIN,
            });
        }

        let (won_a, won_b) = self.sets_won();
        if won_a == SETS_TO_WIN || won_b == SETS_TO_WIN {
            let winner = if won_a > won_b {
                self.team_a_id
            } else {
                self.team_b_id
            };
            self.status = MatchStatus::Finished;
            self.winner_id = Some(winner);
            return Ok(SetOutcome::MatchWon { winner });
        }

        self.status = MatchStatus::Live;
        self.sets.push(SetScore::default());
        self.current_set += 1;
        Ok(SetOutcome::NextSet {
            set_index: self.current_set,
        })
    }
}
