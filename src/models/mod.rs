//! Data structures for the volleyball league: teams, players, matches, tournaments.

mod game;
mod player;
mod store;
mod team;
mod tournament;

pub use game::{
    is_set_complete, set_target, Match, MatchId, MatchStatus, SetOutcome, SetScore, Side,
    MIN_SET_MARGIN, SETS_TO_WIN, SET_POINTS, TIE_BREAK_POINTS, TIE_BREAK_SET,
};
pub use player::{Player, PlayerId, Position, UnknownPosition};
pub use store::{TournamentStore, TournamentSummary};
pub use team::{Team, TeamId, TeamRecord};
pub use tournament::{Tournament, TournamentError, TournamentId};
