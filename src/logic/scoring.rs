//! Live scoring: drive one match through its set-by-set lifecycle and keep standings in sync.
//!
//! Every successful change refreshes the whole league table from the match list.

use crate::logic::standings::refresh_standings;
use crate::models::{Match, MatchId, SetOutcome, Side, Tournament, TournamentError};

fn match_mut(tournament: &mut Tournament, match_id: MatchId) -> Result<&mut Match, TournamentError> {
    tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Put a scheduled match live.
pub fn start_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    match_mut(tournament, match_id)?.start()?;
    refresh_standings(tournament);
    Ok(())
}

/// Add `delta` to one side of the current set (clamped at zero). Goes live if still scheduled.
///
/// Finished matches are not changed.
pub fn update_match_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
    delta: i32,
) -> Result<(), TournamentError> {
    match_mut(tournament, match_id)?.update_score(side, delta);
    refresh_standings(tournament);
    Ok(())
}

/// Close the current set of a match; see [`Match::finish_set`].
pub fn finish_current_set(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<SetOutcome, TournamentError> {
    let m = match_mut(tournament, match_id)?;
    let outcome = m.finish_set()?;
    match outcome {
        SetOutcome::MatchWon { .. } => log::info!(
            "{} vs {} finished ({}), winner: {}",
            m.team_a_name,
            m.team_b_name,
            m.score_line(),
            m.winner_name().unwrap_or_default()
        ),
        SetOutcome::NextSet { set_index } => {
            log::debug!("Match {} moves to set {}", m.id, set_index + 1)
        }
    }
    refresh_standings(tournament);
    Ok(outcome)
}
