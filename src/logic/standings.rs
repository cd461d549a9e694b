//! League table: derived team records, recomputed from scratch from the match list.

use crate::models::{Match, Team, TeamRecord, Tournament};

/// League points for the winner of a match.
pub const POINTS_FOR_WIN: u32 = 3;
/// League points for losing 2-3.
pub const POINTS_FOR_CLOSE_LOSS: u32 = 2;
/// League points for losing 0-3 or 1-3.
pub const POINTS_FOR_LOSS: u32 = 1;

/// League points for a side that won `sets_for` sets against `sets_against`.
pub fn league_points(sets_for: u32, sets_against: u32) -> u32 {
    if sets_for > sets_against {
        POINTS_FOR_WIN
    } else if sets_against - sets_for == 1 {
        POINTS_FOR_CLOSE_LOSS
    } else {
        POINTS_FOR_LOSS
    }
}

/// Per-side totals of one finished match.
struct MatchTotals {
    sets_a: u32,
    sets_b: u32,
    points_a: u32,
    points_b: u32,
}

impl MatchTotals {
    fn of(m: &Match) -> Self {
        let (sets_a, sets_b) = m.sets_won();
        let (points_a, points_b) = m
            .sets
            .iter()
            .fold((0, 0), |(a, b), s| (a + s.team_a, b + s.team_b));
        Self {
            sets_a,
            sets_b,
            points_a,
            points_b,
        }
    }
}

fn apply_side(record: &mut TeamRecord, sets_for: u32, sets_against: u32, points_for: u32, points_against: u32) {
    record.matches_played += 1;
    if sets_for > sets_against {
        record.matches_won += 1;
    }
    record.sets_won += sets_for;
    record.sets_lost += sets_against;
    record.points_won += points_for;
    record.points_lost += points_against;
    record.points += league_points(sets_for, sets_against);
}

/// Recompute every team's record from the finished matches and return the teams in table order.
///
/// Records are reset before folding, so calling this repeatedly with the same input gives the same
/// output. Matches whose teams are no longer in `teams` are ignored. Order: points descending,
/// then set difference descending; remaining ties keep their input order.
pub fn calculate_standings(teams: &[Team], matches: &[Match]) -> Vec<Team> {
    let mut table: Vec<Team> = teams
        .iter()
        .cloned()
        .map(|mut t| {
            t.record = TeamRecord::default();
            t
        })
        .collect();

    for m in matches.iter().filter(|m| m.is_finished()) {
        let idx_a = table.iter().position(|t| t.id == m.team_a_id);
        let idx_b = table.iter().position(|t| t.id == m.team_b_id);
        let (Some(idx_a), Some(idx_b)) = (idx_a, idx_b) else {
            log::debug!("Skipping match {} with a removed team", m.id);
            continue;
        };
        let totals = MatchTotals::of(m);
        apply_side(
            &mut table[idx_a].record,
            totals.sets_a,
            totals.sets_b,
            totals.points_a,
            totals.points_b,
        );
        apply_side(
            &mut table[idx_b].record,
            totals.sets_b,
            totals.sets_a,
            totals.points_b,
            totals.points_a,
        );
    }

    // Stable sort keeps input order for equal keys.
    table.sort_by(|a, b| {
        b.record
            .points
            .cmp(&a.record.points)
            .then_with(|| b.record.set_difference().cmp(&a.record.set_difference()))
    });
    table
}

/// Replace the tournament's teams with their recomputed standings.
pub fn refresh_standings(tournament: &mut Tournament) {
    tournament.teams = calculate_standings(&tournament.teams, &tournament.matches);
    log::debug!("Standings refreshed for tournament {}", tournament.id);
}
