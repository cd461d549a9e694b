//! Round-robin schedule generation (circle method with randomized order).

use crate::logic::standings::refresh_standings;
use crate::models::{Match, Team, Tournament};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate a single round robin where every team meets every other team once.
///
/// 1. Shuffle the teams; pad with a bye when the count is odd.
/// 2. For each of the `n - 1` rounds, pair slot `i` with slot `n - 1 - i`, skipping the bye.
///    Home/away is a coin flip; each match is labelled `Round <k>`.
/// 3. Shuffle the matches of a round before appending them.
/// 4. Rotate: slot 0 stays fixed, the last slot moves to position 1.
///
/// Fewer than two teams yields an empty schedule.
pub fn generate_round_robin<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Vec<Match> {
    if teams.len() < 2 {
        return Vec::new();
    }

    // `None` is the bye slot.
    let mut rotation: Vec<Option<&Team>> = teams.iter().map(Some).collect();
    rotation.shuffle(&mut *rng);
    if rotation.len() % 2 != 0 {
        rotation.push(None);
    }

    let n = rotation.len();
    let mut matches = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);

    for round in 0..n - 1 {
        let label = format!("Round {}", round + 1);
        let mut round_matches = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (Some(first), Some(second)) = (rotation[i], rotation[n - 1 - i]) else {
                continue;
            };
            let (home, away) = if rng.gen_bool(0.5) {
                (first, second)
            } else {
                (second, first)
            };
            round_matches.push(Match::new(home, away, Some(label.clone()), &mut *rng));
        }
        round_matches.shuffle(&mut *rng);
        matches.append(&mut round_matches);

        rotation[1..].rotate_right(1);
    }

    log::debug!(
        "Generated {} matches over {} rounds for {} teams",
        matches.len(),
        n - 1,
        teams.len()
    );
    matches
}

/// Replace the tournament's schedule with a freshly generated round robin and reset standings.
///
/// Callers check [`Tournament::can_generate_schedule`] first; with fewer than two teams this
/// leaves the tournament untouched.
pub fn generate_schedule<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) {
    if !tournament.can_generate_schedule() {
        log::debug!("Not generating a schedule for {} team(s)", tournament.teams.len());
        return;
    }
    tournament.matches = generate_round_robin(&tournament.teams, rng);
    refresh_standings(tournament);
}
