//! CSV roster import (`team,player,position`) and standings export.

use crate::logic::standings::calculate_standings;
use crate::models::{Position, Tournament, TournamentError};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct RosterRow {
    team: String,
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    position: Option<String>,
}

/// What an import added.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterImport {
    pub teams_added: usize,
    pub players_added: usize,
}

fn csv_error(e: impl std::fmt::Display) -> TournamentError {
    TournamentError::Csv(e.to_string())
}

/// Import teams and players from CSV with a `team,player,position` header.
///
/// Unknown team names create the team; rows with an empty `player` only ensure the team exists.
/// An empty position defaults to setter. The whole input is validated before anything is added,
/// so a bad row leaves the tournament unchanged.
pub fn import_roster_csv<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    input: &str,
    rng: &mut R,
) -> Result<RosterImport, TournamentError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut rows: Vec<(String, Option<(String, Position)>)> = Vec::new();
    for (line, record) in reader.deserialize::<RosterRow>().enumerate() {
        let row = record.map_err(csv_error)?;
        if row.team.trim().is_empty() {
            return Err(csv_error(format!("row {}: team name is empty", line + 1)));
        }
        let player = match row.player.filter(|p| !p.trim().is_empty()) {
            Some(name) => {
                let position = match row.position.as_deref().map(str::trim) {
                    None | Some("") => Position::default(),
                    Some(label) => label
                        .parse()
                        .map_err(|e| csv_error(format!("row {}: {}", line + 1, e)))?,
                };
                Some((name, position))
            }
            None => None,
        };
        rows.push((row.team, player));
    }

    let mut summary = RosterImport::default();
    for (team_name, player) in rows {
        let team_id = match tournament.find_team_by_name(&team_name) {
            Some(team) => team.id,
            None => {
                summary.teams_added += 1;
                tournament.add_team(&team_name, rng)?
            }
        };
        if let Some((name, position)) = player {
            tournament.add_player(team_id, &name, position, rng)?;
            summary.players_added += 1;
        }
    }
    log::debug!(
        "Imported {} team(s) and {} player(s) into {}",
        summary.teams_added,
        summary.players_added,
        tournament.name
    );
    Ok(summary)
}

#[derive(Serialize)]
struct StandingsRow<'a> {
    rank: usize,
    team: &'a str,
    points: u32,
    played: u32,
    won: u32,
    lost: u32,
    sets_won: u32,
    sets_lost: u32,
    points_won: u32,
    points_lost: u32,
}

/// League table as CSV, one row per team in table order.
pub fn standings_csv(tournament: &Tournament) -> Result<String, TournamentError> {
    let table = calculate_standings(&tournament.teams, &tournament.matches);
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, team) in table.iter().enumerate() {
        let r = team.record();
        writer
            .serialize(StandingsRow {
                rank: i + 1,
                team: &team.name,
                points: r.points,
                played: r.matches_played,
                won: r.matches_won,
                lost: r.matches_lost(),
                sets_won: r.sets_won,
                sets_lost: r.sets_lost,
                points_won: r.points_won,
                points_lost: r.points_lost,
            })
            .map_err(csv_error)?;
    }
    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}
