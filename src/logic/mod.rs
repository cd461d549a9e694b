//! League business logic: schedule generation, live scoring, standings, rankings and CSV.

mod rankings;
mod roster_csv;
mod schedule;
mod scoring;
mod standings;

pub use rankings::{player_rankings, PlayerRanking};
pub use roster_csv::{import_roster_csv, standings_csv, RosterImport};
pub use schedule::{generate_round_robin, generate_schedule};
pub use scoring::{finish_current_set, start_match, update_match_score};
pub use standings::{
    calculate_standings, league_points, refresh_standings, POINTS_FOR_CLOSE_LOSS,
    POINTS_FOR_LOSS, POINTS_FOR_WIN,
};
