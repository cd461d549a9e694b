//! Volleyball league web app: library with models and business logic.

pub mod assistant;
pub mod ids;
pub mod logic;
pub mod models;

pub use assistant::{
    ask_assistant, AssistantError, ChatTurn, Role, RuleBookAssistant, RulesAssistant,
    FALLBACK_REPLY,
};
pub use logic::{
    calculate_standings, finish_current_set, generate_round_robin, generate_schedule,
    import_roster_csv, league_points, player_rankings, refresh_standings, standings_csv,
    start_match, update_match_score, PlayerRanking, RosterImport,
};
pub use models::{
    is_set_complete, set_target, Match, MatchId, MatchStatus, Player, PlayerId, Position,
    SetOutcome, SetScore, Side, Team, TeamId, TeamRecord, Tournament, TournamentError,
    TournamentId, TournamentStore, TournamentSummary,
};
