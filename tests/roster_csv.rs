//! Integration tests for CSV roster import and standings export.

use rand::rngs::StdRng;
use rand::SeedableRng;
use volleyball_league_web::{
    finish_current_set, import_roster_csv, standings_csv, update_match_score, Match, Position,
    RosterImport, Side, Tournament, TournamentError,
};

#[test]
fn import_creates_teams_and_players() {
    let mut rng = StdRng::seed_from_u64(41);
    let mut t = Tournament::new("Cup", &mut rng).unwrap();
    t.add_team("Lions", &mut rng).unwrap();

    let csv = "team,player,position\n\
               lions,Ana,Libero\n\
               Tigers,Ben,Middle Blocker\n\
               Tigers,Cleo,\n\
               Bears,,\n";
    let summary = import_roster_csv(&mut t, csv, &mut rng).unwrap();

    assert_eq!(
        summary,
        RosterImport {
            teams_added: 2,
            players_added: 3
        }
    );
    assert_eq!(t.teams.len(), 3);
    let lions = t.find_team_by_name("Lions").unwrap();
    assert_eq!(lions.players[0].position, Position::Libero);
    let tigers = t.find_team_by_name("Tigers").unwrap();
    assert_eq!(tigers.players.len(), 2);
    assert_eq!(tigers.players[1].position, Position::Setter);
    assert!(t.find_team_by_name("Bears").unwrap().players.is_empty());
}

#[test]
fn bad_row_leaves_tournament_unchanged() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut t = Tournament::new("Cup", &mut rng).unwrap();
    let csv = "team,player,position\nLions,Ana,Libero\nTigers,Ben,Goalkeeper\n";
    let err = import_roster_csv(&mut t, csv, &mut rng).unwrap_err();
    assert!(matches!(err, TournamentError::Csv(ref msg) if msg.contains("row 2")));
    assert!(t.teams.is_empty());
}

#[test]
fn standings_export() {
    let mut rng = StdRng::seed_from_u64(43);
    let mut t = Tournament::new("Cup", &mut rng).unwrap();
    t.add_team("Lions", &mut rng).unwrap();
    t.add_team("Tigers", &mut rng).unwrap();
    let teams = t.teams.clone();
    t.matches = vec![Match::new(&teams[1], &teams[0], None, &mut rng)];
    let id = t.matches[0].id;
    for _ in 0..3 {
        update_match_score(&mut t, id, Side::A, 25).unwrap();
        update_match_score(&mut t, id, Side::B, 10).unwrap();
        finish_current_set(&mut t, id).unwrap();
    }

    let csv = standings_csv(&t).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "rank,team,points,played,won,lost,sets_won,sets_lost,points_won,points_lost"
    );
    assert_eq!(lines[1], "1,Tigers,3,1,1,0,3,0,75,30");
    assert_eq!(lines[2], "2,Lions,1,1,0,1,0,3,30,75");
}
