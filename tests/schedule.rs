//! Integration tests for round-robin schedule generation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use volleyball_league_web::{
    finish_current_set, generate_round_robin, generate_schedule, update_match_score, MatchStatus,
    SetScore, Side, Team, TeamId, Tournament,
};

fn teams(n: usize, rng: &mut StdRng) -> Vec<Team> {
    (0..n).map(|i| Team::new(format!("Team {i}"), rng)).collect()
}

#[test]
fn every_pair_meets_exactly_once() {
    for n in 2..=12 {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let teams = teams(n, &mut rng);
            let matches = generate_round_robin(&teams, &mut rng);

            assert_eq!(matches.len(), n * (n - 1) / 2, "n = {n}, seed = {seed}");

            let mut pairs = HashSet::new();
            for m in &matches {
                assert_ne!(m.team_a_id, m.team_b_id);
                let pair = if m.team_a_id < m.team_b_id {
                    (m.team_a_id, m.team_b_id)
                } else {
                    (m.team_b_id, m.team_a_id)
                };
                assert!(pairs.insert(pair), "pair played twice for n = {n}");
            }

            let mut games: HashMap<TeamId, usize> = HashMap::new();
            for m in &matches {
                *games.entry(m.team_a_id).or_default() += 1;
                *games.entry(m.team_b_id).or_default() += 1;
            }
            assert_eq!(games.len(), n);
            assert!(games.values().all(|&g| g == n - 1));
        }
    }
}

#[test]
fn rounds_have_each_team_at_most_once() {
    for n in 2..=9 {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let teams = teams(n, &mut rng);
        let matches = generate_round_robin(&teams, &mut rng);

        let mut by_round: HashMap<String, Vec<TeamId>> = HashMap::new();
        for m in &matches {
            let round = m.round.clone().unwrap();
            assert!(round.starts_with("Round "));
            let slot = by_round.entry(round).or_default();
            slot.push(m.team_a_id);
            slot.push(m.team_b_id);
        }
        let expected_rounds = if n % 2 == 0 { n - 1 } else { n };
        assert_eq!(by_round.len(), expected_rounds, "n = {n}");
        for ids in by_round.values() {
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
        }
    }
}

#[test]
fn rounds_come_out_in_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let teams = teams(6, &mut rng);
    let matches = generate_round_robin(&teams, &mut rng);
    let rounds: Vec<u32> = matches
        .iter()
        .map(|m| m.round.as_deref().unwrap()["Round ".len()..].parse().unwrap())
        .collect();
    assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(rounds.first(), Some(&1));
    assert_eq!(rounds.last(), Some(&5));
}

#[test]
fn three_teams_get_three_rounds_of_one_match() {
    let mut rng = StdRng::seed_from_u64(3);
    let teams = teams(3, &mut rng);
    let matches = generate_round_robin(&teams, &mut rng);
    assert_eq!(matches.len(), 3);
    let rounds: HashSet<_> = matches.iter().map(|m| m.round.clone()).collect();
    assert_eq!(rounds.len(), 3);
}

#[test]
fn new_matches_are_scheduled_with_one_empty_set() {
    let mut rng = StdRng::seed_from_u64(5);
    let teams = teams(4, &mut rng);
    for m in generate_round_robin(&teams, &mut rng) {
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert_eq!(m.sets, vec![SetScore::default()]);
        assert_eq!(m.current_set, 0);
        assert_eq!(m.winner_id, None);
        let home = teams.iter().find(|t| t.id == m.team_a_id).unwrap();
        assert_eq!(m.team_a_name, home.name);
    }
}

#[test]
fn home_and_away_are_both_assigned() {
    let mut rng = StdRng::seed_from_u64(0);
    let teams = teams(2, &mut rng);
    let mut homes = HashSet::new();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let matches = generate_round_robin(&teams, &mut rng);
        homes.insert(matches[0].team_a_id);
    }
    assert_eq!(homes.len(), 2);
}

#[test]
fn same_seed_gives_same_schedule() {
    let mut rng = StdRng::seed_from_u64(9);
    let teams = teams(7, &mut rng);
    let pairings = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_round_robin(&teams, &mut rng)
            .into_iter()
            .map(|m| (m.id, m.team_a_id, m.team_b_id, m.round))
            .collect::<Vec<_>>()
    };
    assert_eq!(pairings(42), pairings(42));
}

#[test]
fn fewer_than_two_teams_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(generate_round_robin(&[], &mut rng).is_empty());
    let one = teams(1, &mut rng);
    assert!(generate_round_robin(&one, &mut rng).is_empty());

    let mut t = Tournament::new("Solo", &mut rng).unwrap();
    t.add_team("Only", &mut rng).unwrap();
    assert!(!t.can_generate_schedule());
    generate_schedule(&mut t, &mut rng);
    assert!(t.matches.is_empty());
}

#[test]
fn regenerating_resets_standings() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut t = Tournament::new("League", &mut rng).unwrap();
    for name in ["A", "B"] {
        t.add_team(name, &mut rng).unwrap();
    }
    generate_schedule(&mut t, &mut rng);
    let id = t.matches[0].id;
    for _ in 0..3 {
        update_match_score(&mut t, id, Side::A, 25).unwrap();
        finish_current_set(&mut t, id).unwrap();
    }
    assert_eq!(t.teams.iter().map(|t| t.record().points).sum::<u32>(), 4);

    generate_schedule(&mut t, &mut rng);
    assert_eq!(t.matches.len(), 1);
    assert!(t.teams.iter().all(|t| t.record().points == 0 && t.record().matches_played == 0));
}
