//! Integration tests for round progression: start, report, undo, cancel, drop.

use chrono::NaiveDate;
use pod_tournament::logic::{build_pods, initial_seating, seed_from_id};
use pod_tournament::{
    cancel_round, drop_player, lock, next_round, report_result, undo_result, undrop_player,
    PodResult, Stage, Tournament, TournamentError,
};

fn tournament_with(id: &str, names: &[&str]) -> Tournament {
    let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let mut t = Tournament::with_id(id, "owner", "Weekly", date);
    for name in names {
        t.add_player(*name, "").unwrap();
    }
    t
}

fn points(t: &Tournament, name: &str) -> i64 {
    t.points_of(name)
}

fn open_pod(t: &Tournament) -> usize {
    t.rounds
        .last()
        .unwrap()
        .pods
        .iter()
        .position(|p| !p.result.is_reported())
        .unwrap()
}

#[test]
fn four_player_event_scores_the_win_when_the_next_round_starts() {
    let mut t = tournament_with("e2e", &["A", "B", "C", "D"]);
    assert_eq!(t.stage(), Stage::NotStarted);

    let round = next_round(&mut t).unwrap();
    assert_eq!(round.round, 1);
    assert_eq!(round.pods.len(), 1);
    assert_eq!(round.pods[0].players.len(), 4);
    assert_eq!(round.pods[0].result, PodResult::Pending);
    assert_eq!(t.stage(), Stage::RoundOpen);

    report_result(&mut t, 1, 0, PodResult::Win, Some("A")).unwrap();
    assert_eq!(t.stage(), Stage::RoundComplete);

    let round = next_round(&mut t).unwrap();
    assert_eq!(round.round, 2);
    assert_eq!(round.points_changes.iter().map(|c| c.change).sum::<i64>(), 0);
    assert_eq!(points(&t, "A"), 1300);
    for name in ["B", "C", "D"] {
        assert_eq!(points(&t, name), 900);
    }
    assert!(t.rounds[0].points_applied);

    // Round 2 walks the frozen seating with stride 2.
    let (expected, _) = build_pods(2, &t.players_for_pods, &[]);
    assert_eq!(t.rounds[1].pods[0].players, expected[0].players);
}

#[test]
fn round_one_seating_is_deterministic_per_id() {
    let names = ["Ann", "Bob", "Cid", "Dee", "Eve", "Fay", "Gus", "Hal", "Ivy"];
    let mut first = tournament_with("same-id", &names);
    let mut second = tournament_with("same-id", &names);

    next_round(&mut first).unwrap();
    next_round(&mut second).unwrap();

    assert_eq!(first.rounds[0].pods, second.rounds[0].pods);
    let sorted: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        first.players_for_pods,
        initial_seating(&sorted, seed_from_id("same-id"))
    );
}

#[test]
fn next_round_requires_three_players_and_complete_results() {
    let mut t = tournament_with("guards", &["A", "B"]);
    assert_eq!(
        next_round(&mut t).unwrap_err(),
        TournamentError::NotEnoughPlayers {
            required: 3,
            actual: 2
        }
    );

    t.add_player("C", "").unwrap();
    t.add_player("D", "").unwrap();
    next_round(&mut t).unwrap();
    assert_eq!(next_round(&mut t).unwrap_err(), TournamentError::IncompleteResults);
    assert_eq!(t.rounds.len(), 1);
}

#[test]
fn registration_closes_once_started() {
    let mut t = tournament_with("closed", &["A", "B", "C"]);
    next_round(&mut t).unwrap();
    assert_eq!(t.add_player("Late", "").unwrap_err(), TournamentError::AlreadyStarted);
    assert_eq!(t.remove_player("A").unwrap_err(), TournamentError::AlreadyStarted);
    assert_eq!(
        t.edit_player("A", "Z", "").unwrap_err(),
        TournamentError::AlreadyStarted
    );
}

#[test]
fn report_result_rejects_invalid_reports() {
    let mut t = tournament_with("report", &["A", "B", "C", "D", "E"]);
    next_round(&mut t).unwrap();
    let bye = t.rounds[0].pods.iter().position(|p| p.result == PodResult::Bye).unwrap();
    let open = open_pod(&t);
    let seated = t.rounds[0].pods[open].players[0].clone();
    let outsider = t.rounds[0].pods[bye].players[0].clone();

    assert_eq!(
        report_result(&mut t, 1, bye, PodResult::Draw, None).unwrap_err(),
        TournamentError::FixedPod
    );
    assert_eq!(
        report_result(&mut t, 1, open, PodResult::Win, None).unwrap_err(),
        TournamentError::MissingWinner
    );
    assert_eq!(
        report_result(&mut t, 1, open, PodResult::Win, Some(outsider.as_str())).unwrap_err(),
        TournamentError::WinnerNotInPod(outsider.clone())
    );
    assert_eq!(
        report_result(&mut t, 1, open, PodResult::Bye, None).unwrap_err(),
        TournamentError::InvalidResult
    );
    assert_eq!(
        report_result(&mut t, 1, 9, PodResult::Draw, None).unwrap_err(),
        TournamentError::PodNotFound { round: 1, pod: 9 }
    );
    assert_eq!(
        report_result(&mut t, 4, open, PodResult::Draw, None).unwrap_err(),
        TournamentError::RoundNotFound(4)
    );
    assert_eq!(t.rounds[0].pods[open].result, PodResult::Pending);

    report_result(&mut t, 1, open, PodResult::Win, Some(seated.as_str())).unwrap();
    assert_eq!(t.rounds[0].pods[open].winner.as_deref(), Some(seated.as_str()));
    assert_eq!(
        report_result(&mut t, 1, open, PodResult::Draw, None).unwrap_err(),
        TournamentError::AlreadyReported
    );

    next_round(&mut t).unwrap();
    assert_eq!(
        report_result(&mut t, 1, open, PodResult::Draw, None).unwrap_err(),
        TournamentError::NotLatestRound(1)
    );
}

#[test]
fn undo_result_reopens_the_pod() {
    let mut t = tournament_with("undo", &["A", "B", "C", "D"]);
    next_round(&mut t).unwrap();
    assert_eq!(undo_result(&mut t, 1, 0).unwrap_err(), TournamentError::NotReported);

    report_result(&mut t, 1, 0, PodResult::Win, Some("B")).unwrap();
    undo_result(&mut t, 1, 0).unwrap();

    let pod = &t.rounds[0].pods[0];
    assert_eq!(pod.result, PodResult::Pending);
    assert_eq!(pod.winner, None);
    assert_eq!(t.stage(), Stage::RoundOpen);
}

#[test]
fn cancel_round_restores_points_and_scoring_state() {
    let mut t = tournament_with("cancel", &["A", "B", "C", "D"]);
    next_round(&mut t).unwrap();
    report_result(&mut t, 1, 0, PodResult::Win, Some("C")).unwrap();
    next_round(&mut t).unwrap();
    assert_eq!(points(&t, "C"), 1300);

    assert_eq!(
        cancel_round(&mut t, 1).unwrap_err(),
        TournamentError::NotLatestRound(1)
    );

    let removed = cancel_round(&mut t, 2).unwrap();
    assert_eq!(removed.round, 2);
    assert_eq!(t.rounds.len(), 1);
    assert!(!t.rounds[0].points_applied);
    for name in ["A", "B", "C", "D"] {
        assert_eq!(points(&t, name), 1000);
    }

    // The restored round is scored again, once, by the next advance.
    next_round(&mut t).unwrap();
    assert_eq!(points(&t, "C"), 1300);
}

#[test]
fn cancelling_round_one_restores_byes_and_reopens_registration() {
    let mut t = tournament_with("cancel-bye", &["A", "B", "C", "D", "E"]);
    next_round(&mut t).unwrap();
    assert_eq!(t.has_had_bye.len(), 1);

    cancel_round(&mut t, 1).unwrap();

    assert!(t.has_had_bye.is_empty());
    assert!(t.players_for_pods.is_empty());
    assert_eq!(t.stage(), Stage::NotStarted);
    t.add_player("F", "").unwrap();
    assert_eq!(cancel_round(&mut t, 1).unwrap_err(), TournamentError::NoRounds);
}

#[test]
fn dropped_players_leave_the_seating_and_can_return() {
    let mut t = tournament_with("drop", &["A", "B", "C", "D", "E"]);
    assert_eq!(drop_player(&mut t, "E").unwrap_err(), TournamentError::NotStarted);
    assert_eq!(
        undrop_player(&mut t, "E").unwrap_err(),
        TournamentError::PlayerNotFound("E".to_string())
    );

    next_round(&mut t).unwrap();
    let open = open_pod(&t);
    report_result(&mut t, 1, open, PodResult::Draw, None).unwrap();
    drop_player(&mut t, "E").unwrap();
    assert_eq!(
        drop_player(&mut t, "E").unwrap_err(),
        TournamentError::PlayerNotFound("E".to_string())
    );

    next_round(&mut t).unwrap();
    assert!(t.rounds[1].pods.iter().all(|p| !p.contains("E")));
    let penalty = t.rounds[1]
        .points_changes
        .iter()
        .find(|c| c.name == "E" && c.dropped)
        .unwrap();
    assert!(penalty.change < 0);

    undrop_player(&mut t, "E").unwrap();
    assert!(t.players.iter().any(|p| p.name == "E"));
    assert!(t.dropped_players.is_empty());
}

#[test]
fn lock_requires_a_reported_final() {
    let mut t = tournament_with("lock", &["A", "B", "C"]);
    assert_eq!(lock(&mut t).unwrap_err(), TournamentError::NoRounds);
    next_round(&mut t).unwrap();
    report_result(&mut t, 1, 0, PodResult::Draw, None).unwrap();
    assert_eq!(lock(&mut t).unwrap_err(), TournamentError::NotFinal);
    assert!(!t.locked);
}
