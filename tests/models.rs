//! Serialization shape of stored tournaments and registration rules.

use chrono::NaiveDate;
use pod_tournament::{Player, Pod, PodResult, Round, Stage, Tournament, TournamentError};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[test]
fn tournament_serializes_with_camel_case_keys() {
    let mut t = Tournament::with_id("t-1", "user-9", "League night", date());
    t.add_player("Ann", "https://decks.example/ann").unwrap();
    t.hide_scores = true;

    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["user"], "user-9");
    assert_eq!(json["date"], "2025-03-14");
    assert_eq!(json["hideScores"], true);
    assert!(json.get("playersForPods").is_some());
    assert!(json.get("hasHadBye").is_some());
    assert!(json.get("topCut").is_none());
    assert_eq!(json["players"][0]["points"], 1000);

    let back: Tournament = serde_json::from_value(json).unwrap();
    assert_eq!(back, t);
}

#[test]
fn legacy_players_and_empty_winners_are_normalized() {
    let players: Vec<Player> =
        serde_json::from_str(r#"["Ann", {"name": "Bob", "points": 950, "autoFinal": true}]"#)
            .unwrap();
    assert_eq!(
        players[0],
        Player {
            name: "Ann".into(),
            deck: String::new(),
            points: None,
            auto_final: false,
        }
    );
    assert_eq!(players[0].points(), 1000);
    assert_eq!(players[1].points(), 950);
    assert!(players[1].auto_final);

    let pod: Pod =
        serde_json::from_str(r#"{"label": "Pod 1", "players": ["Ann"], "result": "", "winner": ""}"#)
            .unwrap();
    assert_eq!(pod.result, PodResult::Pending);
    assert_eq!(pod.winner, None);

    let round: Round = serde_json::from_str(
        r#"{"round": 2, "label": "Semi-Final", "pods": [], "isTopCut": true}"#,
    )
    .unwrap();
    assert!(round.is_top_cut);
    assert!(round.points_changes.is_empty());
    assert!(!round.points_applied);
}

#[test]
fn pod_results_use_their_stored_names() {
    assert_eq!(serde_json::to_string(&PodResult::AutoFinal).unwrap(), "\"auto-final\"");
    assert_eq!(serde_json::to_string(&PodResult::Pending).unwrap(), "\"\"");
    assert_eq!(
        serde_json::from_str::<PodResult>("\"draw\"").unwrap(),
        PodResult::Draw
    );
}

#[test]
fn player_names_are_trimmed_and_unique_ignoring_case() {
    let mut t = Tournament::with_id("reg", "owner", "Registration", date());
    t.add_player("  Ann ", "").unwrap();
    assert_eq!(t.players[0].name, "Ann");
    assert_eq!(
        t.add_player("ann", "").unwrap_err(),
        TournamentError::DuplicatePlayerName("ann".into())
    );
    assert_eq!(
        t.add_player("   ", "").unwrap_err(),
        TournamentError::MissingField("playerName")
    );

    t.add_player("Bob", "").unwrap();
    assert_eq!(
        t.edit_player("Nobody", "Ann", "").unwrap_err(),
        TournamentError::PlayerNotFound("Nobody".into())
    );
    assert_eq!(
        t.edit_player("Bob", "ANN", "").unwrap_err(),
        TournamentError::DuplicatePlayerName("ANN".into())
    );
    t.edit_player("Bob", "Rob", "https://decks.example/rob").unwrap();
    assert_eq!(t.player("Rob").unwrap().deck, "https://decks.example/rob");
    assert_eq!(
        t.remove_player("Bob").unwrap_err(),
        TournamentError::PlayerNotFound("Bob".into())
    );
    t.remove_player("Rob").unwrap();
    assert_eq!(t.players.len(), 1);
    assert_eq!(t.stage(), Stage::NotStarted);
}

#[test]
fn standings_order_by_points_then_name() {
    let mut t = Tournament::with_id("standings", "owner", "Standings", date());
    for (name, pts) in [("Cid", 1100), ("Bob", 1200), ("Ann", 1100)] {
        t.add_player(name, "").unwrap();
        t.player_mut(name).unwrap().points = Some(pts);
    }
    let order: Vec<&str> = t.standings().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, vec!["Bob", "Ann", "Cid"]);
}

#[test]
fn locked_final_from_older_records_keeps_its_bonus_revertible() {
    let round: Round = serde_json::from_str(
        r#"{
            "round": 3,
            "label": "Final",
            "isFinal": true,
            "pointsApplied": true,
            "pods": [{"label": "Final", "players": ["A", "B"], "result": "win", "winner": "A"}],
            "pointsChanges": [{"name": "A", "change": 2000}]
        }"#,
    )
    .unwrap();
    assert!(round.points_changes.is_empty());
    assert_eq!(round.final_points_changes.len(), 1);
    assert_eq!(round.final_points_changes[0].change, 2000);

    // A draw final written with the field present stays as written.
    let round: Round = serde_json::from_str(
        r#"{
            "round": 3,
            "label": "Final",
            "pointsApplied": true,
            "pods": [],
            "pointsChanges": [{"name": "A", "change": 1000}],
            "finalPointsChanges": []
        }"#,
    )
    .unwrap();
    assert_eq!(round.points_changes.len(), 1);
    assert!(round.final_points_changes.is_empty());
}
