//! Roster CSV import.

use pod_tournament::roster::{read_roster, PlayerEntry, RosterError};

#[test]
fn reads_trimmed_entries_with_optional_decks() {
    let csv = "name,deck\n  Ann , https://decks.example/ann\nBob,\n";
    let entries = read_roster(csv.as_bytes()).unwrap();
    assert_eq!(
        entries,
        vec![
            PlayerEntry {
                name: "Ann".into(),
                deck: "https://decks.example/ann".into(),
            },
            PlayerEntry {
                name: "Bob".into(),
                deck: String::new(),
            },
        ]
    );
}

#[test]
fn empty_name_reports_its_line() {
    let csv = "name,deck\nAnn,a\n   ,b\n";
    match read_roster(csv.as_bytes()) {
        Err(RosterError::EmptyName { line }) => assert_eq!(line, 3),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn header_only_roster_is_empty() {
    assert!(read_roster("name,deck\n".as_bytes()).unwrap().is_empty());
}
