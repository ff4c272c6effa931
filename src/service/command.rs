//! Commands accepted by the service, one per state transition.

use crate::logic;
use crate::models::{PodResult, Tournament, TournamentError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A mutation requested by the organizer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    AddPlayer {
        name: String,
        #[serde(default)]
        deck: String,
    },
    EditPlayer {
        old_name: String,
        new_name: String,
        #[serde(default)]
        new_deck: String,
    },
    RemovePlayer {
        name: String,
    },
    EditDetails {
        title: String,
        date: NaiveDate,
    },
    SetVisibility {
        hide_scores: bool,
        hide_decklists: bool,
    },
    NextRound,
    ReportResult {
        round: u32,
        pod: usize,
        result: PodResult,
        #[serde(default)]
        winner: Option<String>,
    },
    UndoResult {
        round: u32,
        pod: usize,
    },
    CancelRound {
        round: u32,
    },
    DropPlayer {
        name: String,
    },
    UndropPlayer {
        name: String,
    },
    TopCut {
        auto_final_count: usize,
        semi_final_count: usize,
    },
    Final,
    Lock,
    Unlock,
}

fn require(value: &str, field: &'static str) -> Result<(), TournamentError> {
    if value.trim().is_empty() {
        return Err(TournamentError::MissingField(field));
    }
    Ok(())
}

fn require_round(round: u32) -> Result<(), TournamentError> {
    if round == 0 {
        return Err(TournamentError::MissingField("round"));
    }
    Ok(())
}

impl Command {
    /// Input checks that need no tournament state.
    pub fn validate(&self) -> Result<(), TournamentError> {
        match self {
            Command::AddPlayer { name, .. }
            | Command::RemovePlayer { name }
            | Command::DropPlayer { name }
            | Command::UndropPlayer { name } => require(name, "playerName"),
            Command::EditPlayer {
                old_name, new_name, ..
            } => {
                require(old_name, "oldName")?;
                require(new_name, "newName")
            }
            Command::EditDetails { title, .. } => require(title, "title"),
            Command::ReportResult {
                round,
                result,
                winner,
                ..
            } => {
                require_round(*round)?;
                match result {
                    PodResult::Win if winner.as_deref().map_or(true, str::is_empty) => {
                        Err(TournamentError::MissingWinner)
                    }
                    PodResult::Win | PodResult::Draw => Ok(()),
                    _ => Err(TournamentError::InvalidResult),
                }
            }
            Command::UndoResult { round, .. } | Command::CancelRound { round } => {
                require_round(*round)
            }
            Command::SetVisibility { .. }
            | Command::NextRound
            | Command::TopCut { .. }
            | Command::Final
            | Command::Lock
            | Command::Unlock => Ok(()),
        }
    }

    /// Run the transition against `tournament`.
    pub fn apply(&self, tournament: &mut Tournament) -> Result<(), TournamentError> {
        match self {
            Command::AddPlayer { name, deck } => tournament.add_player(name.as_str(), deck.as_str()),
            Command::EditPlayer {
                old_name,
                new_name,
                new_deck,
            } => tournament.edit_player(old_name, new_name, new_deck),
            Command::RemovePlayer { name } => tournament.remove_player(name),
            Command::EditDetails { title, date } => tournament.edit_details(title, *date),
            Command::SetVisibility {
                hide_scores,
                hide_decklists,
            } => {
                tournament.set_visibility(*hide_scores, *hide_decklists);
                Ok(())
            }
            Command::NextRound => logic::next_round(tournament).map(|_| ()),
            Command::ReportResult {
                round,
                pod,
                result,
                winner,
            } => logic::report_result(tournament, *round, *pod, *result, winner.as_deref()),
            Command::UndoResult { round, pod } => logic::undo_result(tournament, *round, *pod),
            Command::CancelRound { round } => logic::cancel_round(tournament, *round).map(|_| ()),
            Command::DropPlayer { name } => logic::drop_player(tournament, name),
            Command::UndropPlayer { name } => logic::undrop_player(tournament, name),
            Command::TopCut {
                auto_final_count,
                semi_final_count,
            } => logic::top_cut(tournament, *auto_final_count, *semi_final_count).map(|_| ()),
            Command::Final => logic::final_round(tournament).map(|_| ()),
            Command::Lock => logic::lock(tournament),
            Command::Unlock => logic::unlock(tournament),
        }
    }
}
