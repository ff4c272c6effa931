//! Tournament, TopCut, Stage and TournamentError.

use crate::models::player::Player;
use crate::models::pod::Round;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable category of a [`TournamentError`], for callers mapping errors to responses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Missing or malformed input.
    Validation,
    /// Caller does not own the tournament.
    Authorization,
    /// The tournament is not in a state that allows the operation.
    Precondition,
    /// Tournament, round, pod or player absent.
    NotFound,
    /// The persistence collaborator failed.
    Storage,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A required field was empty.
    MissingField(&'static str),
    /// Another player already uses this name (case-insensitive).
    DuplicatePlayerName(String),
    /// Only win or draw can be reported.
    InvalidResult,
    /// A win was reported without a winner.
    MissingWinner,
    /// The reported winner is not seated in the pod.
    WinnerNotInPod(String),
    /// Top-cut counts are zero or exceed the number of players.
    InvalidTopCut { requested: usize, available: usize },
    /// Credential unknown or caller is not the owner.
    NotAuthorized,
    /// Tournament is locked.
    Locked,
    /// Tournament is not locked.
    NotLocked,
    /// Players can only be registered, edited or removed before round 1.
    AlreadyStarted,
    /// Players can only be dropped once round 1 exists.
    NotStarted,
    /// Fewer than the required number of active players.
    NotEnoughPlayers { required: usize, actual: usize },
    /// The latest round still has unreported pods.
    IncompleteResults,
    /// Operation only applies to the latest round.
    NotLatestRound(u32),
    /// There are no rounds.
    NoRounds,
    /// The pod is a bye or auto-final pod.
    FixedPod,
    /// The pod already has a result.
    AlreadyReported,
    /// The pod has no result to undo.
    NotReported,
    TopCutAlreadyPerformed,
    TopCutNotPerformed,
    /// Latest round is not the semi-final.
    NotSemiFinal,
    /// Latest round is not the final.
    NotFinal,
    NotEnoughFinalists(usize),
    TournamentNotFound(String),
    RoundNotFound(u32),
    PodNotFound { round: u32, pod: usize },
    PlayerNotFound(String),
    /// Store failure, with the collaborator's message.
    Storage(String),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            MissingField(_)
            | DuplicatePlayerName(_)
            | InvalidResult
            | MissingWinner
            | WinnerNotInPod(_)
            | InvalidTopCut { .. } => ErrorKind::Validation,
            NotAuthorized => ErrorKind::Authorization,
            TournamentNotFound(_) | RoundNotFound(_) | PodNotFound { .. } | PlayerNotFound(_) => {
                ErrorKind::NotFound
            }
            Storage(_) => ErrorKind::Storage,
            _ => ErrorKind::Precondition,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::MissingField(field) => write!(f, "Missing required field: {}", field),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named {} already exists", name)
            }
            TournamentError::InvalidResult => write!(f, "Invalid result"),
            TournamentError::MissingWinner => write!(f, "Missing winner"),
            TournamentError::WinnerNotInPod(name) => write!(f, "{} is not in this pod", name),
            TournamentError::InvalidTopCut { requested, available } => write!(
                f,
                "Top cut needs {} players but only {} are active",
                requested, available
            ),
            TournamentError::NotAuthorized => write!(f, "Not authorized"),
            TournamentError::Locked => write!(f, "Tournament is locked and cannot be modified"),
            TournamentError::NotLocked => write!(f, "Tournament is not locked"),
            TournamentError::AlreadyStarted => {
                write!(f, "Players cannot be changed once the tournament has started")
            }
            TournamentError::NotStarted => {
                write!(f, "Cannot drop players before tournament starts")
            }
            TournamentError::NotEnoughPlayers { required, actual } => write!(
                f,
                "Need at least {} players to create a round (have {})",
                required, actual
            ),
            TournamentError::IncompleteResults => {
                write!(f, "All pod results must be reported first")
            }
            TournamentError::NotLatestRound(round) => {
                write!(f, "Round {} is not the latest round", round)
            }
            TournamentError::NoRounds => write!(f, "No rounds"),
            TournamentError::FixedPod => write!(f, "Invalid pod"),
            TournamentError::AlreadyReported => write!(f, "Result already reported"),
            TournamentError::NotReported => write!(f, "No result to undo"),
            TournamentError::TopCutAlreadyPerformed => write!(f, "Top cut already performed"),
            TournamentError::TopCutNotPerformed => write!(f, "Top cut not performed"),
            TournamentError::NotSemiFinal => write!(f, "Last round is not the semi-final"),
            TournamentError::NotFinal => write!(f, "Final round not found"),
            TournamentError::NotEnoughFinalists(n) => {
                write!(f, "Not enough finalists to create final round ({})", n)
            }
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::RoundNotFound(round) => write!(f, "Round {} not found", round),
            TournamentError::PodNotFound { round, pod } => {
                write!(f, "Pod {} not found in round {}", pod, round)
            }
            TournamentError::PlayerNotFound(name) => write!(f, "Player {} not found", name),
            TournamentError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Opaque tournament identifier (a v4 UUID string for new tournaments).
pub type TournamentId = String;

/// Stable external user id supplied by the identity provider.
pub type UserId = String;

/// Players selected by the top cut.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCut {
    pub auto_final_count: usize,
    pub semi_final_count: usize,
    pub auto_final_players: Vec<String>,
    pub semi_final_players: Vec<String>,
}

/// Where the tournament is in its lifecycle, derived from the rounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// No rounds yet; registration is open.
    NotStarted,
    /// The latest round has unreported pods.
    RoundOpen,
    /// Every pod of the latest round is reported.
    RoundComplete,
    /// Results and scores are frozen.
    Locked,
}

/// Full tournament snapshot as stored and exchanged with callers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    /// Owner's user id.
    #[serde(rename = "user")]
    pub owner: UserId,
    #[serde(default)]
    pub username: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub dropped_players: Vec<Player>,
    /// Seating order frozen when round 1 is created.
    #[serde(default)]
    pub players_for_pods: Vec<String>,
    /// Players who already had a bye in the current cycle.
    #[serde(default)]
    pub has_had_bye: Vec<String>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_cut: Option<TopCut>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub ended: bool,
    #[serde(default)]
    pub hide_scores: bool,
    #[serde(default)]
    pub hide_decklists: bool,
}

impl Tournament {
    /// Create an empty tournament with a fresh id.
    pub fn new(owner: impl Into<UserId>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), owner, title, date)
    }

    /// Create an empty tournament with a caller-chosen id.
    pub fn with_id(
        id: impl Into<TournamentId>,
        owner: impl Into<UserId>,
        title: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            username: String::new(),
            title: title.into(),
            date,
            players: Vec::new(),
            dropped_players: Vec::new(),
            players_for_pods: Vec::new(),
            has_had_bye: Vec::new(),
            rounds: Vec::new(),
            top_cut: None,
            locked: false,
            ended: false,
            hide_scores: false,
            hide_decklists: false,
        }
    }

    pub fn is_started(&self) -> bool {
        !self.rounds.is_empty()
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> Stage {
        if self.locked {
            return Stage::Locked;
        }
        match self.latest_round() {
            None => Stage::NotStarted,
            Some(r) if r.is_complete() => Stage::RoundComplete,
            Some(_) => Stage::RoundOpen,
        }
    }

    pub fn ensure_unlocked(&self) -> Result<(), TournamentError> {
        if self.locked {
            return Err(TournamentError::Locked);
        }
        Ok(())
    }

    /// Active or dropped player by exact name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players
            .iter()
            .chain(self.dropped_players.iter())
            .find(|p| p.name == name)
    }

    /// Mutable active or dropped player by exact name.
    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players
            .iter_mut()
            .chain(self.dropped_players.iter_mut())
            .find(|p| p.name == name)
    }

    /// Current points of a player, or the starting value for unknown names.
    pub fn points_of(&self, name: &str) -> i64 {
        self.player(name)
            .map(Player::points)
            .unwrap_or(crate::models::player::STARTING_POINTS)
    }

    fn name_taken(&self, name: &str, except: Option<&str>) -> bool {
        self.players
            .iter()
            .chain(self.dropped_players.iter())
            .filter(|p| Some(p.name.as_str()) != except)
            .any(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn ensure_registration_open(&self) -> Result<(), TournamentError> {
        self.ensure_unlocked()?;
        if self.is_started() {
            return Err(TournamentError::AlreadyStarted);
        }
        Ok(())
    }

    /// Register a player (only before round 1). Names must be unique, case-insensitive.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        deck: impl Into<String>,
    ) -> Result<(), TournamentError> {
        self.ensure_registration_open()?;
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::MissingField("playerName"));
        }
        if self.name_taken(name, None) {
            return Err(TournamentError::DuplicatePlayerName(name.to_string()));
        }
        let deck = deck.into();
        self.players.push(Player::new(name, deck.trim()));
        Ok(())
    }

    /// Rename a player and replace their deck link (only before round 1).
    pub fn edit_player(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_deck: &str,
    ) -> Result<(), TournamentError> {
        self.ensure_registration_open()?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(TournamentError::MissingField("newName"));
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.name == old_name)
            .ok_or_else(|| TournamentError::PlayerNotFound(old_name.to_string()))?;
        if self.name_taken(new_name, Some(old_name)) {
            return Err(TournamentError::DuplicatePlayerName(new_name.to_string()));
        }
        let player = &mut self.players[idx];
        player.name = new_name.to_string();
        player.deck = new_deck.trim().to_string();
        Ok(())
    }

    /// Remove a player by name (only before round 1).
    pub fn remove_player(&mut self, name: &str) -> Result<(), TournamentError> {
        self.ensure_registration_open()?;
        let idx = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Change title and date.
    pub fn edit_details(&mut self, title: &str, date: NaiveDate) -> Result<(), TournamentError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TournamentError::MissingField("title"));
        }
        self.title = title.to_string();
        self.date = date;
        Ok(())
    }

    /// Toggle what spectators may see.
    pub fn set_visibility(&mut self, hide_scores: bool, hide_decklists: bool) {
        self.hide_scores = hide_scores;
        self.hide_decklists = hide_decklists;
    }

    /// Active players sorted by points descending, ties by name.
    pub fn standings(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| b.points().cmp(&a.points()).then_with(|| a.name.cmp(&b.name)));
        sorted
    }
}
