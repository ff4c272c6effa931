//! Pod tournament organizer: library with models, pairing/scoring logic and the command service.

pub mod config;
pub mod logic;
pub mod models;
pub mod roster;
pub mod service;

pub use logic::{
    cancel_round, drop_player, final_round, lock, next_round, report_result, top_cut,
    undo_result, undrop_player, unlock,
};
pub use models::{
    ErrorKind, Player, Pod, PodResult, PointsChange, Round, RoundLabel, Stage, TopCut, Tournament,
    TournamentError, TournamentId, UserId,
};
pub use service::{Command, MemoryStore, StaticIdentity, SubscriberRegistry, TournamentService};
