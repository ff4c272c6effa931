//! Data structures for pod tournaments: players, pods, rounds, tournament state.

mod player;
mod pod;
mod tournament;

pub use player::{Player, STARTING_POINTS};
pub use pod::{Pod, PodResult, PointsChange, Round, RoundLabel, AUTO_FINAL_LABEL, BYE_LABEL};
pub use tournament::{
    ErrorKind, Stage, TopCut, Tournament, TournamentError, TournamentId, UserId,
};
