//! Tournament business logic: seating, pods, scoring, rounds, playoffs.

mod pods;
mod rounds;
mod scoring;
mod seating;
mod top_cut;

pub use pods::{build_pods, pod_slots, PodSlot};
pub use rounds::{
    cancel_round, drop_player, lock, next_round, report_result, swiss_order, undo_result,
    undrop_player, unlock, MIN_PLAYERS,
};
pub use scoring::{
    apply_round_scoring, percent_of, revert_points, BYE_DRAW_PERCENT, FINAL_BONUS,
    SEMI_FINAL_BONUS, WIN_DROP_PERCENT,
};
pub use seating::{initial_seating, seed_from_id, seeded_shuffle};
pub use top_cut::{final_round, resolve_finalists, top_cut};
