//! Points engine: per-round deltas and their reversal.

use crate::models::{PodResult, PointsChange, RoundLabel, Tournament};

/// Bonus for a bye, and the per-member loss on a draw, in percent.
pub const BYE_DRAW_PERCENT: i64 = 5;
/// Share of each loser's points taken by the winner, and the dropped-player penalty, in percent.
pub const WIN_DROP_PERCENT: i64 = 10;
/// Flat bonus for reaching the final from the semi-final round.
pub const SEMI_FINAL_BONUS: i64 = 1000;
/// Flat bonus for winning the final.
pub const FINAL_BONUS: i64 = 2000;

/// `percent`% of `points`, rounded half away from zero.
pub fn percent_of(points: i64, percent: i64) -> i64 {
    let scaled = points * percent;
    let rounded = (scaled.abs() + 50) / 100;
    if scaled < 0 {
        -rounded
    } else {
        rounded
    }
}

/// Score the round at `round_index`, update players in place and mark it applied.
///
/// Returns the deltas, in application order, so they can be reverted later.
/// Must run at most once per round.
pub fn apply_round_scoring(tournament: &mut Tournament, round_index: usize) -> Vec<PointsChange> {
    let Some(round) = tournament.rounds.get(round_index) else {
        return Vec::new();
    };
    let label = round.label;
    let pods = round.pods.clone();
    let mut changes = Vec::new();

    let mut credit = |t: &mut Tournament, change: PointsChange| {
        if let Some(p) = t.player_mut(&change.name) {
            p.add_points(change.change);
            changes.push(change);
        }
    };

    match label {
        Some(RoundLabel::SemiFinal) => {
            for pod in &pods {
                match (pod.result, &pod.winner) {
                    (PodResult::AutoFinal, _) => {
                        for name in &pod.players {
                            credit(tournament, PointsChange::new(name, SEMI_FINAL_BONUS));
                        }
                    }
                    (PodResult::Win, Some(winner)) => {
                        credit(tournament, PointsChange::new(winner, SEMI_FINAL_BONUS));
                    }
                    _ => {}
                }
            }
        }
        Some(RoundLabel::Final) => {
            for pod in &pods {
                if let (PodResult::Win, Some(winner)) = (pod.result, &pod.winner) {
                    credit(tournament, PointsChange::new(winner, FINAL_BONUS));
                }
            }
        }
        None => {
            for pod in &pods {
                match (pod.result, &pod.winner) {
                    (PodResult::Bye, _) => {
                        for name in &pod.players {
                            let gain = percent_of(tournament.points_of(name), BYE_DRAW_PERCENT);
                            credit(tournament, PointsChange::new(name, gain));
                        }
                    }
                    (PodResult::Win, Some(winner)) => {
                        let mut stolen = 0;
                        for name in pod.players.iter().filter(|n| *n != winner) {
                            if tournament.player(name).is_none() {
                                continue;
                            }
                            let loss = percent_of(tournament.points_of(name), WIN_DROP_PERCENT);
                            credit(tournament, PointsChange::new(name, -loss));
                            stolen += loss;
                        }
                        credit(tournament, PointsChange::new(winner, stolen));
                    }
                    (PodResult::Draw, _) => {
                        for name in &pod.players {
                            let loss = percent_of(tournament.points_of(name), BYE_DRAW_PERCENT);
                            credit(tournament, PointsChange::new(name, -loss));
                        }
                    }
                    _ => {}
                }
            }

            let dropped: Vec<String> =
                tournament.dropped_players.iter().map(|p| p.name.clone()).collect();
            for name in dropped {
                let loss = percent_of(tournament.points_of(&name), WIN_DROP_PERCENT);
                credit(
                    tournament,
                    PointsChange {
                        name,
                        change: -loss,
                        dropped: true,
                    },
                );
            }
        }
    }

    tournament.rounds[round_index].points_applied = true;
    log::debug!(
        "scored round {} of tournament {}: {} changes",
        round_index + 1,
        tournament.id,
        changes.len()
    );
    changes
}

/// Subtract previously applied deltas.
pub fn revert_points(tournament: &mut Tournament, changes: &[PointsChange]) {
    for change in changes {
        if let Some(p) = tournament.player_mut(&change.name) {
            p.add_points(-change.change);
        }
    }
}
