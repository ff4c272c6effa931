//! Playoffs: top cut into a semi-final round, then the final.

use crate::logic::rounds::{ensure_latest_complete, ensure_min_players, score_latest_round};
use crate::logic::scoring::revert_points;
use crate::models::{
    Pod, PodResult, Round, RoundLabel, TopCut, Tournament, TournamentError, AUTO_FINAL_LABEL,
};
use std::collections::HashSet;

/// Players per semi-final pod.
const SEMI_FINAL_POD_SIZE: usize = 4;

/// Score the latest round, then seat the top of the standings into a semi-final round.
///
/// The first `auto_final_count` players skip straight to the final; the next
/// `semi_final_count` play semi-final pods of 4 in standings order.
pub fn top_cut(
    tournament: &mut Tournament,
    auto_final_count: usize,
    semi_final_count: usize,
) -> Result<&Round, TournamentError> {
    tournament.ensure_unlocked()?;
    ensure_min_players(tournament)?;
    if tournament.top_cut.is_some() {
        return Err(TournamentError::TopCutAlreadyPerformed);
    }
    // Saturates so absurd counts fail the range check below.
    let requested = auto_final_count.saturating_add(semi_final_count);
    if requested == 0 || requested > tournament.players.len() {
        return Err(TournamentError::InvalidTopCut {
            requested,
            available: tournament.players.len(),
        });
    }
    ensure_latest_complete(tournament)?;

    let points_changes = score_latest_round(tournament);

    let standings: Vec<String> = tournament
        .standings()
        .into_iter()
        .map(|p| p.name.clone())
        .collect();
    let auto_final_players: Vec<String> = standings[..auto_final_count].to_vec();
    let semi_final_players: Vec<String> = standings[auto_final_count..requested].to_vec();

    for p in tournament.players.iter_mut() {
        if auto_final_players.contains(&p.name) {
            p.auto_final = true;
        }
    }

    let mut pods: Vec<Pod> = semi_final_players
        .chunks(SEMI_FINAL_POD_SIZE)
        .enumerate()
        .map(|(i, chunk)| Pod::new(format!("Pod {}", i + 1), chunk.to_vec()))
        .collect();
    if !auto_final_players.is_empty() {
        pods.push(Pod {
            result: PodResult::AutoFinal,
            ..Pod::new(AUTO_FINAL_LABEL, auto_final_players.clone())
        });
    }

    let round_number = tournament.rounds.len() as u32 + 1;
    let mut round = Round::new(round_number, pods, points_changes);
    round.label = Some(RoundLabel::SemiFinal);
    round.is_top_cut = true;
    tournament.rounds.push(round);
    tournament.top_cut = Some(TopCut {
        auto_final_count,
        semi_final_count,
        auto_final_players,
        semi_final_players,
    });

    log::info!(
        "tournament {}: top cut {} auto-final, {} semi-final",
        tournament.id,
        auto_final_count,
        semi_final_count
    );
    Ok(&tournament.rounds[tournament.rounds.len() - 1])
}

/// Finalists after the semi-final: auto-qualified players, then one per semi-final pod.
///
/// A pod contributes its reported winner, or else its member with the most points who is
/// not already a finalist (ties by name).
pub fn resolve_finalists(tournament: &Tournament, semi_final: &Round) -> Vec<String> {
    let mut finalists: Vec<String> = tournament
        .top_cut
        .as_ref()
        .map(|tc| tc.auto_final_players.clone())
        .unwrap_or_default();
    let mut seen: HashSet<String> = finalists.iter().cloned().collect();

    for pod in semi_final.pods.iter().filter(|p| p.result != PodResult::AutoFinal) {
        let pick = match (pod.result, &pod.winner) {
            (PodResult::Win, Some(winner)) if !seen.contains(winner) => Some(winner.clone()),
            _ => pod
                .players
                .iter()
                .filter(|n| !seen.contains(*n))
                .max_by(|a, b| {
                    tournament
                        .points_of(a)
                        .cmp(&tournament.points_of(b))
                        .then_with(|| b.cmp(a))
                })
                .cloned(),
        };
        if let Some(name) = pick {
            seen.insert(name.clone());
            finalists.push(name);
        }
    }
    finalists
}

/// Score the semi-final and create the single-pod final round.
pub fn final_round(tournament: &mut Tournament) -> Result<&Round, TournamentError> {
    tournament.ensure_unlocked()?;
    if tournament.top_cut.is_none() {
        return Err(TournamentError::TopCutNotPerformed);
    }
    match tournament.latest_round() {
        None => return Err(TournamentError::NoRounds),
        Some(r) if !r.is_top_cut => return Err(TournamentError::NotSemiFinal),
        Some(_) => {}
    }

    let semi_idx = tournament.rounds.len() - 1;
    let was_applied = tournament.rounds[semi_idx].points_applied;
    let points_changes = score_latest_round(tournament);
    let finalists = resolve_finalists(tournament, &tournament.rounds[semi_idx]);
    if finalists.len() < 2 {
        revert_points(tournament, &points_changes);
        tournament.rounds[semi_idx].points_applied = was_applied;
        return Err(TournamentError::NotEnoughFinalists(finalists.len()));
    }

    let round_number = tournament.rounds.len() as u32 + 1;
    let mut round = Round::new(round_number, vec![Pod::new("Final", finalists)], points_changes);
    round.label = Some(RoundLabel::Final);
    round.is_final = true;
    tournament.rounds.push(round);
    tournament.ended = true;

    log::info!("tournament {}: final created", tournament.id);
    Ok(&tournament.rounds[tournament.rounds.len() - 1])
}
