//! Round progression: start, report, undo, cancel, drop/undrop, lock/unlock.

use crate::logic::pods::build_pods;
use crate::logic::scoring::{apply_round_scoring, revert_points};
use crate::logic::seating::{initial_seating, seed_from_id};
use crate::models::{PodResult, PointsChange, Round, Tournament, TournamentError};

/// Fewest active players that can start a round or a top cut.
pub const MIN_PLAYERS: usize = 3;

pub(crate) fn ensure_min_players(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.players.len() < MIN_PLAYERS {
        return Err(TournamentError::NotEnoughPlayers {
            required: MIN_PLAYERS,
            actual: tournament.players.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_latest_complete(tournament: &Tournament) -> Result<(), TournamentError> {
    match tournament.latest_round() {
        Some(r) if !r.is_complete() => Err(TournamentError::IncompleteResults),
        _ => Ok(()),
    }
}

/// Score the latest round unless it already was. Returns the applied deltas.
pub(crate) fn score_latest_round(tournament: &mut Tournament) -> Vec<PointsChange> {
    match tournament.rounds.len() {
        0 => Vec::new(),
        len if tournament.rounds[len - 1].points_applied => Vec::new(),
        len => apply_round_scoring(tournament, len - 1),
    }
}

/// Seating order for Swiss pods: the frozen order restricted to active players, then any
/// active player missing from it, by name.
pub fn swiss_order(tournament: &Tournament) -> Vec<String> {
    let active = |name: &str| tournament.players.iter().any(|p| p.name == name);
    let mut order: Vec<String> = tournament
        .players_for_pods
        .iter()
        .filter(|n| active(n))
        .cloned()
        .collect();
    let mut missing: Vec<String> = tournament
        .players
        .iter()
        .map(|p| p.name.clone())
        .filter(|n| !order.contains(n))
        .collect();
    missing.sort();
    order.extend(missing);
    order
}

/// Score the finished round and seat the next Swiss round.
///
/// Round 1 freezes the seating order from a seed derived from the tournament id.
pub fn next_round(tournament: &mut Tournament) -> Result<&Round, TournamentError> {
    tournament.ensure_unlocked()?;
    ensure_min_players(tournament)?;
    if tournament.top_cut.is_some() {
        return Err(TournamentError::TopCutAlreadyPerformed);
    }
    ensure_latest_complete(tournament)?;

    if !tournament.is_started() {
        let names: Vec<String> = tournament.players.iter().map(|p| p.name.clone()).collect();
        tournament.players_for_pods = initial_seating(&names, seed_from_id(&tournament.id));
    }

    let points_changes = score_latest_round(tournament);
    let round_number = tournament.rounds.len() as u32 + 1;
    let order = swiss_order(tournament);
    let prior = tournament.has_had_bye.clone();
    let (pods, history) = build_pods(round_number, &order, &prior);

    let mut round = Round::new(round_number, pods, points_changes);
    round.prior_bye_history = Some(prior);
    tournament.has_had_bye = history;
    tournament.rounds.push(round);

    log::info!("tournament {}: round {} created", tournament.id, round_number);
    Ok(&tournament.rounds[tournament.rounds.len() - 1])
}

/// Index of `round` in the round list, which must be the latest round.
fn latest_index(tournament: &Tournament, round: u32) -> Result<usize, TournamentError> {
    let idx = tournament
        .rounds
        .iter()
        .position(|r| r.round == round)
        .ok_or(TournamentError::RoundNotFound(round))?;
    if idx + 1 != tournament.rounds.len() {
        return Err(TournamentError::NotLatestRound(round));
    }
    Ok(idx)
}

/// Record a win or draw for one pod of the latest round.
pub fn report_result(
    tournament: &mut Tournament,
    round: u32,
    pod_idx: usize,
    result: PodResult,
    winner: Option<&str>,
) -> Result<(), TournamentError> {
    tournament.ensure_unlocked()?;
    let idx = latest_index(tournament, round)?;
    let pod = tournament.rounds[idx]
        .pods
        .get_mut(pod_idx)
        .ok_or(TournamentError::PodNotFound { round, pod: pod_idx })?;
    if pod.is_fixed() {
        return Err(TournamentError::FixedPod);
    }
    if pod.result.is_reported() {
        return Err(TournamentError::AlreadyReported);
    }
    match result {
        PodResult::Win => {
            let winner = winner
                .filter(|w| !w.is_empty())
                .ok_or(TournamentError::MissingWinner)?;
            if !pod.contains(winner) {
                return Err(TournamentError::WinnerNotInPod(winner.to_string()));
            }
            pod.result = PodResult::Win;
            pod.winner = Some(winner.to_string());
        }
        PodResult::Draw => {
            pod.result = PodResult::Draw;
            pod.winner = None;
        }
        _ => return Err(TournamentError::InvalidResult),
    }
    log::info!(
        "tournament {}: round {} {} reported {:?}",
        tournament.id,
        round,
        tournament.rounds[idx].pods[pod_idx].label,
        result
    );
    Ok(())
}

/// Clear the result of one pod of the latest round.
pub fn undo_result(
    tournament: &mut Tournament,
    round: u32,
    pod_idx: usize,
) -> Result<(), TournamentError> {
    tournament.ensure_unlocked()?;
    let idx = latest_index(tournament, round)?;
    let pod = tournament.rounds[idx]
        .pods
        .get_mut(pod_idx)
        .ok_or(TournamentError::PodNotFound { round, pod: pod_idx })?;
    if pod.is_fixed() {
        return Err(TournamentError::FixedPod);
    }
    if !pod.result.is_reported() {
        return Err(TournamentError::NotReported);
    }
    pod.result = PodResult::Pending;
    pod.winner = None;
    Ok(())
}

/// Remove the latest round and undo everything creating it did.
pub fn cancel_round(tournament: &mut Tournament, round: u32) -> Result<Round, TournamentError> {
    tournament.ensure_unlocked()?;
    if tournament.rounds.is_empty() {
        return Err(TournamentError::NoRounds);
    }
    latest_index(tournament, round)?;

    let removed = tournament.rounds.pop().ok_or(TournamentError::NoRounds)?;
    revert_points(tournament, &removed.points_changes);
    if let Some(prev) = tournament.rounds.last_mut() {
        prev.points_applied = false;
    }
    if let Some(prior) = &removed.prior_bye_history {
        tournament.has_had_bye = prior.clone();
    }
    if removed.is_top_cut {
        tournament.top_cut = None;
        for p in tournament
            .players
            .iter_mut()
            .chain(tournament.dropped_players.iter_mut())
        {
            p.auto_final = false;
        }
    }
    if removed.is_final {
        tournament.ended = false;
    }
    if tournament.rounds.is_empty() {
        tournament.players_for_pods.clear();
    }

    log::info!("tournament {}: round {} cancelled", tournament.id, round);
    Ok(removed)
}

/// Move an active player to the dropped list (tournament must have started).
pub fn drop_player(tournament: &mut Tournament, name: &str) -> Result<(), TournamentError> {
    tournament.ensure_unlocked()?;
    if !tournament.is_started() {
        return Err(TournamentError::NotStarted);
    }
    let idx = tournament
        .players
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))?;
    let player = tournament.players.remove(idx);
    tournament.dropped_players.push(player);
    Ok(())
}

/// Move a dropped player back to the active list.
pub fn undrop_player(tournament: &mut Tournament, name: &str) -> Result<(), TournamentError> {
    tournament.ensure_unlocked()?;
    let idx = tournament
        .dropped_players
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| TournamentError::PlayerNotFound(name.to_string()))?;
    let player = tournament.dropped_players.remove(idx);
    tournament.players.push(player);
    Ok(())
}

/// Freeze the tournament once the final is reported, scoring the final exactly once.
pub fn lock(tournament: &mut Tournament) -> Result<(), TournamentError> {
    tournament.ensure_unlocked()?;
    let last = tournament.latest_round().ok_or(TournamentError::NoRounds)?;
    if !last.is_final_round() {
        return Err(TournamentError::NotFinal);
    }
    if !last.is_complete() {
        return Err(TournamentError::IncompleteResults);
    }
    let idx = tournament.rounds.len() - 1;
    if !tournament.rounds[idx].points_applied {
        let changes = apply_round_scoring(tournament, idx);
        tournament.rounds[idx].final_points_changes = changes;
    }
    tournament.locked = true;
    log::info!("tournament {} locked", tournament.id);
    Ok(())
}

/// Reopen a locked tournament, reverting the final's scoring.
pub fn unlock(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.locked {
        return Err(TournamentError::NotLocked);
    }
    let mut reverted = Vec::new();
    if let Some(last) = tournament.rounds.last_mut() {
        if last.is_final_round() && last.points_applied {
            reverted = std::mem::take(&mut last.final_points_changes);
            last.points_applied = false;
        }
    }
    revert_points(tournament, &reverted);
    tournament.locked = false;
    log::info!("tournament {} unlocked", tournament.id);
    Ok(())
}
