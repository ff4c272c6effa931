//! Plays a whole tournament from a roster file with seeded random results.
//! Run with: cargo run --bin run_event -- roster.csv
//! Tune with env: ROUNDS, AUTO_FINAL, SEMI_FINAL, RESULT_SEED, NOTIFY_CAPACITY.

use pod_tournament::config::RunnerConfig;
use pod_tournament::roster::load_roster;
use pod_tournament::{
    Command, MemoryStore, PodResult, StaticIdentity, SubscriberRegistry, Tournament,
    TournamentService,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::Path;

const ORGANIZER: &str = "organizer";

/// Report every open pod of the latest round: one in six is a draw, otherwise a random winner.
async fn report_open_pods(
    service: &TournamentService<MemoryStore>,
    tournament: &Tournament,
    rng: &mut StdRng,
) -> Result<Tournament, Box<dyn Error>> {
    let mut current = tournament.clone();
    let Some(round) = tournament.rounds.last() else {
        return Ok(current);
    };
    for (idx, pod) in round.pods.iter().enumerate() {
        if pod.result.is_reported() {
            continue;
        }
        let command = if rng.gen_ratio(1, 6) {
            Command::ReportResult {
                round: round.round,
                pod: idx,
                result: PodResult::Draw,
                winner: None,
            }
        } else {
            Command::ReportResult {
                round: round.round,
                pod: idx,
                result: PodResult::Win,
                winner: pod.players.choose(rng).cloned(),
            }
        };
        current = service.execute(ORGANIZER, &tournament.id, command).await?;
    }
    Ok(current)
}

fn log_standings(tournament: &Tournament) {
    for (place, player) in tournament.standings().iter().enumerate() {
        log::info!("{:>3}. {:<24} {:>6} pts", place + 1, player.name, player.points());
    }
    for player in &tournament.dropped_players {
        log::info!("     {:<24} {:>6} pts (dropped)", player.name, player.points());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: run_event <roster.csv>")?;
    let config = RunnerConfig::from_env();
    let roster = load_roster(Path::new(&path))?;
    log::info!("Loaded {} players from {}", roster.len(), path);

    let service = TournamentService::new(
        MemoryStore::new(),
        StaticIdentity::new().with_token(ORGANIZER, ORGANIZER),
        SubscriberRegistry::new(config.notify_capacity),
    );
    let today = chrono::Local::now().date_naive();
    let created = service.create(ORGANIZER, ORGANIZER, "Roster event", today).await?;
    let id = created.id.clone();
    let mut changes = service.subscribe(&id);

    for entry in roster {
        let command = Command::AddPlayer {
            name: entry.name,
            deck: entry.deck,
        };
        if let Err(e) = service.execute(ORGANIZER, &id, command).await {
            log::warn!("Skipping roster entry: {}", e);
        }
    }

    log::info!("{} players registered", service.get(&id)?.players.len());

    let mut rng = StdRng::seed_from_u64(config.result_seed);
    for _ in 0..config.swiss_rounds {
        let opened = service.execute(ORGANIZER, &id, Command::NextRound).await?;
        report_open_pods(&service, &opened, &mut rng).await?;
    }

    let cut = service
        .execute(
            ORGANIZER,
            &id,
            Command::TopCut {
                auto_final_count: config.auto_final,
                semi_final_count: config.semi_final,
            },
        )
        .await?;
    report_open_pods(&service, &cut, &mut rng).await?;
    let finals = service.execute(ORGANIZER, &id, Command::Final).await?;

    // A final must have a winner before it can be locked.
    let final_round = finals.rounds.last().ok_or("final round missing")?;
    let winner = final_round
        .pods
        .first()
        .and_then(|pod| pod.players.choose(&mut rng).cloned());
    service
        .execute(
            ORGANIZER,
            &id,
            Command::ReportResult {
                round: final_round.round,
                pod: 0,
                result: PodResult::Win,
                winner: winner.clone(),
            },
        )
        .await?;
    let tournament = service.execute(ORGANIZER, &id, Command::Lock).await?;

    let mut notices = 0;
    while changes.try_changed().is_some() {
        notices += 1;
    }
    log::info!(
        "Winner: {} after {} rounds ({} change notices)",
        winner.unwrap_or_default(),
        tournament.rounds.len(),
        notices
    );
    log_standings(&tournament);
    Ok(())
}
