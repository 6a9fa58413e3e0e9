//! Headless season runner
//!
//! Plays a full season on a simulated clock and prints every round's finish
//! order followed by the grand final table.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use derby_sim::core::{HorseId, RaceConfig, RaceError, Result, RoundId};
use derby_sim::race::{ordinal, SimClock};
use derby_sim::store::GameStore;

/// Upper bound on simulated time for a single race
const MAX_RACE_MS: u64 = 10 * 60 * 1000;

/// Derby Sim - run a horse racing season
#[derive(Parser, Debug)]
#[command(name = "derby-sim")]
#[command(about = "Simulate a multi-round horse racing season")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Override the horse pool size
    #[arg(long)]
    horses: Option<usize>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct Finisher {
    place: usize,
    horse_id: String,
    name: String,
}

#[derive(Serialize)]
struct RoundReport {
    round: u32,
    distance: u32,
    track: String,
    finishers: Vec<Finisher>,
}

#[derive(Serialize)]
struct StandingLine {
    position: usize,
    horse_id: String,
    name: String,
    points: u32,
}

#[derive(Serialize)]
struct SeasonReport {
    seed: u64,
    rounds: Vec<RoundReport>,
    grand_final: Vec<StandingLine>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "derby_sim=debug" } else { "derby_sim=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => RaceConfig::load(path)?,
        None => RaceConfig::default(),
    };
    if let Some(count) = args.horses {
        config.season.horse_pool_size = count;
        config.validate()?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "Derby Sim starting");

    let report = run_season(config, seed)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        other => {
            eprintln!("Unknown format '{}', defaulting to text", other);
            print_text(&report);
        }
    }

    Ok(())
}

fn run_season(config: RaceConfig, seed: u64) -> Result<SeasonReport> {
    let tick_ms = config.motion.tick_ms;
    let mut store = GameStore::with_seed(config, seed);
    let mut clock = SimClock::new(0, tick_ms);

    store.generate_horses()?;
    let round_ids: Vec<RoundId> = store.generate_race_schedule()?.iter().map(|r| r.id).collect();

    let mut rounds = Vec::with_capacity(round_ids.len());
    for round_id in round_ids {
        let started_at = clock.now();
        store.start_race(round_id, started_at)?;
        store.handle_countdown_complete(started_at);

        loop {
            let now = clock.advance();
            let events = store.tick(now);
            if events.finalized_order().is_some() {
                break;
            }
            if now - started_at > MAX_RACE_MS {
                store.stop();
                return Err(RaceError::InvalidConfig(format!(
                    "round {} did not finish within {}s of simulated time",
                    round_id,
                    MAX_RACE_MS / 1000
                )));
            }
        }

        rounds.push(round_report(&store, round_id));
    }

    let standings = store.calculate_grand_final_results()?.to_vec();
    let grand_final = standings
        .iter()
        .map(|r| StandingLine {
            position: r.final_position,
            horse_id: r.horse_id.to_string(),
            name: horse_name(&store, &r.horse_id),
            points: r.total_points,
        })
        .collect();

    Ok(SeasonReport {
        seed,
        rounds,
        grand_final,
    })
}

fn round_report(store: &GameStore, round_id: RoundId) -> RoundReport {
    let (distance, track) = store
        .rounds()
        .iter()
        .find(|r| r.id == round_id)
        .map(|r| (r.distance, r.track.to_string()))
        .unwrap_or_default();

    let finishers = store
        .round_result(round_id)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, id)| Finisher {
            place: i + 1,
            horse_id: id.to_string(),
            name: horse_name(store, id),
        })
        .collect();

    RoundReport {
        round: round_id.0,
        distance,
        track,
        finishers,
    }
}

fn horse_name(store: &GameStore, id: &HorseId) -> String {
    store
        .horse(id)
        .map(|h| h.name.clone())
        .unwrap_or_else(|| "Unknown".into())
}

fn print_text(report: &SeasonReport) {
    println!("Derby Season");
    println!("============");
    println!("Seed: {}", report.seed);

    for round in &report.rounds {
        println!();
        println!("Round {} - {}m on {}", round.round, round.distance, round.track);
        for f in &round.finishers {
            println!("  {:>4}  {}  {}", ordinal(f.place), f.horse_id, f.name);
        }
    }

    println!();
    println!("Grand Final");
    println!("-----------");
    for line in &report.grand_final {
        println!(
            "  {:>4}  {}  {:<28} {:>3} pts",
            ordinal(line.position),
            line.horse_id,
            line.name,
            line.points
        );
    }
}
