//! Headless Economy Runner
//!
//! Loads a scenario, advances it a number of turns and prints the final state.

use std::path::PathBuf;

use clap::Parser;
use region_economy::market::MarketSnapshot;
use region_economy::region::RegionSnapshot;
use region_economy::simulation::EconomicPhase;
use region_economy::Scenario;
use serde::Serialize;

/// Headless Economy Runner - advance a scenario and report the result
#[derive(Parser, Debug)]
#[command(name = "economy_sim")]
#[command(about = "Run a region economy scenario for a number of turns")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long, default_value = "data/scenario.toml")]
    scenario: PathBuf,

    /// Number of turns to advance
    #[arg(long, default_value_t = 10)]
    turns: u64,

    /// Random seed, overriding the scenario's
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    turns: u64,
    phase: EconomicPhase,
    trades_per_turn: Vec<usize>,
    regions: Vec<RegionSnapshot>,
    market: MarketSnapshot,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut scenario = match Scenario::load_from_toml(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario '{}': {}", args.scenario.display(), e);
            std::process::exit(1);
        }
    };
    if let Some(seed) = args.seed {
        scenario = scenario.with_seed(seed);
    }
    let seed = scenario.settings.seed;

    let mut sim = match scenario.build() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Invalid scenario: {}", e);
            std::process::exit(1);
        }
    };

    let mut trades_per_turn = Vec::with_capacity(args.turns as usize);
    for _ in 0..args.turns {
        match sim.advance_turn() {
            Ok(report) => {
                if args.format == "text" {
                    println!(
                        "Turn {:>4}  {:<11?} trades {:>3}  changed {:>3}",
                        report.turn,
                        report.phase,
                        report.trades,
                        report.region_changes().count()
                    );
                }
                trades_per_turn.push(report.trades);
            }
            Err(e) => {
                eprintln!("Turn failed: {}", e);
                std::process::exit(2);
            }
        }
    }

    let summary = RunSummary {
        seed,
        turns: sim.turn(),
        phase: sim.phase(),
        trades_per_turn,
        regions: sim.regions(),
        market: sim.market_snapshot(),
    };

    match args.format.as_str() {
        "text" => print_text(&summary),
        _ => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn print_text(summary: &RunSummary) {
    println!();
    println!("=== After {} turns (seed {}, {:?}) ===", summary.turns, summary.seed, summary.phase);
    println!(
        "{:<16} {:<12} {:>10} {:>8} {:>7} {:>6} {:>5}",
        "Region", "Nation", "Wealth", "Prod", "Labor", "Sat", "Infra"
    );
    for r in &summary.regions {
        println!(
            "{:<16} {:<12} {:>10} {:>8} {:>7} {:>6.2} {:>5}",
            r.name,
            r.nation.as_str(),
            r.wealth,
            r.production,
            r.labor,
            r.satisfaction,
            r.infrastructure_level
        );
    }

    println!();
    println!("{:<16} {:>10} {:>10} {:>7}", "Resource", "Price", "Base", "Ratio");
    for (name, quote) in &summary.market.prices {
        println!(
            "{:<16} {:>10.2} {:>10.2} {:>7.2}",
            name, quote.current, quote.base, quote.ratio
        );
    }
}
