//! sim-runner: headless election simulation runner.
//!
//! Usage:
//!   sim-runner --input states.csv --trials 10000 --seed 12345
//!   sim-runner --config run.json --partitions 8 --json

use anyhow::{Context, Result};
use electsim_core::{
    config::SimConfig,
    engine::ElectionEngine,
    input,
    outcome::Outcome,
    report::RunReport,
    rng::PcgSource,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.trials = parse_arg(&args, "--trials", config.trials);
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.partitions = parse_arg(&args, "--partitions", config.partitions);
    if let Some(path) = find_arg(&args, "--input") {
        config.input_file = Some(path.to_string());
    }
    config.validate()?;
    let json_mode = args.iter().any(|a| a == "--json");

    let input_file = config
        .input_file
        .clone()
        .context("no state table given: pass --input <csv> or set input_file in the config")?;

    if !json_mode {
        println!("Election simulator — sim-runner");
        println!("  input:       {input_file}");
        println!("  trials:      {}", config.trials);
        println!("  seed:        {}", config.seed);
        println!("  partitions:  {}", config.partitions);
        println!();
    }

    let states = input::load_states(&input_file)?;
    let mut engine = ElectionEngine::from_config(states, &config)?;

    let aggregate = if config.partitions > 1 {
        engine.run_partitioned(config.trials, config.seed, config.partitions)?
    } else {
        engine.run(config.trials, &mut PcgSource::new(config.seed))?
    };
    let report = RunReport::build(aggregate, &config)?;
    log::debug!("Built report {}", report.run_id);

    if json_mode {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    let a = &report.candidates.a;
    let b = &report.candidates.b;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", report.run_id);
    println!("  simulations:     {}", report.trials);
    println!("  overall winner:  {}", report.overall_winner);
    println!();
    println!("=== VICTORY ODDS ===");
    println!("  {a:<16} {:>6.2} %", report.odds.a);
    println!("  {b:<16} {:>6.2} %", report.odds.b);
    println!("  {:<16} {:>6.2} %", "Tie", report.odds.tie);
    println!();
    println!("=== ELECTORAL VOTES (threshold {}) ===", report.majority_threshold);
    for (label, summary) in [(a, &report.votes_a), (b, &report.votes_b)] {
        println!(
            "  {label:<16} mean {:>6.1} | min {:>3} | max {:>3}",
            summary.mean, summary.min, summary.max
        );
    }

    if !report.flips.is_empty() {
        println!();
        println!("=== FLIPS ===");
        for flip in &report.flips {
            println!("  {:<16} {} (away from {})", flip.state, flip.flips, flip.reference);
        }
    }

    println!();
    println!("=== MODAL MAP ===");
    for state in &report.modal_map {
        let winner = match state.winner {
            Outcome::A   => a.as_str(),
            Outcome::B   => b.as_str(),
            Outcome::Tie => "Tie",
        };
        println!(
            "  {:<16} {winner:<12} ({} / {})",
            state.state, state.wins_a, state.wins_b
        );
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
