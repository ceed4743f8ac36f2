//! Headless Duel Runner
//!
//! Runs AI vs AI duels and prints the result as JSON or text.

use clap::{Parser, ValueEnum};
use grid_skirmish::ai::{load_personality, AiPersonality};
use grid_skirmish::simulation::{Duel, DuelConfig, Side};
use serde::Serialize;

/// Headless Duel Runner - AI vs AI skirmishes on a random arena
#[derive(Parser, Debug)]
#[command(name = "duel_runner")]
#[command(about = "Run AI vs AI duels and report the outcome")]
struct Args {
    /// Arena width in cells
    #[arg(long, default_value_t = 12)]
    width: u32,

    /// Arena height in cells
    #[arg(long, default_value_t = 10)]
    height: u32,

    /// Maximum rounds before a draw
    #[arg(long, default_value_t = 40)]
    rounds: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// First AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    first: String,

    /// Second AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    second: String,

    /// Chance each free cell holds an obstacle
    #[arg(long, default_value_t = 0.12)]
    density: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Enable debug logging of AI decisions
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// JSON output structure
#[derive(Serialize)]
struct DuelResult {
    outcome: String,
    rounds: u32,
    first_health: u32,
    second_health: u32,
    shots_fired: u32,
    hits: u32,
    first_personality: String,
    second_personality: String,
    seed: u64,
}

fn load_or_default(name: &str) -> AiPersonality {
    load_personality(name).unwrap_or_else(|e| {
        tracing::warn!("Failed to load personality '{}': {}, using default", name, e);
        AiPersonality::default()
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let directive = if args.verbose {
        "grid_skirmish=debug"
    } else {
        "grid_skirmish=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let first_personality = load_or_default(&args.first);
    let second_personality = load_or_default(&args.second);

    let config = DuelConfig {
        width: args.width,
        height: args.height,
        obstacle_density: args.density,
        max_rounds: args.rounds,
        ..DuelConfig::default()
    };

    let mut duel = Duel::new(config, first_personality, second_personality, seed)?;
    let outcome = duel.run();

    let result = DuelResult {
        outcome: match outcome.winner {
            Some(Side::First) => "first".to_string(),
            Some(Side::Second) => "second".to_string(),
            None => "draw".to_string(),
        },
        rounds: outcome.rounds,
        first_health: outcome.first_health,
        second_health: outcome.second_health,
        shots_fired: outcome.shots_fired,
        hits: outcome.hits,
        first_personality: args.first,
        second_personality: args.second,
        seed,
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            println!("Duel Result");
            println!("===========");
            println!("Outcome: {}", result.outcome);
            println!("Rounds: {}", result.rounds);
            println!(
                "First ({}): {} hp",
                result.first_personality, result.first_health
            );
            println!(
                "Second ({}): {} hp",
                result.second_personality, result.second_health
            );
            println!("Shots: {} fired, {} hit", result.shots_fired, result.hits);
            println!("Seed: {}", result.seed);
        }
    }

    Ok(())
}
