//! Command-line front end for the pigeonhole simulator.
//!
//! Two modes:
//! - report (default): run the insertion phase silently and print the full
//!   textual report derived from final engine state.
//! - `--animate`: drive the animation controller with a sleeping tick loop,
//!   printing one line per step event.
//!
//! The tick interval lives entirely here; the core never sees wall-clock
//! time.

use clap::{Parser, ValueEnum};
use pigeonhole_sim::{
    generate_hex_tokens, generate_tokens, render_report, run_insertion_phase, AnimState,
    AnimationController, BucketTable, Engine, HashStrategy, Renderer, ResolutionStart, StepEvent,
    Token,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pigeonhole",
    version,
    about = "Chained-hash pigeonhole principle demonstrator",
    long_about = "Hashes N random tokens into M buckets with chaining, reports every\n\
        collision, then drains each chain. With N > M at least N-M collisions\n\
        are guaranteed by the pigeonhole principle."
)]
struct Cli {
    /// Hash space size M (number of buckets), at least 1
    #[arg(long, default_value_t = 50)]
    space_size: usize,

    /// Number of inputs N to generate and hash
    #[arg(long, default_value_t = 100)]
    inputs: usize,

    /// Token length in characters (or bytes with --hex-tokens), at least 1
    #[arg(long, default_value_t = 8)]
    token_length: usize,

    /// Hash strategy mapping tokens to buckets
    #[arg(long, value_enum, default_value = "summation")]
    strategy: Strategy,

    /// Generate tokens as random bytes rendered hex instead of alphanumeric
    #[arg(long)]
    hex_tokens: bool,

    /// Seed for reproducible token generation; entropy-seeded when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Animate bucket-by-bucket instead of printing the final report
    #[arg(long)]
    animate: bool,

    /// Delay between animation ticks, in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    /// Sum of character codes modulo M (not collision-resistant, on purpose)
    Summation,
    /// SHA-256 prefix modulo M
    Digest,
}

impl From<Strategy> for HashStrategy {
    fn from(s: Strategy) -> HashStrategy {
        match s {
            Strategy::Summation => HashStrategy::Summation,
            Strategy::Digest => HashStrategy::Digest,
        }
    }
}

/// Prints each step event as a status line, Demo-console style.
struct ConsoleRenderer {
    ordinal: usize,
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, event: &StepEvent, _table: &BucketTable) {
        match event {
            StepEvent::Inserted {
                bucket,
                token,
                chain_len,
                collision,
            } => {
                self.ordinal += 1;
                println!(
                    "insert {:>4}: '{}' -> bucket #{bucket} ({}; chain length {chain_len})",
                    self.ordinal,
                    token,
                    if *collision { "COLLISION" } else { "first placement" },
                );
            }
            StepEvent::Drained {
                bucket,
                token,
                remaining,
            } => {
                println!("resolve bucket #{bucket}: retrieved '{token}', {remaining} remaining");
            }
        }
    }

    fn empty_resolution(&mut self) {
        println!("nothing to resolve: all chains are empty");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // All configuration errors surface here, before any simulation work.
    let tokens: Vec<Token> = if cli.hex_tokens {
        generate_hex_tokens(&mut rng, cli.inputs, cli.token_length)?
    } else {
        generate_tokens(&mut rng, cli.inputs, cli.token_length)?
    };
    let engine = Engine::new(tokens, cli.strategy.into(), cli.space_size)?;

    info!(
        space = cli.space_size,
        inputs = cli.inputs,
        strategy = ?cli.strategy,
        "starting run"
    );

    if cli.animate {
        animate(engine, cli.tick_ms)?;
    } else {
        report(engine)?;
    }
    Ok(())
}

/// Run the insertion phase without animation and print the report; the
/// chains stay populated so the report can list every crowded bucket.
fn report(mut engine: Engine) -> Result<(), Box<dyn std::error::Error>> {
    for _ in run_insertion_phase(&mut engine) {}
    print!("{}", render_report(&engine));
    Ok(())
}

/// Tick loop with a sleep between steps.
fn animate(engine: Engine, tick_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_millis(tick_ms);
    let mut controller = AnimationController::new(engine);
    let mut renderer = ConsoleRenderer { ordinal: 0 };

    println!("== insertion phase ==");
    controller.start_insertion()?;
    while controller.tick(&mut renderer) == AnimState::RunningInsertion {
        thread::sleep(interval);
    }
    let stats = *controller.engine().stats();
    println!(
        "insertion complete: {} collisions, {} unique buckets used",
        stats.total_collisions, stats.unique_buckets_used
    );

    println!("== resolution phase ==");
    if controller.start_resolution()? == ResolutionStart::Empty {
        renderer.empty_resolution();
    }
    while controller.tick(&mut renderer) == AnimState::RunningResolution {
        thread::sleep(interval);
    }
    println!("resolution complete: all recorded chains drained");
    Ok(())
}
