//! rqbench - range query cache workload driver

mod chat;
mod runner;
mod workload;

use std::thread;
use std::time::Duration;
use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratelimit::SlidingWindowRateLimiter;
use tracing::{info, warn};

use crate::workload::{make_array, make_queries, WorkloadConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time a random workload with and without the range cache
    Compare(CompareArgs),
    /// Simulate chat traffic against the sliding-window rate limiter
    Ratelimit(RatelimitArgs),
}

#[derive(ClapArgs, Debug)]
struct CompareArgs {
    /// Array length
    #[arg(short = 'n', long, default_value_t = 100_000)]
    size: usize,

    /// Number of queries
    #[arg(short, long, default_value_t = 50_000)]
    queries: usize,

    /// Cache capacity (number of ranges)
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Number of distinct hot ranges
    #[arg(long, default_value_t = 30)]
    hot_pool: usize,

    /// Probability that a range query hits the hot pool
    #[arg(long, default_value_t = 0.95)]
    p_hot: f64,

    /// Probability that a query is an update
    #[arg(long, default_value_t = 0.03)]
    p_update: f64,

    /// RNG seed for a reproducible workload
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct RatelimitArgs {
    /// Window size in seconds
    #[arg(short, long, default_value_t = 10.0)]
    window: f64,

    /// Messages allowed per user per window
    #[arg(short, long, default_value_t = 1)]
    max_requests: usize,

    /// Pause between the two rounds, in seconds
    #[arg(short, long, default_value_t = 4.0)]
    pause: f64,

    /// RNG seed for the inter-message delays
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Compare(args) => compare(args),
        Command::Ratelimit(args) => ratelimit(args),
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn seconds(value: f64, name: &str) -> Result<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) => Ok(duration),
        Err(_) => bail!("{name} must be a non-negative number of seconds, got {value}"),
    }
}

fn compare(args: CompareArgs) -> Result<()> {
    let config = WorkloadConfig {
        n: args.size,
        queries: args.queries,
        hot_pool: args.hot_pool,
        p_hot: args.p_hot,
        p_update: args.p_update,
    };
    config.validate()?;

    info!("Array size: {}", config.n);
    info!("Queries: {}", config.queries);
    info!("Cache capacity: {}", args.capacity);

    let mut rng = rng_from(args.seed);
    let array = make_array(config.n, &mut rng);
    let queries = make_queries(&config, &mut rng)?;

    let plain = runner::run_no_cache(&array, &queries)?;
    let cached = runner::run_with_cache(&array, &queries, args.capacity)?;

    if plain.answers != cached.answers {
        bail!("cached run disagrees with uncached run");
    }

    println!(
        "Time without cache: {:.4} seconds",
        plain.elapsed.as_secs_f64()
    );
    println!(
        "Time with cache: {:.4} seconds",
        cached.elapsed.as_secs_f64()
    );
    if let Some(stats) = cached.stats {
        println!("Cache stats: {stats}");
    }

    if cached.elapsed > plain.elapsed {
        warn!("Cache was slower than the baseline; workload may be too write-heavy");
    }

    Ok(())
}

fn ratelimit(args: RatelimitArgs) -> Result<()> {
    let window = seconds(args.window, "window")?;
    let pause = seconds(args.pause, "pause")?;
    let mut limiter = SlidingWindowRateLimiter::new(window, args.max_requests)?;
    let mut rng = rng_from(args.seed);

    info!(
        "Window: {:.1}s, max requests per window: {}",
        window.as_secs_f64(),
        args.max_requests
    );

    println!("\n=== Simulated message stream ===");
    chat::run_round(&mut limiter, 1..=10, &mut rng, true, |outcome| {
        println!("{}", chat::format_outcome(outcome));
    });

    println!("\nWaiting {:.1} seconds...", pause.as_secs_f64());
    thread::sleep(pause);

    println!("\n=== New round after waiting ===");
    chat::run_round(&mut limiter, 11..=20, &mut rng, true, |outcome| {
        println!("{}", chat::format_outcome(outcome));
    });

    Ok(())
}
