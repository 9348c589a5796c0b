// src/main.rs
use clap::Parser;
use crossbeam_channel::{RecvTimeoutError, bounded};
use pufferfish_miner_rs::miner::algorithm::create_primitive;
use pufferfish_miner_rs::utils::init_bench_logging;
use pufferfish_miner_rs::*;
use std::time::{Duration, Instant};

/// Main entry point for the miner
///
/// Parses command line arguments and delegates to the subcommand handler.
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Start(opts) => start_mining(opts),
        cli::Action::Benchmark(opts) => run_benchmark(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Searches a single job given on the command line
///
/// # Operations
/// 1. Initializes logging
/// 2. Loads and validates configuration
/// 3. Starts the worker pool and the stats reporter
/// 4. Dispatches the job and prints solutions until a limit is reached
fn start_mining(opts: cli::StartOptions) -> Result<(), MinerError> {
    utils::init_logging();

    let mut config = match &opts.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    // Apply CLI overrides
    if let Some(threads) = opts.threads {
        config.threads = threads;
    }
    config.validate()?;

    let job = Job::from_hex(&opts.prefix, opts.difficulty)?;
    let pool = WorkerPool::from_config(&config, create_primitive()?)?;

    let (stop_reporter, stop_rx) = bounded::<()>(0);
    let reporter =
        StatsReporter::new(pool.telemetry(), config.report_interval()).start_reporting(stop_rx);

    log::info!(
        "Searching {} with {} workers",
        job.difficulty(),
        pool.size()
    );
    pool.dispatch(job)?;

    let solutions = pool.solutions();
    let deadline = (opts.duration > 0).then(|| Instant::now() + Duration::from_secs(opts.duration));
    let mut found = 0;

    while found < opts.max_solutions {
        let wait = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(3600),
        };

        match solutions.recv_timeout(wait) {
            Ok(solution) => {
                println!("{}", solution);
                found += 1;
            }
            Err(RecvTimeoutError::Timeout) if deadline.is_none() => continue,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("No more solutions within {}s", opts.duration);
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    pool.shutdown();
    drop(stop_reporter);
    let _ = reporter.join();

    log::info!("Found {} solution(s)", found);
    Ok(())
}

/// Measures hashrate against a target no digest can reasonably meet
fn run_benchmark(opts: cli::BenchmarkOptions) -> Result<(), MinerError> {
    init_bench_logging();

    let config = Config {
        threads: opts.threads,
        ..Config::default()
    };
    let pool = WorkerPool::from_config(&config, create_primitive()?)?;
    let mut reporter = StatsReporter::new(pool.telemetry(), Duration::from_secs(opts.duration));

    log::info!(
        "Starting pufferfish2 benchmark on {} threads for {} seconds",
        pool.size(),
        opts.duration
    );

    pool.dispatch(Job::new([0u8; 32], Difficulty::MAX))?;
    std::thread::sleep(Duration::from_secs(opts.duration));

    // Report final results
    let stats = reporter.sample();
    pool.shutdown();

    log::info!("Benchmark results:");
    log::info!("Total hashes: {}", stats.hashes_total);
    log::info!("Average hashrate: {:.2} H/s", stats.hashrate);
    for (worker, rate) in stats.worker_hashrates.iter().enumerate() {
        log::debug!("Worker {}: {:.2} H/s", worker, rate);
    }
    log::logger().flush(); // Ensure final results appear

    Ok(())
}

/// Writes the configuration template to the requested file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let template = config::generate_template();
    std::fs::write(opts.output, template)?;
    Ok(())
}
