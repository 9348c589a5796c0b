// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pufferfish2 CPU miner - proof-of-work search engine
#[derive(Parser, Debug)]
#[command(name = "pufferfish-miner-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (search a job, run a benchmark, or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Search one job and print the solutions found
    Start(StartOptions),

    /// Measure hashrate against an unreachable target
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for searching a job
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Path to a TOML or JSON configuration file (defaults apply without one)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads, 0 or negative for all cores (overrides config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Job prefix as 64 hex characters
    #[arg(short, long)]
    pub prefix: String,

    /// Required leading zero bits of the digest (0-255)
    #[arg(short, long)]
    pub difficulty: u32,

    /// Stop after this many solutions
    #[arg(short, long, default_value_t = 1)]
    pub max_solutions: usize,

    /// Give up after this many seconds (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub duration: u64,
}

/// Options for running the benchmark
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Duration of benchmark in seconds
    #[arg(short, long, default_value_t = 60)]
    pub duration: u64,

    /// Number of threads to use, 0 or negative for all cores
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub threads: i64,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}
