use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which construction model the demo drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    Accumulative,
    EqualWeighting,
}

/// Runs a portfolio construction model against a synthetic market.
#[derive(Parser, Debug)]
#[command(name = "demo-runner")]
#[command(about = "Drives a portfolio construction model with synthetic data", long_about = None)]
pub struct Args {
    /// Construction model to run.
    #[arg(short, long, value_enum, default_value = "accumulative")]
    pub model: Model,

    /// JSON file with the accumulative model configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Step size per insight, overriding the config file.
    #[arg(short, long)]
    pub percent: Option<f64>,

    /// Number of one-minute steps to simulate.
    #[arg(long, default_value_t = 120)]
    pub steps: usize,

    /// Number of synthetic instruments.
    #[arg(long, default_value_t = 3)]
    pub instruments: usize,

    /// Total portfolio value used to size targets.
    #[arg(long, default_value_t = 100_000.0)]
    pub portfolio_value: f64,

    /// Probability that an instrument emits an insight on a given step.
    #[arg(long, default_value_t = 0.1, value_parser = parse_rate)]
    pub insight_rate: f64,

    /// Step at which the last instrument leaves the universe (never if unset).
    #[arg(long)]
    pub remove_at: Option<usize>,
}

fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("{rate} is not a probability in [0, 1]"));
    }
    Ok(rate)
}
