//! PityForge command line
//!
//! Usage:
//!   pity-forge grid <MAX_CHARACTERS> <MAX_LIGHT_CONES>   - Compute and save the joint grid
//!   pity-forge grid 3 1 --stdout                          - Stream the grid as JSON
//!   pity-forge estimate --characters 3 --light-cones 1    - Expected pulls and spend

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pf_pity::{
    BundleEstimate, CurveKind, EngineConfig, GridReport, GridSize, PityError, PullGrid,
    ReportSink, expected_pulls, parse_prob, to_f64,
};

#[derive(Parser)]
#[command(name = "pity-forge", version, about = "Exact pull-count distributions for soft-pity banners")]
struct Cli {
    /// Engine config file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Chance a lost pickup roll still yields the pickup, e.g. "1/8"
    #[arg(long, global = true)]
    loss_recovery: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute distributions for every (characters, light cones) pair up to the bounds
    Grid {
        /// Largest number of pickup characters
        #[arg(allow_negative_numbers = true)]
        max_characters: i64,

        /// Largest number of pickup light cones
        #[arg(allow_negative_numbers = true)]
        max_light_cones: i64,

        /// Stream the report to standard output instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Output directory for report files
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Worker threads (0 = auto)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Fractional digits kept for irrational standard deviations
        #[arg(long)]
        sqrt_digits: Option<u32>,
    },
    /// Expected pulls and spend for a bundle of pickups
    Estimate {
        /// Number of pickup characters
        #[arg(long, default_value_t = 1)]
        characters: usize,

        /// Number of pickup light cones
        #[arg(long, default_value_t = 0)]
        light_cones: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 for engine defects, 1 for everything the user can fix
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PityError>() {
        Some(PityError::InvariantViolation { .. }) => 2,
        _ => 1,
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(text) = &cli.loss_recovery {
        let recovery = parse_prob(text).context("Invalid --loss-recovery")?;
        config = config.with_loss_recovery(recovery);
        config.validate()?;
    }

    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Grid {
            max_characters,
            max_light_cones,
            stdout,
            output,
            threads,
            sqrt_digits,
        } => {
            // Counts are checked before the config is loaded or any computation starts
            let size = GridSize::new(*max_characters, *max_light_cones)?;

            let mut config = load_config(&cli)?;
            if let Some(threads) = *threads {
                config = config.with_threads(threads);
            }
            if let Some(digits) = *sqrt_digits {
                config = config.with_sqrt_digits(digits);
            }

            let sink = if *stdout { ReportSink::Stdout } else { ReportSink::Directory(output.clone()) };
            run_grid(&config, size, &sink)
        }
        Commands::Estimate { characters, light_cones } => {
            run_estimate(&load_config(&cli)?, *characters, *light_cones)
        }
    }
}

fn run_grid(config: &EngineConfig, size: GridSize, sink: &ReportSink) -> Result<()> {
    log::info!(
        "Computing grid: up to {} characters, {} light cones",
        size.max_characters,
        size.max_light_cones
    );

    let grid = PullGrid::compute(config, size)?;
    let report = GridReport::build(&grid, config.sqrt_digits);

    if report.is_empty() {
        log::warn!("Grid has no non-trivial cells; nothing to report");
    }

    for path in report.write(sink, &config.output_stem)? {
        log::info!("Saved {}", path.display());
    }
    Ok(())
}

fn run_estimate(config: &EngineConfig, characters: usize, light_cones: usize) -> Result<()> {
    let currency = &config.pricing.currency;
    let price = &config.pricing.currency_per_pull;

    let character = expected_pulls(config, CurveKind::Character)?;
    let light_cone = expected_pulls(config, CurveKind::LightCone)?;
    for (kind, pulls) in [(CurveKind::Character, &character), (CurveKind::LightCone, &light_cone)] {
        println!(
            "{:<10} expected pulls: {:>10.4}   expected cost: {:>12.2} {currency}",
            kind.name(),
            to_f64(pulls),
            to_f64(&(pulls * price)),
        );
    }

    let estimate = BundleEstimate::from_expectations(
        &config.pricing,
        &character,
        &light_cone,
        characters,
        light_cones,
    );
    println!(
        "{} characters + {} light cones: expected pulls {:.4}, expected cost {:.2} {currency}",
        estimate.characters,
        estimate.light_cones,
        estimate.expected_pulls_f64(),
        estimate.expected_cost_f64(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_grid() {
        let cli = Cli::try_parse_from(["pity-forge", "grid", "3", "1", "--stdout", "-j", "2"]).unwrap();
        match cli.command {
            Commands::Grid { max_characters, max_light_cones, stdout, threads, .. } => {
                assert_eq!((max_characters, max_light_cones), (3, 1));
                assert!(stdout);
                assert_eq!(threads, Some(2));
            }
            Commands::Estimate { .. } => panic!("expected grid command"),
        }
    }

    #[test]
    fn test_negative_count_is_user_error() {
        let cli = Cli::try_parse_from(["pity-forge", "grid", "-1", "0", "--stdout"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.downcast_ref::<PityError>().is_some_and(PityError::is_user_error));
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn test_invalid_loss_recovery_rejected() {
        let cli = Cli::try_parse_from(["pity-forge", "estimate", "--loss-recovery", "3/2"]).unwrap();
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_negative_count_reported_before_config() {
        let cli = Cli::try_parse_from([
            "pity-forge",
            "grid",
            "-1",
            "0",
            "--stdout",
            "--loss-recovery",
            "3/2",
            "--config",
            "/nonexistent/pity.yaml",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(matches!(err.downcast_ref::<PityError>(), Some(PityError::InvalidInput(_))));
    }

    #[test]
    fn test_invariant_violation_exits_with_two() {
        let err = anyhow::Error::from(PityError::InvariantViolation {
            stage: "convolution for 1 characters, 0 light cones".into(),
            mass: "1/2".into(),
        });
        assert_eq!(exit_status(&err), 2);

        let wrapped = Err::<(), _>(err).context("Grid computation failed").unwrap_err();
        assert_eq!(exit_status(&wrapped), 2);
        assert_eq!(exit_status(&anyhow::Error::from(PityError::ThreadPool("spawn".into()))), 1);
    }
}
