//! Breakout binary
//!
//! Runs one assignment request and prints the schedule as JSON on stdout.
//! Logs and errors go to stderr.

mod output;

use std::process::ExitCode;
use std::time::Duration;

use breakout_core::{Algorithm, ErrorKind, Result};
use breakout_engine::{Engine, EngineConfig, Fallback, PairWeighting, Request, Schedule};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::{ErrorReport, ScheduleReport};

#[derive(Parser, Debug)]
#[command(name = "breakout")]
#[command(about = "Assign participants to breakout rooms over several rounds")]
struct Cli {
    /// Number of participants
    #[arg(long, short = 'n')]
    participants: usize,

    /// Number of rooms per round
    #[arg(long, short = 'r')]
    rooms: usize,

    /// Number of rounds
    #[arg(long, short = 't')]
    rounds: usize,

    /// Algorithm for rounds after the first: random, greedy, optimal
    #[arg(long, short = 'a', default_value = "greedy")]
    algorithm: String,

    /// RNG seed (overrides BREAKOUT_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Per-round solver budget in milliseconds, 0 for unbounded
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// On optimal failure: abort or greedy
    #[arg(long)]
    fallback: Option<String>,

    /// Linear pair weight: constant part
    #[arg(long, conflicts_with = "weight_seen")]
    weight_base: Option<f64>,

    /// Linear pair weight: cost per prior meeting
    #[arg(long, conflicts_with = "weight_seen")]
    weight_per_repeat: Option<f64>,

    /// Only penalize pairs that have met before
    #[arg(long)]
    weight_seen: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    /// Environment config with flags layered on top.
    fn config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env()?;

        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_solver_timeout((ms > 0).then(|| Duration::from_millis(ms)));
        }
        if let Some(fallback) = &self.fallback {
            config = config.with_fallback(fallback.parse::<Fallback>()?);
        }

        if self.weight_seen {
            config = config.with_weighting(PairWeighting::Seen);
        } else if self.weight_base.is_some() || self.weight_per_repeat.is_some() {
            let (base, per_repeat) = match config.weighting {
                PairWeighting::Linear { base, per_repeat } => (base, per_repeat),
                PairWeighting::Seen => (1.0, 1.0),
            };
            config = config.with_weighting(PairWeighting::Linear {
                base: self.weight_base.unwrap_or(base),
                per_repeat: self.weight_per_repeat.unwrap_or(per_repeat),
            });
        }

        Ok(config)
    }

    fn request(&self) -> Result<Request> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        Ok(Request::new(self.participants, self.rooms, self.rounds, algorithm))
    }
}

fn run(cli: &Cli) -> Result<Schedule> {
    let config = cli.config()?;
    let request = cli.request()?;
    tracing::debug!(?config, ?request, "resolved request");

    Engine::new(config).run(&request)
}

fn render(report: &ScheduleReport<'_>, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breakout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let schedule = match run(&cli) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("{}", ErrorReport::from(&e).to_json());
            return match e.kind() {
                ErrorKind::InvalidConfiguration => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            };
        }
    };

    match render(&ScheduleReport::from(&schedule), cli.pretty) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to write schedule");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["breakout"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_build_request() {
        let cli = parse(&["-n", "12", "-r", "3", "-t", "4", "--algorithm", "Optimal"]);
        assert_eq!(cli.request().unwrap(), Request::new(12, 3, 4, Algorithm::Optimal));
    }

    #[test]
    fn algorithm_defaults_to_greedy() {
        let cli = parse(&["--participants", "6", "--rooms", "2", "--rounds", "2"]);
        assert_eq!(cli.request().unwrap().algorithm, Algorithm::Greedy);
    }

    #[test]
    fn unknown_algorithm_is_invalid_configuration() {
        let cli = parse(&["-n", "6", "-r", "2", "-t", "2", "-a", "annealing"]);
        assert_eq!(cli.request().unwrap_err().kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn seen_conflicts_with_linear_coefficients() {
        let argv = ["breakout", "-n", "6", "-r", "2", "-t", "2", "--weight-seen", "--weight-base", "2"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn partial_linear_override_keeps_other_coefficient() {
        let cli = parse(&["-n", "6", "-r", "2", "-t", "2", "--weight-per-repeat", "4"]);
        assert_eq!(
            cli.config().unwrap().weighting,
            PairWeighting::Linear {
                base: 1.0,
                per_repeat: 4.0,
            }
        );
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let cli = parse(&["-n", "6", "-r", "2", "-t", "2", "--timeout-ms", "0", "--seed", "9"]);
        let config = cli.config().unwrap();
        assert_eq!(config.solver_timeout, None);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn run_output_renders_compact_or_pretty() {
        let cli = parse(&["-n", "6", "-r", "2", "-t", "3", "--seed", "2", "--timeout-ms", "0"]);
        let schedule = run(&cli).unwrap();
        let report = ScheduleReport::from(&schedule);

        let compact = render(&report, false).unwrap();
        let pretty = render(&report, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));

        let a: serde_json::Value = serde_json::from_str(&compact).unwrap();
        let b: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["assignments"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn run_errors_keep_their_kind() {
        let cli = parse(&["-n", "3", "-r", "4", "-t", "2", "--seed", "1"]);
        assert_eq!(run(&cli).unwrap_err().kind(), ErrorKind::InvalidConfiguration);
    }
}
