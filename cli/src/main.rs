//! `atm-queue` - command line front end for the ATM queue analysis core

use anyhow::{bail, Context, Result};
use atm_queue_core_rs::{
    generate_log, AnalysisConfig, AnalysisReport, Analyzer, ChannelAssignment, ScenarioRow, SyntheticLogConfig,
    TransactionRecord,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atm-queue", about = "ATM waiting-time simulation and M/M/c comparison")]
struct Command {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the what-if scenario table
    Scenarios {
        /// JSON analysis config (defaults to the standard ATM scenarios)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replay a transaction log and summarize waiting times
    Waiting {
        /// JSON array of transaction records
        #[arg(long)]
        records: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Spread records round-robin over this many ATMs
        #[arg(long, conflicts_with = "by_server")]
        channels: Option<usize>,

        /// Use each record's server_id as its ATM
        #[arg(long)]
        by_server: bool,

        /// Write the full report here as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a synthetic transaction log
    Generate {
        /// JSON synthetic log config (defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Command::parse().action {
        Action::Scenarios { config } => {
            let analyzer = Analyzer::new(load_config(config.as_deref())?)?;
            print_scenarios(&analyzer.evaluate_scenarios()?);
        }
        Action::Waiting {
            records,
            config,
            channels,
            by_server,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            match (channels, by_server) {
                (Some(0), _) => bail!("--channels must be at least 1"),
                (Some(1), _) => config.assignment = ChannelAssignment::Single,
                (Some(n), _) => config.assignment = ChannelAssignment::RoundRobin { channels: n },
                (None, true) => config.assignment = ChannelAssignment::ByServerId,
                (None, false) => {}
            }

            let log = read_records(&records)?;
            let report = Analyzer::new(config)?.run(log)?;
            print_report(&report);

            if let Some(path) = output {
                fs::write(&path, report.to_json()?)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                log::info!("Report written to {}", path.display());
            }
        }
        Action::Generate { config, output } => {
            let config: SyntheticLogConfig = match config {
                Some(path) => serde_json::from_str(&read(&path)?)
                    .with_context(|| format!("parsing synthetic log config {}", path.display()))?,
                None => SyntheticLogConfig::default(),
            };
            let log = generate_log(&config)?;
            fs::write(&output, serde_json::to_string_pretty(&log)?)
                .with_context(|| format!("writing log to {}", output.display()))?;
            log::info!("Wrote {} records to {}", log.len(), output.display());
        }
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => Ok(AnalysisConfig::from_json(&read(path)?)?),
        None => Ok(AnalysisConfig::default()),
    }
}

fn read_records(path: &Path) -> Result<Vec<TransactionRecord>> {
    serde_json::from_str(&read(path)?).with_context(|| format!("parsing records in {}", path.display()))
}

fn print_scenarios(rows: &[ScenarioRow]) {
    println!("{:<24} {:>8} {:>8} {:>4} {:>8}  {:<38} {:<38}", "Scenario", "λ", "μ", "c", "ρ", "Wq (min)", "Lq");
    for row in rows {
        println!(
            "{:<24} {:>8.2} {:>8.2} {:>4} {:>8.3}  {:<38} {:<38}",
            row.label,
            row.arrival_rate,
            row.service_rate,
            row.servers,
            row.utilization,
            row.wq_label(2),
            row.lq_label(2)
        );
    }
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{} records on {} channel(s), dataset {}",
        report.record_count, report.channel_count, report.dataset_hash
    );
    println!("{:<10} {:>7} {:>9} {:>9} {:>9} {:>9}", "Period", "Count", "Mean", "Median", "P90", "Max");
    for period in &report.waiting_by_period {
        match &period.summary {
            Some(s) => println!(
                "{:<10} {:>7} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
                period.period, s.count, s.mean, s.median, s.p90, s.max
            ),
            None => println!("{:<10} {:>7}", period.period, 0),
        }
    }

    if let Some(c) = &report.comparison {
        let analytical = c
            .analytical_wait_min
            .finite()
            .map_or_else(|| "divergent".to_string(), |w| format!("{:.2}", w));
        println!(
            "Observed λ={:.2}, μ={:.2}, ρ={:.3}: simulated Wq={:.2} min, M/M/{} Wq={} min",
            c.observed_arrival_rate,
            c.observed_service_rate,
            c.utilization,
            c.simulated_mean_wait_min,
            c.servers,
            analytical
        );
    }

    println!();
    print_scenarios(&report.scenarios);
}
