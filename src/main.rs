use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use cellrs::config::AppConfig;
use cellrs::export::{self, ExportFormat};
use cellrs::import;
use cellrs::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use cellrs::report::{BatteryAnalyzer, BatterySummary};

/// cellrs - Battery Degradation Analysis CLI
///
/// Estimates state of health, end of life and remaining useful life from
/// per-cycle battery telemetry records.
#[derive(Parser)]
#[command(name = "cellrs")]
#[command(version = "0.1.0")]
#[command(about = "Battery Degradation Analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate SOH, EOL and RUL for one record file
    Summarize {
        /// Input record file (JSON, or a `<base>_cycles.csv`)
        #[arg(short, long)]
        file: PathBuf,

        /// Write the summary as JSON next to printing it
        #[arg(long)]
        save_json: Option<PathBuf>,
    },

    /// Run the full degradation analysis and export the report
    Analyze {
        /// Input record file (JSON, or a `<base>_cycles.csv`)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (json, text)
        #[arg(short = 'F', long, default_value = "json")]
        format: String,
    },

    /// Inspect application configuration
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        list: bool,

        /// Print the config file location
        #[arg(short, long)]
        path: bool,
    },
}

#[derive(Tabled)]
struct SohRow {
    #[tabled(rename = "Cycle")]
    cycle: usize,

    #[tabled(rename = "SOH")]
    soh: String,
}

fn print_summary(summary: &BatterySummary) {
    println!("  Nominal capacity: {:.3} Ah", summary.nominal_capacity_in_ah);
    println!("  Recorded cycles:  {}", summary.num_cycles_recorded);
    println!("  Last SOH:         {:.4}", summary.last_soh);
    println!("  EOL method:       {}", summary.eol_method);
    match summary.eol {
        Some(eol) => println!("  EOL cycle:        {}", eol),
        None => println!("  EOL cycle:        {}", "not reached".green()),
    }
    if let Some(pred) = summary.eol_pred_float {
        println!("  Regression est.:  {:.2}", pred);
    }
    match summary.rul_cycles_from_last_record {
        Some(rul) if rul > 0 => println!("  RUL:              {} cycles", rul),
        Some(rul) => println!("  RUL:              {}", format!("{rul} cycles").red()),
        None => println!("  RUL:              n/a"),
    }

    let start = summary.soh_series.len().saturating_sub(10);
    let rows: Vec<SohRow> = summary.soh_series[start..]
        .iter()
        .enumerate()
        .map(|(offset, soh)| SohRow {
            cycle: start + offset + 1,
            soh: format!("{soh:.4}"),
        })
        .collect();
    println!();
    println!("{}", Table::new(rows));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.parse().map_err(anyhow::Error::msg)?;
    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: log_format,
        ..LogConfig::default()
    };
    init_logging(&log_config)?;

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    let analyzer = BatteryAnalyzer::from_config(&config);

    match cli.command {
        Commands::Summarize { file, save_json } => {
            println!("{}", "Estimating battery degradation...".green().bold());
            let set = import::load_record_set(&file)?;
            let stem = import::file_stem(&file);
            let summary = analyzer.summarize(&set, Some(&stem))?;

            print_summary(&summary);

            if let Some(path) = save_json {
                let json = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", format!("✓ Summary saved to {}", path.display()).green());
            }
        }

        Commands::Analyze { file, output, format } => {
            println!("{}", "Running full degradation analysis...".cyan().bold());
            let format: ExportFormat = format.parse()?;
            let set = import::load_record_set(&file)?;
            let stem = import::file_stem(&file);
            let report = analyzer.analyze(&set, Some(&stem))?;

            match output {
                Some(path) => {
                    export::export_report(&report, &path, format)?;
                    println!("{}", format!("✓ Report written to {}", path.display()).cyan());
                }
                None => match format {
                    ExportFormat::Json => println!("{}", export::json::render_report(&report)?),
                    ExportFormat::Text => print!("{}", export::text::render_report(&report)),
                },
            }
        }

        Commands::Config { list, path } => {
            if path {
                println!("{}", AppConfig::default_path().display());
            }
            if list || !path {
                let rendered = toml::to_string_pretty(&config)?;
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}
