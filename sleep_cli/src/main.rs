use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use sleep_core::chart::Panel;
use sleep_core::ingest::score_entry;
use sleep_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sleepq")]
#[command(about = "Sleep quality tracker with trend reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log last night's metrics and show the estimated sleep quality
    Log {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: u32,

        /// Resting heart rate (bpm)
        #[arg(long)]
        heart_rate: u32,

        /// Daily step count
        #[arg(long)]
        activity_level: u32,

        /// Hours slept
        #[arg(long)]
        sleep_duration: f64,

        /// Bedroom temperature (°C)
        #[arg(long, allow_negative_numbers = true)]
        room_temp: f64,

        /// Caffeinated drinks
        #[arg(long)]
        caffeine: u32,

        /// Alcoholic drinks
        #[arg(long)]
        alcohol: u32,

        /// Hours of screen time before bed
        #[arg(long)]
        screen_time: f64,

        /// Entry time (RFC 3339), defaults to now
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<DateTime<Utc>>,

        /// Weight table to score with (refined, legacy), defaults to the configured one
        #[arg(long, value_parser = parse_estimator)]
        estimator: Option<EstimatorVersion>,

        /// Show the score without saving the entry
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize the logged history and suggest improvements
    Report {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn parse_estimator(s: &str) -> std::result::Result<EstimatorVersion, String> {
    EstimatorVersion::parse(s)
        .ok_or_else(|| format!("unknown estimator {:?}, expected refined or legacy", s))
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        sleep_core::logging::init_with_level("debug");
    } else {
        sleep_core::logging::init();
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Log {
            name,
            age,
            heart_rate,
            activity_level,
            sleep_duration,
            room_temp,
            caffeine,
            alcohol,
            screen_time,
            timestamp,
            estimator,
            dry_run,
        } => {
            let entry = SleepEntry {
                name,
                age,
                heart_rate,
                activity_level,
                sleep_duration,
                room_temperature: room_temp,
                caffeine_consumption: caffeine,
                alcohol_consumption: alcohol,
                screen_time,
            };
            let version = estimator.unwrap_or(config.estimator.version);
            cmd_log(
                data_dir,
                entry,
                version,
                timestamp.unwrap_or_else(Utc::now),
                dry_run,
            )
        }
        Commands::Report { json } => cmd_report(data_dir, json, &config),
    }
}

fn cmd_log(
    data_dir: PathBuf,
    entry: SleepEntry,
    version: EstimatorVersion,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<()> {
    let record = if dry_run {
        score_entry(entry, version, now)?
    } else {
        let mut store = CsvRecordStore::in_dir(&data_dir);
        record_entry(&mut store, entry, version, now)?
    };

    if dry_run {
        println!("Your sleep quality: {:.1}/10", record.sleep_quality);
        println!("\n[Dry run - entry not saved]");
    } else {
        println!(
            "✓ Entry saved! Your sleep quality: {:.1}/10",
            record.sleep_quality
        );
    }

    Ok(())
}

fn cmd_report(data_dir: PathBuf, json: bool, config: &Config) -> Result<()> {
    let store = CsvRecordStore::in_dir(&data_dir);
    let records = store.read_all()?;

    match build_report(&records, &config.suggestions)? {
        ReportOutcome::InsufficientHistory { records } => {
            println!(
                "Not enough data yet: {} night(s) logged, at least 2 are needed for a report.",
                records
            );
        }
        ReportOutcome::Ready(report) => {
            if json {
                println!("{}", report.to_json_pretty()?);
            } else {
                display_report(&report);
            }
        }
    }

    Ok(())
}

fn display_report(report: &Report) {
    let agg = &report.aggregate;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SLEEP REPORT");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Nights logged:    {}", agg.record_count);
    println!(
        "  Latest quality:   {:.1}/10 ({})",
        agg.latest.sleep_quality,
        agg.latest.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!("  Average quality:  {:.1}/10", agg.means.sleep_quality);
    println!(
        "  Trend:            {:?} ({:+.2}/day)",
        report.trend_direction,
        agg.trend.slope_per_day()
    );
    println!();

    println!("  Averages");
    println!("  → Sleep:       {:.1} h", agg.means.sleep_duration);
    println!("  → Heart rate:  {:.0} bpm", agg.means.heart_rate);
    println!("  → Screen time: {:.1} h", agg.means.screen_time);
    println!("  → Activity:    {:.0} steps", agg.means.activity_level);
    println!();

    for panel in &report.chart.panels {
        match panel {
            Panel::QualityDistribution { title, bins } => {
                println!("  {}", title);
                for bin in bins {
                    println!(
                        "  {:>2}-{:<2} | {} {}",
                        bin.lower,
                        bin.upper,
                        "█".repeat(bin.count),
                        bin.count
                    );
                }
                println!();
            }
            Panel::FactorProfile { title, spokes } => {
                println!("  {}", title);
                for spoke in spokes {
                    println!("  → {:<15} {:.2}", spoke.label, spoke.value);
                }
                println!();
            }
            _ => {}
        }
    }

    println!("─────────────────────────────────────────");
    if report.suggestions.is_empty() {
        println!("  No suggestions for the latest night.");
    } else {
        println!("  Suggestions");
        for advisory in &report.suggestions {
            println!();
            println!("  • {}: {}", advisory.category.label(), advisory.observation);
            println!("    → {}", advisory.recommendation);
        }
    }
    println!();
}
