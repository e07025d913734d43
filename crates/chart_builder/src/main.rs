//! Chart Builder CLI
//!
//! Seasons_Stats.csv + Players.csv + player_data.csv → three-point era charts

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use chart_builder::{AnalysisSelection, RunReport};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use hoops_core::AnalysisConfig;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "chart_builder")]
#[command(about = "Render the three-point era charts from the season tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding Players.csv, Seasons_Stats.csv and player_data.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory the PNG charts are written to
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// JSON config file (falls back to HOOPS_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Render all four charts (default)
    All,
    /// League mean of selected columns per season
    Trends,
    /// Beta models of two players' shooting seasons
    Shooters,
    /// Two seasons compared with Normal overlays and Mann-Whitney U tests
    Eras,
    /// Mean-of-means of each decade's top scorers
    Decades,
    /// Print the column legend of the season file
    Legend,
}

#[cfg(feature = "cli")]
impl Commands {
    fn selection(self) -> Option<AnalysisSelection> {
        match self {
            Commands::All => Some(AnalysisSelection::All),
            Commands::Trends => Some(AnalysisSelection::Trends),
            Commands::Shooters => Some(AnalysisSelection::Shooters),
            Commands::Eras => Some(AnalysisSelection::Eras),
            Commands::Decades => Some(AnalysisSelection::Decades),
            Commands::Legend => None,
        }
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[cfg(feature = "cli")]
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::from_env()?.unwrap_or_default(),
    };

    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;
    let command = cli.command.unwrap_or(Commands::All);

    let Some(selection) = command.selection() else {
        return print_legend(&config);
    };

    println!("🏀 Building charts...");
    println!("   Seasons: {}", config.data.seasons.display());
    println!("   Players: {}", config.data.players.display());
    println!("   Output:  {}", config.output_dir.display());

    let report = chart_builder::run_analyses(&config, selection)?;

    print_report(&report);

    if let Some(report_path) = &cli.report {
        chart_builder::save_report(report_path, &report)?;
        println!("\n📄 Report saved to: {}", report_path.display());
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_legend(config: &AnalysisConfig) -> Result<()> {
    let seasons = hoops_core::data::load_seasons(&config.data.seasons).with_context(|| {
        format!("Failed to read season file: {}", config.data.seasons.display())
    })?;
    let legend = seasons.legend();

    for (code, label) in legend.iter() {
        println!("{:>8}  {}", code, label);
    }
    if !legend.unlabeled().is_empty() {
        println!("\n⚠️  Unlabeled columns: {}", legend.unlabeled().join(", "));
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &RunReport) {
    println!("\n✅ Charts written:");
    for chart in &report.charts {
        println!("   {}", chart.display());
    }

    if !report.era_tests.is_empty() {
        println!("\n   Mann-Whitney U (raw / Bonferroni):");
        for test in &report.era_tests {
            println!(
                "   {:>6}  p={:.5}  adj={:.5}",
                test.column, test.p_value, test.bonferroni_p
            );
        }
    }

    for decade in &report.decades {
        let names: Vec<&str> = decade.leaders.iter().map(|l| l.player.as_str()).collect();
        println!("\n   {}: {}", decade.decade, names.join(", "));
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("chart_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
