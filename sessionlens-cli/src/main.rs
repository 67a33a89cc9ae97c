use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use sessionlens_core::{
    build_report, write_report_to, write_sibling_report, Analyzer, AnalyzerError, Config, ConsoleOutput,
    JsonOutput, OutputGenerator, ParsedLog,
};
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "sessionlens",
    version,
    about = "Summarise a testing-session log: user behaviour, performance and errors",
    after_help = "Example: sessionlens testing_logs/session_2025-06-07_14-30-15.log"
)]
struct Cli {
    /// Testing-session log file to analyze
    #[arg(value_name = "LOG_FILE")]
    log_file: PathBuf,

    /// Report settings (defaults to <config dir>/sessionlens/config.toml)
    #[arg(long, value_name = "FILE", env = "SESSIONLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the JSON report (defaults to the log path with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting SessionLens CLI");

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load()?,
    };
    debug!("Report settings: {:?}", config.report);

    println!("🔍 Parsing log file...");
    let parsed = match ParsedLog::parse_file(&cli.log_file) {
        Ok(parsed) => parsed,
        Err(AnalyzerError::SourceNotFound(path)) => {
            error!("Log file not found: {}", path.display());
            println!("❌ Log file not found: {}", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", cli.log_file.display()));
        }
    };

    println!("📊 Analyzing data...");
    let analysis = Analyzer::new(config.report.clone()).analyze(&parsed);
    let report = build_report(&parsed, analysis, Local::now().naive_local());

    let saved = match &cli.output {
        Some(path) => write_report_to(&report, &cli.log_file, path, &JsonOutput).map(|()| path.clone()),
        None => write_sibling_report(&report, &cli.log_file, &JsonOutput),
    };
    let report_path = match saved {
        Ok(path) => path,
        Err(AnalyzerError::OutputCollision(path)) => {
            error!("Report path collides with the log file: {}", path.display());
            println!("❌ Report would overwrite the log file: {}", path.display());
            println!("   Choose another report path with --output <FILE>");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to save detailed report"),
    };
    println!("💾 Detailed report saved to: {}", report_path.display());
    println!();

    let text = ConsoleOutput::new(&config.report).generate(&report)?;
    print!("{}", text);
    info!("Report generation completed");

    Ok(())
}
