//! Festagram UI - scenario replay entry point

use clap::Parser;
use festagram_ui::model::AppError;
use festagram_ui::schedule::PageTime;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Replay a Festagram page scenario and print the resulting UI effects as JSON lines
#[derive(Parser, Debug)]
#[command(name = "festagram-ui")]
#[command(version)]
#[command(about = "Replay a page scenario through the Festagram interaction core")]
pub struct Args {
    /// Path to scenario JSON file
    pub scenario: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop the page clock at this many milliseconds
    #[arg(long)]
    pub until: Option<u64>,

    /// Override the search debounce window (milliseconds)
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Path to log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    run(Args::parse())
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = festagram_ui::config::load_config_with_precedence(args.config.clone())?;
        let merged = festagram_ui::config::merge_config(config_file);
        let with_env = festagram_ui::config::apply_env_overrides(merged);
        festagram_ui::config::apply_cli_overrides(with_env, args.debounce_ms, args.log_file.clone())
    };

    festagram_ui::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let scenario = festagram_ui::page::load_scenario(&args.scenario)?;
    let mut runtime = scenario.build(&config)?;
    let mut presentation = scenario.presentation();
    let until = args.until.map(PageTime::from_millis);

    let log = runtime.replay(&scenario.events, until, &mut presentation);
    info!(
        scenario = %args.scenario.display(),
        records = log.len(),
        ended_at = %runtime.now(),
        "Replay finished"
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    for entry in &log {
        serde_json::to_writer(&mut out, entry)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}
