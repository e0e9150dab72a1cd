//! dpviet - Vietnamese slang localization for subtitle scripts
//!
//! Entry point for the command line tool. Reads a subtitle or plain-text
//! script, rewrites its dialogue with the configured rule tables and writes
//! the result next to the original under a prefixed name.

use anyhow::Result;
use std::path::Path;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use dpviet::cli::{Args, Commands};
use dpviet::config::{Config, TonePolicy};
use dpviet::error::DpVietError;
use dpviet::subtitle::LineKind;
use dpviet::workflow::Workflow;

const MALFORMED_INPUT_HINT: &str =
    "Hint: this is usually caused by the file format. Make sure the file is a standard SRT or plain-text script.";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting dpviet - subtitle slang localization");

    if let Err(e) = run(args).await {
        error!("Processing failed: {}", e);
        eprintln!("Processing failed: {}", e);
        eprintln!("{}", MALFORMED_INPUT_HINT);
        std::process::exit(1);
    }

    info!("dpviet completed successfully");
    Ok(())
}

/// `--config` wins; otherwise a config.toml in the working directory, then defaults
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::from_file(path)?);
    }

    let local = Path::new("config.toml");
    if local.exists() {
        info!("Found config.toml in current directory, loading...");
        Ok(Config::from_file(local)?)
    } else {
        Ok(Config::default())
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Rewrite { input, output, output_dir, tone, seed, json } => {
            info!("Rewriting script: {}", input.display());

            config.tone.policy = parse_tone_policy(tone.as_deref(), seed, config.tone.policy)?;

            let workflow = Workflow::new(config)?;
            let outcome = workflow
                .process_single_file(&input, output.as_deref(), output_dir.as_deref())
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                println!("Wrote {}", outcome.output.display());
                println!(
                    "{} lines: {} dialogue ({} changed), {} structural",
                    outcome.report.total_lines,
                    outcome.report.dialogue,
                    outcome.report.changed,
                    outcome.report.structural()
                );
            }
        }
        Commands::Batch { input_dir, output_dir, tone, seed } => {
            info!("Processing directory: {}", input_dir.display());

            config.tone.policy = parse_tone_policy(tone.as_deref(), seed, config.tone.policy)?;

            let workflow = Workflow::new(config)?;
            let summary = workflow.process_directory(&input_dir, output_dir.as_deref()).await?;

            println!(
                "Processed {} files, skipped {}, failed {}",
                summary.processed.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
            for (path, reason) in &summary.failed {
                eprintln!("  {}: {}", path.display(), reason);
            }
            if !summary.failed.is_empty() {
                eprintln!("{}", MALFORMED_INPUT_HINT);
            }
        }
        Commands::Classify { input } => {
            let workflow = Workflow::new(config)?;
            let lines = workflow.classify_file(&input).await?;

            println!("{:<6} {:<10} {}", "Line", "Kind", "Content");
            println!("{}", "-".repeat(65));
            for (idx, (kind, content)) in lines.iter().enumerate() {
                let shown = if *kind == LineKind::Blank { "" } else { content.as_str() };
                println!("{:<6} {:<10} {}", idx + 1, kind, shown);
            }
        }
        Commands::InitConfig { output } => {
            info!("Writing default configuration to {}", output.display());
            Config::default().save_to_file(&output)?;
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}

/// Log to stderr and to a daily file under `.dpviet/log`
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".dpviet").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let (file_writer, guard) = non_blocking(rolling::daily(&log_dir, "dpviet.log"));
    // the writer flushes until the guard drops, which must not happen before exit
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries reports and --json output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Log level {}, writing to {}", log_level, log_dir.join("dpviet.log").display());
    Ok(())
}

/// Parse the tone policy from command line flags. A bare `--seed` implies seeded mode.
fn parse_tone_policy(mode: Option<&str>, seed: Option<u64>, current: TonePolicy) -> Result<TonePolicy> {
    let Some(mode) = mode else {
        return Ok(seed.map_or(current, |seed| TonePolicy::Seeded { seed }));
    };

    match mode.to_lowercase().as_str() {
        "fixed" => Ok(match current {
            TonePolicy::Fixed { index } => TonePolicy::Fixed { index },
            _ => TonePolicy::Fixed { index: 0 },
        }),
        "seeded" => {
            let seed = seed
                .or(match current {
                    TonePolicy::Seeded { seed } => Some(seed),
                    _ => None,
                })
                .ok_or_else(|| DpVietError::Config("Seeded tone mode needs --seed".to_string()))?;
            Ok(TonePolicy::Seeded { seed })
        }
        "random" => Ok(TonePolicy::Random),
        _ => Err(DpVietError::Config(format!(
            "Invalid tone mode '{}'. Valid modes: fixed, seeded, random",
            mode
        )).into()),
    }
}
