//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_verifier` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Prompting for a target when none is given
//! - Ctrl-C handling
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::future::Future;
use std::process;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use domain_verifier::config::DEFAULT_PROMPT_TARGET;
use domain_verifier::initialization::{init_crypto_provider, init_logger_with};
use domain_verifier::report::print_report;
use domain_verifier::{run_diagnostics, Config, NormalizedTarget};

/// Exit status after Ctrl-C (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), so the proxy URL can
    // live there instead of on the command line
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    match until_interrupted(verify(config), tokio::signal::ctrl_c()).await {
        Outcome::Finished(Ok(())) => Ok(()),
        Outcome::Finished(Err(e)) => {
            eprintln!("domain_verifier error: {e:#}");
            process::exit(1);
        }
        Outcome::Interrupted => {
            println!("\n{}", "Aborted by user.".red().bold());
            process::exit(EXIT_INTERRUPTED);
        }
    }
}

#[derive(Debug)]
enum Outcome {
    Finished(Result<()>),
    Interrupted,
}

/// Drives `work` until it completes or `signal` fires.
///
/// A signal future that fails (the handler could not be installed) is ignored and `work`
/// runs to completion.
async fn until_interrupted<W, S>(work: W, signal: S) -> Outcome
where
    W: Future<Output = Result<()>>,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = work => Outcome::Finished(result),
        Ok(()) = log_signal_error(signal) => Outcome::Interrupted,
    }
}

async fn log_signal_error<S>(signal: S) -> std::io::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    signal.await.inspect_err(|e| log::warn!("Ctrl-C handler unavailable: {e}"))
}

async fn verify(config: Config) -> Result<()> {
    let raw = match &config.target {
        Some(target) => target.clone(),
        None => prompt_target().await?,
    };
    let target =
        NormalizedTarget::parse(&raw).with_context(|| format!("Invalid target '{raw}'"))?;

    let report = run_diagnostics(&config, target).await?;
    print_report(&report, config.format)
}

/// Asks for a target on stdin; an empty answer selects `DEFAULT_PROMPT_TARGET`.
async fn prompt_target() -> Result<String> {
    let mut stdout = tokio::io::stdout();
    let prompt = format!(
        "{} [{}]: ",
        "Enter URL to verify".green().bold(),
        DEFAULT_PROMPT_TARGET
    );
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read target from stdin")?;

    let answer = line.trim();
    Ok(if answer.is_empty() {
        DEFAULT_PROMPT_TARGET.to_string()
    } else {
        answer.to_string()
    })
}
