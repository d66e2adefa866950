// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! hudsec - offline recovery of secrets stored by an automation server.
//!
//! This is the binary entry point. It resolves the input files, derives the
//! confidentiality key once, then decrypts either every token in a
//! credentials document or tokens typed at a prompt.

mod inputs;
mod interactive;
mod recover;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use colored::Colorize;
use hudsec_config::model::HudsecConfig;
use hudsec_core::error::HudsecError;
use hudsec_crypto::{load_confidentiality_key, ConfidentialityKey};
use hudsec_extract::TokenExtractor;
use thiserror::Error;
use tracing::{debug, info};

use crate::inputs::{Mode, PlanError, RunPlan};

/// Recover secrets from an automation server's master key, wrapped
/// confidentiality key and credentials document.
#[derive(Parser, Debug)]
#[command(name = "hudsec", version, about, long_about = None)]
struct Cli {
    /// Prompt for encrypted secrets instead of reading a credentials document.
    #[arg(short, long)]
    interactive: bool,

    /// `<server_home>`, or `<master.key> <hudson.util.Secret> [credentials.xml]`.
    #[arg(value_name = "PATH", num_args = 1..=3, required = true)]
    paths: Vec<PathBuf>,

    /// Load configuration from this file instead of the standard locations.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Additional element name whose content holds a secret. Repeatable.
    #[arg(long = "tag", value_name = "NAME")]
    tags: Vec<String>,

    /// Raise the log level; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Anything that ends a run with exit code 1.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Run(#[from] HudsecError),
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => hudsec_config::load_and_validate_path(path),
        None => hudsec_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            hudsec_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&effective_level(&config.log.level, cli.verbose));

    if let Err(e) = run(&cli, &config) {
        report(&e);
        std::process::exit(1);
    }
}

fn report(error: &CliError) {
    match error {
        CliError::Plan(PlanError::Usage(reason)) => {
            eprintln!("{}: {reason}", "error".red());
            eprintln!("{}", inputs::usage());
        }
        CliError::Plan(PlanError::MissingFiles(paths)) => {
            eprintln!(
                "{}: failed finding required files where they were expected",
                "error".red()
            );
            for path in paths {
                eprintln!("  missing: {}", path.display());
            }
        }
        CliError::Run(e) => eprintln!("{}: {e}", "error".red()),
    }
}

fn run(cli: &Cli, config: &HudsecConfig) -> Result<(), CliError> {
    let plan = inputs::plan(&cli.paths, cli.interactive, &config.layout)?;
    debug!(?plan, "resolved inputs");

    let key = derive_key(&plan)?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match &plan.mode {
        Mode::File(document_path) => {
            let extractor = build_extractor(config, &cli.tags)?;
            let bytes = std::fs::read(document_path)
                .map_err(|e| HudsecError::file_access(document_path, e))?;
            let document = String::from_utf8_lossy(&bytes);
            info!(
                path = %document_path.display(),
                tags = extractor.tags().len(),
                "scanning document"
            );

            recover::recover_document(
                &document,
                &extractor,
                &key,
                &mut stdout.lock(),
                &mut stderr.lock(),
            )
            .map_err(|e| HudsecError::Internal(format!("failed writing output: {e}")))?;
        }
        Mode::Interactive => {
            let mut lines = interactive::TerminalLines::new()?;
            interactive::run(&mut lines, &key, &mut stdout.lock(), &mut stderr.lock())?;
        }
    }
    Ok(())
}

fn derive_key(plan: &RunPlan) -> Result<ConfidentialityKey, HudsecError> {
    let key = load_confidentiality_key(&plan.master_key, &plan.wrapped_key)?;
    info!("confidentiality key derived");
    Ok(key)
}

/// Configured tags followed by the ones given with `--tag`.
fn build_extractor(
    config: &HudsecConfig,
    extra: &[String],
) -> Result<TokenExtractor, HudsecError> {
    let tags = config
        .extract
        .all_tags()
        .chain(extra.iter().map(String::as_str));
    TokenExtractor::new(tags)
}

/// Level after applying `-v` flags on top of the configured one.
fn effective_level(configured: &str, verbose: u8) -> String {
    const LADDER: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

    let configured = configured.trim().to_ascii_lowercase();
    let base = LADDER.iter().position(|l| *l == configured).unwrap_or(1);
    let index = (base + usize::from(verbose)).min(LADDER.len() - 1);
    LADDER[index].to_string()
}

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hudsec={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
