// crates/frontline-cli/src/main.rs
// ============================================================================
// Module: Classify CLI Entry Point
// Description: Command-line front end for hostname fingerprinting.
// Purpose: Probe one hostname and print the inferred front-end technology.
// Dependencies: clap, frontline-config, frontline-core, frontline-probes, tokio
// ============================================================================

//! ## Overview
//! `classify <hostname>` runs every enabled probe concurrently, classifies
//! the merged evidence, and prints the result. Only setup problems (bad
//! arguments, unreadable configuration, probe construction) fail the command;
//! probe failures are logged to stderr and leave their evidence absent.
//!
//! Security posture: the hostname and everything the target returns are
//! untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use frontline_cli::LogLevel;
use frontline_cli::StderrLogObserver;
use frontline_cli::render_json;
use frontline_cli::render_text;
use frontline_config::FrontlineConfig;
use frontline_core::ClassificationPolicy;
use frontline_core::Fingerprinter;
use frontline_core::ProbeOrchestrator;
use frontline_core::Target;
use frontline_probes::DnsResolver;
use frontline_probes::SystemResolver;
use frontline_probes::builtin_probes;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "classify",
    about = "Infer the front-end technology serving a hostname",
    disable_version_flag = true
)]
struct Cli {
    /// Hostname to fingerprint.
    #[arg(value_name = "HOSTNAME")]
    hostname: Option<String>,
    /// Print raw per-probe evidence, the rule trace, and every probe event.
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
    /// Path to a configuration file (overrides `FRONTLINE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Per-probe timeout in milliseconds (overrides the configured value).
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
}

/// Report output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Full report as JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for setup failures.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, runs one fingerprint, and prints the report.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        write_stdout(&format!("classify {}\n", env!("CARGO_PKG_VERSION")))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(hostname) = cli.hostname.as_deref() else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config(&cli)?;
    let target = Target::new(hostname)
        .map_err(|err| CliError::new(format!("invalid hostname: {err}")))?;
    let fingerprinter = build_fingerprinter(&config, cli.debug)?;
    let report = fingerprinter.fingerprint(&target).await;

    let output = match cli.format {
        OutputFormat::Text => render_text(&report, cli.debug),
        OutputFormat::Json => {
            let mut json = render_json(&report)
                .map_err(|err| CliError::new(format!("failed to serialize report: {err}")))?;
            json.push('\n');
            json
        }
    };
    write_stdout(&output)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Loads configuration and applies command-line overrides.
fn load_config(cli: &Cli) -> CliResult<FrontlineConfig> {
    let mut config = FrontlineConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.probes.timeout_ms = timeout_ms;
        config.validate().map_err(|err| CliError::new(err.to_string()))?;
    }
    Ok(config)
}

/// Builds the probe set, orchestrator, and policy from configuration.
fn build_fingerprinter(config: &FrontlineConfig, debug: bool) -> CliResult<Fingerprinter> {
    let resolver: Arc<dyn DnsResolver> = Arc::new(SystemResolver::from_system_conf());
    let descriptors =
        builtin_probes(&config.probes.builtin_configs(), &config.probes.enabled, &resolver)
            .map_err(|err| CliError::new(format!("failed to initialize probes: {err}")))?;
    let level = if debug { LogLevel::Debug } else { LogLevel::Failures };
    let orchestrator =
        ProbeOrchestrator::new(descriptors, Arc::new(StderrLogObserver::stderr(level)))
            .map_err(|err| CliError::new(format!("failed to start probes: {err}")))?;
    let policy = ClassificationPolicy::standard(&config.signatures)
        .map_err(|err| CliError::new(format!("invalid signature table: {err}")))?;
    Ok(Fingerprinter::new(orchestrator, policy))
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Prints CLI help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout("\n")
}

/// Writes text to stdout.
fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
