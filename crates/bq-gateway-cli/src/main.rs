// crates/bq-gateway-cli/src/main.rs
// ============================================================================
// Module: BQ Gateway CLI Entry Point
// Description: Command dispatcher for serving and contract workflows.
// Purpose: Start the gateway, validate config, and manage catalog artifacts.
// Dependencies: clap, bq-gateway-config, bq-gateway-contract, bq-gateway-mcp.
// ============================================================================

//! ## Overview
//! The `bq-gateway` binary loads configuration, builds the BigQuery client,
//! and serves the gateway over HTTP or stdio. It also validates configuration
//! files and writes or verifies the capability catalog artifacts. All output
//! goes through the message catalog; errors go to stderr with a failure exit
//! code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use bq_gateway_cli::t;
use bq_gateway_config::GatewayConfig;
use bq_gateway_config::ServerTransport;
use bq_gateway_contract::ContractBuilder;
use bq_gateway_mcp::GatewayServer;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "bq-gateway", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Capability catalog artifact utilities.
    Contract {
        /// Selected contract subcommand.
        #[command(subcommand)]
        command: ContractCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to bq-gateway.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to bq-gateway.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Contract subcommands.
#[derive(Subcommand, Debug)]
enum ContractCommand {
    /// Generate capability catalog artifacts.
    Generate(ContractOutputArgs),
    /// Verify capability catalog artifacts.
    Check(ContractOutputArgs),
}

/// Output directory arguments for contract commands.
#[derive(Args, Debug)]
struct ContractOutputArgs {
    /// Artifact directory (defaults to docs/generated/bq-gateway).
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-formatted messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a formatted message.
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

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Contract {
            command,
        } => command_contract(command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = GatewayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    let server = GatewayServer::from_config(config)
        .map_err(|err| CliError::new(t!("serve.init_failed", error = err)))?;
    let banner = match (server.transport(), server.bind_addr()) {
        (ServerTransport::Http, Some(addr)) => t!("serve.listening", addr = addr),
        _ => t!("serve.stdio"),
    };
    write_stderr_line(&banner).map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = GatewayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let path = config
        .source_path
        .as_ref()
        .map_or_else(|| t!("config.path.default"), |path| path.display().to_string());
    write_stdout_line(&t!("config.validate.ok", path = path))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Contract Commands
// ============================================================================

/// Dispatches contract subcommands.
fn command_contract(command: ContractCommand) -> CliResult<ExitCode> {
    match command {
        ContractCommand::Generate(args) => command_contract_generate(args),
        ContractCommand::Check(args) => command_contract_check(args),
    }
}

/// Executes contract generation.
fn command_contract_generate(args: ContractOutputArgs) -> CliResult<ExitCode> {
    let output_dir = args.out.unwrap_or_else(ContractBuilder::default_output_dir);
    let builder = ContractBuilder::new(output_dir);
    let manifest = builder
        .write()
        .map_err(|err| CliError::new(t!("contract.generate.failed", error = err)))?;
    write_stdout_line(&t!(
        "contract.generate.ok",
        count = manifest.artifacts.len(),
        dir = builder.output_dir().display()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes contract verification.
fn command_contract_check(args: ContractOutputArgs) -> CliResult<ExitCode> {
    let output_dir = args.out.unwrap_or_else(ContractBuilder::default_output_dir);
    let builder = ContractBuilder::new(output_dir);
    builder
        .verify_output(builder.output_dir())
        .map_err(|err| CliError::new(t!("contract.check.failed", error = err)))?;
    write_stdout_line(&t!("contract.check.ok", dir = builder.output_dir().display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
