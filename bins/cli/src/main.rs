//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use clap::{Args, Parser, Subcommand};
use commands::{
    SchemaKind, ValidateInput, run_check_cpf, run_check_password, run_check_text,
    run_config_schema, run_config_show, run_info, run_session_logout, run_session_show,
    run_validate_registration, run_validate_submission,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, format_error_output};
use std::io::{self, Write};
use std::path::PathBuf;
use ubs_diag_config::{ClientConfig, ValidatedClientConfig, load_client_config_std_env};
use ubs_diag_shared::ErrorEnvelope;

#[derive(Debug, Parser)]
#[command(
    name = "ubs-diag",
    version,
    about = "Validation and session tools for UBS situational-diagnosis forms",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Optional config file path (JSON/TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Check a single value.
    Check {
        #[command(subcommand)]
        command: CheckCommands,
    },
    /// Validate a request payload.
    Validate {
        #[command(subcommand)]
        command: ValidateCommands,
    },
    /// Inspect or clear the stored session.
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CheckCommands {
    /// Verify a CPF and print its canonical form.
    Cpf {
        /// CPF, punctuated or not.
        value: String,
    },
    /// List the password requirements a value misses.
    Password {
        /// Password to check.
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
        /// Read the password from stdin.
        #[arg(long, conflicts_with = "value")]
        stdin: bool,
    },
    /// Report SQL and script markers in a value.
    Text {
        /// Text to scan.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(Debug, Subcommand)]
enum ValidateCommands {
    /// Validate a registration form payload.
    Registration(InputArgs),
    /// Check a report snapshot for submission readiness.
    Submission(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Payload encoded as JSON.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    input_json: Option<String>,
    /// Path to a JSON payload file.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn to_input(&self) -> Result<ValidateInput, CliError> {
        match (self.input_json.as_ref(), self.file.as_ref()) {
            (Some(json), _) => Ok(ValidateInput::Json(json.clone())),
            (None, Some(path)) => Ok(ValidateInput::File(path.clone())),
            (None, None) => Err(CliError::MissingInput("--input-json or --file")),
        }
    }
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    /// Show the stored user and whether a token is present.
    Show,
    /// Remove the stored token and user.
    Logout,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show the effective config after defaults, file, and env are merged.
    Show,
    /// Print the JSON Schema of a request payload.
    Schema {
        /// Request kind.
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    let config = load_client_config_std_env(cli.config.as_deref(), None)
        .map(ValidatedClientConfig::into_inner);

    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    logging::init_tracing(&logging, mode.no_progress);

    match run(&cli, mode, &config) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(
    cli: &Cli,
    mode: OutputMode,
    config: &Result<ClientConfig, ErrorEnvelope>,
) -> Result<CliOutput, CliError> {
    match &cli.command {
        Commands::Info => run_info(mode),
        Commands::Check { command } => match command {
            CheckCommands::Cpf { value } => run_check_cpf(mode, value),
            CheckCommands::Password { value, stdin } => {
                let password = commands::check::resolve_password(*stdin, value.as_deref())?;
                run_check_password(mode, &password)
            },
            CheckCommands::Text { value } => run_check_text(mode, value),
        },
        Commands::Validate { command } => match command {
            ValidateCommands::Registration(args) => {
                run_validate_registration(mode, &args.to_input()?)
            },
            ValidateCommands::Submission(args) => run_validate_submission(mode, &args.to_input()?),
        },
        Commands::Session { command } => {
            let config = match config {
                Ok(config) => config,
                Err(error) => return Ok(format_error_output(mode, error)),
            };
            match command {
                SessionCommands::Show => run_session_show(mode, config),
                SessionCommands::Logout => run_session_logout(mode, config),
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => match config {
                Ok(config) => run_config_show(mode, cli.config.as_deref(), config),
                Err(error) => Ok(format_error_output(mode, error)),
            },
            ConfigCommands::Schema { kind } => run_config_schema(mode, *kind),
        },
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout
        .write_all(output.stdout.as_bytes())
        .map_err(CliError::Output)?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr
            .write_all(output.stderr.as_bytes())
            .map_err(CliError::Output)?;
        stderr.flush().map_err(CliError::Output)?;
    }

    Ok(())
}
