//! Argument parsing and command dispatch.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use warden_config::LocaleCode;
use warden_health::ApplicationMode;
use warden_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};

use crate::commands::{actions, audit};

/// Parses process arguments, installs logging, executes the requested command and returns the
/// process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage(&err),
    };
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Parses `args` and executes the command, writing command output to `out`. Logging is left
/// untouched so callers control the subscriber.
pub fn run_from<I, T>(args: I, out: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => execute(cli, out),
        Err(err) => report_usage(&err),
    }
}

fn report_usage(err: &clap::Error) -> i32 {
    // Help and version requests are reported through the same channel as usage errors.
    let _ = err.print();
    err.exit_code()
}

fn execute(cli: Cli, out: &mut dyn Write) -> i32 {
    match dispatch(cli, out) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn dispatch(cli: Cli, out: &mut dyn Write) -> CliResult<Outcome> {
    let ctx = Context {
        locale: cli.locale,
        format: cli.format,
    };
    match cli.command {
        Command::Actions(command) => match command {
            ActionsCommand::Validate(args) => actions::handle_validate(&ctx, &args, out),
            ActionsCommand::Describe(args) => actions::handle_describe(&ctx, &args, out),
        },
        Command::Audit(args) => audit::handle_audit(&ctx, &args, out),
    }
}

#[derive(Parser)]
#[command(
    name = "warden",
    about = "Inspect action settings and audit configuration health"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "WARDEN_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "WARDEN_LOG_FORMAT",
        value_parser = parse_log_format,
        help = "Log output format (pretty or json)"
    )]
    log_format: Option<LogFormat>,
    #[arg(
        long,
        global = true,
        env = "WARDEN_LOCALE",
        value_parser = parse_locale,
        default_value = "en",
        help = "Locale used for rendered messages"
    )]
    locale: LocaleCode,
    #[arg(
        long = "format",
        alias = "output",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work with action setting documents.
    #[command(subcommand)]
    Actions(ActionsCommand),
    /// Audit a configuration snapshot.
    Audit(AuditArgs),
}

#[derive(Subcommand)]
pub(crate) enum ActionsCommand {
    /// Validate an action document and print the first problem, if any.
    Validate(ValidateArgs),
    /// Render an action document for operators or API consumers.
    Describe(DescribeArgs),
}

#[derive(Args)]
pub(crate) struct ValidateArgs {
    #[arg(help = "Path to the action document")]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Treat an empty value as invalid")]
    pub(crate) required: bool,
}

#[derive(Args)]
pub(crate) struct DescribeArgs {
    #[arg(help = "Path to the action document")]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Emit the API mapping, including certificate facts, as JSON")]
    pub(crate) api: bool,
}

#[derive(Args)]
pub(crate) struct AuditArgs {
    #[arg(help = "Path to the configuration snapshot")]
    pub(crate) snapshot: PathBuf,
    #[arg(long, value_enum, default_value_t = ModeArg::Running)]
    pub(crate) mode: ModeArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum ModeArg {
    Running,
    Configuration,
}

impl From<ModeArg> for ApplicationMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Running => Self::Running,
            ModeArg::Configuration => Self::Configuration,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|err| err.to_string())
}

fn parse_locale(value: &str) -> Result<LocaleCode, String> {
    value.parse::<LocaleCode>()
}

/// Options shared by every command handler.
pub(crate) struct Context {
    pub(crate) locale: LocaleCode,
    pub(crate) format: OutputFormat,
}

/// Successful command completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    /// The inspected document failed validation.
    Invalid,
}

impl Outcome {
    const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Invalid => 2,
        }
    }
}

#[derive(Debug)]
pub(crate) struct CliError(anyhow::Error);

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self(error.into())
    }

    const fn exit_code(&self) -> i32 {
        1
    }

    fn display_message(&self) -> String {
        format!("{:#}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "warden",
            "audit",
            "snapshot.json",
            "--mode",
            "configuration",
            "--locale",
            "de-DE",
            "--format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.locale, LocaleCode::De);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Audit(args) => {
                assert!(matches!(args.mode, ModeArg::Configuration));
            }
            Command::Actions(_) => panic!("expected audit command"),
        }
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(Cli::try_parse_from(["warden", "--locale", "xx", "audit", "s.json"]).is_err());
    }

    #[test]
    fn failures_exit_with_one_and_keep_context() {
        let err = CliError::failure(anyhow!("inner").context("outer"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.display_message(), "outer: inner");
        assert_eq!(Outcome::Invalid.exit_code(), 2);
    }
}
