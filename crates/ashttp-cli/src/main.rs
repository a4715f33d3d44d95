use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use ashttp_core::{Command, EXAMPLE_QUERY, ParseError, QueryView, parse_base64_query};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ASHTTP_BUILD_COMMIT"),
    " ",
    env!("ASHTTP_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ashttp")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for base64-encoded binary ActiveSync query values.",
    long_about = None,
    after_help = "Examples:\n  ashttp query decode\n  ashttp query decode 'jQEJBAV0ZXN0MQQBAAAABXBob25l' --pretty\n  ashttp query decode --input request.txt -o query.json\n  ashttp query commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on binary query values.
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },
}

#[derive(Subcommand, Debug)]
enum QueryCommands {
    /// Decode a base64 query value (or request URL) and print it as JSON.
    #[command(
        after_help = "Without QUERY or --input, the built-in example query is decoded.\nSet RUST_LOG=debug to trace decoding on stderr."
    )]
    Decode {
        /// Base64 query value, `?`-prefixed query string, or full request URL
        query: Option<String>,

        /// Read the query value from a file
        #[arg(long, conflicts_with = "query")]
        input: Option<PathBuf>,

        /// Write JSON to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// List the known command codes.
    Commands {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query { command } => match command {
            QueryCommands::Decode {
                query,
                input,
                output,
                pretty,
                compact,
                quiet,
            } => cmd_query_decode(query, input, output, pretty, compact, quiet),
            QueryCommands::Commands { json } => cmd_query_commands(json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        let hint = match &err {
            ParseError::Base64(_) => "the query value must use the standard base64 alphabet",
            ParseError::Query(_) => "the decoded bytes are not a valid binary query",
        };
        CliError::new(err.to_string(), Some(hint.to_string()))
    }
}

fn cmd_query_decode(
    query: Option<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let encoded = match (query, input) {
        (Some(query), _) => query,
        (None, Some(path)) => read_query_file(&path)?,
        (None, None) => {
            tracing::info!("no query supplied, decoding built-in example");
            EXAMPLE_QUERY.to_string()
        }
    };

    let decoded = parse_base64_query(&encoded)?;
    let view = QueryView::from(&decoded);
    let json = serialize_view(&view, pretty, compact)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        eprintln!("OK: query written -> {}", output.display());
    }
    Ok(())
}

fn read_query_file(path: &Path) -> Result<String, CliError> {
    if !path.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", path.display()),
            Some("pass a file containing the base64 query value".to_string()),
        ));
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    Ok(contents)
}

fn serialize_view(view: &QueryView, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(view)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(view)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

#[derive(Serialize)]
struct CommandEntry {
    code: u8,
    name: &'static str,
}

fn cmd_query_commands(json: bool) -> Result<(), CliError> {
    if json {
        let entries: Vec<CommandEntry> = Command::ALL
            .into_iter()
            .map(|command| CommandEntry {
                code: command.code(),
                name: command.name(),
            })
            .collect();
        let rendered =
            serde_json::to_string_pretty(&entries).context("JSON serialization failed")?;
        println!("{}", rendered);
        return Ok(());
    }

    for command in Command::ALL {
        println!("{}\t{}", command.code(), command.name());
    }
    Ok(())
}
