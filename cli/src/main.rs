use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use tabula_kernel::{dispatch, OperationClass};

mod config;
mod logging;

use config::{load_ledger, save_ledger, CliConfig};

/// Tabula Record Service CLI
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(about = "Run one record-service operation against a ledger snapshot", long_about = None)]
struct Cli {
    /// Path to config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the ledger snapshot JSON
    #[arg(long)]
    state: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the employee table under the given name
    Init { table: String },

    /// Run a mutating operation (init, write, new_emp)
    Invoke {
        function: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run a read-only operation (get_emp_by_id)
    Query {
        function: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn into_parts(self) -> (OperationClass, String, Vec<String>) {
        match self {
            Command::Init { table } => (OperationClass::Init, "init".into(), vec![table]),
            Command::Invoke { function, args } => (OperationClass::Invoke, function, args),
            Command::Query { function, args } => (OperationClass::Query, function, args),
        }
    }
}

/// Wrapper for JSON output
#[derive(Debug, Serialize)]
struct CliOutput {
    operation: String,
    payload: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(cli.state, cli.log_level);
    logging::init_logging(&config.log_level)?;

    let output = run(&config, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Dispatch one command against the snapshot at `config.state_path`.
///
/// The snapshot is rewritten only after a successful init or invoke.
fn run(config: &CliConfig, command: Command) -> Result<CliOutput> {
    let mut ledger = load_ledger(&config.state_path)?;
    tracing::debug!(state = %config.state_path.display(), "ledger snapshot loaded");

    let (class, operation, args) = command.into_parts();

    let payload = dispatch(&mut ledger, class, &operation, &args)?;

    if class != OperationClass::Query {
        save_ledger(&config.state_path, &ledger)?;
        tracing::debug!(state = %config.state_path.display(), "ledger snapshot saved");
    }

    Ok(CliOutput {
        operation,
        payload: payload.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    })
}
