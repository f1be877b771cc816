//! SmartNotes command-line front end.
//!
//! # Responsibility
//! - Render the board as plain text and map subcommands to board actions.
//! - Keep all business rules inside `smartnotes_core`.

mod commands;
mod config;
mod error;
mod prompt;

use commands::{execute, write_help, write_version, Action, Invocation, USAGE};
use config::CliConfig;
use error::CliError;
use log::info;
use smartnotes_core::db::open_db;
use smartnotes_core::{init_logging, ClockIdGenerator, NoteBoard, SqliteKvStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(CliError::Usage(message)) => {
            eprintln!("{message}\n\n{USAGE}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("smartnotes: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<bool, CliError> {
    let invocation = Invocation::parse(args)?;
    let mut stdout = std::io::stdout().lock();
    let command = match invocation.action {
        Action::Help => return write_help(&mut stdout),
        Action::Version => return write_version(&mut stdout),
        Action::Board(command) => command,
    };

    let config = CliConfig::from_env()?;
    init_logging(&config.log_level, config.log_target.clone())?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let mut board = NoteBoard::load(
        SqliteKvStore::new(&conn),
        prompt::TerminalPrompt::new(invocation.assume_yes),
        ClockIdGenerator::new(),
    );
    execute(&mut board, command, &mut stdout)
}

