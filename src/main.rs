mod cli;
mod console;
mod editor;
mod error;
mod flashcards;
mod fmt;
mod models;
mod overview;
mod settings;
mod summary;
mod table;

use std::fs::OpenOptions;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use cli::{Cli, Commands};

/// Append to tally.log in the data directory. Logging is best effort.
fn init_logging(verbose: bool) {
    let path = settings::load_settings().log_path();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(level, config, file);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Budget { file: None }) {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Budget { file } => cli::budget::run(file),
        Commands::Cards { file } => cli::cards::run(file),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
