pub mod budget;
pub mod cards;
pub mod init;
pub mod status;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::console::Console;
use crate::error::Result;

/// Report an operation's failure without ending the session. The console's
/// own I/O errors still propagate.
pub(crate) fn recover<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: Result<()>,
) -> Result<()> {
    if let Err(e) = result {
        log::error!("{e}");
        console.say(format!("Error: {e}").red())?;
    }
    Ok(())
}

pub(crate) fn file_or(file: Option<String>, default: PathBuf) -> PathBuf {
    file.map(PathBuf::from).unwrap_or(default)
}

#[derive(Parser)]
#[command(name = "tally", about = "Budget tracker and flashcard trainer for the terminal.")]
pub struct Cli {
    /// Write debug detail to the log file
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and save settings.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Track spending in a CSV table (the default command).
    Budget {
        /// CSV file to work on (default: <data_dir>/budget.csv)
        #[arg(long)]
        file: Option<String>,
    },
    /// Study with flashcards.
    Cards {
        /// JSON file holding the deck (default: <data_dir>/flashcards.json)
        #[arg(long)]
        file: Option<String>,
    },
    /// Show settings and data file summaries.
    Status,
}
