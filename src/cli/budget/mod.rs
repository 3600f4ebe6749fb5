mod edit;
mod view;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use rand::Rng;

use crate::cli::{file_or, recover};
use crate::console::{Confirm, Console};
use crate::error::Result;
use crate::settings::load_settings;
use crate::table::Table;

const MENU: &[&str] = &[
    "1) Load your data",
    "2) View your data",
    "3) Add new entry (row)",
    "4) Add new column",
    "5) Delete row",
    "6) Delete column",
    "7) Show summaries",
    "8) Save data",
    "9) Exit program",
];

/// The table being edited and where it lives on disk.
struct Session {
    table: Table,
    path: PathBuf,
    dirty: bool,
    /// The file exists but couldn't be loaded; saving would replace it.
    unreadable: bool,
}

impl Session {
    fn open<R: BufRead, W: Write>(console: &mut Console<R, W>, path: &Path) -> Result<Self> {
        let (table, unreadable) = match load(console, path) {
            Ok(table) => (table, false),
            Err(e) => {
                log::warn!("could not load {}: {e}", path.display());
                console.say(format!("Error loading {}: {e}", path.display()).red())?;
                console.say("Starting with an empty set.".yellow())?;
                (Table::default(), true)
            }
        };
        Ok(Self {
            table,
            path: path.to_path_buf(),
            dirty: false,
            unreadable,
        })
    }

    fn reload<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        if self.dirty
            && console.confirm("You have unsaved changes. Discard them and reload?")? != Confirm::Yes
        {
            console.say("Reload cancelled.")?;
            return Ok(());
        }
        let result = load(console, &self.path).map(|table| {
            self.table = table;
            self.dirty = false;
            self.unreadable = false;
        });
        recover(console, result)
    }

    fn save<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<()> {
        if self.unreadable {
            let prompt = format!(
                "{} could not be loaded. Overwrite it with the current table?",
                self.path.display()
            );
            if console.confirm(&prompt)? != Confirm::Yes {
                return console.say("Save cancelled.");
            }
        }
        let result = self.table.save(&self.path).map(|()| {
            self.dirty = false;
            self.unreadable = false;
        });
        if result.is_ok() {
            console.say(format!("Dataset saved to {}.", self.path.display()).green())?;
        }
        recover(console, result)
    }
}

fn load<R: BufRead, W: Write>(console: &mut Console<R, W>, path: &Path) -> Result<Table> {
    let existed = path.exists();
    let table = Table::load_or_default(path)?;
    if existed {
        console.say(
            format!(
                "Loaded {} rows x {} columns from {}.",
                table.len(),
                table.column_count(),
                path.display()
            )
            .green(),
        )?;
    } else {
        console.say("No dataset found. Starting with an empty set.".yellow())?;
    }
    Ok(table)
}

fn show_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<()> {
    console.say("\nWelcome to the Budget Tracker. Please select from the menu below.\n".bold())?;
    for item in MENU {
        console.say(item)?;
    }
    console.blank()
}

pub fn run(file: Option<String>) -> Result<()> {
    let path = file_or(file, load_settings().budget_path());
    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());
    run_session(&mut console, &path, &mut rand::thread_rng())
}

pub fn run_session<R: BufRead, W: Write, G: Rng>(
    console: &mut Console<R, W>,
    path: &Path,
    rng: &mut G,
) -> Result<()> {
    log::info!("budget session on {}", path.display());
    let mut session = Session::open(console, path)?;

    loop {
        show_menu(console)?;
        let choice = console
            .read_line("Enter your choice from 1-9: ")?
            .unwrap_or_else(|| "9".to_string());

        match choice.as_str() {
            "1" => session.reload(console)?,
            "2" => view::data_overview(&session.table, console, rng)?,
            "3" => session.dirty |= edit::add_rows(&mut session.table, console)?,
            "4" => session.dirty |= edit::add_columns(&mut session.table, console)?,
            "5" => session.dirty |= edit::delete_row(&mut session.table, console)?,
            "6" => session.dirty |= edit::delete_column(&mut session.table, console)?,
            "7" => view::summaries(&session.table, console)?,
            "8" => session.save(console)?,
            "9" => {
                if session.dirty {
                    console.say("Unsaved changes were not written to disk.".yellow())?;
                }
                console.say("Now exiting the program.")?;
                break;
            }
            _ => console.say("Please enter a value between 1-9.".red())?,
        }
    }
    Ok(())
}
