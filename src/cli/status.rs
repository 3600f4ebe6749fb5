use std::path::Path;

use crate::error::Result;
use crate::flashcards::Deck;
use crate::fmt::format_bytes;
use crate::settings::{load_settings, settings_file_exists};
use crate::table::Table;

fn file_line(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let size = std::fs::metadata(path)?.len();
    Ok(Some(format!("{} ({})", path.display(), format_bytes(size))))
}

pub fn run() -> Result<()> {
    let settings = load_settings();

    println!("Data dir:    {}", settings.data_dir);
    println!(
        "Settings:    {}",
        if settings_file_exists() { "saved" } else { "defaults (run `tally init` to save)" }
    );

    let budget = settings.budget_path();
    println!();
    match file_line(&budget)? {
        Some(line) => {
            println!("Budget:      {line}");
            match Table::load(&budget) {
                Ok(table) => {
                    println!("Rows:        {}", table.len());
                    println!("Columns:     {}", table.columns().join(", "));
                }
                Err(e) => println!("Unreadable:  {e}"),
            }
        }
        None => println!("Budget:      {} (not created yet)", budget.display()),
    }

    let cards = settings.flashcards_path();
    println!();
    match file_line(&cards)? {
        Some(line) => {
            println!("Flashcards:  {line}");
            match Deck::load(&cards) {
                Ok(deck) => println!("Cards:       {}", deck.len()),
                Err(e) => println!("Unreadable:  {e}"),
            }
        }
        None => println!("Flashcards:  {} (not created yet)", cards.display()),
    }

    Ok(())
}
